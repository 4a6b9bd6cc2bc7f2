#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! REST API for sending client emails

use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};

use anyhow::Result;
use clap::Parser;
use freelancer_mail::{
    domain::communication::deliveries::{DeliveryConfig, EmailDeliveryServiceImpl},
    infrastructure::{
        email::smtp::{SMTPConfig, SMTPMailer},
        http::{
            servers::{http::HttpServer, https::HttpsServer},
            state::AppState,
            HttpServerConfig, Server,
        },
    },
};
use tracing::info;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The SMTP configuration
    #[clap(flatten)]
    pub smtp: SMTPConfig,

    /// Where emails may be delivered
    #[clap(flatten)]
    pub delivery: DeliveryConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Not loading .env: {}", e);
    }

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    if !args.delivery.custom_domain_verified {
        info!(
            test_recipient = %args.delivery.test_recipient,
            "custom domain not verified, emails will be delivered to the test inbox"
        );
    }

    let mailer = Arc::new(SMTPMailer::new(args.smtp));
    let state = AppState::new(EmailDeliveryServiceImpl::new(mailer, args.delivery));

    let address = SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), args.server.http_port);

    match (&args.server.cert_path, &args.server.key_path) {
        (Some(cert_path), Some(key_path)) => {
            let _ = rustls::crypto::ring::default_provider().install_default();

            HttpsServer::new(address, cert_path, key_path, state)
                .await?
                .run()
                .await
        }
        _ => HttpServer::new(address, state).await?.run().await,
    }
}
