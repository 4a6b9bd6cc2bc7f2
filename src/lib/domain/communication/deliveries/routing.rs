//! Delivery routing
//!
//! Until a custom sending domain is verified, mail can only go to an internal test inbox.
//! Redirected messages keep the intended recipient visible in the subject and in a banner.

use clap::Parser;
use tracing::warn;

use crate::domain::communication::{email_addresses::EmailAddress, rendering::EmailDraft};

use super::Participants;

/// Delivery configuration
#[derive(Clone, Debug, Parser)]
pub struct DeliveryConfig {
    /// Whether the custom sending domain has been verified
    #[arg(
        long,
        env = "CUSTOM_DOMAIN_VERIFIED",
        action = clap::ArgAction::Set,
        default_value_t = false
    )]
    pub custom_domain_verified: bool,

    /// Where mail is delivered while the sending domain is unverified
    #[arg(long, env = "TEST_RECIPIENT_EMAIL", default_value = "test@example.com")]
    pub test_recipient: EmailAddress,
}

/// Where and how a single email is delivered
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    /// The address the email is actually sent to
    pub to: EmailAddress,

    /// Display name for `to`
    pub to_name: Option<String>,

    /// The subject as sent
    pub subject: String,

    /// Banner explaining a redirect, shown above the content
    pub notice: Option<String>,

    /// Whether the email was redirected to the test inbox
    pub test_mode: bool,
}

impl DeliveryConfig {
    /// Decides where an email for `participants` should go.
    pub fn route(&self, participants: &Participants, subject: &str) -> Route {
        if self.custom_domain_verified {
            return Route {
                to: participants.client_email.clone(),
                to_name: Some(participants.client_name.clone()),
                subject: subject.to_string(),
                notice: None,
                test_mode: false,
            };
        }

        warn!(
            intended = %participants.client_email,
            test_recipient = %self.test_recipient,
            "custom domain not verified, redirecting email to test recipient"
        );

        Route {
            to: self.test_recipient.clone(),
            to_name: None,
            subject: format!(
                "[Test: {} ({})] {}",
                participants.client_name, participants.client_email, subject
            ),
            notice: Some(format!(
                "Test mode: this email was intended for {} ({}). It was delivered to {} because the sending domain has not been verified yet.",
                participants.client_name, participants.client_email, self.test_recipient
            )),
            test_mode: true,
        }
    }
}

impl Route {
    /// The draft as it will be rendered, with the routed subject.
    pub fn apply(&self, draft: &EmailDraft) -> EmailDraft {
        EmailDraft {
            subject: self.subject.clone(),
            ..draft.clone()
        }
    }
}
