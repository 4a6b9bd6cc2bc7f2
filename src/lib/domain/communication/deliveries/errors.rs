//! Delivery errors

use thiserror::Error;
use tracing::debug;

use crate::domain::communication::{
    email_addresses::EmailAddressError, mailer::MailerError, rendering::RenderError,
};

/// Errors raised while validating an incoming email request
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmailRequestError {
    /// The email type isn't one we know how to send
    #[error("unsupported email type \"{0}\"")]
    UnsupportedType(String),

    /// Required fields are absent or blank
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// A participant's email address is invalid
    #[error("invalid email address in {field}")]
    InvalidEmailAddress {
        /// The offending field
        field: &'static str,

        /// Why the address was rejected
        source: EmailAddressError,
    },
}

/// Errors raised while rendering or sending an email
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The email could not be rendered
    #[error("could not render email")]
    Render(#[source] RenderError),

    /// The mailer failed to send the email
    #[error("could not send email")]
    Send(#[source] MailerError),
}

impl From<RenderError> for DeliveryError {
    fn from(err: RenderError) -> Self {
        debug!("RenderError -> DeliveryError");

        DeliveryError::Render(err)
    }
}

impl From<MailerError> for DeliveryError {
    fn from(err: MailerError) -> Self {
        debug!("MailerError -> DeliveryError");

        DeliveryError::Send(err)
    }
}

impl DeliveryError {
    /// Description of the underlying failure
    pub fn details(&self) -> String {
        match self {
            DeliveryError::Render(err) => err.to_string(),
            DeliveryError::Send(err) => err.to_string(),
        }
    }
}
