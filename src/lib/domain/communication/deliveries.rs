//! Email deliveries.
//!
//! A validated [`EmailRequest`] is composed into an [`EmailDraft`], routed according to
//! the [`DeliveryConfig`], rendered, and handed to a [`Mailer`].
//!
//! [`EmailDraft`]: crate::domain::communication::rendering::EmailDraft
//! [`Mailer`]: crate::domain::communication::mailer::Mailer

mod errors;
mod request;
mod routing;
mod service;

pub use errors::{DeliveryError, EmailRequestError};
pub use request::{ComposedEmail, EmailFields, EmailKind, EmailRequest, Participants};
pub use routing::{DeliveryConfig, Route};
pub use service::{DeliveryReceipt, EmailDeliveryService, EmailDeliveryServiceImpl, EmailPreview};
