//! Email delivery service

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{error, info};
use uuid::Uuid;

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::{
    email_addresses::EmailAddress,
    mailer::{Mailer, Message},
    rendering::{placeholders, render_sections, EmailDraft, ParsedSections, RenderedEmail},
};

use super::{ComposedEmail, DeliveryConfig, DeliveryError, EmailKind, EmailRequest, Route};

/// Proof that an email was handed to the mailer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Identifier of this delivery
    pub id: Uuid,

    /// The kind of email sent
    pub kind: EmailKind,

    /// The address the email was sent to
    pub delivered_to: EmailAddress,

    /// The client the email was meant for
    pub intended_recipient: EmailAddress,

    /// Whether the email was redirected to the test inbox
    pub test_mode: bool,

    /// When the email was sent
    pub sent_at: DateTime<Utc>,
}

/// An email rendered exactly as it would be sent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailPreview {
    /// The kind of email
    pub kind: EmailKind,

    /// The subject as it would be sent
    pub subject: String,

    /// The address it would be sent to
    pub delivered_to: EmailAddress,

    /// Whether it would be redirected to the test inbox
    pub test_mode: bool,

    /// The decomposed body
    pub sections: ParsedSections,

    /// HTML and plain text versions
    pub rendered: RenderedEmail,

    /// `{{variables}}` left in the subject or body
    pub unresolved_variables: Vec<String>,
}

/// Email delivery service
#[async_trait]
pub trait EmailDeliveryService: Clone + Send + Sync + 'static {
    /// Composes, renders and sends an email.
    ///
    /// # Arguments
    /// * `request` - The validated [`EmailRequest`].
    ///
    /// # Returns
    /// - [`Ok`] with a [`DeliveryReceipt`] once the mailer accepted the email.
    /// - [`Err`] containing a [`DeliveryError`] if rendering or sending failed.
    async fn send_email(&self, request: &EmailRequest) -> Result<DeliveryReceipt, DeliveryError>;

    /// Composes and renders an email without sending it.
    fn preview_email(&self, request: &EmailRequest) -> Result<EmailPreview, DeliveryError>;
}

#[cfg(test)]
mock! {
    pub EmailDeliveryService {}

    impl Clone for EmailDeliveryService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl EmailDeliveryService for EmailDeliveryService {
        async fn send_email(&self, request: &EmailRequest) -> Result<DeliveryReceipt, DeliveryError>;
        fn preview_email(&self, request: &EmailRequest) -> Result<EmailPreview, DeliveryError>;
    }
}

/// Email delivery service implementation
#[derive(Debug, Clone)]
pub struct EmailDeliveryServiceImpl<M>
where
    M: Mailer,
{
    mailer: Arc<M>,
    config: DeliveryConfig,
}

#[derive(Debug)]
struct Prepared {
    draft: EmailDraft,
    route: Route,
    sections: ParsedSections,
    rendered: RenderedEmail,
}

impl<M> EmailDeliveryServiceImpl<M>
where
    M: Mailer,
{
    /// Creates a new email delivery service.
    pub fn new(mailer: Arc<M>, config: DeliveryConfig) -> Self {
        Self { mailer, config }
    }

    fn prepare(&self, request: &EmailRequest) -> Result<Prepared, DeliveryError> {
        let ComposedEmail { draft, sections } = request.compose();
        let route = self.config.route(request.participants(), &draft.subject);
        let draft = route.apply(&draft);
        let rendered = render_sections(&draft, &sections, route.notice.as_deref())?;

        Ok(Prepared {
            draft,
            route,
            sections,
            rendered,
        })
    }
}

fn log_failure(kind: EmailKind, err: &DeliveryError) {
    error!(
        email_type = %kind,
        timestamp = %Utc::now().to_rfc3339(),
        details = %err.details(),
        "{err}"
    );
}

#[async_trait]
impl<M> EmailDeliveryService for EmailDeliveryServiceImpl<M>
where
    M: Mailer,
{
    async fn send_email(&self, request: &EmailRequest) -> Result<DeliveryReceipt, DeliveryError> {
        let kind = request.kind();
        let participants = request.participants();

        let Prepared {
            draft,
            route,
            rendered,
            ..
        } = self.prepare(request).inspect_err(|err| log_failure(kind, err))?;

        let message = Message {
            to: route.to.clone(),
            to_name: route.to_name,
            from_name: Some(participants.freelancer_name.clone()),
            reply_to: Some(participants.freelancer_email.clone()),
            subject: draft.subject,
            html_body: rendered.html,
            plain_body: rendered.text,
        };

        self.mailer
            .send_email(&message)
            .await
            .map_err(DeliveryError::from)
            .inspect_err(|err| log_failure(kind, err))?;

        let receipt = DeliveryReceipt {
            id: Uuid::now_v7(),
            kind,
            delivered_to: route.to,
            intended_recipient: participants.client_email.clone(),
            test_mode: route.test_mode,
            sent_at: Utc::now(),
        };

        info!(
            id = %receipt.id,
            email_type = %kind,
            test_mode = receipt.test_mode,
            "email sent"
        );

        Ok(receipt)
    }

    fn preview_email(&self, request: &EmailRequest) -> Result<EmailPreview, DeliveryError> {
        let Prepared {
            draft,
            route,
            sections,
            rendered,
        } = self.prepare(request)?;

        let mut unresolved_variables = placeholders(&draft.subject);
        for name in placeholders(&draft.body) {
            if !unresolved_variables.contains(&name) {
                unresolved_variables.push(name);
            }
        }

        Ok(EmailPreview {
            kind: request.kind(),
            subject: draft.subject,
            delivered_to: route.to,
            test_mode: route.test_mode,
            sections,
            rendered,
            unresolved_variables,
        })
    }
}
