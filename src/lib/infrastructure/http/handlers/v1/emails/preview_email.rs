//! Preview email handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::communication::{
        deliveries::{EmailDeliveryService, EmailPreview, EmailRequest},
        rendering::ParsedSections,
    },
    infrastructure::http::{errors::ApiError, state::AppState},
};

use super::SendEmailBody;

/// The decomposed email body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionsBody {
    /// Opening line
    #[schema(example = "Hi Sam,")]
    pub greeting: String,

    /// First paragraph after the greeting
    #[schema(example = "I hope this message finds you well.")]
    pub lead_paragraph: String,

    /// Remaining paragraphs in document order
    pub body_sections: Vec<String>,

    /// Closing lines
    #[schema(example = "Best regards,\nAlex Rivera")]
    pub signature: String,
}

impl From<ParsedSections> for SectionsBody {
    fn from(sections: ParsedSections) -> Self {
        Self {
            greeting: sections.greeting,
            lead_paragraph: sections.lead_paragraph,
            body_sections: sections.body_sections,
            signature: sections.signature,
        }
    }
}

/// Preview email response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviewEmailResponse {
    /// The subject as it would be sent
    #[schema(example = "[Test: Sam (sam@example.com)] Project kickoff")]
    pub subject: String,

    /// Where the email would be sent
    #[schema(example = "test@example.com")]
    pub delivered_to: String,

    /// Whether the email would be redirected to the test inbox
    pub test_mode: bool,

    /// The decomposed body
    pub sections: SectionsBody,

    /// The HTML document
    pub html: String,

    /// The plain text alternative
    pub text: String,

    /// `{{variables}}` nobody provided a value for
    pub unresolved_variables: Vec<String>,
}

impl From<EmailPreview> for PreviewEmailResponse {
    fn from(preview: EmailPreview) -> Self {
        Self {
            subject: preview.subject,
            delivered_to: preview.delivered_to.into(),
            test_mode: preview.test_mode,
            sections: preview.sections.into(),
            html: preview.rendered.html,
            text: preview.rendered.text,
            unresolved_variables: preview.unresolved_variables,
        }
    }
}

/// Render an email exactly as it would be sent, without sending it
#[utoipa::path(
    post,
    operation_id = "preview_email",
    tag = "Emails",
    path = "/api/v1/emails/preview",
    request_body = SendEmailBody,
    responses(
        (status = StatusCode::OK, description = "Rendered email", body = PreviewEmailResponse),
        (status = StatusCode::BAD_REQUEST, description = "Missing fields or unsupported type", body = ErrorResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid email address", body = ErrorResponse),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "The email could not be rendered", body = ErrorResponse),
    )
)]
pub async fn handler<D: EmailDeliveryService>(
    State(state): State<AppState<D>>,
    request: Result<Json<SendEmailBody>, JsonRejection>,
) -> Result<Json<PreviewEmailResponse>, ApiError> {
    let Json(request) = request?;
    let request: EmailRequest = request.try_into()?;

    let preview = state.deliveries.preview_email(&request)?;

    Ok(Json(preview.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use testresult::TestResult;

    use crate::{
        domain::communication::{
            deliveries::{
                tests::MockEmailDeliveryService, DeliveryConfig, EmailDeliveryServiceImpl,
                EmailKind, EmailPreview,
            },
            email_addresses::EmailAddress,
            mailer::MockMailer,
            rendering::{ParsedSections, RenderedEmail},
        },
        infrastructure::http::{
            errors::ErrorResponse,
            handlers::v1::emails::{preview_email::PreviewEmailResponse, SendEmailBody},
            router,
            state::{test_state, AppState},
        },
    };

    #[tokio::test]
    async fn test_preview_email_with_mock() -> TestResult {
        let mut deliveries = MockEmailDeliveryService::new();

        deliveries.expect_preview_email().times(1).returning(|_| {
            Ok(EmailPreview {
                kind: EmailKind::Custom,
                subject: "Hello".to_string(),
                delivered_to: EmailAddress::new_unchecked("sam@example.com"),
                test_mode: false,
                sections: ParsedSections {
                    greeting: "Hi Sam,".to_string(),
                    lead_paragraph: "Hello there.".to_string(),
                    body_sections: vec![],
                    signature: "Best regards,\nAlex Rivera".to_string(),
                },
                rendered: RenderedEmail {
                    html: "<html></html>".to_string(),
                    text: "Hello".to_string(),
                },
                unresolved_variables: vec!["projectName".to_string()],
            })
        });
        deliveries.expect_send_email().never();

        let state = test_state(Some(deliveries));

        let response = TestServer::new(router(state))?
            .post("/api/v1/emails/preview")
            .json(&SendEmailBody::custom("Hello", "Hello there."))
            .await;

        response.assert_status_ok();

        let json = response.json::<PreviewEmailResponse>();

        assert_eq!(json.subject, "Hello");
        assert_eq!(json.sections.greeting, "Hi Sam,");
        assert_eq!(json.unresolved_variables, vec!["projectName"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_preview_email_renders_in_test_mode() -> TestResult {
        let mut mailer = MockMailer::new();
        mailer.expect_send_email().never();

        let config = DeliveryConfig {
            custom_domain_verified: false,
            test_recipient: EmailAddress::new("inbox@example.com")?,
        };

        let state = AppState::new(EmailDeliveryServiceImpl::new(Arc::new(mailer), config));

        let body = SendEmailBody::custom(
            "Kickoff for {{clientName}}",
            "GREETING: Hi {{clientName}},\n\nLEAD_PARAGRAPH: Welcome aboard.\n\nBODY_SECTION_1: Bring your {{projectName}} notes.\n\nSIGNATURE: Cheers,\nAlex",
        );

        let response = TestServer::new(router(state))?
            .post("/api/v1/emails/preview")
            .json(&body)
            .await;

        response.assert_status_ok();

        let json = response.json::<PreviewEmailResponse>();

        assert_eq!(
            json.subject,
            "[Test: Sam (sam@example.com)] Kickoff for Sam"
        );
        assert_eq!(json.delivered_to, "inbox@example.com");
        assert!(json.test_mode);
        assert_eq!(json.sections.greeting, "Hi Sam,");
        assert_eq!(
            json.sections.body_sections,
            vec!["Bring your {{projectName}} notes."]
        );
        assert_eq!(json.unresolved_variables, vec!["projectName"]);
        assert!(json.html.contains("Welcome aboard."));
        assert!(json.text.contains("Test mode"));
        assert!(!json.text.contains('<'));

        Ok(())
    }

    #[tokio::test]
    async fn test_preview_email_names_missing_fields() -> TestResult {
        let state = test_state(None);

        let response = TestServer::new(router(state))?
            .post("/api/v1/emails/preview")
            .json(&serde_json::json!({ "type": "invoice", "clientName": "Sam" }))
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json.error,
            "Missing required fields: clientEmail, freelancerName, freelancerEmail, invoiceNumber, amount, dueDate"
        );

        Ok(())
    }
}
