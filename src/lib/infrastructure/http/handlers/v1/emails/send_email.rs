//! Send email handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::communication::deliveries::{DeliveryReceipt, EmailDeliveryService, EmailRequest},
    infrastructure::http::{errors::ApiError, state::AppState},
};

use super::SendEmailBody;

/// A delivered email
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReceiptBody {
    /// Identifier of the delivery
    pub id: Uuid,

    /// The kind of email sent
    #[schema(example = "custom")]
    #[serde(rename = "type")]
    pub kind: String,

    /// Where the email was actually sent
    #[schema(example = "sam@example.com")]
    pub delivered_to: String,

    /// Who the email was meant for
    #[schema(example = "sam@example.com")]
    pub intended_recipient: String,

    /// Whether the email was redirected to the test inbox
    pub test_mode: bool,

    /// When the email was sent
    pub sent_at: DateTime<Utc>,
}

impl From<DeliveryReceipt> for DeliveryReceiptBody {
    fn from(receipt: DeliveryReceipt) -> Self {
        Self {
            id: receipt.id,
            kind: receipt.kind.to_string(),
            delivered_to: receipt.delivered_to.into(),
            intended_recipient: receipt.intended_recipient.into(),
            test_mode: receipt.test_mode,
            sent_at: receipt.sent_at,
        }
    }
}

/// Send email response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendEmailResponse {
    /// Always `true`, failures are reported as errors
    pub success: bool,

    /// The delivery receipt
    pub result: DeliveryReceiptBody,
}

/// Compose, render and send an email to a client
#[utoipa::path(
    post,
    operation_id = "send_email",
    tag = "Emails",
    path = "/api/v1/emails",
    request_body = SendEmailBody,
    responses(
        (status = StatusCode::OK, description = "Email sent", body = SendEmailResponse),
        (status = StatusCode::BAD_REQUEST, description = "Missing fields or unsupported type", body = ErrorResponse, example = json!({"error": "Missing required fields: subject, content"})),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid email address", body = ErrorResponse),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "The email could not be sent", body = ErrorResponse, example = json!({"error": "Failed to send email", "details": "could not send email"})),
    )
)]
pub async fn handler<D: EmailDeliveryService>(
    State(state): State<AppState<D>>,
    request: Result<Json<SendEmailBody>, JsonRejection>,
) -> Result<Json<SendEmailResponse>, ApiError> {
    let Json(request) = request?;
    let request: EmailRequest = request.try_into()?;

    let receipt = state.deliveries.send_email(&request).await?;

    Ok(Json(SendEmailResponse {
        success: true,
        result: receipt.into(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::Utc;
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::{
        domain::communication::{
            deliveries::{
                tests::MockEmailDeliveryService, DeliveryError, DeliveryReceipt, EmailKind,
                EmailRequest,
            },
            email_addresses::EmailAddress,
            mailer::MailerError,
        },
        infrastructure::http::{
            errors::ErrorResponse,
            handlers::v1::emails::{send_email::SendEmailResponse, SendEmailBody},
            router,
            state::test_state,
        },
    };

    fn receipt() -> DeliveryReceipt {
        DeliveryReceipt {
            id: Uuid::now_v7(),
            kind: EmailKind::Custom,
            delivered_to: EmailAddress::new_unchecked("sam@example.com"),
            intended_recipient: EmailAddress::new_unchecked("sam@example.com"),
            test_mode: false,
            sent_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_send_email_success() -> TestResult {
        let mut deliveries = MockEmailDeliveryService::new();
        let receipt = receipt();
        let id = receipt.id;

        deliveries
            .expect_send_email()
            .withf(|request: &EmailRequest| {
                matches!(
                    request,
                    EmailRequest::Custom { subject, participants, .. }
                        if subject == "Project kickoff" && participants.client_name == "Sam"
                )
            })
            .times(1)
            .returning(move |_| Ok(receipt.clone()));

        let state = test_state(Some(deliveries));

        let response = TestServer::new(router(state))?
            .post("/api/v1/emails")
            .json(&SendEmailBody::custom("Project kickoff", "Hi Sam,\n\nLet's begin."))
            .await;

        response.assert_status_ok();

        let json = response.json::<SendEmailResponse>();

        assert!(json.success);
        assert_eq!(json.result.id, id);
        assert_eq!(json.result.kind, "custom");
        assert_eq!(json.result.delivered_to, "sam@example.com");
        assert!(!json.result.test_mode);

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_names_missing_fields() -> TestResult {
        let mut deliveries = MockEmailDeliveryService::new();
        deliveries.expect_send_email().never();

        let state = test_state(Some(deliveries));

        let response = TestServer::new(router(state))?
            .post("/api/v1/emails")
            .json(&serde_json::json!({ "type": "custom" }))
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json.error,
            "Missing required fields: clientEmail, clientName, freelancerName, freelancerEmail, subject, content"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_unsupported_type() -> TestResult {
        let state = test_state(None);

        let body = SendEmailBody {
            kind: Some("newsletter".to_string()),
            ..SendEmailBody::custom("Hello", "Hi")
        };

        let response = TestServer::new(router(state))?
            .post("/api/v1/emails")
            .json(&body)
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(json.error, "Unsupported email type \"newsletter\"");

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_invalid_client_email() -> TestResult {
        let state = test_state(None);

        let body = SendEmailBody {
            client_email: Some("not an email".to_string()),
            ..SendEmailBody::custom("Hello", "Hi")
        };

        let response = TestServer::new(router(state))?
            .post("/api/v1/emails")
            .json(&body)
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            json.error,
            "Please provide a valid email address for clientEmail"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_delivery_failure() -> TestResult {
        let mut deliveries = MockEmailDeliveryService::new();

        deliveries
            .expect_send_email()
            .returning(|_| Err(DeliveryError::Send(MailerError::SendError)));

        let state = test_state(Some(deliveries));

        let response = TestServer::new(router(state))?
            .post("/api/v1/emails")
            .json(&SendEmailBody::custom("Hello", "Hi"))
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json.error, "Failed to send email");
        assert_eq!(json.details, Some(MailerError::SendError.to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_malformed_json() -> TestResult {
        let state = test_state(None);

        let response = TestServer::new(router(state))?
            .post("/api/v1/emails")
            .bytes("{ not json".into())
            .content_type("application/json")
            .await;

        assert!(response.status_code().is_client_error());

        Ok(())
    }
}
