//! Email handlers

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::communication::deliveries::{EmailFields, EmailRequest},
    infrastructure::http::errors::ApiError,
};

pub mod preview_email;
pub mod send_email;

/// Email request body, shared by sending and previewing
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailBody {
    /// One of `onboarding`, `invoice`, `welcome` or `custom`
    #[schema(example = "custom")]
    #[serde(rename = "type")]
    kind: Option<String>,

    /// The client's email address
    #[schema(example = "sam@example.com")]
    client_email: Option<String>,

    /// The client's name
    #[schema(example = "Sam")]
    client_name: Option<String>,

    /// The freelancer's name
    #[schema(example = "Alex Rivera")]
    freelancer_name: Option<String>,

    /// The freelancer's email address
    #[schema(example = "alex@example.com")]
    freelancer_email: Option<String>,

    /// Shown under the freelancer's name in the footer
    #[schema(example = "Brand Designer")]
    freelancer_role: Option<String>,

    /// The brand shown in the header, defaults to the freelancer's name
    #[schema(example = "Rivera Studio")]
    brand_name: Option<String>,

    /// Subject of a custom email
    #[schema(example = "Project kickoff for {{clientName}}")]
    subject: Option<String>,

    /// Body of a custom email, tagged or freeform
    #[schema(example = "GREETING: Hi {{clientName}},\nLEAD_PARAGRAPH: Great to meet you.\nSIGNATURE: Cheers,\nAlex")]
    content: Option<String>,

    /// Link to the onboarding steps
    #[schema(example = "https://example.com/onboarding")]
    onboarding_url: Option<String>,

    /// The invoice number
    #[schema(example = "INV-042")]
    invoice_number: Option<String>,

    /// The formatted amount due
    #[schema(example = "$1,200.00")]
    amount: Option<String>,

    /// The formatted due date
    #[schema(example = "March 1, 2025")]
    due_date: Option<String>,

    /// Link to pay the invoice online
    #[schema(example = "https://example.com/pay/INV-042")]
    payment_url: Option<String>,
}

impl TryFrom<SendEmailBody> for EmailRequest {
    type Error = ApiError;

    fn try_from(body: SendEmailBody) -> Result<Self, Self::Error> {
        let fields = EmailFields {
            client_email: body.client_email,
            client_name: body.client_name,
            freelancer_name: body.freelancer_name,
            freelancer_email: body.freelancer_email,
            freelancer_role: body.freelancer_role,
            brand_name: body.brand_name,
            subject: body.subject,
            content: body.content,
            onboarding_url: body.onboarding_url,
            invoice_number: body.invoice_number,
            amount: body.amount,
            due_date: body.due_date,
            payment_url: body.payment_url,
        };

        Ok(EmailRequest::from_fields(body.kind.as_deref(), fields)?)
    }
}

#[cfg(test)]
impl SendEmailBody {
    /// A complete custom email body
    fn custom(subject: &str, content: &str) -> Self {
        Self {
            kind: Some("custom".to_string()),
            client_email: Some("sam@example.com".to_string()),
            client_name: Some("Sam".to_string()),
            freelancer_name: Some("Alex Rivera".to_string()),
            freelancer_email: Some("alex@example.com".to_string()),
            subject: Some(subject.to_string()),
            content: Some(content.to_string()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::domain::communication::deliveries::{EmailKind, EmailRequest};

    use super::SendEmailBody;

    #[test]
    fn test_body_uses_camel_case_and_type() -> testresult::TestResult {
        let body: SendEmailBody = serde_json::from_value(serde_json::json!({
            "type": "welcome",
            "clientEmail": "sam@example.com",
            "clientName": "Sam",
            "freelancerName": "Alex Rivera",
            "freelancerEmail": "alex@example.com",
        }))?;

        let request = EmailRequest::try_from(body)?;

        assert_eq!(request.kind(), EmailKind::Welcome);
        assert_eq!(request.participants().client_name, "Sam");

        Ok(())
    }

    #[test]
    fn test_body_without_type() {
        let body = SendEmailBody {
            kind: None,
            ..SendEmailBody::custom("Hello", "Hi there")
        };

        let err = EmailRequest::try_from(body).expect_err("type is required");

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Missing required fields: type");
    }
}
