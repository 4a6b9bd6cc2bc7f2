//! API error-handling module

use std::fmt;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::communication::{
    deliveries::{DeliveryError, EmailRequestError},
    email_addresses::EmailAddressError,
};

/// An error response
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// The error message
    #[schema(example = "Failed to send email")]
    pub error: String,

    /// What went wrong underneath, when known
    #[schema(example = "could not connect to the SMTP server")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// An error raised in the API
#[derive(Debug, Deserialize, ToSchema)]
pub struct ApiError {
    /// The status code
    #[schema(example = 500, value_type = u16)]
    #[serde(with = "http_serde::status_code")]
    pub status: StatusCode,

    /// The error message
    #[schema(example = "Internal server error")]
    pub message: String,

    /// Additional details
    pub details: Option<String>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
            details: None,
        }
    }

    /// Create a new bad request error
    pub fn new_400(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Create a new unprocessable entity error
    pub fn new_422(message: &str) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    /// Create new internal server error
    pub fn new_500(message: &str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Attach details to the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
                details: self.details,
            }),
        )
            .into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::new_500(&err.to_string())
    }
}

impl From<EmailRequestError> for ApiError {
    fn from(err: EmailRequestError) -> Self {
        match err {
            EmailRequestError::UnsupportedType(kind) => {
                ApiError::new_400(&format!("Unsupported email type \"{kind}\""))
            }
            EmailRequestError::MissingFields(fields) => {
                ApiError::new_400(&format!("Missing required fields: {}", fields.join(", ")))
            }
            EmailRequestError::InvalidEmailAddress { field, source } => {
                let message = match source {
                    EmailAddressError::EmptyEmailAddress => format!("Please provide {field}"),
                    EmailAddressError::InvalidEmailAddress => {
                        format!("Please provide a valid email address for {field}")
                    }
                };

                ApiError::new_422(&message)
            }
        }
    }
}

impl From<DeliveryError> for ApiError {
    fn from(err: DeliveryError) -> Self {
        ApiError::new_500("Failed to send email").with_details(err.details())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(rejection.status(), &rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
    use testresult::TestResult;

    use crate::domain::communication::{
        deliveries::{DeliveryError, EmailRequestError},
        email_addresses::EmailAddressError,
        mailer::MailerError,
    };

    use super::ApiError;

    #[tokio::test]
    async fn test_error_response() -> TestResult {
        let error = ApiError::new_500("Internal server error");

        let response = error.into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await?;

        assert_eq!(body, r#"{"error":"Internal server error"}"#);

        Ok(())
    }

    #[tokio::test]
    async fn test_error_response_with_details() -> TestResult {
        let error = ApiError::new_500("Failed to send email").with_details("timed out");

        let response = error.into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await?;

        assert_eq!(
            body,
            r#"{"error":"Failed to send email","details":"timed out"}"#
        );

        Ok(())
    }

    #[test]
    fn test_api_error_from_error() {
        let error = anyhow!("Internal server error");
        let api_error = ApiError::from(error);

        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.message, "Internal server error");
    }

    #[test]
    fn test_missing_fields_are_a_bad_request() {
        let api_error = ApiError::from(EmailRequestError::MissingFields(vec![
            "subject", "content",
        ]));

        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.message, "Missing required fields: subject, content");
    }

    #[test]
    fn test_unsupported_type_is_a_bad_request() {
        let api_error = ApiError::from(EmailRequestError::UnsupportedType("newsletter".into()));

        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.message, "Unsupported email type \"newsletter\"");
    }

    #[test]
    fn test_invalid_email_address_is_unprocessable() {
        let api_error = ApiError::from(EmailRequestError::InvalidEmailAddress {
            field: "clientEmail",
            source: EmailAddressError::InvalidEmailAddress,
        });

        assert_eq!(api_error.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            api_error.message,
            "Please provide a valid email address for clientEmail"
        );
    }

    #[test]
    fn test_delivery_error_carries_details() {
        let api_error = ApiError::from(DeliveryError::Send(MailerError::SendError));

        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.message, "Failed to send email");
        assert_eq!(
            api_error.details,
            Some(MailerError::SendError.to_string())
        );
    }
}
