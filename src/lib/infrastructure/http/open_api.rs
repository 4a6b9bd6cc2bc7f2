//! OpenAPI module

use utoipa::OpenApi;

use crate::infrastructure::http::{errors::ErrorResponse, handlers::v1::*};

#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "Freelancer Mail"),
    paths(
        emails::send_email::handler,
        emails::preview_email::handler,
        uptime::handler
    ),
    components(schemas(
        emails::SendEmailBody,
        emails::send_email::SendEmailResponse,
        emails::send_email::DeliveryReceiptBody,
        emails::preview_email::PreviewEmailResponse,
        emails::preview_email::SectionsBody,
        uptime::UptimeResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDocs;
