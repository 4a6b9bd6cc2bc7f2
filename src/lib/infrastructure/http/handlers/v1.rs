use axum::{
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    domain::communication::deliveries::EmailDeliveryService,
    infrastructure::http::{open_api::ApiDocs, state::AppState},
};

pub mod emails;
pub mod stoplight;
pub mod uptime;

pub fn router<D: EmailDeliveryService>() -> Router<AppState<D>> {
    Router::new()
        .route("/", get(stoplight::handler))
        .route("/openapi.json", get(Json(ApiDocs::openapi())))
        .route("/uptime", get(uptime::handler::<D>))
        .route("/emails", post(emails::send_email::handler::<D>))
        .route("/emails/preview", post(emails::preview_email::handler::<D>))
}
