//! Application state module

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};

use crate::domain::communication::deliveries::EmailDeliveryService;

/// Global application state
#[derive(Clone)]
pub struct AppState<D: EmailDeliveryService> {
    /// The time the server started
    pub start_time: DateTime<Utc>,

    /// Email delivery service
    pub deliveries: Arc<D>,
}

impl<D> AppState<D>
where
    D: EmailDeliveryService,
{
    /// Create a new application state
    pub fn new(deliveries: D) -> Self {
        Self {
            start_time: Utc::now(),
            deliveries: Arc::new(deliveries),
        }
    }
}

impl<D> fmt::Debug for AppState<D>
where
    D: EmailDeliveryService,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("start_time", &self.start_time)
            .field("deliveries", &"EmailDeliveryService")
            .finish()
    }
}

#[cfg(test)]
use crate::domain::communication::deliveries::tests::MockEmailDeliveryService;

#[cfg(test)]
pub fn test_state(
    deliveries: Option<MockEmailDeliveryService>,
) -> AppState<MockEmailDeliveryService> {
    let deliveries = deliveries
        .map(Arc::new)
        .unwrap_or_else(|| Arc::new(MockEmailDeliveryService::new()));

    AppState {
        start_time: Utc::now(),
        deliveries,
    }
}
