//! Driving port for bill generation.

use async_trait::async_trait;

use crate::domain::{Bill, Error, RateTable};

/// Request for a monthly bill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateBillRequest {
    /// User to bill.
    pub username: String,
    /// Billing month, `YYYY-MM`; `None` bills the current month.
    pub month: Option<String>,
    /// Rates to apply instead of the configured table.
    pub rates: Option<RateTable>,
}

/// Domain use-case port for billing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BillingQuery: Send + Sync {
    /// Price a user's month. Unknown users yield `not_found`; a month without
    /// attendance yields a zero bill.
    async fn generate_bill(&self, request: GenerateBillRequest) -> Result<Bill, Error>;
}
