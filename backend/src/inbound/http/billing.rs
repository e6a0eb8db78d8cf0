//! Bill generation handler.
//!
//! ```text
//! GET /api/generate-bill/alice?month=2025-12
//! GET /api/generate-bill/alice?month=2025-12&breakfastRate=25&lunchRate=45&dinnerRate=45
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::GenerateBillRequest;
use crate::domain::{Bill, Error, MealKind, RateTable};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Query of `GET /api/generate-bill/{username}`.
///
/// Rate overrides must be given together; omitting all three applies the
/// configured table.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct BillQuery {
    /// Billing month, `YYYY-MM`; defaults to the current month.
    pub month: Option<String>,
    /// Breakfast price override.
    pub breakfast_rate: Option<u64>,
    /// Lunch price override.
    pub lunch_rate: Option<u64>,
    /// Dinner price override.
    pub dinner_rate: Option<u64>,
}

impl BillQuery {
    fn rate_override(&self) -> Result<Option<RateTable>, Error> {
        match (self.breakfast_rate, self.lunch_rate, self.dinner_rate) {
            (None, None, None) => Ok(None),
            (Some(breakfast), Some(lunch), Some(dinner)) => {
                let rates = RateTable::new(breakfast, lunch, dinner).map_err(|err| {
                    Error::invalid_request(err.to_string())
                        .with_details(json!({ "code": "invalid_rate" }))
                })?;
                Ok(Some(rates))
            }
            _ => Err(
                Error::invalid_request("breakfastRate, lunchRate and dinnerRate go together")
                    .with_details(json!({ "code": "partial_rates" })),
            ),
        }
    }
}

/// Rates a bill was priced with.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatesResponse {
    /// Price of one breakfast.
    pub breakfast: u64,
    /// Price of one lunch.
    pub lunch: u64,
    /// Price of one dinner.
    pub dinner: u64,
}

impl From<RateTable> for RatesResponse {
    fn from(rates: RateTable) -> Self {
        Self {
            breakfast: rates.breakfast(),
            lunch: rates.lunch(),
            dinner: rates.dinner(),
        }
    }
}

/// Monthly bill.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BillResponse {
    /// Billed user.
    pub username: String,
    /// Display name, or the username when none is on file.
    pub name: String,
    /// Billed month.
    #[schema(example = "2025-12")]
    pub month: String,
    /// Breakfasts taken in the month.
    pub breakfast_count: u64,
    /// Lunches taken in the month.
    pub lunch_count: u64,
    /// Dinners taken in the month.
    pub dinner_count: u64,
    /// Breakfast charge.
    pub breakfast_amount: u64,
    /// Lunch charge.
    pub lunch_amount: u64,
    /// Dinner charge.
    pub dinner_amount: u64,
    /// Rates applied.
    pub rates: RatesResponse,
    /// Sum of the three charges.
    pub total_amount: u64,
}

impl From<&Bill> for BillResponse {
    fn from(bill: &Bill) -> Self {
        let counts = bill.counts();
        Self {
            username: bill.username().to_string(),
            name: bill.name().to_owned(),
            month: bill.month().to_string(),
            breakfast_count: counts.breakfasts,
            lunch_count: counts.lunches,
            dinner_count: counts.dinners,
            breakfast_amount: bill.amount(MealKind::Breakfast),
            lunch_amount: bill.amount(MealKind::Lunch),
            dinner_amount: bill.amount(MealKind::Dinner),
            rates: RatesResponse::from(bill.rates()),
            total_amount: bill.total(),
        }
    }
}

/// Price a user's meals for one month.
#[utoipa::path(
    get,
    path = "/api/generate-bill/{username}",
    params(("username" = String, Path, description = "Login name"), BillQuery),
    responses(
        (status = 200, description = "Monthly bill", body = BillResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["billing"],
    operation_id = "generateBill"
)]
#[get("/generate-bill/{username}")]
pub async fn generate_bill(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<BillQuery>,
) -> ApiResult<web::Json<BillResponse>> {
    let query = query.into_inner();
    let rates = query.rate_override()?;
    let bill = state
        .billing
        .generate_bill(GenerateBillRequest {
            username: path.into_inner(),
            month: query.month,
            rates,
        })
        .await?;
    Ok(web::Json(BillResponse::from(&bill)))
}

#[cfg(test)]
mod tests {
    //! Handler coverage for bill generation.
    use super::*;
    use crate::domain::{AggregateResult, DisplayName, Role, User, Username};
    use crate::inbound::http::test_utils::{MockPorts, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    fn december_bill(rates: RateTable) -> Bill {
        let user = User::new(
            Username::new("alice").expect("valid username"),
            Some(DisplayName::new("Alice Liddell").expect("valid name")),
            Role::Student,
        );
        let counts = AggregateResult {
            breakfasts: 10,
            lunches: 8,
            dinners: 5,
            days: 12,
        };
        Bill::compute(&user, "2025-12".parse().expect("valid month"), counts, rates)
            .expect("bill fits")
    }

    async fn get_bill(ports: MockPorts, uri: &str) -> (StatusCode, Value) {
        let app = actix_test::init_service(test_app(ports)).await;
        let request = actix_test::TestRequest::get().uri(uri).to_request();
        let response = actix_test::call_service(&app, request).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        (status, serde_json::from_slice(&body).expect("JSON body"))
    }

    #[rstest]
    #[actix_web::test]
    async fn bill_lists_counts_amounts_and_rates() {
        let mut ports = MockPorts::default();
        ports
            .billing
            .expect_generate_bill()
            .withf(|request| {
                request.username == "alice"
                    && request.month.as_deref() == Some("2025-12")
                    && request.rates.is_none()
            })
            .return_once(|_| Ok(december_bill(RateTable::default())));

        let (status, body) = get_bill(ports, "/api/generate-bill/alice?month=2025-12").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "username": "alice",
                "name": "Alice Liddell",
                "month": "2025-12",
                "breakfastCount": 10,
                "lunchCount": 8,
                "dinnerCount": 5,
                "breakfastAmount": 300,
                "lunchAmount": 400,
                "dinnerAmount": 250,
                "rates": {"breakfast": 30, "lunch": 50, "dinner": 50},
                "totalAmount": 950,
            })
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn rate_overrides_reach_the_port() {
        let custom = RateTable::new(25, 45, 45).expect("positive rates");
        let mut ports = MockPorts::default();
        ports
            .billing
            .expect_generate_bill()
            .withf(move |request| request.rates == Some(custom))
            .return_once(move |_| Ok(december_bill(custom)));

        let (status, body) = get_bill(
            ports,
            "/api/generate-bill/alice?breakfastRate=25&lunchRate=45&dinnerRate=45",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalAmount"], 10 * 25 + 8 * 45 + 5 * 45);
    }

    #[rstest]
    #[case("/api/generate-bill/alice?breakfastRate=25", "partial_rates")]
    #[case("/api/generate-bill/alice?breakfastRate=0&lunchRate=1&dinnerRate=1", "invalid_rate")]
    #[actix_web::test]
    async fn bad_rate_overrides_are_rejected(#[case] uri: &str, #[case] code: &str) {
        let mut ports = MockPorts::default();
        ports.billing.expect_generate_bill().times(0);

        let (status, body) = get_bill(ports, uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["code"], code);
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_users_get_404() {
        let mut ports = MockPorts::default();
        ports
            .billing
            .expect_generate_bill()
            .return_once(|_| Err(Error::not_found("user ghost does not exist")));

        let (status, body) = get_bill(ports, "/api/generate-bill/ghost").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
    }
}
