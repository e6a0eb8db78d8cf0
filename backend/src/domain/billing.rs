//! Monthly bill computation.
//!
//! A bill is derived from a monthly [`AggregateResult`] and a [`RateTable`].
//! Nothing here is persisted.

use serde::{Deserialize, Serialize};

use super::{AggregateResult, AttendanceRecord, MealKind, User, Username, YearMonth};

/// Errors raised while building a rate table or pricing a bill.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BillingError {
    /// A rate was zero.
    #[error("{meal} rate must be positive")]
    NonPositiveRate {
        /// Meal whose rate was rejected.
        meal: &'static str,
    },
    /// A charge did not fit in `u64`.
    #[error("bill amount overflowed")]
    Overflow,
}

/// Per-meal prices in opaque monetary units.
///
/// ## Invariants
/// - Every rate is strictly positive.
///
/// # Examples
/// ```
/// use messpro::domain::RateTable;
///
/// let rates = RateTable::default();
/// assert_eq!((rates.breakfast(), rates.lunch(), rates.dinner()), (30, 50, 50));
/// assert!(RateTable::new(0, 50, 50).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RateTableDto", into = "RateTableDto")]
pub struct RateTable {
    breakfast: u64,
    lunch: u64,
    dinner: u64,
}

/// Default breakfast price.
pub const DEFAULT_BREAKFAST_RATE: u64 = 30;
/// Default lunch price.
pub const DEFAULT_LUNCH_RATE: u64 = 50;
/// Default dinner price.
pub const DEFAULT_DINNER_RATE: u64 = 50;

impl RateTable {
    /// Validate and build a rate table.
    pub fn new(breakfast: u64, lunch: u64, dinner: u64) -> Result<Self, BillingError> {
        for (meal, rate) in [
            (MealKind::Breakfast, breakfast),
            (MealKind::Lunch, lunch),
            (MealKind::Dinner, dinner),
        ] {
            if rate == 0 {
                return Err(BillingError::NonPositiveRate {
                    meal: meal.as_str(),
                });
            }
        }
        Ok(Self {
            breakfast,
            lunch,
            dinner,
        })
    }

    /// Price of one breakfast.
    pub fn breakfast(&self) -> u64 {
        self.breakfast
    }

    /// Price of one lunch.
    pub fn lunch(&self) -> u64 {
        self.lunch
    }

    /// Price of one dinner.
    pub fn dinner(&self) -> u64 {
        self.dinner
    }

    /// Price of one meal.
    pub fn rate(&self, meal: MealKind) -> u64 {
        match meal {
            MealKind::Breakfast => self.breakfast,
            MealKind::Lunch => self.lunch,
            MealKind::Dinner => self.dinner,
        }
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            breakfast: DEFAULT_BREAKFAST_RATE,
            lunch: DEFAULT_LUNCH_RATE,
            dinner: DEFAULT_DINNER_RATE,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RateTableDto {
    breakfast: u64,
    lunch: u64,
    dinner: u64,
}

impl From<RateTable> for RateTableDto {
    fn from(value: RateTable) -> Self {
        Self {
            breakfast: value.breakfast,
            lunch: value.lunch,
            dinner: value.dinner,
        }
    }
}

impl TryFrom<RateTableDto> for RateTable {
    type Error = BillingError;

    fn try_from(value: RateTableDto) -> Result<Self, Self::Error> {
        Self::new(value.breakfast, value.lunch, value.dinner)
    }
}

/// A user and their attendance for one month, read as one snapshot.
///
/// Stores return `None` instead of a sheet when the user does not exist, so a
/// user deleted mid-request can never be billed as an empty month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSheet {
    /// The billed user.
    pub user: User,
    /// Records whose date falls in the month, newest first.
    pub records: Vec<AttendanceRecord>,
}

/// Monthly bill for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bill {
    username: Username,
    name: String,
    month: YearMonth,
    counts: AggregateResult,
    rates: RateTable,
    total: u64,
}

impl Bill {
    /// Price `counts` for `user` using `rates`.
    ///
    /// # Examples
    /// ```
    /// use messpro::domain::{AggregateResult, Bill, RateTable, Role, User, Username};
    ///
    /// let user = User::new(Username::new("alice").unwrap(), None, Role::Student);
    /// let counts = AggregateResult { breakfasts: 10, lunches: 8, dinners: 5, days: 12 };
    /// let bill = Bill::compute(&user, "2025-12".parse().unwrap(), counts, RateTable::default())
    ///     .unwrap();
    /// assert_eq!(bill.total(), 950);
    /// ```
    pub fn compute(
        user: &User,
        month: YearMonth,
        counts: AggregateResult,
        rates: RateTable,
    ) -> Result<Self, BillingError> {
        let total = MealKind::ALL.into_iter().try_fold(0_u64, |acc, meal| {
            counts
                .count(meal)
                .checked_mul(rates.rate(meal))
                .and_then(|amount| acc.checked_add(amount))
                .ok_or(BillingError::Overflow)
        })?;
        Ok(Self {
            username: user.username().clone(),
            name: user.name_or_username().to_owned(),
            month,
            counts,
            rates,
            total,
        })
    }

    /// User the bill is for.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Display name, or the username when none is on file.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Billed month.
    pub fn month(&self) -> YearMonth {
        self.month
    }

    /// Meal counts the bill was priced from.
    pub fn counts(&self) -> AggregateResult {
        self.counts
    }

    /// Rates the bill was priced with.
    pub fn rates(&self) -> RateTable {
        self.rates
    }

    /// Charge for one meal kind.
    pub fn amount(&self, meal: MealKind) -> u64 {
        // Bounded by `total`, which was computed with checked arithmetic.
        self.counts.count(meal) * self.rates.rate(meal)
    }

    /// Sum of every meal charge.
    pub fn total(&self) -> u64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{DisplayName, Role};
    use rstest::{fixture, rstest};

    #[fixture]
    fn alice() -> User {
        User::new(
            Username::new("alice").expect("valid username"),
            Some(DisplayName::new("Alice Liddell").expect("valid name")),
            Role::Student,
        )
    }

    fn december() -> YearMonth {
        "2025-12".parse().expect("valid month")
    }

    #[rstest]
    fn prices_each_meal_kind(alice: User) {
        let counts = AggregateResult {
            breakfasts: 10,
            lunches: 8,
            dinners: 5,
            days: 12,
        };
        let bill =
            Bill::compute(&alice, december(), counts, RateTable::default()).expect("bill");
        assert_eq!(bill.amount(MealKind::Breakfast), 300);
        assert_eq!(bill.amount(MealKind::Lunch), 400);
        assert_eq!(bill.amount(MealKind::Dinner), 250);
        assert_eq!(bill.total(), 950);
        assert_eq!(bill.name(), "Alice Liddell");
    }

    #[rstest]
    fn empty_month_costs_nothing(alice: User) {
        let bill = Bill::compute(
            &alice,
            december(),
            AggregateResult::default(),
            RateTable::default(),
        )
        .expect("bill");
        assert_eq!(bill.total(), 0);
        assert_eq!(bill.counts(), AggregateResult::default());
    }

    #[rstest]
    fn overflow_is_reported(alice: User) {
        let counts = AggregateResult {
            breakfasts: u64::MAX,
            lunches: 0,
            dinners: 0,
            days: 1,
        };
        let result = Bill::compute(&alice, december(), counts, RateTable::default());
        assert_eq!(result, Err(BillingError::Overflow));
    }

    #[rstest]
    #[case(0, 1, 1, "breakfast")]
    #[case(1, 0, 1, "lunch")]
    #[case(1, 1, 0, "dinner")]
    fn zero_rates_are_rejected(
        #[case] breakfast: u64,
        #[case] lunch: u64,
        #[case] dinner: u64,
        #[case] meal: &'static str,
    ) {
        assert_eq!(
            RateTable::new(breakfast, lunch, dinner),
            Err(BillingError::NonPositiveRate { meal })
        );
    }

    #[rstest]
    fn rate_table_deserialisation_validates() {
        let result: Result<RateTable, _> =
            serde_json::from_str(r#"{"breakfast":0,"lunch":50,"dinner":50}"#);
        assert!(result.is_err());
    }
}
