//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so they can be exercised with mocks and without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AdminCommand, AdminQuery, AttendanceCommand, AttendanceQuery, AttendanceRepository,
    BillingQuery, IssueCommand, IssueRepository, LoginService, PasswordHasher, UserRepository,
};
use crate::domain::{
    AccountService, AttendanceService, BillingService, DashboardService, IssueService, RateTable,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Login and first-time registration.
    pub login: Arc<dyn LoginService>,
    /// Attendance writes.
    pub attendance: Arc<dyn AttendanceCommand>,
    /// Stats, history and the activity feed.
    pub attendance_query: Arc<dyn AttendanceQuery>,
    /// Monthly bills.
    pub billing: Arc<dyn BillingQuery>,
    /// Complaint and feedback submission.
    pub issues: Arc<dyn IssueCommand>,
    /// Dashboard and user listing.
    pub admin_query: Arc<dyn AdminQuery>,
    /// User creation and deletion.
    pub admin: Arc<dyn AdminCommand>,
}

/// Driven adapters the domain services are built from.
pub struct StoreAdapters<A, U, I, H> {
    /// Attendance store.
    pub attendance: Arc<A>,
    /// User store.
    pub users: Arc<U>,
    /// Issue store.
    pub issues: Arc<I>,
    /// Password hasher.
    pub hasher: Arc<H>,
}

impl<S, H> StoreAdapters<S, S, S, H> {
    /// Use one store for every repository port.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use messpro::inbound::http::state::StoreAdapters;
    /// use messpro::outbound::crypto::Argon2PasswordHasher;
    /// use messpro::outbound::memory::InMemoryMessStore;
    ///
    /// let adapters = StoreAdapters::shared(
    ///     Arc::new(InMemoryMessStore::default()),
    ///     Arc::new(Argon2PasswordHasher::new()),
    /// );
    /// # let _ = adapters;
    /// ```
    pub fn shared(store: Arc<S>, hasher: Arc<H>) -> Self {
        Self {
            attendance: Arc::clone(&store),
            users: Arc::clone(&store),
            issues: store,
            hasher,
        }
    }
}

impl HttpState {
    /// Wire the domain services over the given adapters.
    pub fn from_adapters<A, U, I, H>(
        adapters: StoreAdapters<A, U, I, H>,
        rates: RateTable,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        A: AttendanceRepository + 'static,
        U: UserRepository + 'static,
        I: IssueRepository + 'static,
        H: PasswordHasher + 'static,
    {
        let StoreAdapters {
            attendance,
            users,
            issues,
            hasher,
        } = adapters;

        let attendance_service = Arc::new(AttendanceService::new(
            Arc::clone(&attendance),
            Arc::clone(&users),
            Arc::clone(&clock),
        ));
        let accounts = Arc::new(AccountService::new(Arc::clone(&users), hasher));

        Self {
            login: accounts.clone(),
            attendance: attendance_service.clone(),
            attendance_query: attendance_service,
            billing: Arc::new(BillingService::new(
                Arc::clone(&attendance),
                rates,
                Arc::clone(&clock),
            )),
            issues: Arc::new(IssueService::new(
                Arc::clone(&issues),
                Arc::clone(&users),
                Arc::clone(&clock),
            )),
            admin_query: Arc::new(DashboardService::new(users, attendance, issues, clock)),
            admin: accounts,
        }
    }
}
