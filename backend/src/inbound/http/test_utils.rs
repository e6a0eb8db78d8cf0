//! Test helpers for inbound HTTP handlers.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::Trace;
use crate::domain::ports::{
    MockAdminCommand, MockAdminQuery, MockAttendanceCommand, MockAttendanceQuery,
    MockBillingQuery, MockIssueCommand, MockLoginService,
};
use crate::inbound::http::api_scope;
use crate::inbound::http::state::HttpState;

/// Mocked driving ports; unset expectations fail the test when called.
#[derive(Default)]
pub(crate) struct MockPorts {
    pub login: MockLoginService,
    pub attendance: MockAttendanceCommand,
    pub attendance_query: MockAttendanceQuery,
    pub billing: MockBillingQuery,
    pub issues: MockIssueCommand,
    pub admin_query: MockAdminQuery,
    pub admin: MockAdminCommand,
}

impl MockPorts {
    pub(crate) fn into_state(self) -> HttpState {
        HttpState {
            login: Arc::new(self.login),
            attendance: Arc::new(self.attendance),
            attendance_query: Arc::new(self.attendance_query),
            billing: Arc::new(self.billing),
            issues: Arc::new(self.issues),
            admin_query: Arc::new(self.admin_query),
            admin: Arc::new(self.admin),
        }
    }
}

/// Application serving the API scope over `ports`.
pub(crate) fn test_app(
    ports: MockPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .wrap(Trace)
        .service(api_scope())
}
