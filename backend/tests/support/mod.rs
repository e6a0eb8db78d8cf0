//! Shared helpers for HTTP integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`; each
//! pulls this module in with `mod support;`. The app is wired exactly like
//! the server, over the in-process store and a clock pinned to
//! 2025-12-10 09:30 UTC.

#![allow(dead_code, reason = "not every test crate uses every helper")]

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use actix_web::{App, web};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use serde_json::{Value, json};

use messpro::Trace;
use messpro::domain::{RateTable, TRACE_ID_HEADER};
use messpro::inbound::http::api_scope;
use messpro::inbound::http::state::{HttpState, StoreAdapters};
use messpro::outbound::crypto::Argon2PasswordHasher;
use messpro::outbound::memory::InMemoryMessStore;

/// Clock pinned to a fixed instant.
pub struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 10, 9, 30, 0)
            .single()
            .expect("valid fixture timestamp")
    }
}

/// Handler state over a fresh in-process store.
pub fn memory_state() -> HttpState {
    HttpState::from_adapters(
        StoreAdapters::shared(
            Arc::new(InMemoryMessStore::default()),
            Arc::new(Argon2PasswordHasher::new()),
        ),
        RateTable::default(),
        Arc::new(FixtureClock),
    )
}

/// Initialised service serving the API over `state`.
pub async fn init_app(
    state: HttpState,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(api_scope()),
    )
    .await
}

/// Status and JSON body of a response; empty bodies read as `null`.
pub async fn send<S>(app: &S, request: actix_test::TestRequest) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    assert!(
        response.headers().contains_key(TRACE_ID_HEADER),
        "every response carries a trace id"
    );
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

/// Register `username` through the login endpoint.
pub async fn register<S>(app: &S, username: &str)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, _) = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "username": username, "password": "hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registration of {username}");
}

/// Record attendance and return the stored record.
pub async fn record<S>(app: &S, body: Value) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/attendance")
            .set_json(body),
    )
    .await
}

/// `GET` `uri` and return status and body.
pub async fn get<S>(app: &S, uri: &str) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    send(app, actix_test::TestRequest::get().uri(uri)).await
}
