//! Tests for the attendance handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::{AttendanceDate, MealFlags, Username};
use crate::inbound::http::test_utils::{MockPorts, test_app};

fn record(username: &str, date: &str, meals: MealFlags) -> AttendanceRecord {
    AttendanceRecord::new(
        1,
        Username::new(username).expect("valid username"),
        AttendanceDate::parse(date).expect("valid date"),
        meals,
    )
}

async fn send(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(ports)).await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    (status, serde_json::from_slice(&body).expect("JSON body"))
}

fn post_attendance(body: Value) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/api/attendance")
        .set_json(body)
}

#[rstest]
#[case(json!({"username": "alice", "date": "2025-12-01", "breakfast": 1, "lunch": 0}))]
#[case(json!({"username": "alice", "date": "2025-12-01", "breakfast": true, "lunch": false}))]
#[actix_web::test]
async fn flags_accept_bits_and_booleans(#[case] body: Value) {
    let mut ports = MockPorts::default();
    ports
        .attendance
        .expect_record_attendance()
        .withf(|request| {
            request.username == "alice"
                && request.date == "2025-12-01"
                && request.update.breakfast == Some(true)
                && request.update.lunch == Some(false)
                && request.update.dinner.is_none()
                && request.update.mode == WriteMode::Merge
        })
        .return_once(|_| {
            Ok(record(
                "alice",
                "2025-12-01",
                MealFlags {
                    breakfast: true,
                    ..MealFlags::default()
                },
            ))
        });

    let (status, body) = send(ports, post_attendance(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["date"], "2025-12-01");
    assert_eq!(body["breakfast"], true);
    assert_eq!(body["lunch"], false);
}

#[rstest]
#[actix_web::test]
async fn overwrite_mode_is_forwarded() {
    let mut ports = MockPorts::default();
    ports
        .attendance
        .expect_record_attendance()
        .withf(|request| request.update.mode == WriteMode::Overwrite)
        .return_once(|_| Ok(record("alice", "2025-12-01", MealFlags::default())));

    let (status, _) = send(
        ports,
        post_attendance(json!({
            "username": "alice",
            "date": "2025-12-01",
            "mode": "overwrite",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn out_of_range_flags_are_rejected_before_the_port() {
    let mut ports = MockPorts::default();
    ports.attendance.expect_record_attendance().times(0);

    let (status, body) = send(
        ports,
        post_attendance(json!({"username": "alice", "date": "2025-12-01", "dinner": 2})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "dinner");
    assert_eq!(body["details"]["code"], "invalid_flag");
}

#[rstest]
#[actix_web::test]
async fn unknown_users_get_404() {
    let mut ports = MockPorts::default();
    ports
        .attendance
        .expect_record_attendance()
        .return_once(|_| Err(Error::not_found("user ghost does not exist")));

    let (status, body) = send(
        ports,
        post_attendance(json!({"username": "ghost", "date": "2025-12-01", "lunch": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[rstest]
#[actix_web::test]
async fn stats_report_counts_and_total() {
    let mut ports = MockPorts::default();
    ports
        .attendance_query
        .expect_attendance_stats()
        .withf(|request| {
            request.username == "alice" && request.range.as_deref() == Some("2025-12")
        })
        .return_once(|_| {
            Ok(AggregateResult {
                breakfasts: 10,
                lunches: 8,
                dinners: 5,
                days: 12,
            })
        });

    let (status, body) = send(
        ports,
        actix_test::TestRequest::get().uri("/api/attendance-stats?username=alice&range=2025-12"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"breakfasts": 10, "lunches": 8, "dinners": 5, "total": 23, "days": 12})
    );
}

#[rstest]
#[actix_web::test]
async fn stats_without_username_use_the_error_envelope() {
    let mut ports = MockPorts::default();
    ports.attendance_query.expect_attendance_stats().times(0);

    let (status, body) = send(
        ports,
        actix_test::TestRequest::get().uri("/api/attendance-stats"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], "invalid_query");
}

#[rstest]
#[actix_web::test]
async fn history_passes_bounds_and_lists_records() {
    let mut ports = MockPorts::default();
    ports
        .attendance_query
        .expect_attendance_history()
        .withf(|request| {
            request.username == "alice"
                && request.from.as_deref() == Some("2025-12-01")
                && request.to.is_none()
        })
        .return_once(|_| {
            Ok(vec![
                record(
                    "alice",
                    "2025-12-02",
                    MealFlags {
                        dinner: true,
                        ..MealFlags::default()
                    },
                ),
                record("alice", "2025-12-01", MealFlags::default()),
            ])
        });

    let (status, body) = send(
        ports,
        actix_test::TestRequest::get().uri("/api/attendance-history/alice?from=2025-12-01"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = body
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|entry| entry["date"].as_str())
        .collect();
    assert_eq!(dates, ["2025-12-02", "2025-12-01"]);
    assert_eq!(body[0]["dinner"], true);
}

#[rstest]
#[actix_web::test]
async fn recent_activity_reports_last_action() {
    let mut ports = MockPorts::default();
    ports
        .attendance_query
        .expect_recent_activity()
        .withf(|limit| *limit == Some(2))
        .return_once(|_| {
            Ok(vec![RecentActivity {
                username: Username::new("bob").expect("valid username"),
                date: AttendanceDate::parse("2025-12-03").expect("valid date"),
                last_action: "B L".to_owned(),
            }])
        });

    let (status, body) = send(
        ports,
        actix_test::TestRequest::get().uri("/api/recent-activity?limit=2"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"username": "bob", "date": "2025-12-03", "lastAction": "B L"}])
    );
}

#[rstest]
#[actix_web::test]
async fn recent_activity_surfaces_limit_errors() {
    let mut ports = MockPorts::default();
    ports
        .attendance_query
        .expect_recent_activity()
        .withf(|limit| *limit == Some(0))
        .return_once(|_| Err(Error::invalid_request("limit must be between 1 and 100")));

    let (status, body) = send(
        ports,
        actix_test::TestRequest::get().uri("/api/recent-activity?limit=0"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}
