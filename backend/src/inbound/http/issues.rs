//! Complaint and feedback submission.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::SubmitIssueRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Body of `POST /api/submit-issue`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    /// Submitting user.
    pub username: String,
    /// `complaint` or `feedback`.
    #[serde(rename = "type")]
    #[schema(example = "complaint")]
    pub kind: String,
    /// Free-form category.
    pub category: String,
    /// One-line summary.
    pub subject: String,
    /// Full text.
    pub message: String,
    /// Defaults to today.
    pub date: Option<String>,
}

/// Acknowledgement returned for a stored issue.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueResponse {
    /// Always `Success`.
    pub message: String,
    /// Identifier of the stored issue.
    pub id: i64,
}

/// Submit a complaint or feedback.
#[utoipa::path(
    post,
    path = "/api/submit-issue",
    request_body = IssueRequest,
    responses(
        (status = 200, description = "Issue stored", body = IssueResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["issues"],
    operation_id = "submitIssue"
)]
#[post("/submit-issue")]
pub async fn submit_issue(
    state: web::Data<HttpState>,
    payload: web::Json<IssueRequest>,
) -> ApiResult<web::Json<IssueResponse>> {
    let IssueRequest {
        username,
        kind,
        category,
        subject,
        message,
        date,
    } = payload.into_inner();
    let id = state
        .issues
        .submit_issue(SubmitIssueRequest {
            username,
            kind,
            category,
            subject,
            message,
            date,
        })
        .await?;
    Ok(web::Json(IssueResponse {
        message: "Success".to_owned(),
        id,
    }))
}
