use axum::extract::{Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::User;
use crate::orchestrator::{DualWriteOutcome, ServiceError, SubmitRequest};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveContentRequest {
    pub url: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteContentRequest {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteSummaryRequest {
    pub id: Option<i64>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSummaryRequest {
    pub url: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub q: String,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Signed-in user for this request, if any.
///
/// A token that the auth service rejects is an error rather than anonymous access.
async fn request_user(state: &AppState, headers: &HeaderMap) -> Result<Option<User>, ServiceError> {
    let Some(token) = bearer_token(headers) else {
        return Ok(None);
    };
    let Some(auth) = &state.auth else {
        tracing::debug!("Ignoring bearer token: sign-in is not configured");
        return Ok(None);
    };

    match auth.get_user(token).await {
        Ok(user) => Ok(Some(user)),
        Err(e) => {
            tracing::warn!("Rejected bearer token: {}", e);
            Err(ServiceError::AuthRequired)
        }
    }
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// POST /api/save-content
///
/// Stores a content document only; no summary record is written.
pub async fn save_content(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SaveContentRequest>,
) -> Result<Json<Value>, ServiceError> {
    let (Some(url), Some(content)) = (request.url, request.content) else {
        return Err(ServiceError::Validation("Missing url or content".to_string()));
    };
    let user = request_user(&state, &headers).await?;

    let inserted_id = state
        .summaries
        .save_content(&url, &content, user.as_ref())
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Saved",
        "inserted_id": inserted_id,
    })))
}

/// DELETE /api/delete-content
pub async fn delete_content(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<DeleteContentRequest>,
) -> Result<Json<Value>, ServiceError> {
    let url = request
        .url
        .ok_or_else(|| ServiceError::Validation("Missing URL".to_string()))?;
    let user = request_user(&state, &headers).await?;

    let deleted_count = state.summaries.delete_content(&url, user.as_ref()).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Deleted from the document store successfully",
        "deleted_count": deleted_count,
    })))
}

/// DELETE /api/delete-summary
///
/// Removes summary records by `id`, or all of them for a `url`. Content documents stay.
/// A signed-in caller only deletes their own records; anything else is a 404.
pub async fn delete_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<DeleteSummaryRequest>,
) -> Result<Json<Value>, ServiceError> {
    let user = request_user(&state, &headers).await?;

    let deleted_count = match (request.id, request.url) {
        (Some(id), _) => state.summaries.delete_summary(id, user.as_ref()).await?,
        (None, Some(url)) => {
            state
                .summaries
                .delete_summaries_by_url(&url, user.as_ref())
                .await?
        }
        (None, None) => {
            return Err(ServiceError::Validation(
                "Missing summary id or url".to_string(),
            ))
        }
    };

    Ok(Json(json!({
        "success": true,
        "message": "Deleted",
        "deleted_count": deleted_count,
    })))
}

/// GET /api/summaries?q=
pub async fn list_summaries(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ServiceError> {
    let user = request_user(&state, &headers).await?;
    let summaries = state.summaries.list(user.as_ref(), &query.q).await?;

    Ok(Json(json!({ "summaries": summaries })))
}

/// POST /api/summaries
///
/// Runs the full dual write. A partial save answers 500 with `partial: true`.
pub async fn create_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateSummaryRequest>,
) -> Result<Response, ServiceError> {
    let user = request_user(&state, &headers).await?;

    let mut submit = SubmitRequest::new(request.url.unwrap_or_default());
    submit.content = request.content;

    let outcome = state.summaries.submit(submit, user.as_ref()).await;
    let message = outcome.notification();

    let response = match outcome {
        DualWriteOutcome::Complete {
            record,
            transformed,
        } => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": message,
                "record": record,
                "summary": transformed.summary,
                "urdu": transformed.urdu,
            })),
        )
            .into_response(),
        DualWriteOutcome::Partial {
            content_id,
            transformed,
            error,
        } => (
            error.status_code(),
            Json(json!({
                "success": false,
                "partial": true,
                "message": message,
                "content_id": content_id,
                "summary": transformed.summary,
                "urdu": transformed.urdu,
            })),
        )
            .into_response(),
        DualWriteOutcome::Failed(error) => return Err(error),
    };

    Ok(response)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn bearer_token_is_extracted() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
