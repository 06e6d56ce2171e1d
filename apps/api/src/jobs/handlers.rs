use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::jobs::fallback::sample_jobs;
use crate::jobs::filters::{translate, SearchFilter};
use crate::jobs::normalize::{normalize_response, JobRecord};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct JobsResponse {
    pub jobs: Vec<JobRecord>,
}

/// GET /jobs
///
/// The query is read as raw pairs so repeated keys never reject the request.
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<JobsResponse>, AppError> {
    let Query(pairs) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let filter = SearchFilter::from_pairs(pairs);

    let source = match &state.jobs {
        Some(source) if !filter.is_mock() => source,
        _ => {
            debug!("Serving sample jobs (mock={})", filter.is_mock());
            return Ok(Json(JobsResponse {
                jobs: sample_jobs(),
            }));
        }
    };

    let params = translate(&filter)?;
    let body = source.search(&params).await?;
    let jobs = normalize_response(&body);
    debug!("Normalized {} jobs for field '{}'", jobs.len(), params.field);

    Ok(Json(JobsResponse { jobs }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;

    use crate::jobs::filters::WORLDWIDE_GEOID;
    use crate::test_support::{get, test_state, FakeJobSource};

    #[tokio::test]
    async fn test_no_api_key_serves_samples_idempotently() {
        let state = test_state();
        let (status, first) = get(state.clone(), "/jobs?field=engineer").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["jobs"].as_array().unwrap().len(), 3);
        assert_eq!(first["jobs"][0]["id"], "sample-1");

        let (_, second) = get(state, "/jobs?field=engineer").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fallback_does_not_require_field() {
        let (status, body) = get(test_state(), "/jobs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["jobs"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_repeated_query_keys_still_serve_samples() {
        let (status, body) = get(test_state(), "/jobs?field=engineer&field=dev").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["jobs"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_repeated_field_uses_first_value_upstream() {
        let source = Arc::new(FakeJobSource::ok(json!([])));
        let mut state = test_state();
        state.jobs = Some(source.clone());

        let (status, body) = get(state, "/jobs?field=engineer&field=dev").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "jobs": [] }));
        assert_eq!(source.calls()[0].field, "engineer");
    }

    #[tokio::test]
    async fn test_mock_flag_bypasses_upstream() {
        let source = Arc::new(FakeJobSource::ok(json!([{ "job_id": "real" }])));
        let mut state = test_state();
        state.jobs = Some(source.clone());

        let (status, body) = get(state, "/jobs?field=engineer&mock=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["jobs"][0]["id"], "sample-1");
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_field_is_400_with_upstream_configured() {
        let source = Arc::new(FakeJobSource::ok(json!([])));
        let mut state = test_state();
        state.jobs = Some(source.clone());

        let (status, body) = get(state, "/jobs?location=Berlin").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "field is required");
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_translates_and_normalizes() {
        let source = Arc::new(FakeJobSource::ok(json!({
            "jobs": [
                { "job_id": "j-1", "job_position": "Rust Engineer", "company_name": "Ferris", "job_location": "Remote" },
                { "title": "Ops", "company": "Acme", "location": "Austin, TX" }
            ]
        })));
        let mut state = test_state();
        state.jobs = Some(source.clone());

        let (status, body) = get(
            state,
            "/jobs?field=rust&sort_by=DD&job_type=f&work_type=2&exp_level=2,4,9&page=2",
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let jobs = body["jobs"].as_array().unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0]["id"], "j-1");
        assert_eq!(jobs[0]["isRemote"], true);
        assert_eq!(jobs[1]["id"], "1");
        assert_eq!(jobs[1]["isRemote"], false);

        let calls = source.calls();
        assert_eq!(calls.len(), 1);
        let params = &calls[0];
        assert_eq!(params.field, "rust");
        assert_eq!(params.geoid.as_deref(), Some(WORLDWIDE_GEOID));
        assert_eq!(params.page.as_deref(), Some("2"));
        assert_eq!(params.sort_by, Some("day"));
        assert_eq!(params.job_type, Some("full_time"));
        assert_eq!(params.work_type, Some("remote"));
        assert_eq!(params.exp_level.as_deref(), Some("entry_level,mid_senior_level"));
    }

    #[tokio::test]
    async fn test_upstream_status_is_propagated() {
        let source = Arc::new(FakeJobSource::status(403, json!({ "message": "invalid api key" })));
        let mut state = test_state();
        state.jobs = Some(source);

        let (status, body) = get(state, "/jobs?field=engineer").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Failed to fetch jobs");
        assert_eq!(body["detail"]["message"], "invalid api key");
    }
}
