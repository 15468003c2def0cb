use crate::modules::{
    handlers::{error_reply, ErrorReply, ValidatedQuery},
    state::AppState,
};
use axum::{extract::Extension, Json};
use chrono::Utc;
use cp_dashboard_libs::{api::ContestsResponse, contests::map_contests, ContestQuery};
use std::sync::Arc;
use tokio::time::Instant;

pub async fn list_contests(
    ValidatedQuery(params): ValidatedQuery<ContestQuery>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<ContestsResponse>, ErrorReply> {
    let start_process = Instant::now();
    let now = Utc::now();

    let page = state
        .contests
        .fetch_contests(&params, now)
        .await
        .map_err(|e| {
            tracing::error!("failed to fetch contests: {}", e);
            error_reply(&e)
        })?;
    let (contests, meta) = map_contests(page, &params, now);

    let time = Instant::now().duration_since(start_process).as_millis();
    tracing::info!(
        target: "querylog",
        "elapsed_time={} hits={} params={}",
        time, contests.len(), params.to_query_string()
    );

    Ok(Json(ContestsResponse { contests, meta }))
}

#[cfg(test)]
mod test {
    use crate::{cmd::server::create_router, modules::handlers::fake};
    use axum::{body::Body, http::Request, http::StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn get(page: Option<&'static str>, uri: &str) -> (StatusCode, Value) {
        let app = create_router(fake::state(page), None);
        let res = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn contests_with_meta() {
        let (status, body) = get(Some(fake::CONTESTS), "/api/contests?filter=upcoming").await;

        assert_eq!(status, StatusCode::OK);
        let contest = &body["contests"][0];
        assert_eq!(contest["id"], 52836512);
        assert_eq!(contest["isUpcoming"], true);
        assert_eq!(contest["isPast"], false);
        assert_eq!(contest["platformDisplayName"], "Codeforces");
        assert_eq!(contest["start"], "2099-01-01T14:35:00.000Z");
        assert_eq!(body["meta"]["total_count"], 1);
        assert_eq!(body["meta"]["limit"], 25);
    }

    #[tokio::test]
    async fn upstream_failure_is_error() {
        let (status, body) = get(None, "/api/contests").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("401"));
    }

    #[tokio::test]
    async fn unknown_filter_is_rejected() {
        let (status, _) = get(Some(fake::CONTESTS), "/api/contests?filter=future").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn huge_page_is_rejected() {
        let (status, body) = get(
            Some(fake::CONTESTS),
            "/api/contests?page=30000000&limit=200",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some());
    }
}
