use crate::modules::{
    handlers::{error_reply, ErrorReply, ValidatedQuery},
    state::AppState,
};
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use cp_dashboard_libs::{
    api::ErrorResponse,
    models::{Platform, UserProfile},
    FetchError,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::time::Instant;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ProfileParameter {
    #[validate(length(max = 100))]
    pub username: Option<String>,
}

pub async fn get_user(
    Path(platform): Path<String>,
    ValidatedQuery(params): ValidatedQuery<ProfileParameter>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<UserProfile>, ErrorReply> {
    let start_process = Instant::now();

    let fetcher = platform
        .parse::<Platform>()
        .ok()
        .and_then(|platform| state.profiles.get(&platform))
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Unknown platform: {}", platform))),
        ))?;

    let username = params
        .username
        .as_deref()
        .map(str::trim)
        .filter(|username| !username.is_empty())
        .ok_or(FetchError::MissingParameter(String::from(
            "Username is required",
        )))
        .map_err(|e| error_reply(&e))?;

    let result = fetcher.fetch_profile(username).await;
    let time = Instant::now().duration_since(start_process).as_millis();

    match result {
        Ok(profile) => {
            tracing::info!(
                target: "querylog",
                "elapsed_time={} platform={} username={}",
                time,
                profile.platform(),
                username
            );
            Ok(Json(profile))
        }
        Err(e) => {
            tracing::error!(
                "failed to fetch {} profile of {}: {}",
                platform,
                username,
                e
            );
            Err(error_reply(&e))
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{cmd::server::create_router, modules::handlers::fake};
    use axum::{body::Body, http::Request, http::StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn get(uri: &str) -> (StatusCode, Value) {
        let app = create_router(fake::state(None), None);
        let res = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn profile_is_tagged_with_platform() {
        let (status, body) = get("/api/atcoder/getUser?username=chokudai").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["platform"], "atcoder");
        assert_eq!(body["handle"], "chokudai");
        assert_eq!(body["acceptedCount"], 3000);
    }

    #[tokio::test]
    async fn platform_segment_is_case_insensitive() {
        let (status, _) = get("/api/AtCoder/getUser?username=chokudai").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_username_is_bad_request() {
        for uri in ["/api/codeforces/getUser", "/api/codeforces/getUser?username=%20"] {
            let (status, body) = get(uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Username is required");
        }
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (status, body) = get("/api/codechef/getUser?username=nobody").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "nobody not found");
    }

    #[tokio::test]
    async fn upstream_failure_is_internal_error() {
        let (status, body) = get("/api/leetcode/getUser?username=down").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("connection reset"));
    }

    #[tokio::test]
    async fn unknown_platform_is_not_found() {
        let (status, body) = get("/api/topcoder/getUser?username=tourist").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Unknown platform: topcoder");
    }
}
