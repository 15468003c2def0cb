pub mod contest;
pub mod problem;
pub mod profile;

use axum::{async_trait, extract::FromRequestParts, http::StatusCode, Json};
use cp_dashboard_libs::{api::ErrorResponse, FetchError};
use http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

pub type ErrorReply = (StatusCode, Json<ErrorResponse>);

pub fn error_reply(err: &FetchError) -> ErrorReply {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(err)))
}

/// Query string decoded with `serde_urlencoded` and checked with `validator`.
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ErrorReply;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        let value: T = serde_urlencoded::from_str(query).map_err(|rejection| {
            tracing::error!("Parsing error: {}", rejection);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(format!(
                    "invalid format query string: [{}]",
                    rejection
                ))),
            )
        })?;

        value.validate().map_err(|rejection| {
            tracing::error!("Validation error: {}", rejection);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    format!("Validation error: [{}]", rejection).replace('\n', ", "),
                )),
            )
        })?;

        Ok(ValidatedQuery(value))
    }
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
pub(crate) mod fake {
    use crate::modules::state::{AppState, SharedProblemSource, SharedProfileFetcher};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use cp_dashboard_libs::{
        clients::{clist::ClistContestPage, ContestSource, ProblemSource, ProfileFetcher},
        models::{
            profile::AtCoderProfile, Difficulty, Platform, ProblemPlatform, UnifiedProblem,
            UserProfile,
        },
        ContestQuery, FetchError, Result,
    };
    use std::{collections::HashMap, sync::Arc};

    pub struct FakeProfiles;

    #[async_trait]
    impl ProfileFetcher for FakeProfiles {
        async fn fetch_profile(&self, username: &str) -> Result<UserProfile> {
            match username {
                "chokudai" => Ok(UserProfile::AtCoder(AtCoderProfile {
                    handle: username.to_string(),
                    accepted_count: Some(3000),
                    accepted_count_rank: None,
                    rated_point_sum: None,
                    rated_point_sum_rank: None,
                    recent_submissions: Vec::new(),
                })),
                "down" => Err(FetchError::unavailable("connection reset")),
                _ => Err(FetchError::NotFound(format!("{} not found", username))),
            }
        }
    }

    pub struct FakeProblems {
        pub platform: ProblemPlatform,
        pub problems: Option<Vec<UnifiedProblem>>,
    }

    #[async_trait]
    impl ProblemSource for FakeProblems {
        fn platform(&self) -> ProblemPlatform {
            self.platform
        }

        async fn fetch_problems(&self, limit: usize) -> Result<Vec<UnifiedProblem>> {
            match &self.problems {
                Some(problems) => Ok(problems.iter().take(limit).cloned().collect()),
                None => Err(FetchError::unavailable("connection refused")),
            }
        }
    }

    pub struct FakeContests {
        pub page: Option<&'static str>,
    }

    #[async_trait]
    impl ContestSource for FakeContests {
        async fn fetch_contests(
            &self,
            _query: &ContestQuery,
            _now: DateTime<Utc>,
        ) -> Result<ClistContestPage> {
            match self.page {
                Some(page) => Ok(serde_json::from_str(page)?),
                None => Err(FetchError::UpstreamUnavailable {
                    status: Some(401),
                    message: String::from("upstream returned 401 Unauthorized"),
                }),
            }
        }
    }

    pub fn leetcode(slug: &str, label: &str) -> UnifiedProblem {
        UnifiedProblem {
            id: format!("leetcode_{}", slug),
            title: slug.replace('-', " "),
            url: format!("https://leetcode.com/problems/{}/", slug),
            platform: ProblemPlatform::LeetCode,
            difficulty: Some(Difficulty::Label(label.to_string())),
            tags: Vec::new(),
            problem_id_on_platform: slug.to_string(),
            contest_id: None,
            paid_only: Some(false),
            solved_count: None,
        }
    }

    pub const CONTESTS: &str = r#"{
        "meta": {"limit": 25, "next": null, "offset": 0, "previous": null, "total_count": 1},
        "objects": [
            {"id": 52836512, "event": "Codeforces Round 999", "href": "https://codeforces.com/contests/2061",
             "resource": "codeforces.com", "host": "codeforces.com",
             "start": "2099-01-01T14:35:00", "end": "2099-01-01T16:35:00", "duration": 7200}
        ]
    }"#;

    pub fn state(contest_page: Option<&'static str>) -> AppState {
        let profiles = Platform::ALL
            .into_iter()
            .map(|platform| {
                (platform, Arc::new(FakeProfiles) as SharedProfileFetcher)
            })
            .collect::<HashMap<_, _>>();

        AppState {
            profiles,
            problem_sources: vec![
                Arc::new(FakeProblems {
                    platform: ProblemPlatform::LeetCode,
                    problems: Some(vec![
                        leetcode("two-sum", "Easy"),
                        leetcode("valid-parentheses", "Easy"),
                        leetcode("median-of-two-sorted-arrays", "Hard"),
                    ]),
                }) as SharedProblemSource,
                Arc::new(FakeProblems {
                    platform: ProblemPlatform::AtCoder,
                    problems: None,
                }) as SharedProblemSource,
            ],
            contests: Arc::new(FakeContests { page: contest_page }),
        }
    }
}
