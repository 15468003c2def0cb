use crate::{
    clients::{ProblemSource, ProfileFetcher},
    error::{FetchError, Result},
    models::{
        profile::{
            CodeforcesProblem, CodeforcesProfile, CodeforcesRatingChange, CodeforcesSubmission,
            CodeforcesUser,
        },
        ProblemPlatform, UnifiedProblem, UserProfile,
    },
    normalizer::normalize_codeforces,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};

const SUBMISSION_COUNT: u32 = 10;

/// Envelope wrapping every Codeforces API response.
#[derive(Debug, Deserialize)]
pub struct CodeforcesEnvelope<T> {
    pub status: String,
    pub comment: Option<String>,
    pub result: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesProblemset {
    pub problems: Vec<CodeforcesProblem>,
    pub problem_statistics: Vec<CodeforcesProblemStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesProblemStatistics {
    pub contest_id: Option<u64>,
    pub index: String,
    pub solved_count: u64,
}

/// Unwrap a Codeforces response body.
///
/// Codeforces answers failed calls with HTTP 400 and `{"status": "FAILED", "comment": ...}`, so
/// the envelope is inspected before the status code.
pub(crate) fn decode_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<T> {
    let envelope: CodeforcesEnvelope<T> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) if (200..300).contains(&status) => return Err(FetchError::from(e)),
        Err(_) => {
            return Err(FetchError::UpstreamUnavailable {
                status: Some(status),
                message: format!("Codeforces API returned {}", status),
            })
        }
    };

    if envelope.status != "OK" {
        let comment = envelope.comment.unwrap_or_default();
        if comment.to_lowercase().contains("not found") {
            return Err(FetchError::NotFound(comment));
        }
        return Err(FetchError::UpstreamUnavailable {
            status: Some(status),
            message: format!("Codeforces API reported {}: {}", envelope.status, comment),
        });
    }

    envelope.result.ok_or(FetchError::InvalidShape(String::from(
        "Codeforces response has no result",
    )))
}

/// `user.info` answers with a list; an empty one means the handle does not exist.
fn first_user(users: Vec<CodeforcesUser>, handle: &str) -> Result<CodeforcesUser> {
    users.into_iter().next().ok_or(FetchError::NotFound(format!(
        "Codeforces user {} not found",
        handle
    )))
}

pub struct CodeforcesClient {
    base_url: String,
    client: Client,
}

impl CodeforcesClient {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, method);
        let res = self.client.get(url).query(query).send().await?;
        let status = res.status().as_u16();
        let body = res.text().await?;

        decode_envelope(status, &body)
    }

    pub async fn fetch_user_info(&self, handle: &str) -> Result<CodeforcesUser> {
        let users: Vec<CodeforcesUser> = self
            .call("user.info", &[("handles", handle.to_string())])
            .await?;

        first_user(users, handle)
    }

    pub async fn fetch_user_status(
        &self,
        handle: &str,
        count: u32,
    ) -> Result<Vec<CodeforcesSubmission>> {
        self.call(
            "user.status",
            &[
                ("handle", handle.to_string()),
                ("from", String::from("1")),
                ("count", count.to_string()),
            ],
        )
        .await
    }

    pub async fn fetch_user_rating(&self, handle: &str) -> Result<Vec<CodeforcesRatingChange>> {
        self.call("user.rating", &[("handle", handle.to_string())])
            .await
    }

    pub async fn fetch_problemset(&self) -> Result<CodeforcesProblemset> {
        tracing::info!("Attempting to get problem list from Codeforces...");
        let problemset: CodeforcesProblemset = self.call("problemset.problems", &[]).await?;
        tracing::info!(
            "{} Codeforces problems collected.",
            problemset.problems.len()
        );

        Ok(problemset)
    }
}

#[async_trait]
impl ProfileFetcher for CodeforcesClient {
    async fn fetch_profile(&self, username: &str) -> Result<UserProfile> {
        let (user_info, user_submissions, user_rating_changes) = tokio::try_join!(
            self.fetch_user_info(username),
            self.fetch_user_status(username, SUBMISSION_COUNT),
            self.fetch_user_rating(username),
        )?;

        Ok(UserProfile::Codeforces(CodeforcesProfile {
            user_info,
            user_submissions,
            user_rating_changes,
        }))
    }
}

#[async_trait]
impl ProblemSource for CodeforcesClient {
    fn platform(&self) -> ProblemPlatform {
        ProblemPlatform::Codeforces
    }

    async fn fetch_problems(&self, limit: usize) -> Result<Vec<UnifiedProblem>> {
        let problemset = self.fetch_problemset().await?;
        Ok(normalize_codeforces(problemset, limit).collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::clients::fake;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::json;

    #[test]
    fn zero_users_is_not_found() {
        let users: Vec<CodeforcesUser> =
            decode_envelope(200, r#"{"status": "OK", "result": []}"#).unwrap();
        let result = first_user(users, "nobody");
        match result {
            Err(FetchError::NotFound(message)) => assert!(message.contains("nobody")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn failed_lookup_is_not_found() {
        let body = r#"{"status": "FAILED", "comment": "handles: User with handle nobody_xyz not found"}"#;
        let result = decode_envelope::<Vec<CodeforcesUser>>(400, body);
        assert!(matches!(result, Err(FetchError::NotFound(_))));
    }

    #[test]
    fn other_failures_are_unavailable() {
        let body = r#"{"status": "FAILED", "comment": "Call limit exceeded"}"#;
        let result = decode_envelope::<Vec<CodeforcesUser>>(503, body);
        match result {
            Err(FetchError::UpstreamUnavailable { status, message }) => {
                assert_eq!(status, Some(503));
                assert!(message.contains("Call limit exceeded"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn non_json_error_page_is_unavailable() {
        let result = decode_envelope::<Vec<CodeforcesUser>>(502, "<html>Bad Gateway</html>");
        assert!(matches!(
            result,
            Err(FetchError::UpstreamUnavailable { .. })
        ));
    }

    #[test]
    fn malformed_result_is_invalid_shape() {
        let body = r#"{"status": "OK", "result": [{"handle": "tourist"}]}"#;
        let result = decode_envelope::<Vec<CodeforcesUser>>(200, body);
        assert!(matches!(result, Err(FetchError::InvalidShape(_))));
    }

    #[test]
    fn decode_submission() {
        let body = r#"{
            "status": "OK",
            "result": [{
                "id": 212345678,
                "contestId": 1850,
                "creationTimeSeconds": 1689950000,
                "relativeTimeSeconds": 2147483647,
                "problem": {
                    "contestId": 1850, "index": "H", "name": "The Third Letter",
                    "type": "PROGRAMMING", "rating": 1700, "tags": ["dfs and similar", "graphs"]
                },
                "author": {
                    "contestId": 1850, "members": [{"handle": "tourist"}],
                    "participantType": "PRACTICE", "ghost": false, "startTimeSeconds": 1689950000
                },
                "programmingLanguage": "GNU C++20 (64)",
                "verdict": "OK",
                "testset": "TESTS",
                "passedTestCount": 42,
                "timeConsumedMillis": 218,
                "memoryConsumedBytes": 15360000
            }]
        }"#;
        let submissions: Vec<CodeforcesSubmission> = decode_envelope(200, body).unwrap();
        assert_eq!(submissions.len(), 1);
        assert_eq!(
            submissions[0].verdict,
            Some(crate::models::profile::CodeforcesVerdict::Ok)
        );
        assert_eq!(submissions[0].problem.rating, Some(1700));
    }

    #[tokio::test]
    async fn failed_rating_call_fails_the_profile() {
        let app = Router::new()
            .route(
                "/user.info",
                get(|| async {
                    Json(json!({
                        "status": "OK",
                        "result": [{
                            "handle": "tourist",
                            "contribution": 0,
                            "rank": "legendary grandmaster",
                            "rating": 3800,
                            "lastOnlineTimeSeconds": 1700000000,
                            "registrationTimeSeconds": 1265987288,
                            "friendOfCount": 70000,
                            "avatar": "https://userpic.codeforces.org/422/avatar/2b5dbe87f0d859a2.jpg",
                            "titlePhoto": "https://userpic.codeforces.org/422/title/50a270ed4a722867.jpg"
                        }]
                    }))
                }),
            )
            .route(
                "/user.status",
                get(|| async { Json(json!({"status": "OK", "result": []})) }),
            )
            .route(
                "/user.rating",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error") }),
            );
        let base = fake::serve(app).await;
        let client = CodeforcesClient::new(&base, fake::client());

        match client.fetch_profile("tourist").await {
            Err(FetchError::UpstreamUnavailable { status, .. }) => assert_eq!(status, Some(500)),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_handle_is_not_found() {
        let app = Router::new().route(
            "/:method",
            get(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "status": "FAILED",
                        "comment": "handles: User with handle nobody_xyz not found"
                    })),
                )
            }),
        );
        let base = fake::serve(app).await;
        let client = CodeforcesClient::new(&base, fake::client());

        let result = client.fetch_user_info("nobody_xyz").await;
        assert!(matches!(result, Err(FetchError::NotFound(_))));
    }

    #[tokio::test]
    #[ignore]
    async fn fetch_real_profile() {
        let client = CodeforcesClient::new(
            "https://codeforces.com/api",
            crate::clients::http_client().unwrap(),
        );
        let profile = client.fetch_profile("tourist").await.unwrap();
        assert_eq!(profile.platform(), crate::models::Platform::Codeforces);
    }
}
