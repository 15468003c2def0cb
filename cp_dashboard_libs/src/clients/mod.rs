pub mod atcoder;
pub mod clist;
pub mod codechef;
pub mod codeforces;
pub mod leetcode;

use crate::{
    error::{FetchError, Result},
    models::{ProblemPlatform, UnifiedProblem, UserProfile},
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::env;
use url::Url;

pub use atcoder::AtCoderClient;
pub use clist::{ClistClient, ClistCredentials, ContestSource};
pub use codechef::CodeChefClient;
pub use codeforces::CodeforcesClient;
pub use leetcode::LeetCodeClient;

/// Looks up a user profile on one platform.
#[async_trait]
pub trait ProfileFetcher {
    async fn fetch_profile(&self, username: &str) -> Result<UserProfile>;
}

/// Supplies the normalized problem list of one platform.
#[async_trait]
pub trait ProblemSource {
    fn platform(&self) -> ProblemPlatform;
    async fn fetch_problems(&self, limit: usize) -> Result<Vec<UnifiedProblem>>;
}

/// Base URLs of every upstream API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamEndpoints {
    pub leetcode: String,
    pub codeforces: String,
    pub codechef: String,
    pub atcoder: String,
    pub atcoder_resources: String,
    pub clist: String,
}

impl Default for UpstreamEndpoints {
    fn default() -> Self {
        Self {
            leetcode: String::from("https://leetcode-api-pied.vercel.app"),
            codeforces: String::from("https://codeforces.com/api"),
            codechef: String::from("https://codechef-api.vercel.app"),
            atcoder: String::from("https://kenkoooo.com/atcoder/atcoder-api/v3"),
            atcoder_resources: String::from("https://kenkoooo.com/atcoder/resources"),
            clist: String::from("https://clist.by/api/v4"),
        }
    }
}

impl UpstreamEndpoints {
    /// Defaults, overridden by `*_API_URL` environment variables where set.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let read = |key: &str, default: String| -> String {
            env::var(key)
                .map(|value| value.trim_end_matches('/').to_string())
                .unwrap_or(default)
        };

        Self {
            leetcode: read("LEETCODE_API_URL", defaults.leetcode),
            codeforces: read("CODEFORCES_API_URL", defaults.codeforces),
            codechef: read("CODECHEF_API_URL", defaults.codechef),
            atcoder: read("ATCODER_API_URL", defaults.atcoder),
            atcoder_resources: read("ATCODER_RESOURCES_URL", defaults.atcoder_resources),
            clist: read("CLIST_API_URL", defaults.clist),
        }
    }
}

/// HTTP client shared by all upstream clients.
///
/// No timeout is configured: requests live as long as reqwest allows.
pub fn http_client() -> Result<Client> {
    Client::builder()
        .gzip(true)
        .user_agent(concat!("cp_dashboard/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(FetchError::from)
}

/// `base` with `segments` appended as percent-encoded path segments.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| FetchError::Configuration(format!("invalid upstream url {}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| FetchError::Configuration(format!("upstream url {} cannot be a base", base)))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// Send a GET request and decode its JSON body into `T`.
pub(crate) async fn get_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let res = request.send().await?;
    let status = res.status();
    let url = res.url().to_string();
    let body = res.text().await?;

    tracing::debug!("GET {} returned {}", url, status);
    decode_response(status, &body)
}

/// Classify an upstream response by status code, then decode the body.
pub(crate) fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound(format!(
            "upstream returned 404: {}",
            truncate(body, 200)
        )));
    }

    if !status.is_success() {
        return Err(FetchError::UpstreamUnavailable {
            status: Some(status.as_u16()),
            message: format!("upstream returned {}: {}", status, truncate(body, 200)),
        });
    }

    Ok(serde_json::from_str(body)?)
}

fn truncate(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((index, _)) => &body[..index],
        None => body,
    }
}
