use anyhow::{Context, Result};
use cp_dashboard_libs::{
    cache::DEFAULT_TTL,
    clients::{
        http_client, AtCoderClient, ClistClient, ClistCredentials, CodeChefClient,
        CodeforcesClient, ContestSource, LeetCodeClient, ProblemSource, ProfileFetcher,
        UpstreamEndpoints,
    },
    models::Platform,
};
use std::{collections::HashMap, env, sync::Arc, time::Duration};

pub type SharedProfileFetcher = Arc<dyn ProfileFetcher + Send + Sync>;
pub type SharedProblemSource = Arc<dyn ProblemSource + Send + Sync>;
pub type SharedContestSource = Arc<dyn ContestSource + Send + Sync>;

/// Upstream sources shared by every request.
pub struct AppState {
    pub profiles: HashMap<Platform, SharedProfileFetcher>,
    pub problem_sources: Vec<SharedProblemSource>,
    pub contests: SharedContestSource,
}

impl AppState {
    pub fn new(
        endpoints: &UpstreamEndpoints,
        credentials: Option<ClistCredentials>,
        contest_ttl: Duration,
    ) -> Result<Self> {
        let client = http_client().context("couldn't build HTTP client")?;

        let leetcode = Arc::new(LeetCodeClient::new(&endpoints.leetcode, client.clone()));
        let codeforces = Arc::new(CodeforcesClient::new(&endpoints.codeforces, client.clone()));
        let codechef = Arc::new(CodeChefClient::new(&endpoints.codechef, client.clone()));
        let atcoder = Arc::new(AtCoderClient::new(
            &endpoints.atcoder,
            &endpoints.atcoder_resources,
            client.clone(),
        ));
        let clist = Arc::new(ClistClient::new(
            &endpoints.clist,
            client,
            credentials,
            contest_ttl,
        ));

        let profiles = HashMap::from([
            (Platform::LeetCode, leetcode.clone() as SharedProfileFetcher),
            (Platform::Codeforces, codeforces.clone() as SharedProfileFetcher),
            (Platform::CodeChef, codechef as SharedProfileFetcher),
            (Platform::AtCoder, atcoder.clone() as SharedProfileFetcher),
        ]);
        let problem_sources = vec![
            leetcode as SharedProblemSource,
            codeforces as SharedProblemSource,
            atcoder as SharedProblemSource,
        ];

        Ok(Self {
            profiles,
            problem_sources,
            contests: clist,
        })
    }

    /// Build from `*_API_URL`, `CLIST_*` and `CONTEST_CACHE_TTL_SECONDS`.
    pub fn from_env() -> Result<Self> {
        let endpoints = UpstreamEndpoints::from_env();

        let credentials = match ClistCredentials::from_env() {
            Ok(credentials) => Some(credentials),
            Err(e) => {
                tracing::warn!("{}. Contest listing will be unavailable.", e);
                None
            }
        };

        let contest_ttl = match env::var("CONTEST_CACHE_TTL_SECONDS") {
            Ok(value) => value
                .parse::<u64>()
                .map(Duration::from_secs)
                .with_context(|| {
                    let message = format!("invalid CONTEST_CACHE_TTL_SECONDS: {}", value);
                    tracing::error!(message);
                    message
                })?,
            Err(_) => DEFAULT_TTL,
        };

        Self::new(&endpoints, credentials, contest_ttl)
    }
}
