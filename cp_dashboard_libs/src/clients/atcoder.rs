use crate::{
    clients::{get_json, ProblemSource, ProfileFetcher},
    error::Result,
    models::{
        profile::{AtCoderProfile, AtCoderSubmissionEntry},
        ProblemPlatform, UnifiedProblem, UserProfile,
    },
    normalizer::normalize_atcoder,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};

const RECENT_SUBMISSIONS: usize = 20;

#[derive(Debug, Clone, Deserialize)]
pub struct AtCoderSubmissionJson {
    pub id: u64,
    pub epoch_second: i64,
    pub problem_id: String,
    pub contest_id: String,
    pub user_id: String,
    pub language: String,
    pub point: f64,
    pub length: u64,
    pub result: String,
    pub execution_time: Option<u64>,
}

/// Response of the `user/*_rank` endpoints.
#[derive(Debug, Deserialize)]
pub struct AtCoderRankJson<T> {
    pub count: Option<T>,
    pub rank: Option<u64>,
}

/// Entry of `problems.json`.
#[derive(Debug, Deserialize)]
pub struct AtCoderProblemJson {
    pub id: String,
    pub contest_id: String,
    pub problem_index: String,
    pub name: String,
    pub title: String,
}

/// Latest submissions first, capped at `count`.
pub fn recent_submissions(
    mut submissions: Vec<AtCoderSubmissionJson>,
    count: usize,
) -> Vec<AtCoderSubmissionEntry> {
    submissions.sort_by(|a, b| b.epoch_second.cmp(&a.epoch_second));
    submissions
        .into_iter()
        .take(count)
        .map(|submission| AtCoderSubmissionEntry {
            id: submission.id,
            problem_id: submission.problem_id,
            contest_id: submission.contest_id,
            language: submission.language,
            verdict: submission.result,
            points: submission.point,
            submitted_at_seconds: submission.epoch_second,
        })
        .collect()
}

pub struct AtCoderClient {
    api_url: String,
    resources_url: String,
    client: Client,
}

impl AtCoderClient {
    pub fn new(api_url: &str, resources_url: &str, client: Client) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            resources_url: resources_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub async fn fetch_submissions(&self, handle: &str) -> Result<Vec<AtCoderSubmissionJson>> {
        let url = format!("{}/user/submissions", self.api_url);
        get_json(
            self.client
                .get(url)
                .query(&[("user", handle), ("from_second", "0")]),
        )
        .await
    }

    /// Best-effort lookup of one rank statistic. Any failure yields `None`.
    pub async fn fetch_rank_stat<T: DeserializeOwned>(
        &self,
        handle: &str,
        stat: &str,
    ) -> Option<AtCoderRankJson<T>> {
        let url = format!("{}/user/{}", self.api_url, stat);
        match get_json(self.client.get(url).query(&[("user", handle)])).await {
            Ok(rank) => Some(rank),
            Err(e) => {
                tracing::warn!(
                    "AtCoder user/{} for {} is unavailable, leaving it absent: {}",
                    stat,
                    handle,
                    e
                );
                None
            }
        }
    }

    pub async fn fetch_problem_list(&self) -> Result<Vec<AtCoderProblemJson>> {
        tracing::info!("Attempting to get problem list from AtCoder Problems...");
        let url = format!("{}/problems.json", self.resources_url);
        let problems: Vec<AtCoderProblemJson> = get_json(self.client.get(url)).await?;
        tracing::info!("{} AtCoder problems collected.", problems.len());

        Ok(problems)
    }
}

#[async_trait]
impl ProfileFetcher for AtCoderClient {
    async fn fetch_profile(&self, username: &str) -> Result<UserProfile> {
        let (submissions, accepted, rated_point_sum) = tokio::join!(
            self.fetch_submissions(username),
            self.fetch_rank_stat::<u64>(username, "ac_rank"),
            self.fetch_rank_stat::<f64>(username, "rated_point_sum_rank"),
        );
        let submissions = submissions?;

        Ok(UserProfile::AtCoder(AtCoderProfile {
            handle: username.to_string(),
            accepted_count: accepted.as_ref().and_then(|stat| stat.count),
            accepted_count_rank: accepted.as_ref().and_then(|stat| stat.rank),
            rated_point_sum: rated_point_sum.as_ref().and_then(|stat| stat.count),
            rated_point_sum_rank: rated_point_sum.as_ref().and_then(|stat| stat.rank),
            recent_submissions: recent_submissions(submissions, RECENT_SUBMISSIONS),
        }))
    }
}

#[async_trait]
impl ProblemSource for AtCoderClient {
    fn platform(&self) -> ProblemPlatform {
        ProblemPlatform::AtCoder
    }

    async fn fetch_problems(&self, limit: usize) -> Result<Vec<UnifiedProblem>> {
        let problems = self.fetch_problem_list().await?;
        Ok(normalize_atcoder(problems, limit).collect())
    }
}
