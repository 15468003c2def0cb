use crate::{
    clients::{endpoint, get_json, ProblemSource, ProfileFetcher},
    error::Result,
    models::{
        profile::{
            LeetCodeProfile, LeetCodeSubmission, LeetCodeSubmissionCount, LeetCodeUserContests,
            LeetCodeUserData,
        },
        ProblemPlatform, UnifiedProblem, UserProfile,
    },
    normalizer::normalize_leetcode,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

const SUBMISSION_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeUserJson {
    pub username: String,
    pub profile: LeetCodeProfileJson,
    pub submit_stats: LeetCodeSubmitStatsJson,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeProfileJson {
    pub real_name: String,
    pub websites: Vec<String>,
    pub country_name: Option<String>,
    pub company: Option<String>,
    pub school: Option<String>,
    pub about_me: String,
    pub reputation: i64,
    pub ranking: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeSubmitStatsJson {
    pub ac_submission_num: Vec<LeetCodeSubmissionNumJson>,
    pub total_submission_num: Vec<LeetCodeSubmissionNumJson>,
}

#[derive(Debug, Deserialize)]
pub struct LeetCodeSubmissionNumJson {
    pub difficulty: String,
    pub count: u64,
    pub submissions: u64,
}

/// Entry of the public problem list.
#[derive(Debug, Deserialize)]
pub struct LeetCodeProblemJson {
    pub id: String,
    pub frontend_id: String,
    pub title: String,
    pub title_slug: String,
    pub url: String,
    pub difficulty: LeetCodeDifficulty,
    pub paid_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum LeetCodeDifficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for LeetCodeDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LeetCodeDifficulty::Easy => write!(f, "Easy"),
            LeetCodeDifficulty::Medium => write!(f, "Medium"),
            LeetCodeDifficulty::Hard => write!(f, "Hard"),
        }
    }
}

impl LeetCodeUserJson {
    /// Flatten the profile and pair each difficulty bucket's total with its accepted count.
    pub fn into_user_data(self) -> LeetCodeUserData {
        let accepted: HashMap<String, u64> = self
            .submit_stats
            .ac_submission_num
            .iter()
            .map(|item| (item.difficulty.to_lowercase(), item.count))
            .collect();

        let total_submissions_num = self
            .submit_stats
            .total_submission_num
            .iter()
            .map(|item| {
                let difficulty = item.difficulty.to_lowercase();
                LeetCodeSubmissionCount {
                    count: accepted.get(&difficulty).copied().unwrap_or(0),
                    submissions: item.submissions,
                    difficulty,
                }
            })
            .collect();

        LeetCodeUserData {
            username: self.username,
            real_name: self.profile.real_name,
            websites: self.profile.websites,
            country_name: self.profile.country_name,
            company: self.profile.company,
            school: self.profile.school,
            about_me: self.profile.about_me,
            reputation: self.profile.reputation,
            ranking: self.profile.ranking,
            total_submissions_num,
        }
    }
}

pub struct LeetCodeClient {
    base_url: String,
    client: Client,
}

impl LeetCodeClient {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub async fn fetch_user_data(&self, username: &str) -> Result<LeetCodeUserData> {
        let url = endpoint(&self.base_url, &["user", username])?;
        let user: LeetCodeUserJson = get_json(self.client.get(url)).await?;
        Ok(user.into_user_data())
    }

    pub async fn fetch_user_contests(&self, username: &str) -> Result<LeetCodeUserContests> {
        let url = endpoint(&self.base_url, &["user", username, "contests"])?;
        get_json(self.client.get(url)).await
    }

    pub async fn fetch_user_submissions(
        &self,
        username: &str,
        limit: u32,
    ) -> Result<Vec<LeetCodeSubmission>> {
        let url = endpoint(&self.base_url, &["user", username, "submissions"])?;
        get_json(self.client.get(url).query(&[("limit", limit)])).await
    }

    pub async fn fetch_problem_list(&self) -> Result<Vec<LeetCodeProblemJson>> {
        tracing::info!("Attempting to get problem list from LeetCode...");
        let url = endpoint(&self.base_url, &["problems"])?;
        let problems: Vec<LeetCodeProblemJson> = get_json(self.client.get(url)).await?;
        tracing::info!("{} LeetCode problems collected.", problems.len());

        Ok(problems)
    }
}

#[async_trait]
impl ProfileFetcher for LeetCodeClient {
    async fn fetch_profile(&self, username: &str) -> Result<UserProfile> {
        let (user_data, user_contests, user_submissions) = tokio::try_join!(
            self.fetch_user_data(username),
            self.fetch_user_contests(username),
            self.fetch_user_submissions(username, SUBMISSION_LIMIT),
        )?;

        Ok(UserProfile::LeetCode(LeetCodeProfile {
            user_data,
            user_contests,
            user_submissions,
        }))
    }
}

#[async_trait]
impl ProblemSource for LeetCodeClient {
    fn platform(&self) -> ProblemPlatform {
        ProblemPlatform::LeetCode
    }

    async fn fetch_problems(&self, limit: usize) -> Result<Vec<UnifiedProblem>> {
        let problems = self.fetch_problem_list().await?;
        Ok(normalize_leetcode(problems, limit).collect())
    }
}
