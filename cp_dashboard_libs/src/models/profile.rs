use crate::models::platform::Platform;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none, DisplayFromStr};
use validator::Validate;

/// Profile of a single user, one variant per platform.
///
/// The platforms expose unrelated data, so there is no shared shape; consumers switch on the
/// `platform` tag.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum UserProfile {
    LeetCode(LeetCodeProfile),
    Codeforces(CodeforcesProfile),
    CodeChef(CodeChefProfile),
    AtCoder(AtCoderProfile),
}

impl UserProfile {
    pub fn platform(&self) -> Platform {
        match self {
            UserProfile::LeetCode(_) => Platform::LeetCode,
            UserProfile::Codeforces(_) => Platform::Codeforces,
            UserProfile::CodeChef(_) => Platform::CodeChef,
            UserProfile::AtCoder(_) => Platform::AtCoder,
        }
    }
}

// LeetCode

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeProfile {
    pub user_data: LeetCodeUserData,
    pub user_contests: LeetCodeUserContests,
    pub user_submissions: Vec<LeetCodeSubmission>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeUserData {
    pub username: String,
    pub real_name: String,
    pub websites: Vec<String>,
    pub country_name: Option<String>,
    pub company: Option<String>,
    pub school: Option<String>,
    pub about_me: String,
    pub reputation: i64,
    pub ranking: i64,
    pub total_submissions_num: Vec<LeetCodeSubmissionCount>,
}

/// Accepted and total submission counts for one difficulty bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeetCodeSubmissionCount {
    pub difficulty: String,
    pub count: u64,
    pub submissions: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeUserContests {
    pub user_contest_ranking: Option<LeetCodeContestRanking>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeContestRanking {
    pub attended_contests_count: u32,
    pub rating: f64,
    pub global_ranking: u64,
    pub total_participants: u64,
    pub top_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeSubmission {
    pub title: String,
    pub title_slug: String,
    pub timestamp: String,
    pub status_display: String,
    pub lang: String,
    pub url: String,
}

// Codeforces

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesProfile {
    pub user_info: CodeforcesUser,
    pub user_submissions: Vec<CodeforcesSubmission>,
    pub user_rating_changes: Vec<CodeforcesRatingChange>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesUser {
    pub handle: String,
    pub email: Option<String>,
    pub vk_id: Option<String>,
    pub open_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub organization: Option<String>,
    pub contribution: i64,
    // Unrated users have no rank or rating.
    pub rank: Option<String>,
    pub rating: Option<i64>,
    pub max_rank: Option<String>,
    pub max_rating: Option<i64>,
    pub last_online_time_seconds: i64,
    pub registration_time_seconds: i64,
    pub friend_of_count: i64,
    pub avatar: String,
    pub title_photo: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CodeforcesProblemType {
    Programming,
    Question,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesProblem {
    pub contest_id: Option<u64>,
    pub problemset_name: Option<String>,
    pub index: String,
    pub name: String,
    #[serde(rename = "type")]
    pub problem_type: CodeforcesProblemType,
    pub points: Option<f64>,
    pub rating: Option<i64>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CodeforcesVerdict {
    Failed,
    Ok,
    Partial,
    CompilationError,
    RuntimeError,
    WrongAnswer,
    PresentationError,
    TimeLimitExceeded,
    MemoryLimitExceeded,
    IdlenessLimitExceeded,
    SecurityViolated,
    Crashed,
    InputPreparationCrashed,
    Challenged,
    Skipped,
    Testing,
    Rejected,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CodeforcesParticipantType {
    Contestant,
    Practice,
    Virtual,
    Manager,
    OutOfCompetition,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeforcesMember {
    pub handle: String,
    pub name: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesParty {
    pub contest_id: Option<u64>,
    pub members: Vec<CodeforcesMember>,
    pub participant_type: CodeforcesParticipantType,
    pub team_id: Option<u64>,
    pub team_name: Option<String>,
    pub ghost: bool,
    pub room: Option<u64>,
    pub start_time_seconds: Option<i64>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesSubmission {
    pub id: u64,
    pub contest_id: Option<u64>,
    pub creation_time_seconds: i64,
    pub relative_time_seconds: i64,
    pub problem: CodeforcesProblem,
    pub author: CodeforcesParty,
    pub programming_language: String,
    pub verdict: Option<CodeforcesVerdict>,
    pub testset: String,
    pub passed_test_count: u32,
    pub time_consumed_millis: u64,
    pub memory_consumed_bytes: u64,
    pub points: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesRatingChange {
    pub contest_id: u64,
    pub contest_name: String,
    pub handle: String,
    pub rank: u64,
    pub rating_update_time_seconds: i64,
    pub old_rating: i64,
    pub new_rating: i64,
}

// CodeChef

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CodeChefProfile {
    pub success: bool,
    pub status: u16,
    /// Profile picture.
    #[validate(url)]
    pub profile: String,
    pub name: String,
    pub current_rating: i64,
    pub highest_rating: i64,
    #[validate(url)]
    pub country_flag: String,
    pub country_name: String,
    pub global_rank: Option<u64>,
    pub country_rank: Option<u64>,
    pub stars: String,
    pub heat_map: Vec<CodeChefHeatMapEntry>,
    pub rating_data: Vec<CodeChefRatingEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeChefHeatMapEntry {
    /// YYYY-MM-DD
    pub date: String,
    pub value: u64,
}

/// One rated contest. Upstream sends `rating` and `rank` as strings.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeChefRatingEntry {
    pub code: String,
    pub getyear: String,
    pub getmonth: String,
    pub getday: String,
    pub reason: Option<String>,
    pub penalised_in: Option<String>,
    #[serde_as(deserialize_as = "DisplayFromStr")]
    pub rating: i64,
    #[serde_as(deserialize_as = "DisplayFromStr")]
    pub rank: u64,
    pub name: String,
    pub end_date: String,
    pub color: String,
}

// AtCoder

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtCoderProfile {
    pub handle: String,
    pub accepted_count: Option<u64>,
    pub accepted_count_rank: Option<u64>,
    pub rated_point_sum: Option<f64>,
    pub rated_point_sum_rank: Option<u64>,
    pub recent_submissions: Vec<AtCoderSubmissionEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtCoderSubmissionEntry {
    pub id: u64,
    pub problem_id: String,
    pub contest_id: String,
    pub language: String,
    pub verdict: String,
    pub points: f64,
    pub submitted_at_seconds: i64,
}
