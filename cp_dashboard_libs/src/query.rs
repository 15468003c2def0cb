//! Request parameters of the list endpoints and their query-string form.
//!
//! `to_query_string` and `from_query_string` are inverses for normalized values, so the same
//! types carry filter state between the URL and the aggregator.

use crate::models::ProblemPlatform;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none, NoneAsEmptyString};
use std::{fmt, str::FromStr};
use url::form_urlencoded;
use validator::Validate;

pub const DEFAULT_PROBLEM_LIMIT: u32 = 24;
pub const DEFAULT_CONTEST_LIMIT: u32 = 25;

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn split_list(value: &Option<String>) -> Vec<String> {
    non_empty(value)
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProblemQuery {
    #[validate(length(max = 200))]
    pub search: Option<String>,
    /// Empty means every platform.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub platform: Option<ProblemPlatform>,
    pub difficulty: Option<String>,
    /// Comma-separated.
    pub tags: Option<String>,
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 200))]
    pub limit: Option<u32>,
}

impl ProblemQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PROBLEM_LIMIT)
    }

    pub fn tag_list(&self) -> Vec<String> {
        split_list(&self.tags)
    }

    pub fn from_query_string(query: &str) -> Result<Self, serde_urlencoded::de::Error> {
        serde_urlencoded::from_str(query)
    }

    /// Empty values are left out; tags are trimmed and re-joined.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(search) = non_empty(&self.search) {
            serializer.append_pair("search", search);
        }
        if let Some(platform) = &self.platform {
            serializer.append_pair("platform", platform.as_str());
        }
        if let Some(difficulty) = non_empty(&self.difficulty) {
            serializer.append_pair("difficulty", difficulty);
        }
        let tags = self.tag_list();
        if !tags.is_empty() {
            serializer.append_pair("tags", &tags.join(","));
        }
        if let Some(page) = self.page.filter(|page| *page > 0) {
            serializer.append_pair("page", &page.to_string());
        }
        if let Some(limit) = self.limit.filter(|limit| *limit > 0) {
            serializer.append_pair("limit", &limit.to_string());
        }

        serializer.finish()
    }
}

/// Time window of the contest listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContestWindow {
    #[default]
    Upcoming,
    Past,
    All,
}

impl fmt::Display for ContestWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ContestWindow::Upcoming => write!(f, "upcoming"),
            ContestWindow::Past => write!(f, "past"),
            ContestWindow::All => write!(f, "all"),
        }
    }
}

impl FromStr for ContestWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upcoming" => Ok(ContestWindow::Upcoming),
            "past" => Ok(ContestWindow::Past),
            "all" => Ok(ContestWindow::All),
            other => Err(format!("unknown contest filter: {}", other)),
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ContestQuery {
    pub filter: Option<ContestWindow>,
    /// Comma-separated hostnames such as `codeforces.com`.
    pub resources: Option<String>,
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 200))]
    pub limit: Option<u32>,
}

impl ContestQuery {
    pub fn window(&self) -> ContestWindow {
        self.filter.unwrap_or_default()
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_CONTEST_LIMIT)
    }

    pub fn offset(&self) -> u32 {
        self.page()
            .max(1)
            .saturating_sub(1)
            .saturating_mul(self.limit())
    }

    pub fn resource_hosts(&self) -> Vec<String> {
        split_list(&self.resources)
    }

    pub fn from_query_string(query: &str) -> Result<Self, serde_urlencoded::de::Error> {
        serde_urlencoded::from_str(query)
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(filter) = &self.filter {
            serializer.append_pair("filter", &filter.to_string());
        }
        let resources = self.resource_hosts();
        if !resources.is_empty() {
            serializer.append_pair("resources", &resources.join(","));
        }
        if let Some(page) = self.page.filter(|page| *page > 0) {
            serializer.append_pair("page", &page.to_string());
        }
        if let Some(limit) = self.limit.filter(|limit| *limit > 0) {
            serializer.append_pair("limit", &limit.to_string());
        }

        serializer.finish()
    }
}
