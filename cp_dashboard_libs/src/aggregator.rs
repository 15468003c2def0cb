//! Merging, filtering and pagination of the unified problem list.

use crate::{
    clients::ProblemSource,
    models::{Difficulty, ProblemPlatform, UnifiedProblem},
    query::ProblemQuery,
};
use futures::future::join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use std::{collections::HashMap, sync::Arc};

/// Problems requested from each source before filtering.
pub const SOURCE_FETCH_LIMIT: usize = 200;

static RANGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d+)\s*-\s*(\d+)\s*$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DifficultyFilter {
    /// Problems without any difficulty.
    Unknown,
    /// Inclusive rating range.
    Range { min: i64, max: i64 },
    Exact(i64),
    /// Lowercased label such as `easy`.
    Label(String),
}

impl DifficultyFilter {
    /// `None` for a blank filter.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().to_lowercase();
        if raw.is_empty() {
            return None;
        }
        if raw == "unknown" {
            return Some(DifficultyFilter::Unknown);
        }
        if let Some(captures) = RANGE_RE.captures(&raw) {
            if let (Ok(min), Ok(max)) = (captures[1].parse(), captures[2].parse()) {
                return Some(DifficultyFilter::Range { min, max });
            }
        }
        if let Ok(rating) = raw.parse() {
            return Some(DifficultyFilter::Exact(rating));
        }

        Some(DifficultyFilter::Label(raw))
    }

    pub fn matches(&self, difficulty: Option<&Difficulty>) -> bool {
        match (self, difficulty) {
            (DifficultyFilter::Unknown, difficulty) => difficulty.is_none(),
            (_, None) => false,
            (DifficultyFilter::Label(label), Some(Difficulty::Label(value))) => {
                value.to_lowercase() == *label
            }
            (DifficultyFilter::Range { min, max }, Some(Difficulty::Rating(rating))) => {
                min <= rating && rating <= max
            }
            (DifficultyFilter::Exact(exact), Some(Difficulty::Rating(rating))) => exact == rating,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemFilter {
    /// Lowercased search text.
    pub search: Option<String>,
    pub platform: Option<ProblemPlatform>,
    pub difficulty: Option<DifficultyFilter>,
    /// Lowercased tags, all of which must match.
    pub tags: Vec<String>,
    pub page: u32,
    pub limit: u32,
}

impl From<&ProblemQuery> for ProblemFilter {
    fn from(query: &ProblemQuery) -> Self {
        Self {
            search: query
                .search
                .as_deref()
                .map(|search| search.trim().to_lowercase())
                .filter(|search| !search.is_empty()),
            platform: query.platform,
            difficulty: query.difficulty.as_deref().and_then(DifficultyFilter::parse),
            tags: query
                .tag_list()
                .into_iter()
                .map(|tag| tag.to_lowercase())
                .collect(),
            page: query.page().max(1),
            limit: query.limit().max(1),
        }
    }
}

impl ProblemFilter {
    fn matches_search(&self, problem: &UnifiedProblem) -> bool {
        let search = match &self.search {
            Some(search) => search,
            None => return true,
        };

        problem.title.to_lowercase().contains(search)
            || problem
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(search))
            || problem
                .problem_id_on_platform
                .to_lowercase()
                .contains(search)
            || problem
                .contest_id
                .as_ref()
                .map_or(false, |contest_id| contest_id.to_lowercase().contains(search))
    }

    fn matches_tags(&self, problem: &UnifiedProblem) -> bool {
        self.tags.iter().all(|wanted| {
            problem
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(wanted))
        })
    }

    pub fn matches(&self, problem: &UnifiedProblem) -> bool {
        self.platform
            .map_or(true, |platform| problem.platform == platform)
            && self.matches_search(problem)
            && self
                .difficulty
                .as_ref()
                .map_or(true, |difficulty| difficulty.matches(problem.difficulty.as_ref()))
            && self.matches_tags(problem)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u32,
    pub total_pages: u32,
    pub current_page: u32,
}

/// Slice out the 1-indexed `page`. Pages past the end are empty.
pub fn paginate<T>(items: Vec<T>, page: u32, limit: u32) -> Page<T> {
    let page = page.max(1);
    let limit = limit.max(1);
    let total = items.len() as u32;
    let offset = ((page - 1) as usize).saturating_mul(limit as usize);

    Page {
        items: items.into_iter().skip(offset).take(limit as usize).collect(),
        total,
        total_pages: (total + limit - 1) / limit,
        current_page: page,
    }
}

/// Remove repeated ids. Each id stays where it first appeared and carries its last value.
pub fn dedup_by_id(problems: impl IntoIterator<Item = UnifiedProblem>) -> Vec<UnifiedProblem> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<UnifiedProblem> = Vec::new();

    for problem in problems {
        match positions.get(&problem.id) {
            Some(&position) => unique[position] = problem,
            None => {
                positions.insert(problem.id.clone(), unique.len());
                unique.push(problem);
            }
        }
    }

    unique
}

pub fn aggregate(problems: Vec<UnifiedProblem>, filter: &ProblemFilter) -> Page<UnifiedProblem> {
    let matched: Vec<UnifiedProblem> = dedup_by_id(problems)
        .into_iter()
        .filter(|problem| filter.matches(problem))
        .collect();

    paginate(matched, filter.page, filter.limit)
}

/// Problems gathered from every selected source.
#[derive(Debug, Default)]
pub struct CollectedProblems {
    pub problems: Vec<UnifiedProblem>,
    /// Sources that failed and contributed nothing.
    pub unavailable: Vec<ProblemPlatform>,
}

/// Fetch the sources matching `platform` (all when `None`) concurrently.
pub async fn collect_problems(
    sources: &[Arc<dyn ProblemSource + Send + Sync>],
    platform: Option<ProblemPlatform>,
    limit: usize,
) -> CollectedProblems {
    let selected: Vec<&Arc<dyn ProblemSource + Send + Sync>> = sources
        .iter()
        .filter(|source| platform.map_or(true, |platform| source.platform() == platform))
        .collect();

    let results = join_all(selected.iter().map(|source| async move {
        (source.platform(), source.fetch_problems(limit).await)
    }))
    .await;

    let mut collected = CollectedProblems::default();
    for (platform, result) in results {
        match result {
            Ok(problems) => collected.problems.extend(problems),
            Err(e) => {
                tracing::error!("failed to fetch {} problems: {}", platform, e);
                collected.unavailable.push(platform);
            }
        }
    }

    collected
}
