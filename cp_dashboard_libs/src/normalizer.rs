//! Mapping of each platform's raw problem list into [`UnifiedProblem`]s.
//!
//! Every normalizer is lazy and capped: nothing past `limit` is mapped.

use crate::{
    clients::{
        atcoder::AtCoderProblemJson, codeforces::CodeforcesProblemset,
        leetcode::LeetCodeProblemJson,
    },
    models::{Difficulty, ProblemPlatform, UnifiedProblem},
};
use std::collections::HashMap;

fn composite_id(platform: ProblemPlatform, native_id: &str) -> String {
    format!("{}_{}", platform.id_prefix(), native_id)
}

pub fn normalize_leetcode(
    problems: Vec<LeetCodeProblemJson>,
    limit: usize,
) -> impl Iterator<Item = UnifiedProblem> {
    problems
        .into_iter()
        .take(limit)
        .map(|problem| UnifiedProblem {
            id: composite_id(ProblemPlatform::LeetCode, &problem.title_slug),
            title: problem.title,
            url: problem.url,
            platform: ProblemPlatform::LeetCode,
            difficulty: Some(Difficulty::Label(problem.difficulty.to_string())),
            // the problem list carries no tags
            tags: Vec::new(),
            problem_id_on_platform: problem.frontend_id,
            contest_id: None,
            paid_only: Some(problem.paid_only),
            solved_count: None,
        })
}

/// Highest rated first, then most recent contest, so the cap keeps the most informative problems.
pub fn normalize_codeforces(
    problemset: CodeforcesProblemset,
    limit: usize,
) -> impl Iterator<Item = UnifiedProblem> {
    let solved_counts: HashMap<(Option<u64>, String), u64> = problemset
        .problem_statistics
        .into_iter()
        .map(|stat| ((stat.contest_id, stat.index), stat.solved_count))
        .collect();

    let mut problems = problemset.problems;
    problems.sort_by(|a, b| {
        b.rating
            .unwrap_or(0)
            .cmp(&a.rating.unwrap_or(0))
            .then_with(|| b.contest_id.unwrap_or(0).cmp(&a.contest_id.unwrap_or(0)))
    });

    problems.into_iter().take(limit).map(move |problem| {
        let contest = problem
            .contest_id
            .map(|id| id.to_string())
            .unwrap_or(String::from("gym"));
        let url = match problem.contest_id {
            Some(contest_id) => format!(
                "https://codeforces.com/problemset/problem/{}/{}",
                contest_id, problem.index
            ),
            None => String::from("https://codeforces.com/problemset"),
        };
        let solved_count = solved_counts
            .get(&(problem.contest_id, problem.index.clone()))
            .copied();

        UnifiedProblem {
            id: composite_id(
                ProblemPlatform::Codeforces,
                &format!("{}_{}", contest, problem.index),
            ),
            title: problem.name,
            url,
            platform: ProblemPlatform::Codeforces,
            difficulty: problem.rating.map(Difficulty::Rating),
            tags: problem.tags,
            problem_id_on_platform: problem.index,
            contest_id: problem.contest_id.map(|id| id.to_string()),
            paid_only: None,
            solved_count,
        }
    })
}

/// Difficulty and tags live in other AtCoder Problems resources and are not merged here.
pub fn normalize_atcoder(
    problems: Vec<AtCoderProblemJson>,
    limit: usize,
) -> impl Iterator<Item = UnifiedProblem> {
    problems
        .into_iter()
        .take(limit)
        .map(|problem| UnifiedProblem {
            id: composite_id(ProblemPlatform::AtCoder, &problem.id),
            title: problem.name,
            url: format!(
                "https://atcoder.jp/contests/{}/tasks/{}",
                problem.contest_id, problem.id
            ),
            platform: ProblemPlatform::AtCoder,
            difficulty: None,
            tags: Vec::new(),
            problem_id_on_platform: problem.id,
            contest_id: Some(problem.contest_id),
            paid_only: None,
            solved_count: None,
        })
}
