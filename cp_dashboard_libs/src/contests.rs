//! Contest listing: CLIST request parameters and mapping into [`UnifiedContest`]s.
//!
//! Window and resource filtering happen upstream. Locally only the upcoming/past flags and the
//! display names are derived.

use crate::{
    api::ToQuery,
    clients::clist::{ClistContestJson, ClistContestPage},
    models::{ContestMeta, UnifiedContest},
    query::{ContestQuery, ContestWindow},
};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use itertools::Itertools;
use once_cell::sync::Lazy;
use std::collections::HashMap;

static DISPLAY_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("leetcode.com", "LeetCode"),
        ("codeforces.com", "Codeforces"),
        ("atcoder.jp", "AtCoder"),
        ("codechef.com", "CodeChef"),
        ("topcoder.com", "TopCoder"),
        ("hackerearth.com", "HackerEarth"),
        ("codingcompetitions.withgoogle.com", "Google"),
    ])
});

/// CLIST resource ids of the hosts the listing can be narrowed to.
static RESOURCE_IDS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    HashMap::from([
        ("leetcode.com", 102),
        ("codeforces.com", 1),
        ("codechef.com", 2),
        ("atcoder.jp", 93),
    ])
});

/// Display name of a contest host. Unknown hosts are returned as is.
pub fn display_name(host: &str) -> String {
    DISPLAY_NAMES
        .get(host.to_lowercase().as_str())
        .map(|name| name.to_string())
        .unwrap_or(host.to_string())
}

/// Sorted, deduplicated CLIST ids of the known hosts in `hosts`.
pub fn resource_ids(hosts: &[String]) -> Vec<u32> {
    hosts
        .iter()
        .filter_map(|host| RESOURCE_IDS.get(host.to_lowercase().as_str()).copied())
        .sorted()
        .dedup()
        .collect()
}

fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Contest query as sent to CLIST at a fixed instant.
pub struct ClistQuery<'a> {
    pub query: &'a ContestQuery,
    pub now: DateTime<Utc>,
}

impl ToQuery for ClistQuery<'_> {
    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            (String::from("limit"), self.query.limit().to_string()),
            (String::from("offset"), self.query.offset().to_string()),
            (String::from("total_count"), String::from("true")),
        ];

        match self.query.window() {
            ContestWindow::Upcoming => {
                query.push((String::from("start__gt"), format_timestamp(&self.now)));
                query.push((String::from("order_by"), String::from("start")));
            }
            ContestWindow::Past => {
                query.push((String::from("end__lt"), format_timestamp(&self.now)));
                query.push((String::from("order_by"), String::from("-start")));
            }
            ContestWindow::All => {
                query.push((String::from("order_by"), String::from("start")));
            }
        }

        let ids = resource_ids(&self.query.resource_hosts());
        if !ids.is_empty() {
            query.push((String::from("resource_id__in"), ids.iter().join(",")));
        }

        query
    }
}

/// Logical identity of a contest listing request, independent of the request time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContestCacheKey {
    pub window: ContestWindow,
    pub limit: u32,
    pub offset: u32,
    pub resource_ids: Vec<u32>,
}

impl From<&ContestQuery> for ContestCacheKey {
    fn from(query: &ContestQuery) -> Self {
        Self {
            window: query.window(),
            limit: query.limit(),
            offset: query.offset(),
            resource_ids: resource_ids(&query.resource_hosts()),
        }
    }
}

/// Parse a CLIST date. Values without an offset are UTC.
pub fn parse_contest_time(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Some(time.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|time| Utc.from_utc_datetime(&time))
}

fn map_contest(contest: ClistContestJson, now: &DateTime<Utc>) -> Option<UnifiedContest> {
    let (start, end) = match (
        parse_contest_time(&contest.start),
        parse_contest_time(&contest.end),
    ) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            tracing::warn!(
                "skip contest {} ({}): unparseable dates start={} end={}",
                contest.id,
                contest.event,
                contest.start,
                contest.end
            );
            return None;
        }
    };
    if end < start {
        tracing::warn!(
            "skip contest {} ({}): ends at {} before it starts at {}",
            contest.id,
            contest.event,
            contest.end,
            contest.start
        );
        return None;
    }

    let resource = contest
        .resource
        .map(|resource| resource.name().to_string())
        .unwrap_or(contest.host.clone());

    Some(UnifiedContest {
        id: contest.id,
        platform_display_name: display_name(&contest.host),
        event: contest.event,
        href: contest.href,
        resource,
        host: contest.host,
        start: format_timestamp(&start),
        end: format_timestamp(&end),
        duration: contest.duration,
        is_upcoming: start > *now,
        is_past: end < *now,
    })
}

/// Map one CLIST page relative to `now`, dropping contests with unreadable or inverted dates.
pub fn map_contests(
    page: ClistContestPage,
    query: &ContestQuery,
    now: DateTime<Utc>,
) -> (Vec<UnifiedContest>, ContestMeta) {
    let contests: Vec<UnifiedContest> = page
        .objects
        .into_iter()
        .filter_map(|contest| map_contest(contest, &now))
        .collect();

    let meta = page.meta.unwrap_or(ContestMeta {
        limit: query.limit(),
        next: None,
        offset: query.offset(),
        previous: None,
        total_count: None,
    });

    (contests, meta)
}
