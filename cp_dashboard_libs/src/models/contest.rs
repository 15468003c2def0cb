use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedContest {
    pub id: u64,
    pub event: String,
    pub href: String,
    pub resource: String,
    pub host: String,
    pub start: String,
    pub end: String,
    pub duration: i64,
    pub is_upcoming: bool,
    pub is_past: bool,
    pub platform_display_name: String,
}

/// Pagination metadata passed through from CLIST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestMeta {
    pub limit: u32,
    pub next: Option<String>,
    pub offset: u32,
    pub previous: Option<String>,
    pub total_count: Option<u64>,
}
