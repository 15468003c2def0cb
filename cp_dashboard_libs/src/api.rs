use crate::{
    aggregator::Page,
    models::{ContestMeta, ProblemPlatform, UnifiedContest, UnifiedProblem},
};
use serde::Serialize;

pub trait ToQuery {
    fn to_query(&self) -> Vec<(String, String)>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemsResponse {
    pub problems: Vec<UnifiedProblem>,
    pub total_pages: u32,
    pub current_page: u32,
    pub total_problems: u32,
    /// Platforms whose problem list could not be fetched for this response.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unavailable: Vec<ProblemPlatform>,
}

impl ProblemsResponse {
    pub fn new(page: Page<UnifiedProblem>, unavailable: Vec<ProblemPlatform>) -> Self {
        Self {
            problems: page.items,
            total_pages: page.total_pages,
            current_page: page.current_page,
            total_problems: page.total,
            unavailable,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContestsResponse {
    pub contests: Vec<UnifiedContest>,
    pub meta: ContestMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl ToString) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unavailable_is_omitted_when_empty() {
        let page = Page {
            items: Vec::new(),
            total: 0,
            total_pages: 0,
            current_page: 1,
        };
        let response = ProblemsResponse::new(page, Vec::new());
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"problems":[],"totalPages":0,"currentPage":1,"totalProblems":0}"#
        );

        let response = ProblemsResponse {
            unavailable: vec![ProblemPlatform::AtCoder],
            ..response
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["unavailable"], serde_json::json!(["AtCoder"]));
    }

    #[test]
    fn error_body() {
        assert_eq!(
            serde_json::to_string(&ErrorResponse::new("Username is required")).unwrap(),
            r#"{"error":"Username is required"}"#
        );
    }
}
