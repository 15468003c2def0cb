use crate::models::platform::ProblemPlatform;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Difficulty as reported by the platform: a label (LeetCode) or a numeric rating (Codeforces).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Difficulty {
    Rating(i64),
    Label(String),
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedProblem {
    /// `<platform>_<native id>`, unique across platforms.
    pub id: String,
    pub title: String,
    pub url: String,
    pub platform: ProblemPlatform,
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub problem_id_on_platform: String,
    pub contest_id: Option<String>,
    pub paid_only: Option<bool>,
    pub solved_count: Option<u64>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn serialize_skips_absent_fields() {
        let problem = UnifiedProblem {
            id: String::from("atcoder_abc001_a"),
            title: String::from("積雪深差"),
            url: String::from("https://atcoder.jp/contests/abc001/tasks/abc001_1"),
            platform: ProblemPlatform::AtCoder,
            difficulty: None,
            tags: vec![],
            problem_id_on_platform: String::from("abc001_1"),
            contest_id: Some(String::from("abc001")),
            paid_only: None,
            solved_count: None,
        };

        let value = serde_json::to_value(&problem).unwrap();
        assert_eq!(value["problemIdOnPlatform"], "abc001_1");
        assert_eq!(value["platform"], "AtCoder");
        assert!(value.get("difficulty").is_none());
        assert!(value.get("paidOnly").is_none());
    }

    #[test]
    fn difficulty_is_string_or_number() {
        assert_eq!(
            serde_json::to_string(&Difficulty::Rating(1500)).unwrap(),
            "1500"
        );
        assert_eq!(
            serde_json::to_string(&Difficulty::Label(String::from("Easy"))).unwrap(),
            r#""Easy""#
        );
        assert_eq!(
            serde_json::from_str::<Difficulty>(r#""Hard""#).unwrap(),
            Difficulty::Label(String::from("Hard"))
        );
    }
}
