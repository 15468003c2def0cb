use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Platforms a user profile can be looked up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    LeetCode,
    Codeforces,
    CodeChef,
    AtCoder,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::LeetCode,
        Platform::Codeforces,
        Platform::CodeChef,
        Platform::AtCoder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::LeetCode => "leetcode",
            Platform::Codeforces => "codeforces",
            Platform::CodeChef => "codechef",
            Platform::AtCoder => "atcoder",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|platform| platform.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(format!("unknown platform: {}", s))
    }
}

/// Platforms contributing to the unified problem list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProblemPlatform {
    LeetCode,
    Codeforces,
    AtCoder,
}

impl ProblemPlatform {
    pub const ALL: [ProblemPlatform; 3] = [
        ProblemPlatform::LeetCode,
        ProblemPlatform::Codeforces,
        ProblemPlatform::AtCoder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemPlatform::LeetCode => "LeetCode",
            ProblemPlatform::Codeforces => "Codeforces",
            ProblemPlatform::AtCoder => "AtCoder",
        }
    }

    /// Prefix of the composite problem id.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            ProblemPlatform::LeetCode => "leetcode",
            ProblemPlatform::Codeforces => "codeforces",
            ProblemPlatform::AtCoder => "atcoder",
        }
    }
}

impl fmt::Display for ProblemPlatform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProblemPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProblemPlatform::ALL
            .into_iter()
            .find(|platform| platform.as_str() == s.trim())
            .ok_or(format!("unknown problem platform: {}", s))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_platform_case_insensitive() {
        assert_eq!("LeetCode".parse::<Platform>(), Ok(Platform::LeetCode));
        assert_eq!("atcoder".parse::<Platform>(), Ok(Platform::AtCoder));
        assert!("topcoder".parse::<Platform>().is_err());
    }

    #[test]
    fn problem_platform_uses_display_names() {
        assert_eq!(
            "Codeforces".parse::<ProblemPlatform>(),
            Ok(ProblemPlatform::Codeforces)
        );
        assert_eq!(
            serde_json::to_string(&ProblemPlatform::AtCoder).unwrap(),
            r#""AtCoder""#
        );
        assert_eq!(
            serde_json::to_string(&Platform::CodeChef).unwrap(),
            r#""codechef""#
        );
    }
}
