pub mod contest;
pub mod platform;
pub mod problem;
pub mod profile;

pub use contest::{ContestMeta, UnifiedContest};
pub use platform::{Platform, ProblemPlatform};
pub use problem::{Difficulty, UnifiedProblem};
pub use profile::UserProfile;
