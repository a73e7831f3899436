pub mod client;
pub mod issue;
pub mod pull_request;
pub mod review;
pub mod search;

pub use client::{ContributionFetcher, Contributions, GitHubClient};
pub use issue::IssueRecord;
pub use pull_request::PullRequestRecord;
pub use review::CodeReviewRecord;

const SERVICE: &str = "GitHub";
