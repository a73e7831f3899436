use crate::github::{CodeReviewRecord, IssueRecord, PullRequestRecord};
use crate::http::build_client;
use crate::model::{DateRange, Result};
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use tracing::info;

#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    pub(super) api_url: String,
    token: String,
}

/// Everything fetched from GitHub for one associate and period.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contributions {
    pub pull_requests: Vec<PullRequestRecord>,
    pub issues: Vec<IssueRecord>,
    pub code_reviews: Vec<CodeReviewRecord>,
}

// New
impl GitHubClient {
    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        Ok(Self {
            client: build_client(super::SERVICE)?,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    pub(super) fn get(&self, url: &str) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json");
        if self.token.is_empty() {
            request
        } else {
            request.bearer_auth(&self.token)
        }
    }
}

pub trait ContributionFetcher {
    async fn fetch_contributions(&self, username: &str, range: &DateRange)
        -> Result<Contributions>;
}

impl ContributionFetcher for GitHubClient {
    async fn fetch_contributions(
        &self,
        username: &str,
        range: &DateRange,
    ) -> Result<Contributions> {
        let (pull_requests, issues, code_reviews) = futures::try_join!(
            self.fetch_pull_requests(username, range),
            self.fetch_issues(username, range),
            self.fetch_code_reviews(username, range),
        )?;

        info!(
            target: "github",
            username,
            pull_requests = pull_requests.len(),
            issues = issues.len(),
            code_reviews = code_reviews.len(),
            "fetched contributions"
        );
        Ok(Contributions {
            pull_requests,
            issues,
            code_reviews,
        })
    }
}
