use crate::github::search::SearchItem;
use crate::github::GitHubClient;
use crate::model::{DateRange, Result};
use chrono::{DateTime, Utc};

/// One reviewed pull request; a PR reviewed several times may appear more than once.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeReviewRecord {
    pub pr_number: u64,
    pub pr_title: String,
    pub url: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub repo: String,
}

pub(super) fn code_reviews_query(username: &str, range: &DateRange) -> String {
    format!(
        "reviewed-by:{username} type:pr reviewed:{} -author:{username}",
        range.search_span()
    )
}

impl GitHubClient {
    pub(super) async fn fetch_code_reviews(
        &self,
        username: &str,
        range: &DateRange,
    ) -> Result<Vec<CodeReviewRecord>> {
        let items = self.search(&code_reviews_query(username, range)).await?;
        Ok(items
            .into_iter()
            .filter(SearchItem::is_pull_request)
            .map(|item| CodeReviewRecord {
                pr_number: item.number,
                pr_title: item.title(),
                repo: item.repo(),
                state: item.state(),
                url: item.html_url,
                created_at: item.created_at,
            })
            .collect())
    }
}
