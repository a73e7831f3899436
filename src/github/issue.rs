use crate::github::search::SearchItem;
use crate::github::GitHubClient;
use crate::model::{DateRange, Result};
use chrono::{DateTime, Utc};
use itertools::Itertools;

#[derive(Debug, Clone, PartialEq)]
pub struct IssueRecord {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub repo: String,
}

impl IssueRecord {
    fn from_item(item: SearchItem) -> Self {
        Self {
            number: item.number,
            title: item.title(),
            repo: item.repo(),
            state: item.state(),
            url: item.html_url,
            created_at: item.created_at,
            closed_at: item.closed_at,
        }
    }
}

pub(super) fn authored_issues_query(username: &str, range: &DateRange) -> String {
    format!("author:{username} type:issue created:{}", range.search_span())
}

pub(super) fn involved_issues_query(username: &str, range: &DateRange) -> String {
    format!(
        "involves:{username} type:issue updated:{} -author:{username}",
        range.search_span()
    )
}

impl GitHubClient {
    /// Issues the user opened, then issues they took part in; each `(repo, number)` once.
    pub(super) async fn fetch_issues(
        &self,
        username: &str,
        range: &DateRange,
    ) -> Result<Vec<IssueRecord>> {
        let authored = self.search(&authored_issues_query(username, range)).await?;
        let involved = self.search(&involved_issues_query(username, range)).await?;
        Ok(merge_issues(authored, involved))
    }
}

fn merge_issues(authored: Vec<SearchItem>, involved: Vec<SearchItem>) -> Vec<IssueRecord> {
    authored
        .into_iter()
        .chain(involved)
        .filter(|item| !item.is_pull_request())
        .map(IssueRecord::from_item)
        .unique_by(|issue| (issue.repo.clone(), issue.number))
        .collect()
}
