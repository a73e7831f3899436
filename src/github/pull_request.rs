use crate::github::search::{split_repo, SearchItem};
use crate::github::GitHubClient;
use crate::http::send_json;
use crate::model::{DateRange, Result};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use tracing::{debug, warn};

/// Upper bound on detail requests in flight for one search.
pub const DETAIL_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct PullRequestRecord {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub repo: String,
    pub commits: u64,
    pub additions: u64,
    pub deletions: u64,
    pub changed_files: u64,
}

#[derive(Debug, Default, Deserialize)]
struct PullRequestDetail {
    commits: Option<u64>,
    additions: Option<u64>,
    deletions: Option<u64>,
    changed_files: Option<u64>,
    merged_at: Option<DateTime<Utc>>,
}

pub(super) fn pull_requests_query(username: &str, range: &DateRange) -> String {
    format!("author:{username} type:pr created:{}", range.search_span())
}

impl GitHubClient {
    pub(super) async fn fetch_pull_requests(
        &self,
        username: &str,
        range: &DateRange,
    ) -> Result<Vec<PullRequestRecord>> {
        let items = self.search(&pull_requests_query(username, range)).await?;
        let items = items
            .into_iter()
            .filter(SearchItem::is_pull_request)
            .collect::<Vec<_>>();

        // `buffered` keeps the search order regardless of completion order
        let records = stream::iter(items)
            .map(|item| self.pull_request_record(item))
            .buffered(DETAIL_CONCURRENCY)
            .collect::<Vec<_>>()
            .await;
        Ok(records)
    }

    async fn pull_request_record(&self, item: SearchItem) -> PullRequestRecord {
        let repo = item.repo();
        let detail = match split_repo(&repo) {
            Some((owner, name)) => match self.fetch_detail(owner, name, item.number).await {
                Ok(detail) => Some(detail),
                Err(err) => {
                    warn!(
                        target: "github",
                        repo = %repo,
                        number = item.number,
                        error = %err,
                        "pull request details unavailable, statistics default to 0"
                    );
                    None
                }
            },
            None => {
                debug!(target: "github", url = %item.html_url, "no repository in pull request url");
                None
            }
        };

        let linked_merged_at = item.pull_request.as_ref().and_then(|links| links.merged_at);
        let (detail, merged_at) = match detail {
            Some(detail) => {
                let merged_at = detail.merged_at;
                (detail, merged_at)
            }
            None => (PullRequestDetail::default(), linked_merged_at),
        };

        PullRequestRecord {
            number: item.number,
            title: item.title(),
            url: item.html_url.clone(),
            state: item.state(),
            created_at: item.created_at,
            merged_at,
            repo,
            commits: detail.commits.unwrap_or(0),
            additions: detail.additions.unwrap_or(0),
            deletions: detail.deletions.unwrap_or(0),
            changed_files: detail.changed_files.unwrap_or(0),
        }
    }

    async fn fetch_detail(&self, owner: &str, name: &str, number: u64) -> Result<PullRequestDetail> {
        let url = format!("{}/repos/{owner}/{name}/pulls/{number}", self.api_url);
        let (detail, _) = send_json(super::SERVICE, self.get(&url)).await?;
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::quarter_dates;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::{Duration, Instant};

    fn pr_item(number: u64, state: &str, merged_at: Option<&str>) -> serde_json::Value {
        json!({
            "number": number,
            "title": format!("PR {number}"),
            "html_url": format!("https://github.com/acme/widgets/pull/{number}"),
            "state": state,
            "created_at": "2024-04-05T09:30:00Z",
            "closed_at": merged_at,
            "pull_request": {"merged_at": merged_at}
        })
    }

    #[test]
    fn query_selects_authored_pull_requests_created_in_range() {
        let range = quarter_dates("Q2", 2024).unwrap();
        assert_eq!(
            pull_requests_query("alice", &range),
            "author:alice type:pr created:2024-04-01..2024-06-30"
        );
    }

    #[tokio::test]
    async fn failed_detail_fetch_only_zeroes_its_own_record() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search/issues");
                then.status(200).json_body(json!({
                    "total_count": 3,
                    "incomplete_results": false,
                    "items": [
                        pr_item(1, "closed", Some("2024-04-06T10:00:00Z")),
                        pr_item(2, "closed", Some("2024-04-07T10:00:00Z")),
                        pr_item(3, "open", None)
                    ]
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/acme/widgets/pulls/1");
                then.status(200).json_body(json!({
                    "commits": 3,
                    "additions": 10,
                    "deletions": 2,
                    "changed_files": 1,
                    "merged_at": "2024-04-06T10:00:00Z"
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/acme/widgets/pulls/2");
                then.status(500).body("boom");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/acme/widgets/pulls/3");
                then.status(200).json_body(json!({
                    "commits": 1,
                    "additions": null,
                    "deletions": 7,
                    "changed_files": null,
                    "merged_at": null
                }));
            })
            .await;

        let client = GitHubClient::new(&server.base_url(), "token").unwrap();
        let range = quarter_dates("Q2", 2024).unwrap();
        let records = client.fetch_pull_requests("alice", &range).await.unwrap();

        let numbers = records.iter().map(|r| r.number).collect::<Vec<_>>();
        assert_eq!(numbers, [1, 2, 3]);

        assert_eq!(
            (records[0].commits, records[0].additions, records[0].deletions),
            (3, 10, 2)
        );
        assert!(records[0].merged_at.is_some());

        assert_eq!(
            (records[1].commits, records[1].additions, records[1].deletions),
            (0, 0, 0)
        );
        // merge timestamp still comes from the search linkage
        assert!(records[1].merged_at.is_some());

        assert_eq!((records[2].commits, records[2].additions), (1, 0));
        assert_eq!(records[2].deletions, 7);
        assert_eq!(records[2].merged_at, None);
        assert_eq!(records[2].repo, "acme/widgets");
    }

    #[tokio::test]
    async fn closed_but_unmerged_pull_request_has_no_merge_time() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search/issues");
                then.status(200).json_body(json!({
                    "items": [{
                        "number": 4,
                        "title": "Abandoned",
                        "html_url": "https://github.com/acme/widgets/pull/4",
                        "state": "closed",
                        "created_at": "2024-04-05T09:30:00Z",
                        "closed_at": "2024-04-09T09:30:00Z",
                        "pull_request": {"merged_at": null}
                    }]
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/acme/widgets/pulls/4");
                then.status(404).body("{}");
            })
            .await;

        let client = GitHubClient::new(&server.base_url(), "token").unwrap();
        let range = quarter_dates("Q2", 2024).unwrap();
        let records = client.fetch_pull_requests("alice", &range).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].state, "closed");
        assert_eq!(records[0].merged_at, None);
    }

    #[tokio::test]
    async fn details_keep_search_order_with_bounded_fan_out() {
        // one more item than the limit; the first four finish in reverse order
        let delays_ms = [400, 300, 200, 100, 200];
        assert!(delays_ms.len() > DETAIL_CONCURRENCY);

        let server = MockServer::start_async().await;
        let items = (1..=delays_ms.len() as u64)
            .map(|number| pr_item(number, "open", None))
            .collect::<Vec<_>>();
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search/issues");
                then.status(200).json_body(json!({"items": items}));
            })
            .await;
        for (number, delay) in (1u64..).zip(delays_ms) {
            server
                .mock_async(|when, then| {
                    when.method(GET)
                        .path(format!("/repos/acme/widgets/pulls/{number}"));
                    then.status(200)
                        .delay(Duration::from_millis(delay))
                        .json_body(json!({"commits": number}));
                })
                .await;
        }

        let client = GitHubClient::new(&server.base_url(), "token").unwrap();
        let range = quarter_dates("Q2", 2024).unwrap();
        let started = Instant::now();
        let records = client.fetch_pull_requests("alice", &range).await.unwrap();
        let elapsed = started.elapsed();

        let pairs = records
            .iter()
            .map(|r| (r.number, r.commits))
            .collect::<Vec<_>>();
        assert_eq!(pairs, [(1, 1), (2, 2), (3, 3), (4, 4), (5, 5)]);

        // the fifth request only starts once the first of four in flight is
        // yielded (400ms), then takes 200ms itself; with five in flight at
        // once everything would be done after about 400ms
        assert!(
            elapsed >= Duration::from_millis(580),
            "fifth detail request started early: {elapsed:?}"
        );
    }
}
