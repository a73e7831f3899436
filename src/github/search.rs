use crate::github::GitHubClient;
use crate::http::send_json;
use crate::model::Result;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, LINK};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

const PER_PAGE: usize = 100;
const MAX_PAGES: usize = 50;

/// One hit of `GET /search/issues`; pull requests and issues share this shape.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct SearchItem {
    pub(super) number: u64,
    #[serde(default)]
    pub(super) title: Option<String>,
    pub(super) html_url: String,
    #[serde(default)]
    pub(super) state: Option<String>,
    pub(super) created_at: DateTime<Utc>,
    pub(super) closed_at: Option<DateTime<Utc>>,
    pub(super) pull_request: Option<PullRequestLinks>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct PullRequestLinks {
    pub(super) merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    total_count: usize,
    #[serde(default)]
    incomplete_results: bool,
    #[serde(default)]
    items: Vec<SearchItem>,
}

impl SearchItem {
    pub(super) fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    pub(super) fn repo(&self) -> String {
        repo_from_url(&self.html_url)
    }

    pub(super) fn title(&self) -> String {
        self.title.clone().unwrap_or_default()
    }

    pub(super) fn state(&self) -> String {
        self.state.clone().unwrap_or_default()
    }
}

impl GitHubClient {
    /// Runs one search query and follows `rel="next"` links until exhausted.
    pub(super) async fn search(&self, query: &str) -> Result<Vec<SearchItem>> {
        let mut items: Vec<SearchItem> = vec![];
        let mut request = self.get(&format!("{}/search/issues", self.api_url)).query(&[
            ("q", query.to_string()),
            ("per_page", PER_PAGE.to_string()),
            ("page", "1".to_string()),
        ]);

        for page in 1.. {
            let (result, headers) = send_json::<SearchPage>(super::SERVICE, request).await?;
            if result.incomplete_results {
                warn!(target: "github", query, page, "search results are incomplete");
            }
            debug!(
                target: "github",
                query,
                page,
                total = result.total_count,
                returned = result.items.len(),
                "search page"
            );
            items.extend(result.items);

            let Some(next) = next_page_url(&headers) else {
                break;
            };
            if page >= MAX_PAGES {
                warn!(target: "github", query, page, "stopping after page limit");
                break;
            }
            request = self.get(&next);
        }
        Ok(items)
    }
}

fn next_page_url(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    link.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        let is_next = params
            .split(';')
            .any(|param| param.trim() == r#"rel="next""#);
        is_next.then(|| {
            target
                .trim()
                .trim_start_matches('<')
                .trim_end_matches('>')
                .to_string()
        })
    })
}

/// `owner/repo` from `https://host/owner/repo/...`, or an empty string.
pub fn repo_from_url(html_url: &str) -> String {
    let Ok(url) = Url::parse(html_url) else {
        return String::new();
    };
    let mut segments = url
        .path_segments()
        .into_iter()
        .flatten()
        .filter(|segment| !segment.is_empty());
    match (segments.next(), segments.next()) {
        (Some(owner), Some(repo)) => format!("{owner}/{repo}"),
        _ => String::new(),
    }
}

/// Splits `owner/repo`; `None` when either half is missing.
pub(super) fn split_repo(repo: &str) -> Option<(&str, &str)> {
    let (owner, name) = repo.split_once('/')?;
    (!owner.is_empty() && !name.is_empty()).then_some((owner, name))
}
