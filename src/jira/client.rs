use crate::http::{build_client, send_json};
use crate::jira::ticket::SearchResponse;
use crate::jira::TrackerTicket;
use crate::model::{DateRange, Error, Result};
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::{debug, info};

const SERVICE: &str = "Jira";
const MAX_RESULTS: usize = 1000;
const DONE_STATUSES: &str = "Done, Closed, Resolved";
const BASE_FIELDS: &str = "summary,status,issuetype,priority,assignee,reporter";
const DATE_FIELDS: &str = "created,updated,resolutiondate";

#[derive(Debug, Clone)]
pub struct JiraClient {
    client: Client,
    base_url: String,
    token: String,
    story_points_field: String,
}

// New
impl JiraClient {
    pub fn new(base_url: &str, token: &str, story_points_field: &str) -> Result<Self> {
        Ok(Self {
            client: build_client(SERVICE)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            story_points_field: story_points_field.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

pub trait TicketFetcher {
    async fn fetch_completed_tickets(
        &self,
        username: &str,
        range: &DateRange,
    ) -> Result<Vec<TrackerTicket>>;
}

impl TicketFetcher for JiraClient {
    async fn fetch_completed_tickets(
        &self,
        username: &str,
        range: &DateRange,
    ) -> Result<Vec<TrackerTicket>> {
        let jql = completed_tickets_jql(username, range);
        let fields = format!("{BASE_FIELDS},{},{DATE_FIELDS}", self.story_points_field);
        let url = format!("{}/rest/api/2/search", self.base_url);

        let mut tickets: Vec<TrackerTicket> = vec![];
        loop {
            let mut request = self
                .client
                .get(&url)
                .header(ACCEPT, "application/json")
                .query(&[
                    ("jql", jql.clone()),
                    ("startAt", tickets.len().to_string()),
                    ("maxResults", MAX_RESULTS.to_string()),
                    ("fields", fields.clone()),
                ]);
            if !self.token.is_empty() {
                request = request.bearer_auth(&self.token);
            }

            let (page, _) = send_json::<SearchResponse>(SERVICE, request).await?;
            let returned = page.issues.len();
            tickets.extend(
                page.issues
                    .into_iter()
                    .map(|issue| issue.into_ticket(&self.story_points_field)),
            );

            let total = page.total.unwrap_or(tickets.len());
            if tickets.len() >= total {
                break;
            }
            if returned == 0 {
                return Err(Error::IncompleteResult {
                    service: SERVICE,
                    returned: tickets.len(),
                    total,
                });
            }
            debug!(target: "jira", username, fetched = tickets.len(), total, "fetching next page");
        }

        info!(target: "jira", username, count = tickets.len(), "fetched completed tickets");
        Ok(tickets)
    }
}

fn completed_tickets_jql(username: &str, range: &DateRange) -> String {
    format!(
        r#"assignee = "{}" AND status in ({DONE_STATUSES}) AND resolved >= "{}" AND resolved <= "{}" ORDER BY resolved DESC"#,
        username.replace('\\', "\\\\").replace('"', "\\\""),
        range.start_day(),
        range.end_day(),
    )
}
