use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

/// A resolved Jira issue, flattened for the report.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerTicket {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub issue_type: String,
    pub priority: Option<String>,
    /// `None` means "not estimated", which is not the same as an estimate of 0.
    pub story_points: Option<f64>,
    pub assignee: Option<String>,
    pub reporter: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub resolved: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchResponse {
    #[serde(default)]
    pub(super) issues: Vec<WireIssue>,
    pub(super) total: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireIssue {
    key: String,
    fields: WireFields,
}

#[derive(Debug, Deserialize)]
struct WireFields {
    summary: Option<String>,
    status: Option<Named>,
    issuetype: Option<Named>,
    priority: Option<Named>,
    assignee: Option<Person>,
    reporter: Option<Person>,
    created: Option<String>,
    updated: Option<String>,
    resolutiondate: Option<String>,
    /// Custom fields; the story points field id differs between instances.
    #[serde(flatten)]
    custom: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Person {
    #[serde(rename = "displayName")]
    display_name: Option<String>,
}

/// Story points as they appear on the wire; any other JSON value fails to decode.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoryPointsWire {
    Integer(i64),
    Float(f64),
}

impl StoryPointsWire {
    fn normalize(self) -> f64 {
        match self {
            StoryPointsWire::Integer(points) => points as f64,
            StoryPointsWire::Float(points) => points,
        }
    }
}

impl WireIssue {
    pub(super) fn into_ticket(mut self, story_points_field: &str) -> TrackerTicket {
        let story_points = self
            .fields
            .custom
            .remove(story_points_field)
            .and_then(|value| serde_json::from_value::<StoryPointsWire>(value).ok())
            .map(StoryPointsWire::normalize);
        let fields = self.fields;

        TrackerTicket {
            key: self.key,
            summary: fields.summary.unwrap_or_default(),
            status: fields.status.and_then(|s| s.name).unwrap_or_default(),
            issue_type: fields.issuetype.and_then(|t| t.name).unwrap_or_default(),
            priority: fields.priority.and_then(|p| p.name),
            story_points,
            assignee: fields.assignee.and_then(|p| p.display_name),
            reporter: fields.reporter.and_then(|p| p.display_name),
            created: parse_datetime(fields.created.as_deref()),
            updated: parse_datetime(fields.updated.as_deref()),
            resolved: parse_datetime(fields.resolutiondate.as_deref()),
        }
    }
}

/// Accepts RFC 3339 and Jira's `2024-04-02T10:15:30.000+0000`; anything else is `None`.
fn parse_datetime(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?.trim();
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
        .map(|datetime| datetime.with_timezone(&Utc))
}
