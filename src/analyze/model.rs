use crate::github::{CodeReviewRecord, IssueRecord, PullRequestRecord};
use crate::jira::TrackerTicket;
use crate::model::{Associate, DateRange, Quarter};
use chrono::{DateTime, Utc};

/// Who and which period a report is about.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportHeader {
    pub associate: Associate,
    pub quarter: Quarter,
    pub year: i32,
    pub period: DateRange,
    /// Base URL ticket links are built from.
    pub tracker_url: String,
}

impl ReportHeader {
    pub fn new(
        associate: Associate,
        quarter: Quarter,
        year: i32,
        period: DateRange,
        tracker_url: impl ToString,
    ) -> Self {
        Self {
            associate,
            quarter,
            year,
            period,
            tracker_url: tracker_url.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportModel {
    pub header: ReportHeader,
    pub generated_at: DateTime<Utc>,
    pub tickets: Vec<TrackerTicket>,
    pub pull_requests: Vec<PullRequestRecord>,
    pub issues: Vec<IssueRecord>,
    pub code_reviews: Vec<CodeReviewRecord>,
    pub summary: ReportSummary,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSummary {
    pub tickets: TicketAnalyzed,
    pub pull_requests: PullRequestAnalyzed,
    pub issues: IssueAnalyzed,
    pub code_reviews: usize,
    pub unique_repositories: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketAnalyzed {
    pub total: usize,
    /// Tickets carrying an estimate, an explicit 0 included.
    pub with_points: usize,
    pub story_points: f64,
}

impl TicketAnalyzed {
    pub fn from_tickets(tickets: &[TrackerTicket]) -> Self {
        tickets.iter().fold(Self::default(), |mut acc, ticket| {
            acc.total += 1;
            if let Some(points) = ticket.story_points {
                acc.with_points += 1;
                acc.story_points += points;
            }
            acc
        })
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct PullRequestAnalyzed {
    pub total: usize,
    pub merged: usize,
    pub commits: u64,
    pub additions: u64,
    pub deletions: u64,
    pub changed_files: u64,
}

impl PullRequestAnalyzed {
    pub fn from_pull_requests(pull_requests: &[PullRequestRecord]) -> Self {
        pull_requests.iter().fold(Self::default(), |mut acc, pr| {
            acc.total += 1;
            if pr.merged_at.is_some() {
                acc.merged += 1;
            }
            acc.commits += pr.commits;
            acc.additions += pr.additions;
            acc.deletions += pr.deletions;
            acc.changed_files += pr.changed_files;
            acc
        })
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct IssueAnalyzed {
    pub total: usize,
    pub closed: usize,
}

impl IssueAnalyzed {
    pub fn from_issues(issues: &[IssueRecord]) -> Self {
        Self {
            total: issues.len(),
            closed: issues.iter().filter(|i| i.closed_at.is_some()).count(),
        }
    }
}
