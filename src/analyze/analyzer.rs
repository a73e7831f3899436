use crate::analyze::{
    IssueAnalyzed, PullRequestAnalyzed, ReportHeader, ReportModel, ReportSummary, TicketAnalyzed,
};
use crate::github::{CodeReviewRecord, Contributions, IssueRecord, PullRequestRecord};
use crate::jira::TrackerTicket;
use chrono::{DateTime, Utc};
use itertools::Itertools;

pub fn build_report(
    header: ReportHeader,
    generated_at: DateTime<Utc>,
    tickets: Vec<TrackerTicket>,
    contributions: Contributions,
) -> ReportModel {
    let summary = ReportSummary::from_records(
        &tickets,
        &contributions.pull_requests,
        &contributions.issues,
        &contributions.code_reviews,
    );
    ReportModel {
        header,
        generated_at,
        tickets,
        pull_requests: contributions.pull_requests,
        issues: contributions.issues,
        code_reviews: contributions.code_reviews,
        summary,
    }
}

impl ReportSummary {
    /// Derives every figure from the raw collections alone.
    pub fn from_records(
        tickets: &[TrackerTicket],
        pull_requests: &[PullRequestRecord],
        issues: &[IssueRecord],
        code_reviews: &[CodeReviewRecord],
    ) -> Self {
        Self {
            tickets: TicketAnalyzed::from_tickets(tickets),
            pull_requests: PullRequestAnalyzed::from_pull_requests(pull_requests),
            issues: IssueAnalyzed::from_issues(issues),
            code_reviews: code_reviews.len(),
            unique_repositories: unique_repositories(pull_requests, issues, code_reviews),
        }
    }
}

// Exact, case-sensitive; records without a repository are not counted.
fn unique_repositories(
    pull_requests: &[PullRequestRecord],
    issues: &[IssueRecord],
    code_reviews: &[CodeReviewRecord],
) -> usize {
    pull_requests
        .iter()
        .map(|pr| pr.repo.as_str())
        .chain(issues.iter().map(|issue| issue.repo.as_str()))
        .chain(code_reviews.iter().map(|review| review.repo.as_str()))
        .filter(|repo| !repo.is_empty())
        .unique()
        .count()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{quarter_dates, Associate, Quarter};
    use chrono::TimeZone;

    pub(crate) fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()
    }

    pub(crate) fn ticket(key: &str, points: Option<f64>) -> TrackerTicket {
        TrackerTicket {
            key: key.to_string(),
            summary: format!("Summary {key}"),
            status: "Done".into(),
            issue_type: "Story".into(),
            priority: None,
            story_points: points,
            assignee: Some("Alice".into()),
            reporter: None,
            created: Some(at(1)),
            updated: Some(at(2)),
            resolved: Some(at(3)),
        }
    }

    pub(crate) fn pull_request(
        repo: &str,
        number: u64,
        state: &str,
        merged: bool,
        stats: (u64, u64, u64),
    ) -> PullRequestRecord {
        let (commits, additions, deletions) = stats;
        PullRequestRecord {
            number,
            title: format!("PR {number}"),
            url: format!("https://github.com/{repo}/pull/{number}"),
            state: state.into(),
            created_at: at(4),
            merged_at: merged.then(|| at(5)),
            repo: repo.into(),
            commits,
            additions,
            deletions,
            changed_files: 1,
        }
    }

    pub(crate) fn issue(repo: &str, number: u64, closed: bool) -> IssueRecord {
        IssueRecord {
            number,
            title: format!("Issue {number}"),
            url: format!("https://github.com/{repo}/issues/{number}"),
            state: if closed { "closed" } else { "open" }.into(),
            created_at: at(6),
            closed_at: closed.then(|| at(7)),
            repo: repo.into(),
        }
    }

    fn review(repo: &str, number: u64) -> CodeReviewRecord {
        CodeReviewRecord {
            pr_number: number,
            pr_title: format!("PR {number}"),
            url: format!("https://github.com/{repo}/pull/{number}"),
            state: "open".into(),
            created_at: at(8),
            repo: repo.into(),
        }
    }

    pub(crate) fn header() -> ReportHeader {
        let associate = Associate {
            name: "alice".into(),
            jira_username: "alice".into(),
            github_username: "alice-gh".into(),
            full_name: "Alice Example".into(),
        };
        ReportHeader::new(
            associate,
            Quarter::Q2,
            2024,
            quarter_dates("Q2", 2024).unwrap(),
            "https://issues.example.com",
        )
    }

    #[test]
    fn summary_matches_the_reference_scenario() {
        let contributions = Contributions {
            pull_requests: vec![pull_request("acme/api", 1, "closed", true, (3, 10, 2))],
            issues: vec![issue("acme/api", 2, false)],
            code_reviews: vec![],
        };
        let tickets = vec![ticket("P-1", Some(3.0)), ticket("P-2", None)];
        let report = build_report(header(), at(30), tickets, contributions);
        let summary = &report.summary;

        assert_eq!(summary.tickets.total, 2);
        assert_eq!(summary.tickets.story_points, 3.0);
        assert_eq!(summary.pull_requests.total, 1);
        assert_eq!(summary.pull_requests.merged, 1);
        assert_eq!(summary.pull_requests.additions, 10);
        assert_eq!(summary.pull_requests.deletions, 2);
        assert_eq!(summary.pull_requests.commits, 3);
        assert_eq!(summary.issues.total, 1);
        assert_eq!(summary.issues.closed, 0);
        assert_eq!(summary.unique_repositories, 1);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let tickets = vec![ticket("P-1", Some(2.5)), ticket("P-2", Some(1.0))];
        let contributions = Contributions {
            pull_requests: vec![
                pull_request("a/b", 1, "closed", true, (1, 2, 3)),
                pull_request("a/c", 2, "open", false, (4, 5, 6)),
            ],
            issues: vec![issue("a/d", 3, true)],
            code_reviews: vec![review("a/e", 4)],
        };

        let first = build_report(header(), at(30), tickets.clone(), contributions.clone());
        let second = build_report(header(), at(30), tickets, contributions);
        assert_eq!(first.summary, second.summary);
        assert_eq!(
            first.summary,
            ReportSummary::from_records(
                &first.tickets,
                &first.pull_requests,
                &first.issues,
                &first.code_reviews
            )
        );
    }

    #[test]
    fn missing_estimate_differs_from_explicit_zero() {
        let unestimated = TicketAnalyzed::from_tickets(&[ticket("P-1", None)]);
        let zero = TicketAnalyzed::from_tickets(&[ticket("P-1", Some(0.0))]);

        assert_eq!(unestimated.story_points, 0.0);
        assert_eq!(zero.story_points, 0.0);
        assert_eq!(unestimated.with_points, 0);
        assert_eq!(zero.with_points, 1);
    }

    #[test]
    fn unmerged_pull_requests_are_never_counted_as_merged() {
        let analyzed = PullRequestAnalyzed::from_pull_requests(&[
            pull_request("a/b", 1, "closed", false, (0, 0, 0)),
            pull_request("a/b", 2, "merged", false, (0, 0, 0)),
            pull_request("a/b", 3, "open", true, (0, 0, 0)),
        ]);
        assert_eq!(analyzed.total, 3);
        assert_eq!(analyzed.merged, 1);
    }

    #[test]
    fn repositories_are_counted_once_across_record_kinds() {
        let pull_requests = [
            pull_request("a/b", 1, "open", false, (0, 0, 0)),
            pull_request("a/b", 2, "open", false, (0, 0, 0)),
        ];
        let issues = [issue("a/c", 3, false)];
        assert_eq!(unique_repositories(&pull_requests, &issues, &[]), 2);

        let reviews = [review("a/c", 9), review("A/B", 10), review("", 11)];
        assert_eq!(unique_repositories(&pull_requests, &issues, &reviews), 3);
    }
}
