use crate::analyze::{ReportModel, ReportSummary};
use crate::github::{CodeReviewRecord, IssueRecord, PullRequestRecord};
use crate::jira::TrackerTicket;
use crate::model::Result;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; max-width: 1200px; margin: 0 auto; padding: 20px; background-color: #f5f5f5; }
.header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 30px; border-radius: 8px; margin-bottom: 30px; }
.header h1 { margin: 0 0 10px 0; }
.header p { margin: 5px 0; opacity: 0.9; }
.stats-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin-bottom: 30px; }
.stat-card { background: white; padding: 20px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); text-align: center; }
.stat-number { font-size: 36px; font-weight: bold; color: #667eea; margin: 10px 0; }
.stat-label { color: #666; font-size: 14px; text-transform: uppercase; letter-spacing: 0.5px; }
.section { background: white; padding: 25px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); margin-bottom: 20px; }
.section h2 { color: #333; border-bottom: 2px solid #667eea; padding-bottom: 10px; margin-top: 0; }
.item-list { list-style: none; padding: 0; }
.item { padding: 15px; border-left: 3px solid #667eea; margin-bottom: 10px; background-color: #f9f9f9; border-radius: 4px; }
.item-title { font-weight: bold; color: #333; margin-bottom: 5px; }
.item-meta { font-size: 13px; color: #666; }
.badge { display: inline-block; padding: 3px 8px; border-radius: 12px; font-size: 12px; margin-right: 5px; }
.badge-success { background-color: #d4edda; color: #155724; }
.badge-info { background-color: #d1ecf1; color: #0c5460; }
.badge-warning { background-color: #fff3cd; color: #856404; }
.added { color: #22863a; }
.removed { color: #cb2431; }
.footer { text-align: center; color: #666; margin-top: 30px; padding: 20px; font-size: 14px; }
a { color: #667eea; text-decoration: none; }
a:hover { text-decoration: underline; }
"#;

pub trait HtmlReport {
    fn render(&self) -> String;
    fn report_create(&self, output_dir: &Path) -> Result<PathBuf>;
}

impl HtmlReport for ReportModel {
    fn render(&self) -> String {
        let header = &self.header;
        let title = format!(
            "Quarterly Connection Report - {} - {} {}",
            header.associate.display_name(),
            header.quarter,
            header.year
        );

        let mut doc = String::new();
        doc.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        doc.push_str("<meta charset=\"UTF-8\">\n");
        doc.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        doc.push_str(&format!("<title>{}</title>\n", escape(&title)));
        doc.push_str(&format!("<style>{STYLE}</style>\n</head>\n<body>\n"));

        doc.add_header(self);
        doc.add_stats(&self.summary);
        doc.add_tickets(&header.tracker_url, &self.tickets);
        doc.add_pull_requests(&self.pull_requests);
        doc.add_issues(&self.issues);
        doc.add_code_reviews(&self.code_reviews);

        doc.push_str("<div class=\"footer\"><p>This report was automatically generated by the Quarterly Connection tool.</p></div>\n");
        doc.push_str("</body>\n</html>\n");
        doc
    }

    fn report_create(&self, output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join(report_file_name(self));
        fs::write(&path, self.render())?;
        Ok(path)
    }
}

/// `<associate>_<quarter>_<year>.html`
pub fn report_file_name(report: &ReportModel) -> String {
    let name = report
        .header
        .associate
        .name
        .replace(['/', '\\'], "_");
    format!("{}_{}_{}.html", name, report.header.quarter, report.header.year)
}

trait HtmlExt {
    fn add_header(&mut self, report: &ReportModel);
    fn add_stats(&mut self, summary: &ReportSummary);
    fn add_tickets(&mut self, tracker_url: &str, tickets: &[TrackerTicket]);
    fn add_pull_requests(&mut self, pull_requests: &[PullRequestRecord]);
    fn add_issues(&mut self, issues: &[IssueRecord]);
    fn add_code_reviews(&mut self, code_reviews: &[CodeReviewRecord]);
}

impl HtmlExt for String {
    fn add_header(&mut self, report: &ReportModel) {
        let header = &report.header;
        self.push_str("<div class=\"header\">\n<h1>Quarterly Connection Report</h1>\n");
        self.push_str(&format!(
            "<p><strong>Associate:</strong> {}</p>\n",
            escape(header.associate.display_name())
        ));
        self.push_str(&format!(
            "<p><strong>Period:</strong> {} {} ({} to {})</p>\n",
            header.quarter,
            header.year,
            header.period.start_day(),
            header.period.end_day()
        ));
        self.push_str(&format!(
            "<p><strong>Generated:</strong> {}</p>\n</div>\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S")
        ));
    }

    fn add_stats(&mut self, summary: &ReportSummary) {
        let tickets = &summary.tickets;
        let prs = &summary.pull_requests;

        self.push_str("<div class=\"stats-grid\">\n");
        let points = if tickets.story_points > 0.0 {
            format!("{:.1} story points", tickets.story_points)
        } else {
            String::new()
        };
        self.push_str(&stat_card("Jira Issues Completed", tickets.total, &points));
        self.push_str(&stat_card(
            "Pull Requests",
            prs.total,
            &format!("{} merged", prs.merged),
        ));
        self.push_str(&stat_card("Commits", prs.commits, "Across all PRs"));
        self.push_str(&stat_card(
            "Code Changes",
            prs.additions,
            &format!(
                "<span class=\"added\">+{}</span> / <span class=\"removed\">-{}</span>",
                prs.additions, prs.deletions
            ),
        ));
        self.push_str(&stat_card(
            "Issues",
            summary.issues.total,
            &format!("{} closed", summary.issues.closed),
        ));
        self.push_str(&stat_card("Code Reviews", summary.code_reviews, ""));
        self.push_str(&stat_card(
            "Repositories",
            summary.unique_repositories,
            "Worked on",
        ));
        self.push_str("</div>\n");
    }

    fn add_tickets(&mut self, tracker_url: &str, tickets: &[TrackerTicket]) {
        if tickets.is_empty() {
            return;
        }
        self.push_str(&section_start("Jira Accomplishments", tickets.len()));
        for ticket in tickets {
            let link = format!("{}/browse/{}", tracker_url.trim_end_matches('/'), ticket.key);
            let mut meta = vec![
                badge("success", &ticket.status),
                badge("info", &ticket.issue_type),
            ];
            if let Some(priority) = ticket.priority.as_deref().filter(|p| !p.is_empty()) {
                meta.push(badge("warning", priority));
            }
            if let Some(points) = ticket.story_points {
                meta.push(badge("info", &format!("{points:.1} SP")));
            }
            if let Some(assignee) = ticket.assignee.as_deref() {
                meta.push(format!("Assignee: {}", escape(assignee)));
            }
            if let Some(reporter) = ticket.reporter.as_deref() {
                meta.push(format!("Reporter: {}", escape(reporter)));
            }
            if let Some(created) = ticket.created {
                meta.push(format!("Created: {}", day(&created)));
            }
            if let Some(updated) = ticket.updated {
                meta.push(format!("Updated: {}", day(&updated)));
            }
            if let Some(resolved) = ticket.resolved {
                meta.push(format!("Resolved: {}", day(&resolved)));
            }
            self.push_str(&item(&link, &ticket.key, &ticket.summary, &meta));
        }
        self.push_str("</ul>\n</div>\n");
    }

    fn add_pull_requests(&mut self, pull_requests: &[PullRequestRecord]) {
        if pull_requests.is_empty() {
            return;
        }
        self.push_str(&section_start("Pull Requests", pull_requests.len()));
        for pr in pull_requests {
            let mut meta = vec![match pr.merged_at {
                Some(_) => badge("success", "Merged"),
                None => badge("warning", &pr.state),
            }];
            meta.push(badge("info", &pr.repo));
            if pr.commits > 0 {
                meta.push(badge("info", &format!("{} commits", pr.commits)));
            }
            if pr.additions > 0 {
                meta.push(format!("<span class=\"added\">+{}</span>", pr.additions));
            }
            if pr.deletions > 0 {
                meta.push(format!("<span class=\"removed\">-{}</span>", pr.deletions));
            }
            if pr.changed_files > 0 {
                meta.push(badge("info", &format!("{} files", pr.changed_files)));
            }
            meta.push(format!("Created: {}", day(&pr.created_at)));
            self.push_str(&item(&pr.url, &format!("#{}", pr.number), &pr.title, &meta));
        }
        self.push_str("</ul>\n</div>\n");
    }

    fn add_issues(&mut self, issues: &[IssueRecord]) {
        if issues.is_empty() {
            return;
        }
        self.push_str(&section_start("GitHub Issues", issues.len()));
        for issue in issues {
            let meta = vec![
                match issue.closed_at {
                    Some(_) => badge("success", "Closed"),
                    None => badge("warning", &issue.state),
                },
                badge("info", &issue.repo),
                format!("Created: {}", day(&issue.created_at)),
            ];
            self.push_str(&item(
                &issue.url,
                &format!("#{}", issue.number),
                &issue.title,
                &meta,
            ));
        }
        self.push_str("</ul>\n</div>\n");
    }

    fn add_code_reviews(&mut self, code_reviews: &[CodeReviewRecord]) {
        if code_reviews.is_empty() {
            return;
        }
        self.push_str(&section_start("Code Reviews", code_reviews.len()));
        for review in code_reviews {
            let meta = vec![
                badge("info", &review.repo),
                format!("Reviewed: {}", day(&review.created_at)),
            ];
            self.push_str(&item(
                &review.url,
                &format!("#{}", review.pr_number),
                &review.pr_title,
                &meta,
            ));
        }
        self.push_str("</ul>\n</div>\n");
    }
}

fn stat_card(label: &str, value: impl ToString, note: &str) -> String {
    let note = if note.is_empty() {
        String::new()
    } else {
        format!("<div class=\"stat-label\">{note}</div>")
    };
    format!(
        "<div class=\"stat-card\"><div class=\"stat-label\">{label}</div><div class=\"stat-number\">{}</div>{note}</div>\n",
        value.to_string()
    )
}

fn section_start(title: &str, count: usize) -> String {
    format!("<div class=\"section\">\n<h2>{title} ({count})</h2>\n<ul class=\"item-list\">\n")
}

fn badge(kind: &str, text: &str) -> String {
    format!("<span class=\"badge badge-{kind}\">{}</span>", escape(text))
}

fn item(href: &str, label: &str, title: &str, meta: &[String]) -> String {
    format!(
        "<li class=\"item\"><div class=\"item-title\"><a href=\"{}\" target=\"_blank\">{}</a> - {}</div><div class=\"item-meta\">{}</div></li>\n",
        escape(href),
        escape(label),
        escape(title),
        meta.join(" ")
    )
}

fn day(datetime: &DateTime<Utc>) -> String {
    datetime.format("%Y-%m-%d").to_string()
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::analyzer::tests::{at, header, issue, pull_request, ticket};
    use crate::analyze::build_report;
    use crate::github::Contributions;

    fn report() -> ReportModel {
        let mut pr = pull_request("acme/api", 42, "closed", true, (3, 10, 2));
        pr.title = "Use <Vec> & friends".into();
        let contributions = Contributions {
            pull_requests: vec![pr],
            issues: vec![issue("acme/app", 7, false)],
            code_reviews: vec![],
        };
        build_report(
            header(),
            at(30),
            vec![ticket("PROJ-1", Some(3.0)), ticket("PROJ-2", None)],
            contributions,
        )
    }

    #[test]
    fn renders_summary_and_sections() {
        let html = report().render();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Alice Example"));
        assert!(html.contains("Q2 2024 (2024-04-01 to 2024-06-30)"));
        assert!(html.contains("3.0 story points"));
        assert!(html.contains("1 merged"));
        assert!(html.contains("https://issues.example.com/browse/PROJ-1"));
        assert!(html.contains("Pull Requests (1)"));
        assert!(html.contains("GitHub Issues (1)"));
        assert!(!html.contains("Code Reviews ("), "empty sections are omitted");
    }

    #[test]
    fn code_changes_card_shows_lines_added() {
        let html = report().render();
        assert!(html.contains(
            "<div class=\"stat-label\">Code Changes</div><div class=\"stat-number\">10</div>"
        ));
        assert!(html.contains("+10</span> / <span class=\"removed\">-2</span>"));
    }

    #[test]
    fn ticket_people_and_dates_are_listed_when_present() {
        let html = report().render();
        assert!(html.contains("Assignee: Alice"));
        assert!(html.contains("Created: 2024-05-01"));
        assert!(html.contains("Updated: 2024-05-02"));
        assert!(html.contains("Resolved: 2024-05-03"));
        assert!(!html.contains("Reporter:"), "tickets without a reporter omit it");
    }

    #[test]
    fn record_text_is_escaped() {
        let html = report().render();
        assert!(html.contains("Use &lt;Vec&gt; &amp; friends"));
        assert!(!html.contains("<Vec>"));
    }

    #[test]
    fn writes_report_named_after_associate_and_period() {
        let dir = tempfile::tempdir().unwrap();
        let report = report();
        let path = report.report_create(dir.path()).unwrap();

        assert_eq!(path.file_name().unwrap(), "alice_Q2_2024.html");
        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written, report.render());
    }
}
