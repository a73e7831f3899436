pub mod analyzer;
mod model;

pub use analyzer::build_report;
pub use model::{
    IssueAnalyzed, PullRequestAnalyzed, ReportHeader, ReportModel, ReportSummary, TicketAnalyzed,
};
