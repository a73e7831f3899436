mod analyze;
mod github;
mod http;
mod jira;
mod logging;
mod model;
mod report;
mod utils;

use crate::analyze::{build_report, ReportHeader, ReportModel};
use crate::github::{ContributionFetcher, GitHubClient};
use crate::jira::{JiraClient, TicketFetcher};
use crate::model::{Config, Quarter, Result};
use crate::report::HtmlReport;
use crate::utils::AssociateProgress;
use chrono::{Datelike, Utc};
use clap::Parser;
use futures::stream::{self, StreamExt};
use indicatif::MultiProgress;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info, warn};

#[derive(Parser, Debug, Clone)]
#[command(about = "Quarterly Jira and GitHub activity reports")]
struct Args {
    /// Quarter to generate the report for (Q1, Q2, Q3, Q4)
    #[arg(long)]
    quarter: String,
    /// Year of the quarter
    #[arg(long, default_value_t = current_year())]
    year: i32,
    /// Associate name from the config file; all associates when omitted
    #[arg(long)]
    associate: Option<String>,
    #[arg(long = "config", default_value = "config.yaml")]
    config_path: String,
    #[arg(long = "output", default_value = "reports")]
    output_dir: String,
    /// Associates processed at the same time
    #[arg(long, default_value_t = 2)]
    concurrency: usize,
    #[arg(long = "jira-token", env = "JIRA_TOKEN", hide_env_values = true)]
    jira_token: Option<String>,
    #[arg(long = "github-token", env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,
}

fn current_year() -> i32 {
    Utc::now().year()
}

#[tokio::main]
async fn main() -> ExitCode {
    let multi_progress = MultiProgress::new();
    logging::init(&multi_progress);
    let args = Args::parse();
    match run(&args, &multi_progress).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args, multi_progress: &MultiProgress) -> Result<()> {
    let quarter: Quarter = args.quarter.parse()?;
    let period = quarter.date_range(args.year)?;

    let config = Config::from_config(&args.config_path)?;
    let associates = config.select_associates(args.associate.as_deref())?;
    fs::create_dir_all(&args.output_dir)?;

    let jira_token = args.jira_token.as_deref().unwrap_or(&config.jira.token);
    let github_token = args.github_token.as_deref().unwrap_or(&config.github.token);
    let jira = JiraClient::new(&config.jira.url, jira_token, &config.jira.story_points_field)?;
    let github = GitHubClient::new(&config.github.api_url, github_token)?;

    info!(
        quarter = %quarter,
        year = args.year,
        start = %period.start_day(),
        end = %period.end_day(),
        associates = associates.len(),
        "generating reports"
    );

    let output_dir = Path::new(&args.output_dir);
    let total = associates.len();
    let outcomes = stream::iter(associates.into_iter().enumerate())
        .map(|(index, associate)| {
            let progress = AssociateProgress::new(multi_progress, index + 1, total, &associate.name);
            let header = ReportHeader::new(associate, quarter, args.year, period, jira.base_url());
            process_associate(&jira, &github, header, output_dir, progress)
        })
        .buffered(args.concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    let failed = outcomes.iter().filter(|generated| !**generated).count();
    if failed > 0 {
        warn!(failed, total, "some reports were not generated");
    }
    info!(
        generated = total - failed,
        output = %output_dir.display(),
        "done"
    );
    Ok(())
}

/// Fetch, aggregate and write one associate's report; failures are logged and skipped.
async fn process_associate<T, G>(
    tickets: &T,
    github: &G,
    header: ReportHeader,
    output_dir: &Path,
    progress: AssociateProgress,
) -> bool
where
    T: TicketFetcher,
    G: ContributionFetcher,
{
    let name = header.associate.name.clone();
    progress.stage("Fetching Jira and GitHub data ...");
    let written = match generate_report(tickets, github, header).await {
        Ok(report) => {
            progress.stage("Writing HTML report ...");
            report.report_create(output_dir)
        }
        Err(err) => Err(err),
    };

    match written {
        Ok(path) => {
            info!(associate = %name, path = %path.display(), "report generated");
            progress.finish_ok(format!("Report generated: {}", path.display()));
            true
        }
        Err(err) => {
            if err.is_fetch_error() {
                warn!(associate = %name, error = %err, "skipping associate");
            } else {
                error!(associate = %name, error = %err, "skipping associate");
            }
            progress.finish_failed(err);
            false
        }
    }
}

async fn generate_report<T, G>(tickets: &T, github: &G, header: ReportHeader) -> Result<ReportModel>
where
    T: TicketFetcher,
    G: ContributionFetcher,
{
    let associate = &header.associate;
    let (completed, contributions) = futures::try_join!(
        tickets.fetch_completed_tickets(&associate.jira_username, &header.period),
        github.fetch_contributions(&associate.github_username, &header.period),
    )?;
    Ok(build_report(header, Utc::now(), completed, contributions))
}
