use crate::infra::{default_dependency_edges, sample_outage_windows, InMemoryOutageRepository};
use chrono::{DateTime, Utc};
use clap::Args;
use std::sync::Arc;

use status_board::error::AppError;
use status_board::outages::{DegradedReport, DependencyGraph, OutageReport, StatusService};

#[derive(Args, Debug, Default)]
pub(crate) struct StatusReportArgs {
    /// Evaluation instant (RFC 3339). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_instant)]
    pub(crate) at: Option<DateTime<Utc>>,
    /// Outage window as 'service=start[,end]' (repeatable). Defaults to the
    /// sample window set when omitted.
    #[arg(long = "outage", value_parser = crate::infra::parse_outage)]
    pub(crate) outages: Vec<OutageReport>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation instant (RFC 3339). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_instant)]
    pub(crate) at: Option<DateTime<Utc>>,
}

pub(crate) fn run_status_report(args: StatusReportArgs) -> Result<(), AppError> {
    let StatusReportArgs { at, outages } = args;

    let now = at.unwrap_or_else(Utc::now);
    let outages = if outages.is_empty() {
        sample_outage_windows(now)
    } else {
        outages
    };

    let graph = DependencyGraph::from_edges(default_dependency_edges())?;
    let report = resolve_report(graph, outages, now)?;
    render_report(&report);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let now = args.at.unwrap_or_else(Utc::now);
    let graph = DependencyGraph::from_edges(default_dependency_edges())?;

    println!("Deployed dependency topology");
    println!(
        "  {} services, {} edges",
        graph.service_count(),
        graph.edge_count()
    );
    for (upstream, downstream) in graph.edges() {
        println!("  {upstream} -> {downstream}");
    }

    let outages = sample_outage_windows(now);
    println!("\nSample outage windows");
    for outage in &outages {
        match outage.window.end {
            Some(end) => println!(
                "  {} from {} until {}",
                outage.service,
                outage.window.start.to_rfc3339(),
                end.to_rfc3339()
            ),
            None => println!(
                "  {} ongoing since {}",
                outage.service,
                outage.window.start.to_rfc3339()
            ),
        }
    }

    println!();
    let report = resolve_report(graph, outages, now)?;
    render_report(&report);
    Ok(())
}

fn resolve_report(
    graph: DependencyGraph,
    outages: Vec<OutageReport>,
    now: DateTime<Utc>,
) -> Result<DegradedReport, AppError> {
    let repository = Arc::new(InMemoryOutageRepository::seeded(outages));
    let service = StatusService::new(graph, repository);
    Ok(service.degraded(now)?)
}

fn render_report(report: &DegradedReport) {
    println!("Evaluated at {}", report.evaluated_at.to_rfc3339());

    if report.is_empty() {
        println!("No degraded capabilities.");
        return;
    }

    println!("\nActive upstream outages:");
    for cause in &report.active_outages {
        match cause.end {
            Some(end) => println!(
                "  {} from {} until {}",
                cause.service,
                cause.start.to_rfc3339(),
                end.to_rfc3339()
            ),
            None => println!("  {} ongoing since {}", cause.service, cause.start.to_rfc3339()),
        }
    }

    println!("\nDegraded capabilities:");
    for row in &report.affected_services {
        println!(
            "  {:<20} impaired by {}",
            row.external_service, row.internal_service
        );
    }
}
