//! Plain-text sync report.

use crate::sync::{JourneyOutcome, StepAction, SyncReport};
use console::style;
use std::fmt::Write;

pub fn render_sync_report(report: &SyncReport) -> String {
    let mut out = String::new();
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &SyncReport) -> std::fmt::Result {
    if let Some(reason) = &report.manifest_warning {
        writeln!(out, "{} manifest ignored: {}", style("warning:").yellow(), reason)?;
    }

    for journey in &report.journeys {
        match &journey.outcome {
            JourneyOutcome::Unparseable => {
                writeln!(out, "{} could not parse {}", style("!").yellow(), journey.path)?;
            }
            JourneyOutcome::Unchanged => {
                writeln!(out, "{}", style(format!("= {} (unchanged)", journey.id)).dim())?;
            }
            JourneyOutcome::Synced { is_new, steps } => {
                let tag =
                    if *is_new { style("(new)").green() } else { style("(changed)").yellow() };
                writeln!(out, "\n{} {}", style(format!("Journey: {}", journey.name)).blue(), tag)?;
                for step in steps {
                    write_step(out, &step.description, &step.action)?;
                }
            }
        }
    }

    writeln!(out, "\n{}", style("Sync summary").bold())?;
    writeln!(out, "  Journeys processed: {}", report.journeys_processed())?;
    writeln!(out, "  Changes detected: {}", report.changes_detected)?;
    writeln!(out, "  Scenarios created: {}", report.scenarios_created)?;
    if report.dry_run {
        writeln!(out, "  {}", style("dry run: no files modified").yellow())?;
    }
    Ok(())
}

fn write_step(out: &mut String, description: &str, action: &StepAction) -> std::fmt::Result {
    match action {
        StepAction::Unlinked => {
            writeln!(out, "{}", style(format!("  - {description} (no scenario linked)")).dim())
        }
        StepAction::Exists { scenario } => {
            writeln!(out, "{}", style(format!("  = {scenario} (exists)")).dim())
        }
        StepAction::WouldCreate { scenario } => {
            writeln!(out, "  {} {scenario} (missing, would create)", style("+").yellow())
        }
        StepAction::Created { scenario, test } => {
            writeln!(out, "  {} created {scenario} and {test}", style("+").green())
        }
        StepAction::Declined { scenario } => {
            writeln!(out, "  {} skipped {scenario}", style("-").dim())
        }
        StepAction::Failed { scenario, reason } => {
            writeln!(out, "  {} {scenario}: {reason}", style("failed").red())
        }
    }
}
