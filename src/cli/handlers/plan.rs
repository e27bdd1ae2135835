use crate::distribute::allocate_counts;
use crate::ledger::Ledger;
use crate::model::response_schema;
use crate::plan_file::PlanFile;
use crate::schedule::{project_due, serialize_instant};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

use super::utils::{print_ledger, resolve_now};

/// Parameters for plan operation
pub struct PlanParams {
    pub plan: PathBuf,
    pub tasks: usize,
    pub now: Option<String>,
    pub json: bool,
}

#[derive(Serialize)]
struct PlanRow {
    id: i64,
    name: String,
    percent: f64,
    eta_days: Option<f64>,
    tasks: usize,
    #[serde(serialize_with = "serialize_instant")]
    due_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct RolePlan {
    total: f64,
    valid: bool,
    rows: Vec<PlanRow>,
}

#[derive(Serialize)]
struct PlanOutput {
    tasks: usize,
    valid: bool,
    annotators: RolePlan,
    reviewers: RolePlan,
    response_schema: Map<String, Value>,
}

fn role_plan(ledger: &Ledger, tasks: usize, now: DateTime<Utc>) -> RolePlan {
    let counts = allocate_counts(ledger.entries(), tasks);
    let rows = ledger
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| (entry, counts.get(i).copied().unwrap_or(0)))
        .map(|(entry, count)| PlanRow {
            id: entry.assignee_id,
            name: entry.name.clone(),
            percent: entry.percent.value(),
            eta_days: entry.eta_days,
            tasks: count,
            due_at: if count > 0 {
                project_due(now, entry.eta_days)
            } else {
                None
            },
        })
        .collect();
    RolePlan {
        total: ledger.total(),
        valid: ledger.is_valid(),
        rows,
    }
}

pub fn handle_plan(params: PlanParams) -> Result<()> {
    let now = resolve_now(params.now.as_deref())?;
    let session = PlanFile::load(&params.plan)
        .and_then(PlanFile::into_session)
        .with_context(|| format!("Failed to load plan {}", params.plan.display()))?;

    if params.json {
        let annotators = role_plan(&session.annotators, params.tasks, now);
        let reviewers = role_plan(&session.reviewers, params.tasks, now);
        let output = PlanOutput {
            tasks: params.tasks,
            valid: annotators.valid && reviewers.valid,
            annotators,
            reviewers,
            response_schema: response_schema(&session.attributes),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "Plan for {} tasks from {}",
        params.tasks.to_string().bold(),
        params.plan.display()
    );
    for ledger in [&session.annotators, &session.reviewers] {
        let counts = allocate_counts(ledger.entries(), params.tasks);
        println!();
        print_ledger(ledger, Some(&counts), now);
    }

    if !session.attributes.is_empty() {
        println!();
        println!("{}", "Label attributes".bold());
        for attribute in &session.attributes {
            println!("  {:<20} {}", attribute.name, attribute.schema_value().dimmed());
        }
    }

    if session.validate().is_err() {
        println!();
        println!(
            "{}",
            "Annotator and Reviewer totals must equal 100% before sending".yellow()
        );
    }
    Ok(())
}
