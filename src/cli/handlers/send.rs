use crate::backend::{Backend, MemoryBackend, TaskItem};
use crate::dispatch::{DispatchReport, ProjectTarget, send_for_annotation};
use crate::items::{items_from_json_file, items_from_text, items_or_samples};
use crate::model::{ProjectId, WorkspaceId};
use crate::plan_file::PlanFile;
use crate::schedule::format_instant;
use crate::validation;
use anyhow::{Context, Result, bail};
use chrono::Utc;
use colored::Colorize;
use std::path::PathBuf;

use super::CommandContext;
use super::utils::resolve_text;

/// Parameters for send operation
pub struct SendParams {
    pub plan: PathBuf,
    pub project: Option<ProjectId>,
    pub workspace: Option<WorkspaceId>,
    pub name: Option<String>,
    pub description: String,
    pub text: Option<String>,
    pub items_file: Option<PathBuf>,
    pub batch_name: Option<String>,
    pub no_workflow: bool,
    pub dry_run: bool,
    pub json: bool,
}

fn resolve_target(params: &SendParams) -> Result<ProjectTarget> {
    if let Some(id) = params.project {
        return Ok(ProjectTarget::Existing(id));
    }
    match (params.workspace, &params.name) {
        (Some(workspace_id), Some(name)) => {
            let name = name.trim().to_string();
            validation::validate_project_name(&name)?;
            validation::validate_description(&params.description)?;
            Ok(ProjectTarget::New {
                workspace_id,
                name,
                description: params.description.clone(),
            })
        }
        _ => bail!("Either --project or both --workspace and --name are required"),
    }
}

fn resolve_items(ctx: &CommandContext, params: &SendParams) -> Result<Vec<TaskItem>> {
    let items = if let Some(ref path) = params.items_file {
        items_from_json_file(path)
            .with_context(|| format!("Failed to read items from {}", path.display()))?
    } else {
        resolve_text(params.text.clone())?
            .map(|text| items_from_text(&text))
            .unwrap_or_default()
    };
    Ok(items_or_samples(items, &ctx.config.dispatch.sample_tasks))
}

pub fn handle_send(ctx: &CommandContext, params: SendParams) -> Result<()> {
    let mut session = PlanFile::load(&params.plan)
        .and_then(PlanFile::into_session)
        .with_context(|| format!("Failed to load plan {}", params.plan.display()))?;
    let target = resolve_target(&params)?;
    let items = resolve_items(ctx, &params)?;

    let mut options = ctx.config.dispatch.options();
    if let Some(ref name) = params.batch_name {
        options.batch_name = name.clone();
    }
    if params.no_workflow {
        options.create_default_workflow = false;
    }

    let backend: Box<dyn Backend> = if params.dry_run {
        tracing::info!("Dry run against an in-memory backend");
        match target {
            ProjectTarget::Existing(id) => {
                Box::new(MemoryBackend::new().with_project(id, &format!("Project {}", id)))
            }
            ProjectTarget::New { .. } => Box::new(MemoryBackend::new()),
        }
    } else {
        Box::new(ctx.http_backend()?)
    };

    let report = send_for_annotation(
        backend.as_ref(),
        &mut session,
        target,
        &items,
        &options,
        Utc::now(),
    )?;

    if params.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, params.dry_run, options.create_default_workflow);
    }

    if !report.is_complete() {
        bail!(
            "{} of {} task assignments failed",
            report.failures.len(),
            report.task_count()
        );
    }
    Ok(())
}

fn print_report(report: &DispatchReport, dry_run: bool, workflow_requested: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    println!(
        "{}{} {} tasks to project {} (batch {})",
        prefix.dimmed(),
        "Sent".green(),
        report.applied(),
        format!("#{}", report.project_id).cyan(),
        report.batch_id
    );

    for assignment in &report.assignments {
        let annotator = assignment
            .annotator_id
            .map(|id| format!("#{}", id))
            .unwrap_or_else(|| "-".to_string());
        let reviewer = assignment
            .reviewer_id
            .map(|id| format!("#{}", id))
            .unwrap_or_else(|| "-".to_string());
        let due = assignment
            .due_at
            .as_ref()
            .map(format_instant)
            .unwrap_or_else(|| "no due date".to_string());
        println!(
            "  task {}  annotator {}  reviewer {}  {}",
            assignment.task_id,
            annotator,
            reviewer,
            due.dimmed()
        );
    }

    for failure in &report.failures {
        println!(
            "  {} task {}: {}",
            "failed".red(),
            failure.task_id,
            failure.message
        );
    }

    if workflow_requested && !report.workflow_created {
        println!("{}", "Default workflow was not created".yellow());
    }
}
