//! "Send for annotation": activate a project, create its tasks and assign them.
//!
//! The steps run in order and the first three are all-or-nothing:
//!
//! 1. both ledgers are validated; nothing is sent if either total is off
//! 2. the project is created (if needed) and patched with the ledgers
//! 3. a batch is created and its tasks bulk-created
//! 4. every task gets its annotator, reviewer, status and due date
//! 5. the default workflow is requested
//!
//! Step 4 is best effort. A rejected task update is logged, recorded in the
//! [`DispatchReport`] and the loop moves on. Tasks created in step 3 are never
//! rolled back. Nothing is retried.

use crate::backend::{Backend, NewBatch, NewProject, TaskItem, TaskPatch, TaskRecord};
use crate::distribute::distribute;
use crate::error::{ApportionError, Result};
use crate::model::{BatchId, ProjectId, ProjectStatus, TaskId, TaskStatus, UserId, WorkspaceId};
use crate::schedule::{project_due, serialize_instant};
use crate::session::AssignmentSession;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const DEFAULT_BATCH_NAME: &str = "Batch 1";

/// Where the dispatch lands.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectTarget {
    Existing(ProjectId),
    New {
        workspace_id: WorkspaceId,
        name: String,
        description: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOptions {
    pub batch_name: String,
    pub create_default_workflow: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            batch_name: DEFAULT_BATCH_NAME.to_string(),
            create_default_workflow: true,
        }
    }
}

/// The assignment computed for one task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskAssignment {
    pub task_id: TaskId,
    pub annotator_id: Option<UserId>,
    pub reviewer_id: Option<UserId>,
    #[serde(serialize_with = "serialize_instant")]
    pub due_at: Option<DateTime<Utc>>,
}

impl TaskAssignment {
    /// Tasks with an annotator move to in-progress; others keep their status.
    pub fn patch(&self) -> TaskPatch {
        TaskPatch {
            claimed_by_id: self.annotator_id,
            assigned_reviewer_id: self.reviewer_id,
            status: self.annotator_id.map(|_| TaskStatus::InProgress),
            due_at: self.due_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskFailure {
    pub task_id: TaskId,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchReport {
    pub project_id: ProjectId,
    pub batch_id: BatchId,
    pub assignments: Vec<TaskAssignment>,
    pub failures: Vec<TaskFailure>,
    pub workflow_created: bool,
}

impl DispatchReport {
    pub fn task_count(&self) -> usize {
        self.assignments.len()
    }

    pub fn applied(&self) -> usize {
        self.assignments.len() - self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Computes the assignment of every task without touching the backend.
///
/// `task_ids` must be in creation order. Annotator and reviewer ledgers are
/// distributed independently; only the annotator's ETA sets the due date.
pub fn plan_assignments(
    session: &AssignmentSession,
    task_ids: &[TaskId],
    now: DateTime<Utc>,
) -> Vec<TaskAssignment> {
    let annotators = session.annotators.entries();
    let reviewers = session.reviewers.entries();
    let annotator_dist = distribute(annotators, task_ids.len());
    let reviewer_dist = distribute(reviewers, task_ids.len());

    task_ids
        .iter()
        .enumerate()
        .map(|(i, &task_id)| {
            let annotator = annotator_dist.get(i).map(|&idx| &annotators[idx]);
            let reviewer = reviewer_dist.get(i).map(|&idx| &reviewers[idx]);
            TaskAssignment {
                task_id,
                annotator_id: annotator.map(|a| a.assignee_id),
                reviewer_id: reviewer.map(|r| r.assignee_id),
                due_at: project_due(now, annotator.and_then(|a| a.eta_days)),
            }
        })
        .collect()
}

/// Runs the whole send-for-annotation flow against `backend`.
pub fn send_for_annotation<B: Backend + ?Sized>(
    backend: &B,
    session: &mut AssignmentSession,
    target: ProjectTarget,
    items: &[TaskItem],
    options: &DispatchOptions,
    now: DateTime<Utc>,
) -> Result<DispatchReport> {
    session.validate()?;

    let (project_id, name, description) = match target {
        ProjectTarget::Existing(id) => (id, None, None),
        ProjectTarget::New {
            workspace_id,
            name,
            description,
        } => {
            let project = backend.create_project(&NewProject {
                workspace_id,
                name: name.clone(),
                description: description.clone(),
                status: ProjectStatus::Draft,
            })?;
            tracing::info!(project_id = project.id, name = %project.name, "Created project");
            (project.id, Some(name), Some(description))
        }
    };
    session.project_id = Some(project_id);

    backend.patch_project(project_id, &session.project_patch(name, description))?;
    tracing::info!(
        project_id,
        annotators = session.annotators.len(),
        reviewers = session.reviewers.len(),
        "Project activated"
    );

    let batch = backend.create_batch(&NewBatch {
        project_id,
        name: options.batch_name.clone(),
    })?;

    let tasks: Vec<TaskRecord> = backend
        .bulk_create_tasks(batch.id, items)
        .map_err(|e| ApportionError::BulkCreate(e.to_string()))?;
    if tasks.len() != items.len() {
        tracing::warn!(
            requested = items.len(),
            created = tasks.len(),
            "Backend created a different number of tasks than requested"
        );
    }
    tracing::info!(batch_id = batch.id, tasks = tasks.len(), "Tasks created");

    let task_ids: Vec<TaskId> = tasks.iter().map(|t| t.id).collect();
    let assignments = plan_assignments(session, &task_ids, now);

    let mut failures = Vec::new();
    for assignment in &assignments {
        if let Err(e) = backend.patch_task(assignment.task_id, &assignment.patch()) {
            tracing::warn!(task_id = assignment.task_id, error = %e, "Task assignment failed");
            failures.push(TaskFailure {
                task_id: assignment.task_id,
                message: e.to_string(),
            });
        }
    }

    let workflow_created = if options.create_default_workflow {
        match backend.create_default_workflow(project_id) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(project_id, error = %e, "Default workflow not created");
                false
            }
        }
    } else {
        false
    };

    tracing::info!(
        project_id,
        batch_id = batch.id,
        assigned = assignments.len() - failures.len(),
        failed = failures.len(),
        "Dispatch finished"
    );

    Ok(DispatchReport {
        project_id,
        batch_id: batch.id,
        assignments,
        failures,
        workflow_created,
    })
}
