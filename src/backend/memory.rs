use super::payloads::{
    BatchRecord, NewBatch, NewProject, ProjectPatch, ProjectRecord, TaskItem, TaskPatch,
    TaskRecord, UserRecord,
};
use super::Backend;
use crate::error::{ApportionError, Result};
use crate::model::{BatchId, ProjectId, ProjectStatus, Role, TaskId, TaskStatus};
use crate::schedule::format_instant;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};

#[derive(Default)]
struct MemoryState {
    users: Vec<UserRecord>,
    projects: BTreeMap<ProjectId, ProjectRecord>,
    project_patches: Vec<(ProjectId, ProjectPatch)>,
    batches: Vec<BatchRecord>,
    tasks: BTreeMap<TaskId, TaskRecord>,
    workflows: Vec<ProjectId>,
    next_id: i64,
    failing_tasks: HashSet<TaskId>,
    bulk_failure: Option<String>,
    workflow_failure: Option<String>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process backend. Keeps everything in memory and can be told to fail
/// specific calls.
#[derive(Default)]
pub struct MemoryBackend {
    state: RefCell<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(self, users: Vec<UserRecord>) -> Self {
        self.state.borrow_mut().users = users;
        self
    }

    /// Registers an existing project so it can be patched.
    pub fn with_project(self, id: ProjectId, name: &str) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.projects.insert(
                id,
                ProjectRecord {
                    id,
                    name: name.to_string(),
                    workspace_id: None,
                    status: Some(ProjectStatus::Draft.to_string()),
                },
            );
            state.next_id = state.next_id.max(id);
        }
        self
    }

    /// Makes `patch_task` fail for the given task id.
    pub fn fail_task(&self, id: TaskId) {
        self.state.borrow_mut().failing_tasks.insert(id);
    }

    pub fn fail_bulk_create(&self, message: &str) {
        self.state.borrow_mut().bulk_failure = Some(message.to_string());
    }

    pub fn fail_workflow(&self, message: &str) {
        self.state.borrow_mut().workflow_failure = Some(message.to_string());
    }

    pub fn project(&self, id: ProjectId) -> Option<ProjectRecord> {
        self.state.borrow().projects.get(&id).cloned()
    }

    pub fn project_patches(&self) -> Vec<(ProjectId, ProjectPatch)> {
        self.state.borrow().project_patches.clone()
    }

    pub fn batches(&self) -> Vec<BatchRecord> {
        self.state.borrow().batches.clone()
    }

    /// All tasks, ordered by id.
    pub fn tasks(&self) -> Vec<TaskRecord> {
        self.state.borrow().tasks.values().cloned().collect()
    }

    pub fn workflows(&self) -> Vec<ProjectId> {
        self.state.borrow().workflows.clone()
    }
}

fn not_found(what: &str, id: i64) -> ApportionError {
    ApportionError::Backend {
        status: 404,
        message: format!("{} {} not found", what, id),
    }
}

impl Backend for MemoryBackend {
    fn users_by_role(&self, role: Role) -> Result<Vec<UserRecord>> {
        Ok(self
            .state
            .borrow()
            .users
            .iter()
            .filter(|u| u.role == role.as_str())
            .cloned()
            .collect())
    }

    fn create_project(&self, project: &NewProject) -> Result<ProjectRecord> {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        let record = ProjectRecord {
            id,
            name: project.name.clone(),
            workspace_id: Some(project.workspace_id),
            status: Some(project.status.to_string()),
        };
        state.projects.insert(id, record.clone());
        Ok(record)
    }

    fn patch_project(&self, id: ProjectId, patch: &ProjectPatch) -> Result<ProjectRecord> {
        let mut state = self.state.borrow_mut();
        let record = state
            .projects
            .get_mut(&id)
            .ok_or_else(|| not_found("Project", id))?;
        if let Some(name) = &patch.name {
            record.name = name.clone();
        }
        record.status = Some(patch.status.to_string());
        let record = record.clone();
        state.project_patches.push((id, patch.clone()));
        Ok(record)
    }

    fn create_batch(&self, batch: &NewBatch) -> Result<BatchRecord> {
        let mut state = self.state.borrow_mut();
        if !state.projects.contains_key(&batch.project_id) {
            return Err(not_found("Project", batch.project_id));
        }
        let id = state.next_id();
        let record = BatchRecord {
            id,
            project_id: batch.project_id,
            name: batch.name.clone(),
        };
        state.batches.push(record.clone());
        Ok(record)
    }

    fn bulk_create_tasks(&self, batch_id: BatchId, items: &[TaskItem]) -> Result<Vec<TaskRecord>> {
        let mut state = self.state.borrow_mut();
        if let Some(message) = &state.bulk_failure {
            return Err(ApportionError::Backend {
                status: 500,
                message: message.clone(),
            });
        }
        if !state.batches.iter().any(|b| b.id == batch_id) {
            return Err(not_found("Batch", batch_id));
        }

        let mut created = Vec::with_capacity(items.len());
        for _ in items {
            let id = state.next_id();
            let task = TaskRecord {
                id,
                batch_id,
                status: TaskStatus::Pending.to_string(),
                pipeline_stage: Some("L1".to_string()),
                claimed_by_id: None,
                assigned_reviewer_id: None,
                due_at: None,
            };
            state.tasks.insert(id, task.clone());
            created.push(task);
        }
        Ok(created)
    }

    fn patch_task(&self, id: TaskId, patch: &TaskPatch) -> Result<TaskRecord> {
        let mut state = self.state.borrow_mut();
        if state.failing_tasks.contains(&id) {
            return Err(ApportionError::Backend {
                status: 503,
                message: format!("Task {} update rejected", id),
            });
        }
        let task = state
            .tasks
            .get_mut(&id)
            .ok_or_else(|| not_found("Task", id))?;
        task.claimed_by_id = patch.claimed_by_id;
        task.assigned_reviewer_id = patch.assigned_reviewer_id;
        if let Some(status) = patch.status {
            task.status = status.to_string();
        }
        task.due_at = patch.due_at.as_ref().map(format_instant);
        Ok(task.clone())
    }

    fn create_default_workflow(&self, project_id: ProjectId) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if let Some(message) = &state.workflow_failure {
            return Err(ApportionError::Backend {
                status: 500,
                message: message.clone(),
            });
        }
        state.workflows.push(project_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_create_preserves_item_order() {
        let backend = MemoryBackend::new().with_project(1, "p");
        let batch = backend
            .create_batch(&NewBatch {
                project_id: 1,
                name: "Batch 1".to_string(),
            })
            .unwrap();
        let items = vec![TaskItem::text("a"), TaskItem::text("b"), TaskItem::text("c")];
        let tasks = backend.bulk_create_tasks(batch.id, &items).unwrap();
        let ids: Vec<_> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(tasks.len(), 3);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert!(tasks.iter().all(|t| t.status == "pending"));
    }

    #[test]
    fn test_users_filtered_by_role() {
        let user = |id, role: &str| UserRecord {
            id,
            email: format!("u{}@example.com", id),
            first_name: None,
            last_name: None,
            full_name: None,
            role: role.to_string(),
        };
        let backend =
            MemoryBackend::new().with_users(vec![user(1, "annotator"), user(2, "reviewer")]);
        let reviewers = backend.users_by_role(Role::Reviewer).unwrap();
        assert_eq!(reviewers.len(), 1);
        assert_eq!(reviewers[0].id, 2);
    }

    #[test]
    fn test_failing_task_patch() {
        let backend = MemoryBackend::new();
        backend.fail_task(5);
        let err = backend.patch_task(5, &TaskPatch::default()).unwrap_err();
        assert!(matches!(err, ApportionError::Backend { status: 503, .. }));
    }

    #[test]
    fn test_batch_requires_project() {
        let backend = MemoryBackend::new();
        let err = backend
            .create_batch(&NewBatch {
                project_id: 42,
                name: "Batch 1".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, ApportionError::Backend { status: 404, .. }));
    }
}
