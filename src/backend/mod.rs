//! The REST backend that owns users, projects, batches and tasks.
//!
//! [`Backend`] is the contract the dispatcher calls into. Two implementations
//! ship with the crate:
//!
//! - [`HttpBackend`]: blocking JSON client for the real service
//! - [`MemoryBackend`]: in-process stand-in used for dry runs and tests

mod http;
mod memory;
mod payloads;

pub use http::{HttpBackend, error_message};
pub use memory::MemoryBackend;
pub use payloads::{
    BatchRecord, BulkTasks, NewBatch, NewProject, ProjectPatch, ProjectRecord, TaskItem,
    TaskPatch, TaskRecord, UserRecord,
};

use crate::error::Result;
use crate::model::{BatchId, ProjectId, Role, TaskId};

pub trait Backend {
    /// Active users holding `role`.
    fn users_by_role(&self, role: Role) -> Result<Vec<UserRecord>>;

    fn create_project(&self, project: &NewProject) -> Result<ProjectRecord>;

    fn patch_project(&self, id: ProjectId, patch: &ProjectPatch) -> Result<ProjectRecord>;

    fn create_batch(&self, batch: &NewBatch) -> Result<BatchRecord>;

    /// Creates one task per item. The returned tasks are in item order.
    fn bulk_create_tasks(&self, batch_id: BatchId, items: &[TaskItem]) -> Result<Vec<TaskRecord>>;

    fn patch_task(&self, id: TaskId, patch: &TaskPatch) -> Result<TaskRecord>;

    fn create_default_workflow(&self, project_id: ProjectId) -> Result<()>;
}
