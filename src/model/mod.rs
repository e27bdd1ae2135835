//! Data models for assignment.
//!
//! - [`Assignee`]: a person eligible for annotation or review work
//! - [`Assignment`]: one row of a percentage ledger
//! - [`Percent`]: a share in `[0, 100]`
//! - [`LabelAttribute`]: a field of the project's response schema
//! - [`Role`], [`TaskStatus`], [`ProjectStatus`]: backend vocabulary

mod assignee;
mod attribute;
mod percent;
mod types;

pub use assignee::{Assignee, Assignment, UserId};
pub use attribute::{AttributeKind, LabelAttribute, response_schema};
pub use percent::Percent;
pub use types::{ProjectStatus, Role, TaskStatus};

pub type ProjectId = i64;
pub type BatchId = i64;
pub type TaskId = i64;
pub type WorkspaceId = i64;
