use crate::model::{
    BatchId, ProjectId, ProjectStatus, TaskId, TaskStatus, UserId, WorkspaceId,
};
use crate::schedule::serialize_instant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub workspace_id: Option<WorkspaceId>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub id: BatchId,
    pub project_id: ProjectId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub batch_id: BatchId,
    pub status: String,
    #[serde(default)]
    pub pipeline_stage: Option<String>,
    #[serde(default)]
    pub claimed_by_id: Option<UserId>,
    #[serde(default)]
    pub assigned_reviewer_id: Option<UserId>,
    #[serde(default)]
    pub due_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProject {
    pub workspace_id: WorkspaceId,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
}

/// Project update sent when the project is activated for annotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ProjectStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Map<String, Value>>,
    pub annotator_ids: Vec<UserId>,
    pub reviewer_ids: Vec<UserId>,
    pub annotator_pct: Vec<f64>,
    pub reviewer_pct: Vec<f64>,
    pub annotator_eta_days: Vec<Option<f64>>,
    pub reviewer_eta_days: Vec<Option<f64>>,
    pub num_annotators: usize,
    pub num_reviewers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBatch {
    pub project_id: ProjectId,
    pub name: String,
}

/// One task payload for bulk creation. The backend stores it as the task content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskItem(pub Map<String, Value>);

impl TaskItem {
    pub fn text(text: impl Into<String>) -> Self {
        let mut content = Map::new();
        content.insert("text".to_string(), Value::String(text.into()));
        Self(content)
    }

    pub fn label(&self) -> Option<&str> {
        self.0
            .get("text")
            .or_else(|| self.0.get("file"))
            .and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkTasks<'a> {
    pub batch_id: BatchId,
    pub items: &'a [TaskItem],
}

/// Partial task update. `status` is omitted when unset; the other fields
/// are always sent, so `null` clears them on the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskPatch {
    pub claimed_by_id: Option<UserId>,
    pub assigned_reviewer_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(serialize_with = "serialize_instant")]
    pub due_at: Option<DateTime<Utc>>,
}
