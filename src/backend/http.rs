use super::payloads::{
    BatchRecord, BulkTasks, NewBatch, NewProject, ProjectPatch, ProjectRecord, TaskItem,
    TaskPatch, TaskRecord, UserRecord,
};
use super::Backend;
use crate::error::{ApportionError, Result};
use crate::model::{BatchId, ProjectId, Role, TaskId};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Once;
use std::time::Duration;
use url::Url;

static CRYPTO_PROVIDER: Once = Once::new();

fn install_crypto_provider() {
    CRYPTO_PROVIDER.call_once(|| {
        // Fails only if another provider was installed first, which is fine.
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Blocking JSON client for the annotation backend.
pub struct HttpBackend {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        install_crypto_provider();

        let mut base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(ApportionError::Config(format!(
                "Backend URL cannot be used as a base: {}",
                base_url
            )));
        }
        // Url::join replaces the last segment unless the path ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send()?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApportionError::Unauthorized);
        }

        let body = response.text()?;
        if !status.is_success() {
            let message = error_message(&body, status.canonical_reason());
            tracing::debug!(status = status.as_u16(), %message, "Backend request failed");
            return Err(ApportionError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let body = if body.trim().is_empty() { "null" } else { &body };
        Ok(serde_json::from_str(body)?)
    }
}

const FALLBACK_MESSAGE: &str = "Request failed";

/// Human-readable message for a failed response.
///
/// JSON bodies are searched for `{"detail": "..."}`, then
/// `{"detail": [{"msg": "..."}, ...]}`, then `{"message": "..."}`, then the
/// status reason. A body that is not JSON is used as-is. An empty body gives
/// the status reason.
pub fn error_message(body: &str, reason: Option<&str>) -> String {
    let body = body.trim();
    if body.is_empty() {
        return reason.unwrap_or(FALLBACK_MESSAGE).to_string();
    }
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };

    let message = match value.get("detail") {
        Some(Value::Array(items)) => detail_list_message(items),
        Some(Value::String(detail)) => detail.clone(),
        _ => value
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .or(reason)
            .unwrap_or_default()
            .to_string(),
    };

    if message.is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        message
    }
}

fn item_msg(item: &Value) -> Option<&str> {
    item.get("msg").and_then(Value::as_str).filter(|m| !m.is_empty())
}

/// First `msg` of a validation error list, or every entry joined.
fn detail_list_message(items: &[Value]) -> String {
    if let Some(first) = items.first().and_then(item_msg) {
        return first.to_string();
    }
    items
        .iter()
        .map(|item| match (item_msg(item), item) {
            (Some(msg), _) => msg.to_string(),
            (None, Value::String(s)) => s.clone(),
            (None, other) => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl Backend for HttpBackend {
    fn users_by_role(&self, role: Role) -> Result<Vec<UserRecord>> {
        let mut url = self.url("users/by-role")?;
        url.query_pairs_mut().append_pair("role", role.as_str());
        self.send(self.request(Method::GET, url))
    }

    fn create_project(&self, project: &NewProject) -> Result<ProjectRecord> {
        let url = self.url("projects")?;
        self.send(self.request(Method::POST, url).json(project))
    }

    fn patch_project(&self, id: ProjectId, patch: &ProjectPatch) -> Result<ProjectRecord> {
        let url = self.url(&format!("projects/{}", id))?;
        self.send(self.request(Method::PATCH, url).json(patch))
    }

    fn create_batch(&self, batch: &NewBatch) -> Result<BatchRecord> {
        let url = self.url("batches")?;
        self.send(self.request(Method::POST, url).json(batch))
    }

    fn bulk_create_tasks(&self, batch_id: BatchId, items: &[TaskItem]) -> Result<Vec<TaskRecord>> {
        let url = self.url("tasks/bulk")?;
        let body = BulkTasks { batch_id, items };
        self.send(self.request(Method::POST, url).json(&body))
    }

    fn patch_task(&self, id: TaskId, patch: &TaskPatch) -> Result<TaskRecord> {
        let url = self.url(&format!("tasks/{}", id))?;
        self.send(self.request(Method::PATCH, url).json(patch))
    }

    fn create_default_workflow(&self, project_id: ProjectId) -> Result<()> {
        let url = self.url(&format!("projects/{}/create-default-workflow", project_id))?;
        let _: Value = self.send(self.request(Method::POST, url))?;
        Ok(())
    }
}
