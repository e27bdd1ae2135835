use super::percent::Percent;
use super::types::Role;
use crate::backend::UserRecord;
use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// A person eligible for work. Owned by the backend's user directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: UserId,
    pub display_name: String,
    pub role: Role,
}

impl Assignee {
    pub fn new(id: UserId, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            role,
        }
    }

    /// Builds an assignee from a backend user record.
    ///
    /// The display name prefers `full_name`, then the non-blank parts of
    /// `first_name last_name`, then the email address.
    pub fn from_user(user: &UserRecord, role: Role) -> Self {
        Self::new(user.id, display_name_for(user), role)
    }
}

fn display_name_for(user: &UserRecord) -> String {
    let full = user.full_name.as_deref().map(str::trim).unwrap_or("");
    if !full.is_empty() {
        return full.to_string();
    }

    let joined = [user.first_name.as_deref(), user.last_name.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if !joined.is_empty() {
        return joined;
    }

    user.email.trim().to_string()
}

/// One row of a percentage ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub assignee_id: UserId,
    pub name: String,
    pub percent: Percent,
    #[serde(default)]
    pub eta_days: Option<f64>,
}

impl Assignment {
    pub fn new(assignee: &Assignee, percent: Percent) -> Self {
        Self {
            assignee_id: assignee.id,
            name: assignee.display_name.clone(),
            percent,
            eta_days: None,
        }
    }

    pub fn with_eta(mut self, eta_days: Option<f64>) -> Self {
        self.eta_days = eta_days;
        self
    }
}
