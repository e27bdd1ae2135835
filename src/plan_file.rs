//! Plan files: a session's ledgers written down as TOML, YAML or JSON.
//!
//! ```toml
//! [[annotators]]
//! id = 7
//! name = "Ada"
//! percent = 60.0
//! eta_days = 2.0
//!
//! [[reviewers]]
//! id = 9
//!
//! [[attributes]]
//! name = "animal"
//! type = "single_select"
//! options = "dog,cat,bird"
//! ```
//!
//! Loading selects every listed user (equal split), then applies the given
//! percents as manual edits, clamped to `[0, 100]`. Rows without a percent
//! keep their equal share.

use crate::error::{ApportionError, Result};
use crate::model::{Assignee, LabelAttribute, Role, UserId};
use crate::session::AssignmentSession;
use crate::validation;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanFormat {
    Toml,
    Yaml,
    Json,
}

impl PlanFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "toml" => Ok(PlanFormat::Toml),
            "yaml" | "yml" => Ok(PlanFormat::Yaml),
            "json" => Ok(PlanFormat::Json),
            _ => Err(ApportionError::Parse(format!(
                "Unsupported plan file extension for {} (expected .toml, .yaml, .yml or .json)",
                path.display()
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta_days: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanFile {
    #[serde(default)]
    pub annotators: Vec<PlanEntry>,
    #[serde(default)]
    pub reviewers: Vec<PlanEntry>,
    /// Label attributes published as the project's response schema.
    #[serde(default)]
    pub attributes: Vec<LabelAttribute>,
}

impl PlanFile {
    pub fn load(path: &Path) -> Result<Self> {
        let format = PlanFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, format)
    }

    pub fn parse(content: &str, format: PlanFormat) -> Result<Self> {
        let plan = match format {
            PlanFormat::Toml => toml::from_str(content)?,
            PlanFormat::Yaml => serde_yaml::from_str(content)?,
            PlanFormat::Json => serde_json::from_str(content)?,
        };
        Ok(plan)
    }

    /// Builds a session with both ledgers filled in.
    pub fn into_session(self) -> Result<AssignmentSession> {
        let mut session = AssignmentSession::new();
        apply_entries(&mut session, Role::Annotator, &self.annotators)?;
        apply_entries(&mut session, Role::Reviewer, &self.reviewers)?;

        if self.attributes.iter().any(|a| a.name.trim().is_empty()) {
            return Err(ApportionError::Validation(
                "Attribute name cannot be empty".to_string(),
            ));
        }
        session.attributes = self.attributes;
        Ok(session)
    }
}

fn apply_entries(session: &mut AssignmentSession, role: Role, entries: &[PlanEntry]) -> Result<()> {
    let ids: Vec<UserId> = entries.iter().map(|e| e.id).collect();
    validation::validate_unique_ids(&ids, role)?;

    let selection: Vec<Assignee> = entries
        .iter()
        .map(|e| {
            let name = e.name.clone().unwrap_or_else(|| format!("user {}", e.id));
            Assignee::new(e.id, name, role)
        })
        .collect();

    let ledger = session.ledger_mut(role);
    ledger.set_selection(&selection);

    for (index, entry) in entries.iter().enumerate() {
        if let Some(percent) = entry.percent {
            ledger.update_percent(index, percent)?;
        }
        if let Some(days) = entry.eta_days {
            validation::validate_eta(days)?;
            ledger.update_eta(index, Some(days))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(PlanFormat::from_path(Path::new("a.toml")).unwrap(), PlanFormat::Toml);
        assert_eq!(PlanFormat::from_path(Path::new("a.YML")).unwrap(), PlanFormat::Yaml);
        assert_eq!(PlanFormat::from_path(Path::new("a.json")).unwrap(), PlanFormat::Json);
        assert!(PlanFormat::from_path(Path::new("a.txt")).is_err());
        assert!(PlanFormat::from_path(Path::new("plan")).is_err());
    }

    #[test]
    fn test_toml_with_explicit_percents() {
        let content = r#"
[[annotators]]
id = 1
name = "Ann"
percent = 60.0
eta_days = 2.0

[[annotators]]
id = 2
percent = 40.0

[[reviewers]]
id = 9
name = "Rae"
"#;
        let session = PlanFile::parse(content, PlanFormat::Toml)
            .unwrap()
            .into_session()
            .unwrap();
        let annotators = session.annotators.entries();
        assert_eq!(annotators[0].percent.value(), 60.0);
        assert_eq!(annotators[0].eta_days, Some(2.0));
        assert_eq!(annotators[1].name, "user 2");
        assert_eq!(annotators[1].percent.value(), 40.0);
        assert_eq!(session.reviewers.entries()[0].percent.value(), 100.0);
        assert!(session.validate().is_ok());
    }

    #[test]
    fn test_yaml_without_percents_is_equal_split() {
        let content = "annotators:\n  - id: 1\n  - id: 2\n  - id: 3\n";
        let session = PlanFile::parse(content, PlanFormat::Yaml)
            .unwrap()
            .into_session()
            .unwrap();
        assert_eq!(session.annotators.len(), 3);
        assert!(session.reviewers.is_empty());
        assert!(session.annotators.is_valid());
    }

    #[test]
    fn test_json_partial_percents_can_be_invalid() {
        let content = r#"{"annotators": [{"id": 1, "percent": 90}, {"id": 2}]}"#;
        let session = PlanFile::parse(content, PlanFormat::Json)
            .unwrap()
            .into_session()
            .unwrap();
        assert!(!session.annotators.is_valid());
        assert!(session.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_rows() {
        let dup = r#"{"reviewers": [{"id": 1}, {"id": 1}]}"#;
        assert!(
            PlanFile::parse(dup, PlanFormat::Json)
                .unwrap()
                .into_session()
                .is_err()
        );

        let unnamed = r#"{"attributes": [{"name": " ", "type": "checkbox"}]}"#;
        assert!(
            PlanFile::parse(unnamed, PlanFormat::Json)
                .unwrap()
                .into_session()
                .is_err()
        );

        let eta = r#"{"annotators": [{"id": 1, "eta_days": -2}]}"#;
        assert!(
            PlanFile::parse(eta, PlanFormat::Json)
                .unwrap()
                .into_session()
                .is_err()
        );
    }

    #[test]
    fn test_out_of_range_percents_are_clamped() {
        let content = r#"{"annotators": [{"id": 1, "percent": 150}, {"id": 2, "percent": -5}]}"#;
        let session = PlanFile::parse(content, PlanFormat::Json)
            .unwrap()
            .into_session()
            .unwrap();
        let annotators = session.annotators.entries();
        assert_eq!(annotators[0].percent.value(), 100.0);
        assert_eq!(annotators[1].percent.value(), 0.0);
        assert!(session.validate().is_ok());
    }

    #[test]
    fn test_attributes_become_response_schema() {
        let content = r#"
[[annotators]]
id = 1

[[attributes]]
name = "animal_name"
type = "single_select"
options = "dog,cat,bird"

[[attributes]]
name = "labels"
type = "multi_select"

[[attributes]]
name = "description"
"#;
        let session = PlanFile::parse(content, PlanFormat::Toml)
            .unwrap()
            .into_session()
            .unwrap();
        assert_eq!(session.attributes.len(), 3);

        let schema = session.project_patch(None, None).response_schema.unwrap();
        assert_eq!(schema["animal_name"], "dog,cat,bird");
        assert_eq!(schema["labels"], "multi_select:");
        assert_eq!(schema["description"], "free_text");
    }
}
