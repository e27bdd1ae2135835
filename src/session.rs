//! Caller-owned state for one "send for annotation" session.

use crate::backend::ProjectPatch;
use crate::error::{ApportionError, Result};
use crate::ledger::Ledger;
use crate::model::{LabelAttribute, ProjectId, ProjectStatus, Role, response_schema};

/// The two ledgers of a project-creation session, the label attributes to
/// publish with it, and the project they belong to once it exists.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentSession {
    pub project_id: Option<ProjectId>,
    pub annotators: Ledger,
    pub reviewers: Ledger,
    pub attributes: Vec<LabelAttribute>,
}

impl Default for AssignmentSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AssignmentSession {
    pub fn new() -> Self {
        Self {
            project_id: None,
            annotators: Ledger::new(Role::Annotator),
            reviewers: Ledger::new(Role::Reviewer),
            attributes: Vec::new(),
        }
    }

    pub fn ledger_mut(&mut self, role: Role) -> &mut Ledger {
        match role {
            Role::Annotator => &mut self.annotators,
            Role::Reviewer => &mut self.reviewers,
        }
    }

    /// Gate for sending: both ledgers must be empty or total 100%.
    pub fn validate(&self) -> Result<()> {
        if self.annotators.is_valid() && self.reviewers.is_valid() {
            return Ok(());
        }
        tracing::debug!(
            annotator_total = self.annotators.total(),
            reviewer_total = self.reviewers.total(),
            "Ledger totals rejected"
        );
        Err(ApportionError::Validation(
            "Annotator and Reviewer totals must equal 100%".to_string(),
        ))
    }

    /// Project update that activates the project with both ledgers attached.
    ///
    /// Reviewer ETAs are stored with the project but no review due date is
    /// derived from them. The response schema is only sent when the session
    /// carries label attributes, so an existing schema is left alone otherwise.
    pub fn project_patch(&self, name: Option<String>, description: Option<String>) -> ProjectPatch {
        let annotators = self.annotators.arrays();
        let reviewers = self.reviewers.arrays();
        ProjectPatch {
            name,
            description,
            status: ProjectStatus::Active,
            response_schema: (!self.attributes.is_empty())
                .then(|| response_schema(&self.attributes)),
            num_annotators: annotators.ids.len(),
            num_reviewers: reviewers.ids.len(),
            annotator_ids: annotators.ids,
            reviewer_ids: reviewers.ids,
            annotator_pct: annotators.percents,
            reviewer_pct: reviewers.percents,
            annotator_eta_days: annotators.eta_days,
            reviewer_eta_days: reviewers.eta_days,
        }
    }

    /// Drops both ledgers and the attributes, and forgets the project.
    pub fn reset(&mut self) {
        self.project_id = None;
        self.annotators.clear();
        self.reviewers.clear();
        self.attributes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Assignee, AttributeKind};

    fn session() -> AssignmentSession {
        let mut session = AssignmentSession::new();
        session.annotators.set_selection(&[
            Assignee::new(1, "Ann", Role::Annotator),
            Assignee::new(2, "Bo", Role::Annotator),
        ]);
        session
            .reviewers
            .set_selection(&[Assignee::new(9, "Rae", Role::Reviewer)]);
        session
    }

    #[test]
    fn test_validate_passes_for_equal_split() {
        assert!(session().validate().is_ok());
        assert!(AssignmentSession::new().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_total() {
        let mut s = session();
        s.ledger_mut(Role::Reviewer).update_percent(0, 80.0).unwrap();
        let err = s.validate().unwrap_err();
        assert!(err.to_string().contains("must equal 100%"));
    }

    #[test]
    fn test_project_patch_flattens_ledgers() {
        let mut s = session();
        s.annotators.update_eta(1, Some(2.5)).unwrap();
        s.reviewers.update_eta(0, Some(1.0)).unwrap();

        let patch = s.project_patch(Some("Birds".to_string()), None);
        assert_eq!(patch.status, ProjectStatus::Active);
        assert_eq!(patch.annotator_ids, vec![1, 2]);
        assert_eq!(patch.annotator_pct, vec![50.0, 50.0]);
        assert_eq!(patch.annotator_eta_days, vec![None, Some(2.5)]);
        assert_eq!(patch.reviewer_ids, vec![9]);
        assert_eq!(patch.reviewer_eta_days, vec![Some(1.0)]);
        assert_eq!(patch.num_annotators, 2);
        assert_eq!(patch.num_reviewers, 1);
        assert_eq!(patch.response_schema, None);
    }

    #[test]
    fn test_project_patch_carries_response_schema() {
        let mut s = session();
        s.attributes = vec![
            LabelAttribute::new("animal", AttributeKind::SingleSelect).with_options("dog,cat"),
            LabelAttribute::new("tags", AttributeKind::MultiSelect).with_options("fur,scales"),
            LabelAttribute::new("notes", AttributeKind::FreeText),
        ];

        let patch = s.project_patch(None, None);
        let schema = patch.response_schema.unwrap();
        assert_eq!(schema["animal"], "dog,cat");
        assert_eq!(schema["tags"], "multi_select:fur,scales");
        assert_eq!(schema["notes"], "free_text");
    }

    #[test]
    fn test_reset() {
        let mut s = session();
        s.project_id = Some(4);
        s.attributes = vec![LabelAttribute::new("notes", AttributeKind::Textarea)];
        s.reset();
        assert_eq!(s, AssignmentSession::new());
    }
}
