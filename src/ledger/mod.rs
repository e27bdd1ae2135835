//! Percentage ledgers.
//!
//! A [`Ledger`] holds the assignees of one role together with their share of
//! the work and an optional turnaround estimate. Selecting assignees always
//! produces an equal split (see [`equal_split`]); manual edits change a single
//! row and may leave the ledger invalid until the user fixes the total.

mod pool;

pub use pool::{build_assignments, equal_split, reequalize};

use crate::error::{ApportionError, Result};
use crate::model::{Assignee, Assignment, Percent, Role, UserId};
use serde::{Deserialize, Serialize};

/// Allowed deviation of a ledger's total from 100%.
pub const PERCENT_TOLERANCE: f64 = 0.02;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    role: Role,
    entries: Vec<Assignment>,
}

/// Flat per-field view of a ledger, in ledger order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LedgerArrays {
    pub ids: Vec<UserId>,
    pub percents: Vec<f64>,
    pub eta_days: Vec<Option<f64>>,
}

impl Ledger {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            entries: Vec::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn entries(&self) -> &[Assignment] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces the whole ledger with the given selection, split equally.
    pub fn set_selection(&mut self, selected: &[Assignee]) {
        self.entries = build_assignments(selected, &self.entries);
        tracing::debug!(role = %self.role, count = self.entries.len(), "Selection replaced");
    }

    /// Sets one row's percent, clamped to `[0, 100]`. Other rows are untouched.
    pub fn update_percent(&mut self, index: usize, value: f64) -> Result<()> {
        let entry = self.entry_mut(index)?;
        entry.percent = Percent::clamped(value);
        Ok(())
    }

    /// Sets or clears one row's ETA. Negative values clamp to 0.
    pub fn update_eta(&mut self, index: usize, value: Option<f64>) -> Result<()> {
        let entry = self.entry_mut(index)?;
        entry.eta_days = value.map(|days| if days.is_nan() { 0.0 } else { days.max(0.0) });
        Ok(())
    }

    /// Removes a row and re-equalizes the remaining ones.
    pub fn remove(&mut self, index: usize) -> Result<Assignment> {
        if index >= self.entries.len() {
            return Err(ApportionError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        let removed = self.entries.remove(index);
        reequalize(&mut self.entries);
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|a| a.percent.value()).sum()
    }

    /// An empty ledger is valid; otherwise the total must be 100 within tolerance.
    pub fn is_valid(&self) -> bool {
        self.entries.is_empty() || (self.total() - 100.0).abs() < PERCENT_TOLERANCE
    }

    pub fn arrays(&self) -> LedgerArrays {
        LedgerArrays {
            ids: self.entries.iter().map(|a| a.assignee_id).collect(),
            percents: self.entries.iter().map(|a| a.percent.value()).collect(),
            eta_days: self.entries.iter().map(|a| a.eta_days).collect(),
        }
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut Assignment> {
        let len = self.entries.len();
        self.entries
            .get_mut(index)
            .ok_or(ApportionError::IndexOutOfRange { index, len })
    }
}
