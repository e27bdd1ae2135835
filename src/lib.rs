//! # Apportion - percentage-based task assignment for annotation projects
//!
//! Splits a pool of annotation tasks across annotators and reviewers
//! according to the share of work each person was given, stamps each task
//! with a due date derived from the assignee's ETA, and pushes the result to
//! the labeling backend.
//!
//! ## Quick Start
//!
//! ```bash
//! # Point the CLI at a backend
//! apportion init --url http://localhost:8000
//!
//! # Preview how 25 tasks would be split
//! apportion plan team.toml --tasks 25
//!
//! # Activate project 12 and assign one task per line of input
//! apportion send team.toml --project 12 --text "$(cat prompts.txt)"
//! ```
//!
//! ## Modules
//!
//! - [`ledger`]: percentage ledgers and the equal split
//! - [`distribute`]: task counts per assignee and the per-task mapping
//! - [`schedule`]: due dates from ETAs
//! - [`session`]: the caller-owned state of one send
//! - [`dispatch`]: the send-for-annotation flow
//! - [`backend`]: the REST backend contract and its clients

/// Command-line interface definitions using clap.
pub mod cli;

/// Configuration loading and management.
///
/// Handles `.apportion.toml` files and their discovery.
pub mod config;

/// Error types and result aliases.
pub mod error;

/// Data models: assignees, assignments, percents and backend vocabulary.
pub mod model;

pub mod backend;
pub mod dispatch;
pub mod distribute;
pub mod items;
pub mod ledger;
pub mod logging;
pub mod plan_file;
pub mod schedule;
pub mod session;

/// Input validation and coercion.
pub mod validation;
