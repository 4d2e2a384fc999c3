//! Case metadata attached to a sketch session.
//!
//! These fields are free-form bookkeeping for the investigating officer; the
//! renderer never consumes them, but the project and metadata documents do.

use serde::{Deserialize, Serialize};

/// Case priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// Case workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseStatus {
    #[default]
    Draft,
    InProgress,
    Review,
    Completed,
}

/// Free-form case information.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseInfo {
    pub case_number: String,
    /// ISO date string, filled in by the shell.
    pub date: String,
    pub officer: String,
    pub description: String,
    pub witness: String,
    pub priority: Priority,
    pub status: CaseStatus,
}
