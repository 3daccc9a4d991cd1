use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timetable::ClassFilter;

/// What happens when requests overlap and settle out of order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrdering {
    #[default]
    LastSettledWins,     // every response applies in the order it settles
    LatestRequestWins,   // responses from superseded requests are dropped
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Nothing loaded yet
    Idle,
    /// At least one request in flight; earlier data stays visible
    Loading,
    Loaded,
    /// Last login failed; earlier data, if any, is kept
    Error,
}

/// UI-facing selection state owned by the controller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    /// `None` only while no plans are known
    pub selected_plan_index: Option<usize>,
    /// Set to `All` once, on the first load that brings plans
    pub selected_class: Option<ClassFilter>,
    pub is_loading: bool,
    pub last_updated: Option<String>,
}

impl SelectionState {
    pub fn class_filter(&self) -> ClassFilter {
        self.selected_class.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Commands the controller refuses. A refused command changes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("plan {index} does not exist ({len} plans available)")]
    PlanOutOfRange { index: usize, len: usize },

    #[error("plan {index} has no URL")]
    MissingPlanUrl { index: usize },

    #[error("no credentials entered yet")]
    NoCredentials,
}
