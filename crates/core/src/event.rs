//! Story event kinds and review status.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Gamble,
    Decision,
    Reveal,
    Shift,
    Resolution,
}

pub const VALID_EVENT_TYPES: &[&str] = &["gamble", "decision", "reveal", "shift", "resolution"];

impl EventType {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "gamble" => Ok(Self::Gamble),
            "decision" => Ok(Self::Decision),
            "reveal" => Ok(Self::Reveal),
            "shift" => Ok(Self::Shift),
            "resolution" => Ok(Self::Resolution),
            _ => Err(CoreError::Validation(format!(
                "Invalid event type '{s}'. Must be one of: {}",
                VALID_EVENT_TYPES.join(", ")
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gamble => "gamble",
            Self::Decision => "decision",
            Self::Reveal => "reveal",
            Self::Shift => "shift",
            Self::Resolution => "resolution",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Draft,
    Pending,
    Approved,
}

impl EventStatus {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "draft" => Ok(Self::Draft),
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            _ => Err(CoreError::Validation(format!(
                "Invalid event status '{s}'. Must be one of: draft, pending, approved"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
        }
    }

    /// Events written by moderators go live immediately.
    pub fn initial_for(role: Role) -> Self {
        if role.is_moderator() {
            Self::Approved
        } else {
            Self::Pending
        }
    }

    pub fn ensure_approvable(&self) -> Result<(), CoreError> {
        match self {
            Self::Approved => Err(CoreError::Conflict("Event is already approved".into())),
            Self::Draft | Self::Pending => Ok(()),
        }
    }
}
