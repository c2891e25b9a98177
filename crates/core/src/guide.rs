//! Guide publication workflow.
//!
//! ```text
//! draft ──submit──> pending ──approve──> published ──unpublish──> draft
//!                     │  ^
//!                  reject │ resubmit
//!                     v  │
//!                   rejected
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuideStatus {
    Draft,
    Pending,
    Published,
    Rejected,
}

/// An action that moves a guide between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideAction {
    Submit,
    Approve,
    Reject,
    Unpublish,
}

impl GuideAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Unpublish => "unpublish",
        }
    }

    /// Whether only moderators may perform this action.
    pub fn requires_moderator(&self) -> bool {
        !matches!(self, Self::Submit)
    }
}

impl GuideStatus {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "draft" => Ok(Self::Draft),
            "pending" => Ok(Self::Pending),
            "published" => Ok(Self::Published),
            "rejected" => Ok(Self::Rejected),
            _ => Err(CoreError::Validation(format!(
                "Invalid guide status '{s}'. Must be one of: draft, pending, published, rejected"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Published => "published",
            Self::Rejected => "rejected",
        }
    }

    /// Compute the status that `action` leads to, or a conflict if the
    /// action is not allowed from this status.
    pub fn transition(self, action: GuideAction) -> Result<Self, CoreError> {
        let next = match (self, action) {
            (Self::Draft | Self::Rejected, GuideAction::Submit) => Self::Pending,
            (Self::Pending, GuideAction::Approve) => Self::Published,
            (Self::Pending, GuideAction::Reject) => Self::Rejected,
            (Self::Published, GuideAction::Unpublish) => Self::Draft,
            (from, action) => {
                return Err(CoreError::Conflict(format!(
                    "Cannot {} a guide that is {}",
                    action.as_str(),
                    from.as_str()
                )))
            }
        };
        Ok(next)
    }
}

/// Who is acting on a guide, relative to its author.
#[derive(Debug, Clone, Copy)]
pub struct GuideActor {
    pub user_id: DbId,
    pub role: Role,
}

impl GuideActor {
    pub fn is_author(&self, author_id: DbId) -> bool {
        self.user_id == author_id
    }

    /// Authors may read their own guides in any status; moderators may read
    /// everything; everyone may read published guides.
    pub fn can_view(actor: Option<&Self>, author_id: DbId, status: GuideStatus) -> bool {
        status == GuideStatus::Published
            || actor.is_some_and(|a| a.is_author(author_id) || a.role.is_moderator())
    }

    /// Authors edit only while the guide is not in review or live.
    pub fn ensure_can_edit(&self, author_id: DbId, status: GuideStatus) -> Result<(), CoreError> {
        if self.role.is_moderator() {
            return Ok(());
        }
        if !self.is_author(author_id) {
            return Err(CoreError::Forbidden(
                "Only the author or a moderator can edit this guide".into(),
            ));
        }
        match status {
            GuideStatus::Draft | GuideStatus::Rejected => Ok(()),
            other => Err(CoreError::Conflict(format!(
                "A {} guide cannot be edited by its author",
                other.as_str()
            ))),
        }
    }

    pub fn ensure_can_delete(&self, author_id: DbId) -> Result<(), CoreError> {
        if self.role.is_moderator() || self.is_author(author_id) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(
                "Only the author or a moderator can delete this guide".into(),
            ))
        }
    }

    pub fn ensure_can_perform(&self, author_id: DbId, action: GuideAction) -> Result<(), CoreError> {
        if action.requires_moderator() {
            if !self.role.is_moderator() {
                return Err(CoreError::Forbidden(format!(
                    "Moderator role required to {} a guide",
                    action.as_str()
                )));
            }
            return Ok(());
        }
        if !self.is_author(author_id) {
            return Err(CoreError::Forbidden(
                "Only the author can submit this guide".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn actor(user_id: DbId, role: Role) -> GuideActor {
        GuideActor { user_id, role }
    }

    #[test]
    fn happy_path_to_published() {
        let s = GuideStatus::Draft.transition(GuideAction::Submit).unwrap();
        assert_eq!(s, GuideStatus::Pending);
        let s = s.transition(GuideAction::Approve).unwrap();
        assert_eq!(s, GuideStatus::Published);
        let s = s.transition(GuideAction::Unpublish).unwrap();
        assert_eq!(s, GuideStatus::Draft);
    }

    #[test]
    fn rejected_guides_can_be_resubmitted() {
        let s = GuideStatus::Pending.transition(GuideAction::Reject).unwrap();
        assert_eq!(s, GuideStatus::Rejected);
        assert_eq!(
            s.transition(GuideAction::Submit).unwrap(),
            GuideStatus::Pending
        );
    }

    #[test]
    fn invalid_transitions_conflict() {
        assert_matches!(
            GuideStatus::Draft.transition(GuideAction::Approve),
            Err(CoreError::Conflict(_))
        );
        assert_matches!(
            GuideStatus::Published.transition(GuideAction::Submit),
            Err(CoreError::Conflict(_))
        );
        assert_matches!(
            GuideStatus::Rejected.transition(GuideAction::Unpublish),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn visibility() {
        let author = actor(1, Role::User);
        let stranger = actor(2, Role::User);
        let moderator = actor(3, Role::Moderator);

        assert!(GuideActor::can_view(None, 1, GuideStatus::Published));
        assert!(!GuideActor::can_view(None, 1, GuideStatus::Draft));
        assert!(GuideActor::can_view(Some(&author), 1, GuideStatus::Draft));
        assert!(!GuideActor::can_view(Some(&stranger), 1, GuideStatus::Pending));
        assert!(GuideActor::can_view(Some(&moderator), 1, GuideStatus::Pending));
    }

    #[test]
    fn authors_edit_only_unreviewed_guides() {
        let author = actor(1, Role::User);
        assert!(author.ensure_can_edit(1, GuideStatus::Draft).is_ok());
        assert!(author.ensure_can_edit(1, GuideStatus::Rejected).is_ok());
        assert_matches!(
            author.ensure_can_edit(1, GuideStatus::Published),
            Err(CoreError::Conflict(_))
        );
        assert_matches!(
            actor(2, Role::Editor).ensure_can_edit(1, GuideStatus::Draft),
            Err(CoreError::Forbidden(_))
        );
        assert!(actor(9, Role::Moderator)
            .ensure_can_edit(1, GuideStatus::Published)
            .is_ok());
    }

    #[test]
    fn review_actions_need_moderator() {
        let author = actor(1, Role::User);
        assert!(author.ensure_can_perform(1, GuideAction::Submit).is_ok());
        assert_matches!(
            author.ensure_can_perform(1, GuideAction::Approve),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            actor(2, Role::Admin).ensure_can_perform(1, GuideAction::Submit),
            Err(CoreError::Forbidden(_))
        );
        assert!(actor(2, Role::Admin)
            .ensure_can_perform(1, GuideAction::Reject)
            .is_ok());
    }
}
