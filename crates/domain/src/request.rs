//! Survey request workflow.
//!
//! A request moves through a fixed transition table:
//!
//! | from          | to                        |
//! |---------------|---------------------------|
//! | `pending`     | `active`, `inactive`      |
//! | `active`      | `in_progress`, `inactive` |
//! | `in_progress` | `active`, `inactive`      |
//! | `inactive`    | `active`                  |
//!
//! There is no terminal state: `inactive` requests are paused and may be
//! reactivated. Every state change is captured as a [`RequestTransition`]
//! that carries both the previous and the next state, and yields exactly one
//! [`RequestAuditEntry`].

use std::str::FromStr;

use chrono::{DateTime, Utc};
use relevar_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::{NeighborhoodId, RequestAuditId, RequestId, UserId};

/// What the request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// First survey of the neighborhood.
    New,
    /// Refresh of previously surveyed data.
    Update,
}

impl RequestKind {
    /// Returns a stable storage value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Update => "update",
        }
    }
}

impl FromStr for RequestKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "new" => Ok(Self::New),
            "update" => Ok(Self::Update),
            _ => Err(AppError::Validation(format!(
                "unknown request kind '{value}'"
            ))),
        }
    }
}

/// Workflow state of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    /// Awaiting review. Initial state.
    Pending,
    /// Approved and scheduled.
    Active,
    /// Field survey underway.
    InProgress,
    /// Paused. May be reactivated.
    Inactive,
}

impl RequestState {
    /// States that count against the one-open-request-per-pair rule.
    pub const OPEN: [Self; 3] = [Self::Pending, Self::Active, Self::InProgress];

    /// Returns a stable storage value for this state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::InProgress => "in_progress",
            Self::Inactive => "inactive",
        }
    }

    /// Returns whether the state blocks another request for the same pair.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Inactive)
    }

    /// Returns the states reachable in one step.
    #[must_use]
    pub fn allowed_targets(&self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Active, Self::Inactive],
            Self::Active => &[Self::InProgress, Self::Inactive],
            Self::InProgress => &[Self::Active, Self::Inactive],
            Self::Inactive => &[Self::Active],
        }
    }

    /// Pure lookup against the transition table.
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        self.allowed_targets().contains(&target)
    }
}

impl FromStr for RequestState {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "in_progress" => Ok(Self::InProgress),
            "inactive" => Ok(Self::Inactive),
            _ => Err(AppError::Validation(format!(
                "unknown request state '{value}'"
            ))),
        }
    }
}

/// Returns whether `current` may move to `target`.
#[must_use]
pub fn can_transition(current: RequestState, target: RequestState) -> bool {
    current.can_transition_to(target)
}

/// Stored attributes of a request, used to restore it from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyRequestParts {
    /// Request identifier.
    pub id: RequestId,
    /// Target neighborhood.
    pub neighborhood_id: NeighborhoodId,
    /// Request kind.
    pub kind: RequestKind,
    /// Current state.
    pub state: RequestState,
    /// Creator, cleared when the account is removed.
    pub created_by: Option<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last write timestamp.
    pub updated_at: DateTime<Utc>,
    /// Free-text notes.
    pub notes: String,
}

/// Tracked ask to survey or re-survey a neighborhood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyRequest {
    id: RequestId,
    neighborhood_id: NeighborhoodId,
    kind: RequestKind,
    state: RequestState,
    created_by: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    notes: String,
}

impl SurveyRequest {
    /// Opens a new request in [`RequestState::Pending`].
    #[must_use]
    pub fn open(
        neighborhood_id: NeighborhoodId,
        kind: RequestKind,
        created_by: Option<UserId>,
        notes: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RequestId::new(),
            neighborhood_id,
            kind,
            state: RequestState::Pending,
            created_by,
            created_at: now,
            updated_at: now,
            notes: notes.into().trim().to_owned(),
        }
    }

    /// Restores a request from stored attributes.
    #[must_use]
    pub fn from_parts(parts: SurveyRequestParts) -> Self {
        Self {
            id: parts.id,
            neighborhood_id: parts.neighborhood_id,
            kind: parts.kind,
            state: parts.state,
            created_by: parts.created_by,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
            notes: parts.notes,
        }
    }

    /// Returns the request identifier.
    #[must_use]
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Returns the target neighborhood.
    #[must_use]
    pub fn neighborhood_id(&self) -> NeighborhoodId {
        self.neighborhood_id
    }

    /// Returns the request kind.
    #[must_use]
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> RequestState {
        self.state
    }

    /// Returns the creator, if still known.
    #[must_use]
    pub fn created_by(&self) -> Option<UserId> {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last write timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the free-text notes.
    #[must_use]
    pub fn notes(&self) -> &str {
        self.notes.as_str()
    }

    /// Audit row recorded when the request is first persisted.
    #[must_use]
    pub fn creation_audit_entry(&self) -> RequestAuditEntry {
        RequestAuditEntry {
            id: RequestAuditId::new(),
            request_id: self.id,
            previous: None,
            next: self.state,
            changed_by: self.created_by,
            changed_at: self.created_at,
            comment: "created".to_owned(),
        }
    }

    /// Validates a move to `target` and describes it without mutating.
    pub fn plan_transition(
        &self,
        target: RequestState,
        changed_by: Option<UserId>,
        comment: impl Into<String>,
        now: DateTime<Utc>,
    ) -> AppResult<RequestTransition> {
        if !self.state.can_transition_to(target) {
            return Err(AppError::Validation(format!(
                "request '{}' cannot move from '{}' to '{}'",
                self.id,
                self.state.as_str(),
                target.as_str()
            )));
        }

        Ok(RequestTransition {
            request_id: self.id,
            previous: self.state,
            next: target,
            changed_by,
            changed_at: now,
            comment: comment.into().trim().to_owned(),
        })
    }

    /// Applies a planned transition.
    pub fn apply(&mut self, transition: &RequestTransition) -> AppResult<()> {
        if transition.request_id != self.id || transition.previous != self.state {
            return Err(AppError::Conflict(format!(
                "request '{}' is no longer in state '{}'",
                self.id,
                transition.previous.as_str()
            )));
        }

        self.state = transition.next;
        self.updated_at = transition.changed_at;
        Ok(())
    }

    /// Replaces the notes. Not a state change, so no audit row is produced.
    pub fn set_notes(&mut self, notes: impl Into<String>, now: DateTime<Utc>) {
        self.notes = notes.into().trim().to_owned();
        self.updated_at = now;
    }
}

/// One validated state change with both endpoints made explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTransition {
    /// Request being moved.
    pub request_id: RequestId,
    /// State before the change.
    pub previous: RequestState,
    /// State after the change.
    pub next: RequestState,
    /// Acting user, when known.
    pub changed_by: Option<UserId>,
    /// Change timestamp.
    pub changed_at: DateTime<Utc>,
    /// Optional comment, empty when absent.
    pub comment: String,
}

impl RequestTransition {
    /// Returns whether the change re-enters an open state.
    #[must_use]
    pub fn reopens(&self) -> bool {
        !self.previous.is_open() && self.next.is_open()
    }

    /// Audit row describing this change.
    #[must_use]
    pub fn audit_entry(&self) -> RequestAuditEntry {
        RequestAuditEntry {
            id: RequestAuditId::new(),
            request_id: self.request_id,
            previous: Some(self.previous),
            next: self.next,
            changed_by: self.changed_by,
            changed_at: self.changed_at,
            comment: self.comment.clone(),
        }
    }
}

/// Immutable audit row for one state change of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestAuditEntry {
    /// Audit row identifier.
    pub id: RequestAuditId,
    /// Owning request.
    pub request_id: RequestId,
    /// State before the change; `None` for the creation row.
    pub previous: Option<RequestState>,
    /// State after the change.
    pub next: RequestState,
    /// Acting user, when known.
    pub changed_by: Option<UserId>,
    /// Change timestamp.
    pub changed_at: DateTime<Utc>,
    /// Optional comment.
    pub comment: String,
}

impl RequestAuditEntry {
    /// Marker stored as the previous state of a creation row.
    pub const NEW_MARKER: &'static str = "(new)";

    /// Storage label of the previous state.
    #[must_use]
    pub fn previous_label(&self) -> &'static str {
        self.previous
            .map(|state| state.as_str())
            .unwrap_or(Self::NEW_MARKER)
    }

    /// Parses a stored previous-state label.
    pub fn parse_previous(value: &str) -> AppResult<Option<RequestState>> {
        if value == Self::NEW_MARKER {
            return Ok(None);
        }

        RequestState::from_str(value).map(Some)
    }
}
