use async_trait::async_trait;
use chrono::{DateTime, Utc};

use relevar_core::AppResult;
use relevar_domain::{
    NeighborhoodId, RequestAuditEntry, RequestId, RequestKind, RequestState, RequestTransition,
    SurveyRequest,
};

/// Input payload for opening a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequestInput {
    /// Target neighborhood.
    pub neighborhood_id: NeighborhoodId,
    /// Request kind.
    pub kind: RequestKind,
    /// Optional free-text notes.
    pub notes: String,
}

/// Input payload for moving a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequestInput {
    /// Target state.
    pub target: RequestState,
    /// Comment stored on the audit row.
    pub comment: String,
}

/// Query parameters for request listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestListQuery {
    /// Optional state filter.
    pub state: Option<RequestState>,
    /// Optional neighborhood filter.
    pub neighborhood_id: Option<NeighborhoodId>,
    /// Maximum rows returned.
    pub limit: usize,
    /// Number of rows skipped for offset pagination.
    pub offset: usize,
}

impl Default for RequestListQuery {
    fn default() -> Self {
        Self {
            state: None,
            neighborhood_id: None,
            limit: 50,
            offset: 0,
        }
    }
}

/// Repository port for survey requests and their audit trail.
///
/// Writes that change state persist the audit row in the same unit of work.
#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// Finds the open request of `kind` for a neighborhood, if any.
    async fn find_open_request(
        &self,
        neighborhood_id: NeighborhoodId,
        kind: RequestKind,
    ) -> AppResult<Option<SurveyRequest>>;

    /// Inserts a new request and its creation audit row.
    ///
    /// Returns `AppError::Conflict` when another open request of the same
    /// neighborhood and kind exists.
    async fn create_request(
        &self,
        request: &SurveyRequest,
        audit: &RequestAuditEntry,
    ) -> AppResult<()>;

    /// Finds one request.
    async fn find_request(&self, request_id: RequestId) -> AppResult<Option<SurveyRequest>>;

    /// Lists requests newest first.
    async fn list_requests(&self, query: RequestListQuery) -> AppResult<Vec<SurveyRequest>>;

    /// Applies a transition when the stored state still equals
    /// `transition.previous`, and appends `audit`.
    ///
    /// Returns `AppError::Conflict` when the state moved concurrently or the
    /// transition would leave two open requests of the same kind.
    async fn save_transition(
        &self,
        transition: &RequestTransition,
        audit: &RequestAuditEntry,
    ) -> AppResult<()>;

    /// Replaces the notes of a request.
    async fn update_notes(
        &self,
        request_id: RequestId,
        notes: &str,
        updated_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Lists the audit trail of a request oldest first.
    async fn list_audit(&self, request_id: RequestId) -> AppResult<Vec<RequestAuditEntry>>;
}
