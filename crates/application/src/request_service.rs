use std::sync::Arc;

use chrono::Utc;
use relevar_core::{AppError, AppResult, UserIdentity};
use relevar_domain::{
    Neighborhood, NeighborhoodId, NotificationKind, Permission, RequestAuditEntry, RequestId,
    RequestState, SurveyRequest, UserId,
};
use serde_json::json;
use tracing::info;

use crate::geography_ports::GeographyRepository;
use crate::notification_ports::AdminNotice;
use crate::request_ports::{
    CreateRequestInput, RequestListQuery, RequestRepository, TransitionRequestInput,
};
use crate::{AuthorizationService, NotificationService};

/// Application service driving survey requests through their workflow.
#[derive(Clone)]
pub struct RequestService {
    authorization_service: AuthorizationService,
    geography_repository: Arc<dyn GeographyRepository>,
    repository: Arc<dyn RequestRepository>,
    notification_service: NotificationService,
}

impl RequestService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        geography_repository: Arc<dyn GeographyRepository>,
        repository: Arc<dyn RequestRepository>,
        notification_service: NotificationService,
    ) -> Self {
        Self {
            authorization_service,
            geography_repository,
            repository,
            notification_service,
        }
    }

    /// Opens a pending request for a neighborhood.
    ///
    /// At most one open request of each kind may exist per neighborhood.
    pub async fn create_request(
        &self,
        actor: &UserIdentity,
        input: CreateRequestInput,
    ) -> AppResult<SurveyRequest> {
        self.authorization_service
            .require_permission(actor, Permission::RequestCreate)
            .await?;

        let neighborhood = self.require_neighborhood(input.neighborhood_id).await?;
        if let Some(existing) = self
            .repository
            .find_open_request(neighborhood.id(), input.kind)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "neighborhood '{}' already has an open '{}' request ('{}')",
                neighborhood.name(),
                input.kind.as_str(),
                existing.id()
            )));
        }

        let actor_id = UserId::from_uuid(actor.user_id());
        let request = SurveyRequest::open(
            neighborhood.id(),
            input.kind,
            Some(actor_id),
            input.notes,
            Utc::now(),
        );
        self.repository
            .create_request(&request, &request.creation_audit_entry())
            .await?;

        info!(
            request_id = %request.id(),
            neighborhood = %neighborhood.name(),
            kind = request.kind().as_str(),
            "survey request opened"
        );

        self.notification_service
            .notify_administrators_quietly(
                AdminNotice::new(
                    format!(
                        "{} opened a '{}' survey request for '{}'",
                        actor.username(),
                        request.kind().as_str(),
                        neighborhood.name()
                    ),
                    NotificationKind::Info,
                )
                .excluding(actor_id)
                .with_link(format!("/requests/{}", request.id()))
                .with_metadata(json!({
                    "request_id": request.id(),
                    "neighborhood_id": neighborhood.id(),
                })),
            )
            .await;

        Ok(request)
    }

    /// Moves a request to `input.target` and records the audit row.
    pub async fn transition_request(
        &self,
        actor: &UserIdentity,
        request_id: RequestId,
        input: TransitionRequestInput,
    ) -> AppResult<SurveyRequest> {
        self.authorization_service
            .require_permission(actor, Permission::RequestTransition)
            .await?;

        let mut request = self.get_request(request_id).await?;
        let actor_id = UserId::from_uuid(actor.user_id());
        let transition =
            request.plan_transition(input.target, Some(actor_id), input.comment, Utc::now())?;

        if transition.reopens()
            && let Some(existing) = self
                .repository
                .find_open_request(request.neighborhood_id(), request.kind())
                .await?
            && existing.id() != request.id()
        {
            return Err(AppError::Conflict(format!(
                "request '{}' cannot be reopened while request '{}' is open",
                request.id(),
                existing.id()
            )));
        }

        self.repository
            .save_transition(&transition, &transition.audit_entry())
            .await?;
        request.apply(&transition)?;

        info!(
            request_id = %request.id(),
            from = transition.previous.as_str(),
            to = transition.next.as_str(),
            "survey request moved"
        );

        let kind = if transition.next == RequestState::Inactive {
            NotificationKind::Warning
        } else {
            NotificationKind::Info
        };
        self.notification_service
            .notify_administrators_quietly(
                AdminNotice::new(
                    format!(
                        "{} moved request '{}' from '{}' to '{}'",
                        actor.username(),
                        request.id(),
                        transition.previous.as_str(),
                        transition.next.as_str()
                    ),
                    kind,
                )
                .excluding(actor_id)
                .with_link(format!("/requests/{}", request.id())),
            )
            .await;

        Ok(request)
    }

    /// Replaces the notes of a request without touching its state.
    pub async fn update_request_notes(
        &self,
        actor: &UserIdentity,
        request_id: RequestId,
        notes: &str,
    ) -> AppResult<SurveyRequest> {
        self.authorization_service
            .require_permission(actor, Permission::RequestTransition)
            .await?;

        let mut request = self.get_request(request_id).await?;
        request.set_notes(notes, Utc::now());
        self.repository
            .update_notes(request.id(), request.notes(), request.updated_at())
            .await?;

        Ok(request)
    }

    /// Returns one request.
    pub async fn get_request(&self, request_id: RequestId) -> AppResult<SurveyRequest> {
        self.repository
            .find_request(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("request '{request_id}' does not exist")))
    }

    /// Lists requests newest first.
    pub async fn list_requests(&self, query: RequestListQuery) -> AppResult<Vec<SurveyRequest>> {
        let query = RequestListQuery {
            limit: query.limit.clamp(1, 200),
            ..query
        };

        self.repository.list_requests(query).await
    }

    /// Lists the audit trail of a request oldest first.
    pub async fn list_request_audit(
        &self,
        request_id: RequestId,
    ) -> AppResult<Vec<RequestAuditEntry>> {
        self.get_request(request_id).await?;
        self.repository.list_audit(request_id).await
    }

    async fn require_neighborhood(&self, neighborhood_id: NeighborhoodId) -> AppResult<Neighborhood> {
        self.geography_repository
            .find_neighborhood(neighborhood_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("neighborhood '{neighborhood_id}' does not exist"))
            })
    }
}
