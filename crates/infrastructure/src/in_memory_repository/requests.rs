use chrono::{DateTime, NaiveDate, Utc};
use relevar_application::{RequestListQuery, RequestRepository, SurveyRepository};
use relevar_domain::{RequestKind, RequestTransition, ensure_request_accepts_survey};

use super::*;

impl InMemoryState {
    fn open_request(
        &self,
        neighborhood_id: NeighborhoodId,
        kind: RequestKind,
    ) -> Option<&SurveyRequest> {
        self.requests.values().find(|request| {
            request.neighborhood_id() == neighborhood_id
                && request.kind() == kind
                && request.state().is_open()
        })
    }
}

#[async_trait]
impl RequestRepository for InMemoryRepository {
    async fn find_open_request(
        &self,
        neighborhood_id: NeighborhoodId,
        kind: RequestKind,
    ) -> AppResult<Option<SurveyRequest>> {
        Ok(self
            .state
            .read()
            .await
            .open_request(neighborhood_id, kind)
            .cloned())
    }

    async fn create_request(
        &self,
        request: &SurveyRequest,
        audit: &RequestAuditEntry,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;

        if !state.neighborhoods.contains_key(&request.neighborhood_id()) {
            return Err(AppError::NotFound(format!(
                "neighborhood '{}' does not exist",
                request.neighborhood_id()
            )));
        }
        if request.state().is_open()
            && state
                .open_request(request.neighborhood_id(), request.kind())
                .is_some()
        {
            return Err(AppError::Conflict(format!(
                "the neighborhood already has an open '{}' request",
                request.kind().as_str()
            )));
        }

        state.requests.insert(request.id(), request.clone());
        state.audit.push(audit.clone());
        Ok(())
    }

    async fn find_request(&self, request_id: RequestId) -> AppResult<Option<SurveyRequest>> {
        Ok(self.state.read().await.requests.get(&request_id).cloned())
    }

    async fn list_requests(&self, query: RequestListQuery) -> AppResult<Vec<SurveyRequest>> {
        let state = self.state.read().await;

        let mut requests: Vec<SurveyRequest> = state
            .requests
            .values()
            .filter(|request| query.state.is_none_or(|wanted| request.state() == wanted))
            .filter(|request| {
                query
                    .neighborhood_id
                    .is_none_or(|neighborhood_id| request.neighborhood_id() == neighborhood_id)
            })
            .cloned()
            .collect();
        requests.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| left.id().cmp(&right.id()))
        });

        Ok(requests
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect())
    }

    async fn save_transition(
        &self,
        transition: &RequestTransition,
        audit: &RequestAuditEntry,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;

        let Some(current) = state.requests.get(&transition.request_id) else {
            return Err(AppError::NotFound(format!(
                "request '{}' does not exist",
                transition.request_id
            )));
        };

        if transition.reopens()
            && state
                .open_request(current.neighborhood_id(), current.kind())
                .is_some_and(|open| open.id() != transition.request_id)
        {
            return Err(AppError::Conflict(format!(
                "request '{}' cannot be reopened while another request of its kind is open",
                transition.request_id
            )));
        }

        let Some(request) = state.requests.get_mut(&transition.request_id) else {
            return Err(AppError::NotFound(format!(
                "request '{}' does not exist",
                transition.request_id
            )));
        };
        request.apply(transition)?;
        state.audit.push(audit.clone());

        Ok(())
    }

    async fn update_notes(
        &self,
        request_id: RequestId,
        notes: &str,
        updated_at: DateTime<Utc>,
    ) -> AppResult<()> {
        if let Some(request) = self.state.write().await.requests.get_mut(&request_id) {
            request.set_notes(notes, updated_at);
        }

        Ok(())
    }

    async fn list_audit(&self, request_id: RequestId) -> AppResult<Vec<RequestAuditEntry>> {
        let mut entries: Vec<RequestAuditEntry> = self
            .state
            .read()
            .await
            .audit
            .iter()
            .filter(|entry| entry.request_id == request_id)
            .cloned()
            .collect();
        entries.sort_by_key(|entry| entry.changed_at);

        Ok(entries)
    }
}

#[async_trait]
impl SurveyRepository for InMemoryRepository {
    async fn survey_exists_on(
        &self,
        neighborhood_id: NeighborhoodId,
        date: NaiveDate,
    ) -> AppResult<bool> {
        Ok(self.state.read().await.surveys.values().any(|survey| {
            survey.neighborhood_id() == neighborhood_id && survey.performed_on() == date
        }))
    }

    async fn insert_survey(&self, survey: &Survey) -> AppResult<()> {
        let mut state = self.state.write().await;

        if let Some(request_id) = survey.request_id() {
            let request = state.requests.get(&request_id).ok_or_else(|| {
                AppError::NotFound(format!("request '{request_id}' does not exist"))
            })?;
            ensure_request_accepts_survey(request, survey.neighborhood_id())?;
        }

        if state.surveys.values().any(|existing| {
            existing.neighborhood_id() == survey.neighborhood_id()
                && existing.performed_on() == survey.performed_on()
        }) {
            return Err(AppError::Conflict(format!(
                "neighborhood '{}' already has a survey on {}",
                survey.neighborhood_id(),
                survey.performed_on()
            )));
        }

        state.surveys.insert(survey.id(), survey.clone());
        Ok(())
    }

    async fn find_survey(&self, survey_id: SurveyId) -> AppResult<Option<Survey>> {
        Ok(self.state.read().await.surveys.get(&survey_id).cloned())
    }

    async fn list_surveys(&self, neighborhood_id: Option<NeighborhoodId>) -> AppResult<Vec<Survey>> {
        let mut surveys: Vec<Survey> = self
            .state
            .read()
            .await
            .surveys
            .values()
            .filter(|survey| neighborhood_id.is_none_or(|id| survey.neighborhood_id() == id))
            .cloned()
            .collect();
        surveys.sort_by(|left, right| right.performed_at().cmp(&left.performed_at()));

        Ok(surveys)
    }
}
