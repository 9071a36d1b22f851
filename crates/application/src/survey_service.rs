use std::sync::Arc;

use chrono::Utc;
use relevar_core::{AppError, AppResult, UserIdentity};
use relevar_domain::{
    NeighborhoodId, Permission, Survey, SurveyId, SurveyParts, UserId,
    ensure_request_accepts_survey,
};
use tracing::info;

use crate::AuthorizationService;
use crate::geography_ports::GeographyRepository;
use crate::request_ports::RequestRepository;
use crate::survey_ports::{RecordSurveyInput, SurveyRepository};

/// Application service recording surveys under the request and calendar guards.
#[derive(Clone)]
pub struct SurveyService {
    authorization_service: AuthorizationService,
    geography_repository: Arc<dyn GeographyRepository>,
    request_repository: Arc<dyn RequestRepository>,
    repository: Arc<dyn SurveyRepository>,
}

impl SurveyService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        geography_repository: Arc<dyn GeographyRepository>,
        request_repository: Arc<dyn RequestRepository>,
        repository: Arc<dyn SurveyRepository>,
    ) -> Self {
        Self {
            authorization_service,
            geography_repository,
            request_repository,
            repository,
        }
    }

    /// Records a survey.
    ///
    /// A linked request must target the same neighborhood and be in progress,
    /// and a neighborhood gets at most one survey per UTC calendar day.
    pub async fn record_survey(
        &self,
        actor: &UserIdentity,
        input: RecordSurveyInput,
    ) -> AppResult<Survey> {
        self.authorization_service
            .require_permission(actor, Permission::SurveyRecord)
            .await?;

        if self
            .geography_repository
            .find_neighborhood(input.neighborhood_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "neighborhood '{}' does not exist",
                input.neighborhood_id
            )));
        }

        if let Some(request_id) = input.request_id {
            let request = self
                .request_repository
                .find_request(request_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("request '{request_id}' does not exist"))
                })?;
            ensure_request_accepts_survey(&request, input.neighborhood_id)?;
        }

        let survey = Survey::new(SurveyParts {
            id: SurveyId::new(),
            neighborhood_id: input.neighborhood_id,
            request_id: input.request_id,
            performed_at: input.performed_at.unwrap_or_else(Utc::now),
            data: input.data,
            performed_by: Some(UserId::from_uuid(actor.user_id())),
        })?;

        if self
            .repository
            .survey_exists_on(survey.neighborhood_id(), survey.performed_on())
            .await?
        {
            return Err(AppError::Conflict(format!(
                "neighborhood '{}' already has a survey on {}",
                survey.neighborhood_id(),
                survey.performed_on()
            )));
        }

        self.repository.insert_survey(&survey).await?;

        info!(
            survey_id = %survey.id(),
            neighborhood_id = %survey.neighborhood_id(),
            performed_on = %survey.performed_on(),
            "survey recorded"
        );

        Ok(survey)
    }

    /// Returns one survey.
    pub async fn get_survey(&self, survey_id: SurveyId) -> AppResult<Survey> {
        self.repository
            .find_survey(survey_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("survey '{survey_id}' does not exist")))
    }

    /// Lists surveys newest first, optionally for one neighborhood.
    pub async fn list_surveys(&self, neighborhood_id: Option<NeighborhoodId>) -> AppResult<Vec<Survey>> {
        self.repository.list_surveys(neighborhood_id).await
    }
}

#[cfg(test)]
mod tests;
