//! In-process fakes shared by the service test suites.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;

use relevar_core::{AppError, AppResult, NonEmptyString, UserIdentity};
use relevar_domain::{
    AccountOrigin, AccountStatus, Area, AreaId, CodeScope, Department, DepartmentId, District,
    DistrictId, EntityCode, Neighborhood, NeighborhoodId, Notification, NotificationId, Objective,
    ObjectiveId, Permission, RequestAuditEntry, RequestId, RequestKind, RequestTransition, Role,
    RoleId, Survey, SurveyId, SurveyRequest, UserAccount, UserId, ensure_request_accepts_survey,
};

use crate::{
    AreaRepository, AuthorizationRepository, CodeRegistry, CodedInsert, GeographyRepository,
    InsertOutcome, NeighborhoodFilter, NotificationRepository, RequestListQuery,
    RequestRepository, RoleRepository, SurveyRepository, UserRepository,
};

#[derive(Default)]
pub(crate) struct FakeStore {
    pub departments: Mutex<Vec<Department>>,
    pub districts: Mutex<Vec<District>>,
    pub neighborhoods: Mutex<Vec<Neighborhood>>,
    pub areas: Mutex<Vec<Area>>,
    pub objectives: Mutex<Vec<Objective>>,
    pub requests: Mutex<Vec<SurveyRequest>>,
    pub audit: Mutex<Vec<RequestAuditEntry>>,
    pub surveys: Mutex<Vec<Survey>>,
    pub users: Mutex<Vec<UserAccount>>,
    pub roles: Mutex<Vec<Role>>,
    pub notifications: Mutex<Vec<Notification>>,
    pub fail_notifications: AtomicBool,
}

impl FakeStore {
    /// Seeds an active account holding a role with `permissions`.
    pub async fn seed_user(
        &self,
        username: &str,
        permissions: &[Permission],
        is_superuser: bool,
    ) -> UserIdentity {
        let role = Role::new(
            RoleId::new(),
            format!("{username}-role"),
            "",
            None,
            permissions.to_vec(),
        )
        .unwrap_or_else(|_| unreachable!());
        let now = Utc::now();
        let account = UserAccount {
            id: UserId::new(),
            username: NonEmptyString::new(username).unwrap_or_else(|_| unreachable!()),
            email: None,
            national_id: None,
            phone: None,
            role_id: Some(role.id()),
            status: AccountStatus::Active,
            is_superuser,
            origin: AccountOrigin::AdminCreated,
            created_at: now,
            updated_at: now,
        };

        let identity = UserIdentity::new(account.id.as_uuid(), username, is_superuser);
        self.roles.lock().await.push(role);
        self.users.lock().await.push(account);
        identity
    }

    pub async fn notifications_for(&self, identity: &UserIdentity) -> Vec<Notification> {
        self.notifications
            .lock()
            .await
            .iter()
            .filter(|notification| notification.recipient_id.as_uuid() == identity.user_id())
            .cloned()
            .collect()
    }
}

fn insert_coded<T: Clone>(
    rows: &mut Vec<T>,
    record: &T,
    same_scope: impl Fn(&T) -> bool,
    code: impl Fn(&T) -> EntityCode,
    name_clash: impl Fn(&T) -> bool,
) -> AppResult<InsertOutcome> {
    if rows
        .iter()
        .any(|row| same_scope(row) && code(row) == code(record))
    {
        return Ok(InsertOutcome::CodeTaken);
    }
    if rows.iter().any(name_clash) {
        return Err(AppError::Conflict("name already taken".to_owned()));
    }

    rows.push(record.clone());
    Ok(InsertOutcome::Inserted)
}

#[async_trait]
impl CodeRegistry for FakeStore {
    async fn list_codes(&self, scope: CodeScope) -> AppResult<Vec<EntityCode>> {
        Ok(match scope {
            CodeScope::Departments => self.departments.lock().await.iter().map(Department::code).collect(),
            CodeScope::Districts => self.districts.lock().await.iter().map(District::code).collect(),
            CodeScope::Neighborhoods => self
                .neighborhoods
                .lock()
                .await
                .iter()
                .map(Neighborhood::code)
                .collect(),
            CodeScope::Areas => self.areas.lock().await.iter().map(Area::code).collect(),
            CodeScope::Objectives(area_id) => self
                .objectives
                .lock()
                .await
                .iter()
                .filter(|objective| objective.area_id() == area_id)
                .map(Objective::code)
                .collect(),
        })
    }
}

#[async_trait]
impl CodedInsert<Department> for FakeStore {
    async fn insert_coded(&self, record: &Department) -> AppResult<InsertOutcome> {
        let mut rows = self.departments.lock().await;
        insert_coded(&mut rows, record, |_| true, Department::code, |row| {
            row.name() == record.name()
        })
    }
}

#[async_trait]
impl CodedInsert<District> for FakeStore {
    async fn insert_coded(&self, record: &District) -> AppResult<InsertOutcome> {
        let mut rows = self.districts.lock().await;
        insert_coded(&mut rows, record, |_| true, District::code, |row| {
            row.department_id() == record.department_id() && row.name() == record.name()
        })
    }
}

#[async_trait]
impl CodedInsert<Neighborhood> for FakeStore {
    async fn insert_coded(&self, record: &Neighborhood) -> AppResult<InsertOutcome> {
        let mut rows = self.neighborhoods.lock().await;
        insert_coded(&mut rows, record, |_| true, Neighborhood::code, |row| {
            row.name() == record.name()
        })
    }
}

#[async_trait]
impl CodedInsert<Area> for FakeStore {
    async fn insert_coded(&self, record: &Area) -> AppResult<InsertOutcome> {
        let mut rows = self.areas.lock().await;
        insert_coded(&mut rows, record, |_| true, Area::code, |row| {
            row.name() == record.name()
        })
    }
}

#[async_trait]
impl CodedInsert<Objective> for FakeStore {
    async fn insert_coded(&self, record: &Objective) -> AppResult<InsertOutcome> {
        let mut rows = self.objectives.lock().await;
        insert_coded(
            &mut rows,
            record,
            |row| row.area_id() == record.area_id(),
            Objective::code,
            |row| row.area_id() == record.area_id() && row.name() == record.name(),
        )
    }
}

#[async_trait]
impl GeographyRepository for FakeStore {
    async fn list_departments(&self) -> AppResult<Vec<Department>> {
        Ok(self.departments.lock().await.clone())
    }

    async fn find_department(&self, department_id: DepartmentId) -> AppResult<Option<Department>> {
        Ok(self
            .departments
            .lock()
            .await
            .iter()
            .find(|row| row.id() == department_id)
            .cloned())
    }

    async fn update_department(&self, department: &Department) -> AppResult<()> {
        let mut rows = self.departments.lock().await;
        if let Some(row) = rows.iter_mut().find(|row| row.id() == department.id()) {
            *row = department.clone();
        }
        Ok(())
    }

    async fn delete_department(&self, department_id: DepartmentId) -> AppResult<()> {
        self.departments
            .lock()
            .await
            .retain(|row| row.id() != department_id);
        Ok(())
    }

    async fn department_has_districts(&self, department_id: DepartmentId) -> AppResult<bool> {
        Ok(self
            .districts
            .lock()
            .await
            .iter()
            .any(|row| row.department_id() == department_id))
    }

    async fn list_districts(&self, department_id: Option<DepartmentId>) -> AppResult<Vec<District>> {
        Ok(self
            .districts
            .lock()
            .await
            .iter()
            .filter(|row| department_id.is_none_or(|id| row.department_id() == id))
            .cloned()
            .collect())
    }

    async fn find_district(&self, district_id: DistrictId) -> AppResult<Option<District>> {
        Ok(self
            .districts
            .lock()
            .await
            .iter()
            .find(|row| row.id() == district_id)
            .cloned())
    }

    async fn update_district(&self, district: &District) -> AppResult<()> {
        let mut rows = self.districts.lock().await;
        if let Some(row) = rows.iter_mut().find(|row| row.id() == district.id()) {
            *row = district.clone();
        }
        Ok(())
    }

    async fn delete_district(&self, district_id: DistrictId) -> AppResult<()> {
        self.districts
            .lock()
            .await
            .retain(|row| row.id() != district_id);
        Ok(())
    }

    async fn district_has_neighborhoods(&self, district_id: DistrictId) -> AppResult<bool> {
        Ok(self
            .neighborhoods
            .lock()
            .await
            .iter()
            .any(|row| row.district_ids().contains(&district_id)))
    }

    async fn list_neighborhoods(&self, filter: NeighborhoodFilter) -> AppResult<Vec<Neighborhood>> {
        Ok(self
            .neighborhoods
            .lock()
            .await
            .iter()
            .filter(|row| filter.status.is_none_or(|status| row.status() == status))
            .filter(|row| {
                filter
                    .district_id
                    .is_none_or(|district_id| row.district_ids().contains(&district_id))
            })
            .filter(|row| {
                filter.name_contains.as_deref().is_none_or(|needle| {
                    row.name()
                        .as_str()
                        .to_lowercase()
                        .contains(&needle.to_lowercase())
                })
            })
            .cloned()
            .collect())
    }

    async fn find_neighborhood(
        &self,
        neighborhood_id: NeighborhoodId,
    ) -> AppResult<Option<Neighborhood>> {
        Ok(self
            .neighborhoods
            .lock()
            .await
            .iter()
            .find(|row| row.id() == neighborhood_id)
            .cloned())
    }

    async fn update_neighborhood(&self, neighborhood: &Neighborhood) -> AppResult<()> {
        let mut rows = self.neighborhoods.lock().await;
        if let Some(row) = rows.iter_mut().find(|row| row.id() == neighborhood.id()) {
            *row = neighborhood.clone();
        }
        Ok(())
    }

    async fn delete_neighborhood(&self, neighborhood_id: NeighborhoodId) -> AppResult<()> {
        self.neighborhoods
            .lock()
            .await
            .retain(|row| row.id() != neighborhood_id);
        Ok(())
    }

    async fn neighborhood_has_activity(&self, neighborhood_id: NeighborhoodId) -> AppResult<bool> {
        let has_requests = self
            .requests
            .lock()
            .await
            .iter()
            .any(|row| row.neighborhood_id() == neighborhood_id);
        let has_surveys = self
            .surveys
            .lock()
            .await
            .iter()
            .any(|row| row.neighborhood_id() == neighborhood_id);
        Ok(has_requests || has_surveys)
    }
}

#[async_trait]
impl AreaRepository for FakeStore {
    async fn list_areas(&self) -> AppResult<Vec<Area>> {
        Ok(self.areas.lock().await.clone())
    }

    async fn find_area(&self, area_id: AreaId) -> AppResult<Option<Area>> {
        Ok(self
            .areas
            .lock()
            .await
            .iter()
            .find(|row| row.id() == area_id)
            .cloned())
    }

    async fn delete_area(&self, area_id: AreaId) -> AppResult<()> {
        self.areas.lock().await.retain(|row| row.id() != area_id);
        self.objectives
            .lock()
            .await
            .retain(|row| row.area_id() != area_id);
        Ok(())
    }

    async fn list_objectives(&self, area_id: AreaId) -> AppResult<Vec<Objective>> {
        Ok(self
            .objectives
            .lock()
            .await
            .iter()
            .filter(|row| row.area_id() == area_id)
            .cloned()
            .collect())
    }

    async fn find_objective(&self, objective_id: ObjectiveId) -> AppResult<Option<Objective>> {
        Ok(self
            .objectives
            .lock()
            .await
            .iter()
            .find(|row| row.id() == objective_id)
            .cloned())
    }

    async fn delete_objective(&self, objective_id: ObjectiveId) -> AppResult<()> {
        self.objectives
            .lock()
            .await
            .retain(|row| row.id() != objective_id);
        Ok(())
    }
}

#[async_trait]
impl RequestRepository for FakeStore {
    async fn find_open_request(
        &self,
        neighborhood_id: NeighborhoodId,
        kind: RequestKind,
    ) -> AppResult<Option<SurveyRequest>> {
        Ok(self
            .requests
            .lock()
            .await
            .iter()
            .find(|row| {
                row.neighborhood_id() == neighborhood_id
                    && row.kind() == kind
                    && row.state().is_open()
            })
            .cloned())
    }

    async fn create_request(
        &self,
        request: &SurveyRequest,
        audit: &RequestAuditEntry,
    ) -> AppResult<()> {
        self.requests.lock().await.push(request.clone());
        self.audit.lock().await.push(audit.clone());
        Ok(())
    }

    async fn find_request(&self, request_id: RequestId) -> AppResult<Option<SurveyRequest>> {
        Ok(self
            .requests
            .lock()
            .await
            .iter()
            .find(|row| row.id() == request_id)
            .cloned())
    }

    async fn list_requests(&self, query: RequestListQuery) -> AppResult<Vec<SurveyRequest>> {
        Ok(self
            .requests
            .lock()
            .await
            .iter()
            .rev()
            .filter(|row| query.state.is_none_or(|state| row.state() == state))
            .filter(|row| {
                query
                    .neighborhood_id
                    .is_none_or(|neighborhood_id| row.neighborhood_id() == neighborhood_id)
            })
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn save_transition(
        &self,
        transition: &RequestTransition,
        audit: &RequestAuditEntry,
    ) -> AppResult<()> {
        let mut rows = self.requests.lock().await;
        let Some(row) = rows.iter_mut().find(|row| row.id() == transition.request_id) else {
            return Err(AppError::NotFound("request not found".to_owned()));
        };
        row.apply(transition)?;
        self.audit.lock().await.push(audit.clone());
        Ok(())
    }

    async fn update_notes(
        &self,
        request_id: RequestId,
        notes: &str,
        updated_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut rows = self.requests.lock().await;
        if let Some(row) = rows.iter_mut().find(|row| row.id() == request_id) {
            row.set_notes(notes, updated_at);
        }
        Ok(())
    }

    async fn list_audit(&self, request_id: RequestId) -> AppResult<Vec<RequestAuditEntry>> {
        Ok(self
            .audit
            .lock()
            .await
            .iter()
            .filter(|row| row.request_id == request_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SurveyRepository for FakeStore {
    async fn survey_exists_on(
        &self,
        neighborhood_id: NeighborhoodId,
        date: NaiveDate,
    ) -> AppResult<bool> {
        Ok(self
            .surveys
            .lock()
            .await
            .iter()
            .any(|row| row.neighborhood_id() == neighborhood_id && row.performed_on() == date))
    }

    async fn insert_survey(&self, survey: &Survey) -> AppResult<()> {
        if let Some(request_id) = survey.request_id() {
            let requests = self.requests.lock().await;
            let request = requests
                .iter()
                .find(|row| row.id() == request_id)
                .ok_or_else(|| AppError::NotFound("request does not exist".to_owned()))?;
            ensure_request_accepts_survey(request, survey.neighborhood_id())?;
        }
        self.surveys.lock().await.push(survey.clone());
        Ok(())
    }

    async fn find_survey(&self, survey_id: SurveyId) -> AppResult<Option<Survey>> {
        Ok(self
            .surveys
            .lock()
            .await
            .iter()
            .find(|row| row.id() == survey_id)
            .cloned())
    }

    async fn list_surveys(&self, neighborhood_id: Option<NeighborhoodId>) -> AppResult<Vec<Survey>> {
        Ok(self
            .surveys
            .lock()
            .await
            .iter()
            .filter(|row| neighborhood_id.is_none_or(|id| row.neighborhood_id() == id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserRepository for FakeStore {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|row| row.id == user_id)
            .cloned())
    }

    async fn list_users(&self, status: Option<AccountStatus>) -> AppResult<Vec<UserAccount>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .filter(|row| status.is_none_or(|status| row.status == status))
            .cloned()
            .collect())
    }

    async fn insert_user(&self, account: &UserAccount) -> AppResult<()> {
        let mut rows = self.users.lock().await;
        if rows.iter().any(|row| row.username == account.username) {
            return Err(AppError::Conflict("username already taken".to_owned()));
        }
        rows.push(account.clone());
        Ok(())
    }

    async fn update_user(&self, account: &UserAccount) -> AppResult<()> {
        let mut rows = self.users.lock().await;
        if let Some(row) = rows.iter_mut().find(|row| row.id == account.id) {
            *row = account.clone();
        }
        Ok(())
    }

    async fn list_superuser_ids(&self) -> AppResult<Vec<UserId>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .filter(|row| row.is_superuser && row.is_active())
            .map(|row| row.id)
            .collect())
    }
}

#[async_trait]
impl RoleRepository for FakeStore {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.roles.lock().await.clone())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|row| row.id() == role_id)
            .cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|row| row.name().as_str().eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn insert_role(&self, role: &Role) -> AppResult<()> {
        let mut rows = self.roles.lock().await;
        if rows.iter().any(|row| row.name() == role.name()) {
            return Err(AppError::Conflict("role name already taken".to_owned()));
        }
        rows.push(role.clone());
        Ok(())
    }

    async fn update_role(&self, role: &Role) -> AppResult<()> {
        let mut rows = self.roles.lock().await;
        if rows
            .iter()
            .any(|row| row.id() != role.id() && row.name() == role.name())
        {
            return Err(AppError::Conflict("role name already taken".to_owned()));
        }
        if let Some(row) = rows.iter_mut().find(|row| row.id() == role.id()) {
            *row = role.clone();
        }
        Ok(())
    }

    async fn role_has_users(&self, role_id: RoleId) -> AppResult<bool> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .any(|row| row.role_id == Some(role_id)))
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        if self.role_has_users(role_id).await? {
            return Err(AppError::Conflict("role is still assigned".to_owned()));
        }
        self.roles.lock().await.retain(|row| row.id() != role_id);
        Ok(())
    }
}

#[async_trait]
impl AuthorizationRepository for FakeStore {
    async fn list_permissions_for_user(&self, user_id: UserId) -> AppResult<Vec<Permission>> {
        let Some(role_id) = self
            .users
            .lock()
            .await
            .iter()
            .find(|row| row.id == user_id)
            .and_then(|row| row.role_id)
        else {
            return Ok(Vec::new());
        };

        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|row| row.id() == role_id)
            .map(|role| role.permissions().to_vec())
            .unwrap_or_default())
    }
}

#[async_trait]
impl NotificationRepository for FakeStore {
    async fn insert_batch(&self, notifications: &[Notification]) -> AppResult<()> {
        if self.fail_notifications.load(Ordering::SeqCst) {
            return Err(AppError::Internal("notification store offline".to_owned()));
        }
        self.notifications
            .lock()
            .await
            .extend_from_slice(notifications);
        Ok(())
    }

    async fn list_for_recipient(
        &self,
        recipient_id: UserId,
        limit: usize,
    ) -> AppResult<Vec<Notification>> {
        Ok(self
            .notifications
            .lock()
            .await
            .iter()
            .rev()
            .filter(|row| row.recipient_id == recipient_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count_unread(&self, recipient_id: UserId) -> AppResult<u64> {
        Ok(self
            .notifications
            .lock()
            .await
            .iter()
            .filter(|row| row.recipient_id == recipient_id && !row.read)
            .count() as u64)
    }

    async fn mark_all_read(&self, recipient_id: UserId) -> AppResult<u64> {
        let mut updated = 0;
        for row in self.notifications.lock().await.iter_mut() {
            if row.recipient_id == recipient_id && !row.read {
                row.read = true;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete_many(
        &self,
        recipient_id: UserId,
        notification_ids: &[NotificationId],
    ) -> AppResult<u64> {
        let mut rows = self.notifications.lock().await;
        let before = rows.len();
        rows.retain(|row| {
            !(row.recipient_id == recipient_id && notification_ids.contains(&row.id))
        });
        Ok((before - rows.len()) as u64)
    }

    async fn delete_all(&self, recipient_id: UserId) -> AppResult<u64> {
        let mut rows = self.notifications.lock().await;
        let before = rows.len();
        rows.retain(|row| row.recipient_id != recipient_id);
        Ok((before - rows.len()) as u64)
    }
}
