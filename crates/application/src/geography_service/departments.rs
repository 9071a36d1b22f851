use super::*;

impl GeographyService {
    /// Lists departments ordered by name.
    pub async fn list_departments(&self) -> AppResult<Vec<Department>> {
        self.repository.list_departments().await
    }

    /// Returns one department.
    pub async fn get_department(&self, department_id: DepartmentId) -> AppResult<Department> {
        self.require_department(department_id).await
    }

    /// Creates a department with the next free code and tells administrators.
    pub async fn create_department(
        &self,
        actor: &UserIdentity,
        name: &str,
    ) -> AppResult<Department> {
        self.require_geography_manage(actor).await?;

        let department = insert_with_next_code(
            self.repository.as_ref(),
            CodeScope::Departments,
            |code| Department::new(DepartmentId::new(), name, code),
        )
        .await?;

        self.notification_service
            .notify_administrators_quietly(
                AdminNotice::new(
                    format!(
                        "Department '{}' was created with code {} by {}",
                        department.name(),
                        department.code(),
                        actor.username()
                    ),
                    NotificationKind::Info,
                )
                .excluding(UserId::from_uuid(actor.user_id()))
                .with_link(format!("/departments/{}", department.id())),
            )
            .await;

        Ok(department)
    }

    /// Renames a department and tells administrators. The code is kept.
    pub async fn rename_department(
        &self,
        actor: &UserIdentity,
        department_id: DepartmentId,
        name: &str,
    ) -> AppResult<Department> {
        self.require_geography_manage(actor).await?;

        let mut department = self.require_department(department_id).await?;
        let previous_name = department.name().clone();
        department.rename(name)?;
        self.repository.update_department(&department).await?;

        self.notification_service
            .notify_administrators_quietly(
                AdminNotice::new(
                    format!(
                        "Department '{previous_name}' was renamed to '{}' by {}",
                        department.name(),
                        actor.username()
                    ),
                    NotificationKind::Info,
                )
                .excluding(UserId::from_uuid(actor.user_id()))
                .with_link(format!("/departments/{}", department.id())),
            )
            .await;

        Ok(department)
    }

    /// Deletes a department that has no districts.
    pub async fn delete_department(
        &self,
        actor: &UserIdentity,
        department_id: DepartmentId,
    ) -> AppResult<()> {
        self.require_geography_manage(actor).await?;

        let department = self.require_department(department_id).await?;
        if self.repository.department_has_districts(department_id).await? {
            return Err(AppError::Conflict(format!(
                "department '{}' still has districts",
                department.name()
            )));
        }

        self.repository.delete_department(department_id).await
    }
}
