use super::*;

impl PostgresUserRepository {
    pub(super) async fn find_user_impl(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        let query = format!("{SELECT_USERS} WHERE id = $1");

        sqlx::query_as::<_, UserRow>(query.as_str())
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find user by id: {error}")))?
            .map(UserAccount::try_from)
            .transpose()
    }

    pub(super) async fn list_users_impl(
        &self,
        status: Option<AccountStatus>,
    ) -> AppResult<Vec<UserAccount>> {
        let query = format!(
            "{SELECT_USERS} WHERE ($1::text IS NULL OR status = $1) ORDER BY LOWER(username)"
        );

        sqlx::query_as::<_, UserRow>(query.as_str())
            .bind(status.map(|status| status.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list users: {error}")))?
            .into_iter()
            .map(UserAccount::try_from)
            .collect()
    }

    pub(super) async fn list_superuser_ids_impl(&self) -> AppResult<Vec<UserId>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM users
            WHERE is_superuser AND status = 'active'
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list superusers: {error}")))?;

        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }
}
