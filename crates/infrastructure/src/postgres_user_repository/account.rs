use super::*;

impl PostgresUserRepository {
    pub(super) async fn insert_user_impl(&self, account: &UserAccount) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, username, email, national_id, phone, role_id, status, is_superuser, origin,
                created_at, updated_at
            )
            VALUES ($1, $2, LOWER($3), $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(account.username.as_str())
        .bind(account.email.as_ref().map(EmailAddress::as_str))
        .bind(account.national_id.as_ref().map(NationalId::as_str))
        .bind(account.phone.as_ref().map(PhoneNumber::as_str))
        .bind(account.role_id.map(|role_id| role_id.as_uuid()))
        .bind(account.status.as_str())
        .bind(account.is_superuser)
        .bind(account.origin.as_str())
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| username_conflict(error, "create user", account))?;

        Ok(())
    }

    pub(super) async fn update_user_impl(&self, account: &UserAccount) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2,
                email = LOWER($3),
                national_id = $4,
                phone = $5,
                role_id = $6,
                status = $7,
                is_superuser = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(account.username.as_str())
        .bind(account.email.as_ref().map(EmailAddress::as_str))
        .bind(account.national_id.as_ref().map(NationalId::as_str))
        .bind(account.phone.as_ref().map(PhoneNumber::as_str))
        .bind(account.role_id.map(|role_id| role_id.as_uuid()))
        .bind(account.status.as_str())
        .bind(account.is_superuser)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| username_conflict(error, "update user", account))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "user '{}' does not exist",
                account.id
            )));
        }

        Ok(())
    }
}
