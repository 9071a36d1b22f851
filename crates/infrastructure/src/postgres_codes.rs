//! Shared plumbing for coded inserts.
//!
//! Inserts run in a transaction holding a per-scope advisory lock, so two
//! writers in the same scope are serialized. The unique constraints on the
//! code columns remain the final guard.

use relevar_application::InsertOutcome;
use relevar_core::{AppError, AppResult};
use relevar_domain::{CodeScope, EntityCode};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

/// Lists the codes assigned in `scope`.
pub(crate) async fn list_codes(pool: &PgPool, scope: CodeScope) -> AppResult<Vec<EntityCode>> {
    let codes = match scope {
        CodeScope::Objectives(area_id) => {
            sqlx::query_scalar::<_, i32>("SELECT code FROM objectives WHERE area_id = $1")
                .bind(area_id.as_uuid())
                .fetch_all(pool)
                .await
        }
        other => sqlx::query_scalar::<_, i32>(codes_query(other)).fetch_all(pool).await,
    }
    .map_err(|error| AppError::Internal(format!("failed to list codes in '{scope}': {error}")))?;

    codes.into_iter().map(code_from_row).collect()
}

/// Opens a transaction for inserting `code` into `scope`.
///
/// Returns `None` when the code is already taken; the caller then reports
/// [`InsertOutcome::CodeTaken`].
pub(crate) async fn begin_coded_insert(
    pool: &PgPool,
    scope: CodeScope,
    code: EntityCode,
) -> AppResult<Option<Transaction<'static, Postgres>>> {
    let mut transaction = pool.begin().await.map_err(|error| {
        AppError::Internal(format!("failed to start coded insert transaction: {error}"))
    })?;

    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(scope.key())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to lock code scope '{scope}': {error}"))
        })?;

    let code_value = code_param(code)?;
    let taken = match scope {
        CodeScope::Objectives(area_id) => {
            sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM objectives WHERE area_id = $1 AND code = $2)",
            )
            .bind(area_id.as_uuid())
            .bind(code_value)
            .fetch_one(&mut *transaction)
            .await
        }
        other => {
            sqlx::query_scalar::<_, bool>(code_taken_query(other))
                .bind(code_value)
                .fetch_one(&mut *transaction)
                .await
        }
    }
    .map_err(|error| AppError::Internal(format!("failed to check code in '{scope}': {error}")))?;

    if taken {
        debug!(scope = %scope, code = %code, "code already taken");
        return Ok(None);
    }

    Ok(Some(transaction))
}

/// Converts a code into its `INTEGER` column value.
pub(crate) fn code_param(code: EntityCode) -> AppResult<i32> {
    i32::try_from(code.value())
        .map_err(|_| AppError::Internal(format!("code '{code}' exceeds the storage range")))
}

/// Restores a code read from an `INTEGER` column.
pub(crate) fn code_from_row(code: i32) -> AppResult<EntityCode> {
    EntityCode::from_storage(i64::from(code))
}

/// Classifies a failed coded insert.
///
/// A violation of `code_constraint` means the code was taken and is not an
/// error. Any other unique violation is a naming conflict.
pub(crate) fn coded_insert_failure(
    error: sqlx::Error,
    code_constraint: &str,
    operation: &str,
) -> AppResult<InsertOutcome> {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        if database_error.constraint() == Some(code_constraint) {
            return Ok(InsertOutcome::CodeTaken);
        }

        return Err(AppError::Conflict(format!(
            "failed to {operation}: name already in use"
        )));
    }

    Err(AppError::Internal(format!("failed to {operation}: {error}")))
}

/// Maps unique violations to `Conflict` and everything else to `Internal`.
pub(crate) fn conflict_or_internal(error: sqlx::Error, operation: &str, conflict: &str) -> AppError {
    if is_unique_violation(&error) {
        return AppError::Conflict(conflict.to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

/// Returns whether the error is a unique-constraint violation.
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Database(database_error) if database_error.code().as_deref() == Some("23505")
    )
}

/// Returns whether the error is a foreign-key violation.
pub(crate) fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Database(database_error) if database_error.code().as_deref() == Some("23503")
    )
}

fn codes_query(scope: CodeScope) -> &'static str {
    match scope {
        CodeScope::Departments => "SELECT code FROM departments",
        CodeScope::Districts => "SELECT code FROM districts",
        CodeScope::Neighborhoods => "SELECT code FROM neighborhoods",
        CodeScope::Areas | CodeScope::Objectives(_) => "SELECT code FROM areas",
    }
}

fn code_taken_query(scope: CodeScope) -> &'static str {
    match scope {
        CodeScope::Departments => "SELECT EXISTS (SELECT 1 FROM departments WHERE code = $1)",
        CodeScope::Districts => "SELECT EXISTS (SELECT 1 FROM districts WHERE code = $1)",
        CodeScope::Neighborhoods => "SELECT EXISTS (SELECT 1 FROM neighborhoods WHERE code = $1)",
        CodeScope::Areas | CodeScope::Objectives(_) => {
            "SELECT EXISTS (SELECT 1 FROM areas WHERE code = $1)"
        }
    }
}
