use async_trait::async_trait;
use relevar_core::AppResult;
use relevar_domain::{CodeScope, EntityCode};

/// Result of inserting a record that carries an assigned code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Record was persisted.
    Inserted,
    /// Another record already holds the code in the same scope.
    CodeTaken,
}

/// Port listing the codes already assigned in a scope.
#[async_trait]
pub trait CodeRegistry: Send + Sync {
    /// Lists every code currently assigned in `scope`.
    async fn list_codes(&self, scope: CodeScope) -> AppResult<Vec<EntityCode>>;
}

/// Port inserting one coded record.
///
/// Implementations must reject a duplicate code in the record's scope
/// atomically with the insert and report it as [`InsertOutcome::CodeTaken`].
/// Other uniqueness violations are returned as `AppError::Conflict`.
#[async_trait]
pub trait CodedInsert<T: Send + Sync + 'static>: Send + Sync {
    /// Inserts `record`.
    async fn insert_coded(&self, record: &T) -> AppResult<InsertOutcome>;
}
