//! Sequential code assignment on top of the coded-insert ports.

use relevar_core::{AppError, AppResult};
use relevar_domain::{CodeScope, EntityCode, next_free_code};
use tracing::debug;

use crate::geography_ports::{CodeRegistry, CodedInsert, InsertOutcome};

/// Upper bound of scan-and-insert rounds before giving up on a scope.
pub const MAX_CODE_ASSIGNMENT_ATTEMPTS: usize = 5;

/// Inserts a record built around the lowest free code of `scope`.
///
/// `build` is called once per attempt with the candidate code. When the
/// store reports the code as taken by a concurrent writer the scope is
/// scanned again, up to [`MAX_CODE_ASSIGNMENT_ATTEMPTS`] rounds.
pub async fn insert_with_next_code<T, R, F>(
    repository: &R,
    scope: CodeScope,
    mut build: F,
) -> AppResult<T>
where
    T: Send + Sync + 'static,
    R: CodeRegistry + CodedInsert<T> + ?Sized,
    F: FnMut(EntityCode) -> AppResult<T> + Send,
{
    for attempt in 1..=MAX_CODE_ASSIGNMENT_ATTEMPTS {
        let existing = repository.list_codes(scope).await?;
        let code = next_free_code(existing);
        let record = build(code)?;

        match repository.insert_coded(&record).await? {
            InsertOutcome::Inserted => return Ok(record),
            InsertOutcome::CodeTaken => {
                debug!(scope = %scope, code = %code, attempt, "code taken concurrently, rescanning");
            }
        }
    }

    Err(AppError::Conflict(format!(
        "could not assign a free code in scope '{scope}' after {MAX_CODE_ASSIGNMENT_ATTEMPTS} attempts"
    )))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use relevar_domain::{Department, DepartmentId};

    use super::*;

    /// Store that loses the race a configurable number of times.
    struct RacingStore {
        codes: Mutex<Vec<EntityCode>>,
        lost_races: AtomicUsize,
    }

    impl RacingStore {
        fn new(existing: &[u32], lost_races: usize) -> Self {
            Self {
                codes: Mutex::new(
                    existing
                        .iter()
                        .filter_map(|value| EntityCode::new(*value).ok())
                        .collect(),
                ),
                lost_races: AtomicUsize::new(lost_races),
            }
        }
    }

    #[async_trait]
    impl CodeRegistry for RacingStore {
        async fn list_codes(&self, _scope: CodeScope) -> AppResult<Vec<EntityCode>> {
            Ok(self.codes.lock().await.clone())
        }
    }

    #[async_trait]
    impl CodedInsert<Department> for RacingStore {
        async fn insert_coded(&self, record: &Department) -> AppResult<InsertOutcome> {
            let mut codes = self.codes.lock().await;
            if self.lost_races.load(Ordering::SeqCst) > 0 {
                self.lost_races.fetch_sub(1, Ordering::SeqCst);
                // A concurrent writer grabbed the candidate first.
                codes.push(record.code());
                return Ok(InsertOutcome::CodeTaken);
            }

            codes.push(record.code());
            Ok(InsertOutcome::Inserted)
        }
    }

    fn build(code: EntityCode) -> AppResult<Department> {
        Department::new(DepartmentId::new(), "Central", code)
    }

    #[tokio::test]
    async fn assigns_lowest_gap() {
        let store = RacingStore::new(&[1, 2, 4], 0);
        let result = insert_with_next_code(&store, CodeScope::Departments, build).await;
        assert!(matches!(result, Ok(ref department) if department.code().value() == 3));
    }

    #[tokio::test]
    async fn rescans_after_losing_a_race() {
        let store = RacingStore::new(&[1], 2);
        let result = insert_with_next_code(&store, CodeScope::Departments, build).await;
        assert!(matches!(result, Ok(ref department) if department.code().value() == 4));
    }

    #[tokio::test]
    async fn gives_up_with_conflict_after_bounded_attempts() {
        let store = RacingStore::new(&[], MAX_CODE_ASSIGNMENT_ATTEMPTS);
        let result = insert_with_next_code(&store, CodeScope::Departments, build).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn build_errors_are_returned_unchanged() {
        let store = RacingStore::new(&[], 0);
        let result = insert_with_next_code(&store, CodeScope::Departments, |code| {
            Department::new(DepartmentId::new(), "  ", code)
        })
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
