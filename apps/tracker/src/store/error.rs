//! Store error types.

use crate::db::DbError;
use habit_core::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("habit {0} not found")]
    HabitNotFound(i64),

    #[error("check-in {0} not found")]
    CheckInNotFound(i64),
}
