//! Typed access to the record store.
//!
//! Every function takes the connection explicitly and re-reads the store; no
//! state is kept between calls.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub mod albums;
pub mod messages;
pub mod songs;
pub mod users;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("uniqueness violated: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(DbErr),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::Conflict(detail),
            _ => match err {
                DbErr::RecordNotFound(_) => StoreError::NotFound,
                other => StoreError::Db(other),
            },
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
