/*
 * Responsibility
 * - the meaning a repo communicates upward
 * - a delete blocked by a referential constraint is its own variant, not a
 *   generic db error; handlers branch on the variant, never on error text
 */
use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),

    #[error("{message}")]
    Constraint { message: String },
}

impl RepoError {
    // SQLSTATE 23503 = foreign_key_violation
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some("23503")
        {
            return RepoError::Constraint {
                message: "User cannot be deleted while related records exist".to_string(),
            };
        }
        RepoError::Db(e)
    }
}
