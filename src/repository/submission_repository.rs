use sqlx::{query_as, query_scalar, FromRow, Pool, Sqlite};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    models::{types::UtcDateTime, NewSubmission, Submission, SubmissionId, ValidationError},
    repository::conversion::DBConvertible,
};

use super::conversion::{DBFromConversionError, DBToConversionError};

const SUBMISSION_COLUMNS: &str = "id, student_id, name, crush, created_at";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("A submission with this student id and name already exists")]
    Duplicate,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub struct SubmissionRepository {
    pool: Pool<Sqlite>,
}

impl SubmissionRepository {
    pub fn new(pool: Pool<Sqlite>) -> SubmissionRepository {
        SubmissionRepository { pool }
    }

    /// Validates and stores a submission stamped with the current time.
    #[tracing::instrument(skip(self, name, crush))]
    pub async fn submit(
        &self,
        student_id: &str,
        name: &str,
        crush: &str,
    ) -> Result<Submission, SubmitError> {
        let submission = NewSubmission::new(student_id, name, crush, UtcDateTime::now())?;
        self.insert(&submission).await
    }

    /// Stores an already validated submission. The `(student_id, name)` unique
    /// constraint decides races between identical submissions.
    pub async fn insert(&self, submission: &NewSubmission) -> Result<Submission, SubmitError> {
        let submitted_at = submission
            .submitted_at
            .to_db()
            .map_err(anyhow::Error::from)?;

        let inserted = query_as::<_, SqlSubmission>(
            r#"
                INSERT INTO submissions (student_id, name, crush, created_at)
                VALUES ($1, $2, $3, $4)
                RETURNING id, student_id, name, crush, created_at
            "#,
        )
        .bind(&submission.student_id)
        .bind(&submission.name)
        .bind(&submission.crush)
        .bind(submitted_at)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(inserted) => {
                let submission = Submission::from_db(&inserted).map_err(anyhow::Error::from)?;
                info!("Stored submission {:?}", submission.id);
                Ok(submission)
            }
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                debug!("Rejected duplicate submission");
                Err(SubmitError::Duplicate)
            }
            Err(err) => Err(SubmitError::Internal(err.into())),
        }
    }

    /// Several rows may share a student id under different names; the
    /// earliest stored one wins.
    pub async fn find_by_student_id(
        &self,
        student_id: &str,
    ) -> Result<Option<Submission>, anyhow::Error> {
        let found = query_as::<_, SqlSubmission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE student_id = $1 ORDER BY id LIMIT 1"
        ))
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        match found {
            Some(found) => Ok(Some(Submission::from_db(&found)?)),
            None => Ok(None),
        }
    }

    /// Finds someone called `crush` who named `name` as their crush.
    pub async fn find_reciprocal(
        &self,
        name: &str,
        crush: &str,
    ) -> Result<Option<Submission>, anyhow::Error> {
        let found = query_as::<_, SqlSubmission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE name = $1 AND crush = $2 ORDER BY id LIMIT 1"
        ))
        .bind(crush)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        match found {
            Some(found) => Ok(Some(Submission::from_db(&found)?)),
            None => Ok(None),
        }
    }

    /// All submissions, newest first.
    pub async fn list_all(&self) -> Result<Vec<Submission>, anyhow::Error> {
        let rows = query_as::<_, SqlSubmission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions ORDER BY id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(Submission::from_db)
            .collect::<Result<Vec<_>, _>>()?)
    }

    pub async fn count(&self) -> Result<i64, anyhow::Error> {
        let count = query_scalar::<_, i64>("SELECT COUNT(*) FROM submissions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// A `submissions` row as stored, also the shape of an exported record.
#[derive(Debug, FromRow)]
pub struct SqlSubmission {
    pub id: i64,
    pub student_id: String,
    pub name: String,
    pub crush: String,
    pub created_at: String,
}

impl DBConvertible for Submission {
    type DBType = SqlSubmission;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        Ok(SqlSubmission {
            id: self.id.to_db()?,
            student_id: self.student_id.clone(),
            name: self.name.clone(),
            crush: self.crush.clone(),
            created_at: self.submitted_at.to_db()?,
        })
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        Ok(Submission {
            id: SubmissionId::from_db(&value.id)?,
            student_id: value.student_id.clone(),
            name: value.name.clone(),
            crush: value.crush.clone(),
            submitted_at: UtcDateTime::from_db(&value.created_at)?,
        })
    }
}
