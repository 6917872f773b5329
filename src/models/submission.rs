use thiserror::Error;

use super::types::{TrimmedString, UtcDateTime};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub id: SubmissionId,
    pub student_id: String,
    pub name: String,
    pub crush: String,
    pub submitted_at: UtcDateTime,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Field `{field}` is required")]
pub struct ValidationError {
    pub field: &'static str,
}

/// A submission that passed validation but is not stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub student_id: String,
    pub name: String,
    pub crush: String,
    pub submitted_at: UtcDateTime,
}

impl NewSubmission {
    pub fn new(
        student_id: impl Into<TrimmedString>,
        name: impl Into<TrimmedString>,
        crush: impl Into<TrimmedString>,
        submitted_at: UtcDateTime,
    ) -> Result<NewSubmission, ValidationError> {
        Ok(NewSubmission {
            student_id: required("studentId", student_id.into())?,
            name: required("name", name.into())?,
            crush: required("crush", crush.into())?,
            submitted_at,
        })
    }
}

fn required(field: &'static str, value: TrimmedString) -> Result<String, ValidationError> {
    if value.is_blank() {
        Err(ValidationError { field })
    } else {
        Ok(value.into())
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn at() -> UtcDateTime {
        UtcDateTime::assume_utc(datetime!(2024-02-14 12:00))
    }

    #[test]
    fn trims_all_fields() {
        let submission = NewSubmission::new(" 20231234 ", "\tKim Minji ", " Lee Hana\n", at())
            .expect("Fields are not blank");

        assert_eq!(submission.student_id, "20231234");
        assert_eq!(submission.name, "Kim Minji");
        assert_eq!(submission.crush, "Lee Hana");
    }

    #[test]
    fn rejects_blank_student_id() {
        assert_eq!(
            NewSubmission::new("   ", "A", "B", at()),
            Err(ValidationError { field: "studentId" })
        );
    }

    #[test]
    fn rejects_blank_name() {
        assert_eq!(
            NewSubmission::new("1", "", "B", at()),
            Err(ValidationError { field: "name" })
        );
    }

    #[test]
    fn rejects_whitespace_only_crush() {
        assert_eq!(
            NewSubmission::new("1", "A", " \t ", at()),
            Err(ValidationError { field: "crush" })
        );
    }
}
