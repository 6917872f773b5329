use crate::{
    models::Submission,
    repository::{DBConvertible, DBToConversionError, SqlSubmission},
};

pub const CSV_HEADER: [&str; 5] = ["id", "studentId", "name", "crush", "createdAt"];
const LINE_END: &str = "\r\n";

/// Renders submissions as CSV, one record per line in the given order.
pub fn write_csv(submissions: &[Submission]) -> Result<String, DBToConversionError> {
    let mut out = String::new();
    write_record(&mut out, CSV_HEADER);

    for submission in submissions {
        let row: SqlSubmission = submission.to_db()?;
        let id = row.id.to_string();
        write_record(
            &mut out,
            [
                id.as_str(),
                row.student_id.as_str(),
                row.name.as_str(),
                row.crush.as_str(),
                row.created_at.as_str(),
            ],
        );
    }

    Ok(out)
}

fn write_record<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_field(out, field);
    }
    out.push_str(LINE_END);
}

fn write_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\r', '\n']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::write_csv;
    use crate::{
        models::{types::UtcDateTime, Submission, SubmissionId},
        repository::DBToConversionError,
    };

    fn submission(id: u64, student_id: &str, name: &str, crush: &str) -> Submission {
        Submission {
            id: SubmissionId(id),
            student_id: student_id.to_string(),
            name: name.to_string(),
            crush: crush.to_string(),
            submitted_at: UtcDateTime::assume_utc(datetime!(2024-02-14 09:30:00.25)),
        }
    }

    #[test]
    fn empty_export_has_only_header() {
        assert_eq!(
            write_csv(&[]).unwrap(),
            "id,studentId,name,crush,createdAt\r\n"
        );
    }

    #[test]
    fn rows_keep_given_order() {
        let rows = [submission(2, "2", "B", "A"), submission(1, "1", "A", "B")];

        assert_eq!(
            write_csv(&rows).unwrap(),
            "id,studentId,name,crush,createdAt\r\n\
             2,2,B,A,2024-02-14T09:30:00.250000\r\n\
             1,1,A,B,2024-02-14T09:30:00.250000\r\n"
        );
    }

    #[test]
    fn special_characters_are_quoted() {
        let rows = [submission(1, "1", "Kim, Minji", "the \"one\"\nand only")];

        assert_eq!(
            write_csv(&rows).unwrap(),
            "id,studentId,name,crush,createdAt\r\n\
             1,1,\"Kim, Minji\",\"the \"\"one\"\"\nand only\",2024-02-14T09:30:00.250000\r\n"
        );
    }

    #[test]
    fn unicode_is_written_verbatim() {
        let rows = [submission(1, "20231234", "김민지", "이하나")];

        assert!(write_csv(&rows)
            .unwrap()
            .ends_with("1,20231234,김민지,이하나,2024-02-14T09:30:00.250000\r\n"));
    }

    #[test]
    fn id_out_of_storage_range_is_rejected() {
        let rows = [submission(u64::MAX, "1", "A", "B")];

        assert!(matches!(
            write_csv(&rows),
            Err(DBToConversionError::InvalidNumber(u64::MAX))
        ));
    }
}
