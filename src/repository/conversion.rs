use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, PrimitiveDateTime};

use crate::models::{types::UtcDateTime, SubmissionId};

/// Storage and export format of timestamps, e.g. `2024-02-14T09:30:00.000000`.
const DATETIME_FORMAT: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]");

pub trait DBConvertible: Sized {
    type DBType;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError>;

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError>;
}

#[derive(Debug, Error)]
pub enum DBFromConversionError {
    #[error("Failed to parse datetime: {0}")]
    DateTime(#[from] time::error::Parse),
    #[error("Invalid number: {0}")]
    InvalidNumber(i64),
}

#[derive(Debug, Error)]
pub enum DBToConversionError {
    #[error("Failed to format datetime")]
    DateTime(#[from] time::error::Format),
    #[error("Number out of range: {0}")]
    InvalidNumber(u64),
}

impl DBConvertible for UtcDateTime {
    type DBType = String;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        Ok(self.inner().format(DATETIME_FORMAT)?)
    }

    fn from_db(db_value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        let datetime = PrimitiveDateTime::parse(db_value, DATETIME_FORMAT)?;
        Ok(UtcDateTime::assume_utc(datetime))
    }
}

impl DBConvertible for SubmissionId {
    type DBType = i64;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        i64::try_from(self.0).map_err(|_| DBToConversionError::InvalidNumber(self.0))
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        u64::try_from(*value)
            .map(SubmissionId)
            .map_err(|_| DBFromConversionError::InvalidNumber(*value))
    }
}
