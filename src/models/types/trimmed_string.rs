use std::{fmt::Display, ops::Deref};

use serde::Deserialize;

/// A string that has no leading or trailing whitespaces.
///
/// Implemented `From*` traits and `Deserialize` trim the strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct TrimmedString(String);

impl TrimmedString {
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for TrimmedString {
    fn from(value: String) -> Self {
        TrimmedString::from(value.as_str())
    }
}

impl From<&str> for TrimmedString {
    fn from(value: &str) -> Self {
        TrimmedString(value.trim().to_owned())
    }
}

impl From<TrimmedString> for String {
    fn from(value: TrimmedString) -> Self {
        value.0
    }
}

impl Display for TrimmedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TrimmedString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for TrimmedString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
