use strum::Display;
use thiserror::Error;

use crate::models::types::TrimmedString;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum AdminRole {
    /// Sees the participant count and flips result visibility.
    General,
    /// Sees and exports every submission.
    Data,
}

/// What an admin types into the login form. Re-sent with every privileged request.
#[derive(Clone, Debug, Default)]
pub struct Credentials {
    pub code: TrimmedString,
    pub name: TrimmedString,
    pub crush: TrimmedString,
}

/// Deliberately says nothing about which part of the credentials was wrong.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Access denied")]
pub struct AuthorizationError;

pub trait AdminPolicy: Send + Sync {
    fn authorize(&self, role: AdminRole, credentials: &Credentials)
        -> Result<(), AuthorizationError>;
}

#[derive(Clone, Debug)]
pub struct GeneralAdmin {
    pub code: String,
    pub names: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct DataAdmin {
    pub code: String,
    pub name: String,
    pub crush: String,
}

/// Shared secrets loaded from configuration.
#[derive(Clone, Debug)]
pub struct StaticAdminPolicy {
    general: GeneralAdmin,
    data: DataAdmin,
}

impl StaticAdminPolicy {
    pub fn new(general: GeneralAdmin, data: DataAdmin) -> StaticAdminPolicy {
        StaticAdminPolicy { general, data }
    }
}

impl AdminPolicy for StaticAdminPolicy {
    #[tracing::instrument(skip(self, credentials))]
    fn authorize(
        &self,
        role: AdminRole,
        credentials: &Credentials,
    ) -> Result<(), AuthorizationError> {
        if credentials.code.is_blank() {
            return Err(AuthorizationError);
        }

        let allowed = match role {
            AdminRole::General => {
                *credentials.code == self.general.code
                    && self
                        .general
                        .names
                        .iter()
                        .any(|name| *credentials.name == **name)
            }
            AdminRole::Data => {
                *credentials.code == self.data.code
                    && *credentials.name == self.data.name
                    && *credentials.crush == self.data.crush
            }
        };

        if allowed {
            Ok(())
        } else {
            tracing::warn!("Rejected {role} admin credentials");
            Err(AuthorizationError)
        }
    }
}
