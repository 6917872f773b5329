use std::str::FromStr;

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use strum::EnumString;
use tracing::info;

use super::{
    pages::{self, DataAdminView, GeneralAdminView},
    AppState, WebError,
};
use crate::{
    auth::{AdminRole, Credentials},
    export::write_csv,
    match_service::compute_stats,
    models::types::TrimmedString,
};

#[derive(Debug, Deserialize)]
pub struct AdminForm {
    #[serde(default)]
    code: TrimmedString,
    #[serde(default)]
    name: TrimmedString,
    #[serde(default)]
    crush: TrimmedString,
    action: Option<String>,
}

impl AdminForm {
    fn credentials(&self) -> Credentials {
        Credentials {
            code: self.code.clone(),
            name: self.name.clone(),
            crush: self.crush.clone(),
        }
    }

    fn action(&self) -> AdminAction {
        self.action
            .as_deref()
            .and_then(|action| AdminAction::from_str(action).ok())
            .unwrap_or(AdminAction::Show)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
enum AdminAction {
    Show,
    Toggle,
    Publish,
    Hide,
}

pub async fn general_admin_page() -> Html<String> {
    pages::general_admin(&GeneralAdminView::Login)
}

pub async fn general_admin(
    State(state): State<AppState>,
    Form(form): Form<AdminForm>,
) -> Result<Html<String>, WebError> {
    if state
        .admin_policy
        .authorize(AdminRole::General, &form.credentials())
        .is_err()
    {
        return Ok(pages::general_admin(&GeneralAdminView::Denied));
    }

    let action = form.action();
    let view = match action {
        AdminAction::Toggle => GeneralAdminView::Toggled {
            public: state.visibility_repository.toggle_public().await?,
        },
        AdminAction::Publish | AdminAction::Hide => {
            let public = action == AdminAction::Publish;
            state.visibility_repository.set_public(public).await?;
            GeneralAdminView::Toggled { public }
        }
        AdminAction::Show => GeneralAdminView::Overview {
            participant_count: state.submission_repository.count().await?,
            public: state.visibility_repository.is_public().await?,
        },
    };

    Ok(pages::general_admin(&view))
}

pub async fn data_admin_page() -> Html<String> {
    pages::data_admin(&DataAdminView::Login)
}

pub async fn data_admin(
    State(state): State<AppState>,
    Form(form): Form<AdminForm>,
) -> Result<Html<String>, WebError> {
    let credentials = form.credentials();

    if state
        .admin_policy
        .authorize(AdminRole::Data, &credentials)
        .is_err()
    {
        return Ok(pages::data_admin(&DataAdminView::Denied));
    }

    let entries = state.submission_repository.list_all().await?;
    let stats = compute_stats(&entries);

    Ok(pages::data_admin(&DataAdminView::Entries {
        entries: &entries,
        stats,
        credentials: &credentials,
    }))
}

pub async fn export(
    State(state): State<AppState>,
    Form(form): Form<AdminForm>,
) -> Result<Response, WebError> {
    state
        .admin_policy
        .authorize(AdminRole::Data, &form.credentials())?;

    let entries = state.submission_repository.list_all().await?;
    let csv = write_csv(&entries).map_err(anyhow::Error::from)?;

    info!("Exported {} submissions", entries.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, r#"attachment; filename="entries.csv""#),
        ],
        csv,
    )
        .into_response())
}
