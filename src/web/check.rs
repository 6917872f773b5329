use axum::{extract::State, response::Html, Form, Json};
use serde::{Deserialize, Serialize};

use super::{pages, AppState, WebError};
use crate::models::types::TrimmedString;

#[derive(Debug, Deserialize)]
pub struct CheckForm {
    #[serde(rename = "studentNo", alias = "studentId", default)]
    student_no: TrimmedString,
}

#[derive(Debug, Serialize)]
pub struct PublicStatus {
    pub public: bool,
}

pub async fn check_page() -> Html<String> {
    pages::check_form(None)
}

pub async fn check(
    State(state): State<AppState>,
    Form(form): Form<CheckForm>,
) -> Result<Html<String>, WebError> {
    if form.student_no.is_blank() {
        return Ok(pages::check_form(Some(pages::ENTER_STUDENT_NO)));
    }

    let outcome = state.match_service.check_result(&form.student_no).await?;

    Ok(pages::check_outcome(&outcome))
}

pub async fn public_status(State(state): State<AppState>) -> Result<Json<PublicStatus>, WebError> {
    Ok(Json(PublicStatus {
        public: state.visibility_repository.is_public().await?,
    }))
}
