use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::header,
    response::Html,
    Form, Json,
};
use serde::{Deserialize, Serialize};

use super::{pages, AppState, WebError};
use crate::models::types::TrimmedString;

/// Body of `/submit`, either JSON or a urlencoded form.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(rename = "studentNo")]
    student_no: Option<TrimmedString>,
    #[serde(rename = "studentId")]
    student_id: Option<TrimmedString>,
    name: Option<TrimmedString>,
    crush: Option<TrimmedString>,
}

impl SubmitRequest {
    /// `studentNo` wins unless blank, then `studentId` is used.
    fn student_id(&self) -> &str {
        [&self.student_no, &self.student_id]
            .into_iter()
            .flatten()
            .find(|value| !value.is_blank())
            .map_or("", |value| &**value)
    }

    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    fn crush(&self) -> &str {
        self.crush.as_deref().unwrap_or_default()
    }
}

#[async_trait]
impl<S> FromRequest<S> for SubmitRequest
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        let parsed = if is_json {
            Json::<SubmitRequest>::from_request(request, state)
                .await
                .map(|Json(body)| body)
                .map_err(|rejection| rejection.body_text())
        } else {
            Form::<SubmitRequest>::from_request(request, state)
                .await
                .map(|Form(body)| body)
                .map_err(|rejection| rejection.body_text())
        };

        parsed.map_err(WebError::Malformed)
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl SubmitResponse {
    pub fn accepted() -> SubmitResponse {
        SubmitResponse {
            ok: true,
            error: None,
        }
    }

    pub fn rejected(error: &'static str) -> SubmitResponse {
        SubmitResponse {
            ok: false,
            error: Some(error),
        }
    }
}

pub async fn index() -> Html<String> {
    pages::index()
}

pub async fn result_wait() -> Html<String> {
    pages::result_wait()
}

pub async fn submit(
    State(state): State<AppState>,
    request: SubmitRequest,
) -> Result<Json<SubmitResponse>, WebError> {
    state
        .submission_repository
        .submit(request.student_id(), request.name(), request.crush())
        .await?;

    Ok(Json(SubmitResponse::accepted()))
}

#[cfg(test)]
mod tests {
    use super::SubmitRequest;

    fn parse(json: &str) -> SubmitRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn student_no_takes_precedence() {
        let request = parse(r#"{"studentNo": " 1 ", "studentId": "5"}"#);
        assert_eq!(request.student_id(), "1");
    }

    #[test]
    fn blank_student_no_falls_back_to_student_id() {
        let request = parse(r#"{"studentNo": "  ", "studentId": "5", "name": "A"}"#);
        assert_eq!(request.student_id(), "5");
        assert_eq!(request.name(), "A");
    }

    #[test]
    fn missing_and_null_fields_are_empty() {
        let request = parse(r#"{"studentNo": null}"#);
        assert_eq!(request.student_id(), "");
        assert_eq!(request.name(), "");
        assert_eq!(request.crush(), "");
    }
}
