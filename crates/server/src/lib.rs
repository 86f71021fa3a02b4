use api_types::error::{ErrorResponse, IssueView};
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::IntoResponse,
};
use engine::{EngineError, IssueKind};

pub use server::{router, run_with_listener};

mod budgets;
mod categories;
mod expenses;
mod incomes;
mod server;

const MISSING_BODY: &str = "Missing request body";

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Generic(String),
    BadPayload(JsonRejection),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound { .. } => StatusCode::NOT_FOUND,
        EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::InvalidTransition(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn body_for_engine_error(err: EngineError) -> ErrorResponse {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            ErrorResponse {
                error: "internal server error".to_string(),
                issues: Vec::new(),
            }
        }
        EngineError::Validation(validation) => ErrorResponse {
            error: "Validation failed".to_string(),
            issues: validation
                .issues
                .into_iter()
                .map(|issue| IssueView {
                    field: issue.field,
                    kind: issue.kind.as_str().to_string(),
                    message: issue.message,
                })
                .collect(),
        },
        other => ErrorResponse {
            error: other.to_string(),
            issues: Vec::new(),
        },
    }
}

fn body_for_rejection(rejection: &JsonRejection) -> ErrorResponse {
    ErrorResponse {
        error: "Validation failed".to_string(),
        issues: vec![IssueView {
            field: "body".to_string(),
            kind: IssueKind::WrongType.as_str().to_string(),
            message: rejection.body_text(),
        }],
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), body_for_engine_error(err)),
            ServerError::Generic(error) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error,
                    issues: Vec::new(),
                },
            ),
            ServerError::BadPayload(rejection) => {
                (StatusCode::BAD_REQUEST, body_for_rejection(&rejection))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        let empty_body = match &value {
            JsonRejection::MissingJsonContentType(_) => true,
            JsonRejection::JsonSyntaxError(err) => err.body_text().contains("EOF while parsing"),
            _ => false,
        };
        if empty_body {
            Self::Generic(MISSING_BODY.to_string())
        } else {
            Self::BadPayload(value)
        }
    }
}
