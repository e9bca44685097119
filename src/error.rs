use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;
use tracing::error;

/// Everything a profile or salary request can fail with. Each variant renders
/// as a single `{"error": "..."}` message; unsaved drafts are never touched.
#[derive(Debug, Display)]
pub enum ProfileError {
    #[display(fmt = "Unauthorized")]
    Unauthorized,
    #[display(fmt = "{}", _0)]
    Forbidden(&'static str),
    #[display(fmt = "Employee record not found")]
    NotFound,
    #[display(fmt = "{}", _0)]
    Validation(String),
    #[display(fmt = "No open salary draft for this employee")]
    NoDraft,
    #[display(fmt = "Record store failure: {}", _0)]
    Persistence(String),
}

impl std::error::Error for ProfileError {}

impl From<sqlx::Error> for ProfileError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => ProfileError::NotFound,
            other => ProfileError::Persistence(other.to_string()),
        }
    }
}

impl ResponseError for ProfileError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProfileError::Unauthorized => StatusCode::UNAUTHORIZED,
            ProfileError::Forbidden(_) => StatusCode::FORBIDDEN,
            ProfileError::NotFound | ProfileError::NoDraft => StatusCode::NOT_FOUND,
            ProfileError::Validation(_) => StatusCode::BAD_REQUEST,
            ProfileError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ProfileError::Persistence(_) => {
                error!(error = %self, "Record store request failed");
                "Something went wrong, Contact with system admin".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_variants_to_status_codes() {
        assert_eq!(ProfileError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ProfileError::Forbidden("HR/Admin only").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ProfileError::NoDraft.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ProfileError::Validation("Invalid date of birth format".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProfileError::from(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn missing_row_is_not_found() {
        assert!(matches!(
            ProfileError::from(sqlx::Error::RowNotFound),
            ProfileError::NotFound
        ));
    }

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(
            ProfileError::Validation("Invalid date of joining format".into()).to_string(),
            "Invalid date of joining format"
        );
        assert_eq!(ProfileError::NotFound.to_string(), "Employee record not found");
    }
}
