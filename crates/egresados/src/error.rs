// File: src/error.rs
// Purpose: Handler error type and its HTTP mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};

/// Error returned by every handler
#[derive(Debug)]
pub enum AppError {
    /// A 404 Not Found (e.g., no record with that matrícula)
    NotFound(String),
    /// A 400 for requests that make no sense even before validation
    BadRequest(String),
    /// No live session; sends the browser to the login page
    Unauthorized,
    /// A standard 500 Internal Server Error (e.g., database failure)
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Unauthorized => Redirect::to("/login").into_response(),
            AppError::Internal(err) => {
                tracing::error!("Internal server error: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong").into_response()
            }
        }
    }
}

// Allows `?` on sqlx, io, auth and backup errors inside handlers
impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError::Internal(err.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("missing".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::BadRequest("bad".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(anyhow::anyhow!("boom")).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unauthorized_redirects_to_login() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    }

    #[test]
    fn test_question_mark_conversion() {
        fn failing() -> AppResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"))?;
            Ok(())
        }
        assert!(matches!(failing(), Err(AppError::Internal(_))));
    }
}
