use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures that end route display for a page.
///
/// Each one is terminal for the current page: nothing is retried and no
/// partial route is produced.
#[derive(Error, Debug)]
pub enum RouteError {
    #[error("Failed to load route: {0}")]
    Network(String),

    #[error("Failed to parse GPX XML: {0}")]
    XmlParse(String),

    #[error("No track points found in GPX file")]
    EmptyRoute,

    #[error("Track point {index} has a missing or invalid `{attribute}` attribute")]
    InvalidTrackpoint {
        index: usize,
        attribute: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found")]
    NotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Route(RouteError::Network(e)) => {
                error!("Route fetch failed: {e}");
                StatusCode::BAD_GATEWAY
            }
            AppError::Route(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_error_messages() {
        assert_eq!(
            RouteError::EmptyRoute.to_string(),
            "No track points found in GPX file"
        );
        assert_eq!(
            RouteError::InvalidTrackpoint {
                index: 3,
                attribute: "lat"
            }
            .to_string(),
            "Track point 3 has a missing or invalid `lat` attribute"
        );
    }

    #[test]
    fn test_status_codes() {
        let network = AppError::from(RouteError::Network("404 Not Found".into())).into_response();
        assert_eq!(network.status(), StatusCode::BAD_GATEWAY);

        let parse = AppError::from(RouteError::XmlParse("bad".into())).into_response();
        assert_eq!(parse.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let empty = AppError::from(RouteError::EmptyRoute).into_response();
        assert_eq!(empty.status(), StatusCode::UNPROCESSABLE_ENTITY);

        assert_eq!(AppError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::InvalidInput("cap".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
