use crate::api::v1::handler::ApiResponse;
use crate::application_port::*;
use serde::{Serialize, Serializer};
use std::convert::Infallible;
use thiserror::Error;
use tracing::warn;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    if let Some(err) = err.find::<ApiErrorCode>() {
        let json = warp::reply::json(&ApiResponse::<()>::err(err.clone(), err.to_string()));
        Ok(warp::reply::with_status(json, err.status()))
    } else if err.is_not_found() {
        let json = warp::reply::json(&ApiResponse::<()>::err(
            ApiErrorCode::RouteNotFound,
            ApiErrorCode::RouteNotFound.to_string(),
        ));
        Ok(warp::reply::with_status(json, StatusCode::NOT_FOUND))
    } else {
        let json = warp::reply::json(&ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(ApiError {
                code: ApiErrorCode::InternalError,
                message: format!("Unhandled error: {:?}", err),
            }),
        });
        Ok(warp::reply::with_status(
            json,
            StatusCode::INTERNAL_SERVER_ERROR,
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Error)]
pub enum ApiErrorCode {
    #[error("{0}")]
    AlreadyExists(String),
    #[error("{0}")]
    ValidationFailed(String),
    #[error("{0}")]
    NotFound(String),
    #[error("No registered recipient matches {0:?}")]
    RecipientNotFound(String),
    #[error("Replied-to message does not exist")]
    ParentNotFound,
    #[error("Token is not valid")]
    InvalidToken,
    #[error("Token has expired")]
    TokenExpired,
    #[error("No such route")]
    RouteNotFound,
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ApiErrorCode::AlreadyExists(_) => "AlreadyExists",
            ApiErrorCode::ValidationFailed(_) => "ValidationFailed",
            ApiErrorCode::NotFound(_) => "NotFound",
            ApiErrorCode::RecipientNotFound(_) => "RecipientNotFound",
            ApiErrorCode::ParentNotFound => "ParentNotFound",
            ApiErrorCode::InvalidToken => "InvalidToken",
            ApiErrorCode::TokenExpired => "TokenExpired",
            ApiErrorCode::RouteNotFound => "RouteNotFound",
            ApiErrorCode::InternalError => "InternalError",
        }
    }

    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }

    /// Domain refusals travel in the envelope with 200, like the rest of the
    /// API; auth and infrastructure failures use real status codes.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::InvalidToken | ApiErrorCode::TokenExpired => StatusCode::UNAUTHORIZED,
            ApiErrorCode::RouteNotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::OK,
        }
    }
}

impl Serialize for ApiErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<RelationError> for ApiErrorCode {
    fn from(error: RelationError) -> Self {
        match error {
            RelationError::AlreadyExists(m) => ApiErrorCode::AlreadyExists(m),
            RelationError::Validation(m) => ApiErrorCode::ValidationFailed(m),
            RelationError::NotFound(m) => ApiErrorCode::NotFound(m),
            RelationError::Store(e) => ApiErrorCode::internal(e),
        }
    }
}

impl From<MessagingError> for ApiErrorCode {
    fn from(error: MessagingError) -> Self {
        match error {
            MessagingError::ParentNotFound(_) => ApiErrorCode::ParentNotFound,
            MessagingError::Relation(e) => e.into(),
            MessagingError::Store(e) => ApiErrorCode::internal(e),
        }
    }
}

impl From<PaymentError> for ApiErrorCode {
    fn from(error: PaymentError) -> Self {
        match error {
            PaymentError::RecipientNotFound(identifier) => {
                ApiErrorCode::RecipientNotFound(identifier)
            }
            PaymentError::Messaging(e) => e.into(),
            PaymentError::Store(e) => ApiErrorCode::internal(e),
        }
    }
}

impl From<AuthError> for ApiErrorCode {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::TokenInvalid => ApiErrorCode::InvalidToken,
            AuthError::TokenExpired => ApiErrorCode::TokenExpired,
            AuthError::InternalError(e) => ApiErrorCode::internal(e),
        }
    }
}
