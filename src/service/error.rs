use thiserror::Error;
use uuid::Uuid;

use crate::error::HttpError;
use axum::http::StatusCode;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Job {0} not found")]
    JobNotFound(Uuid),

    #[error("Bid {0} not found")]
    BidNotFound(Uuid),

    #[error("Service provider profile not found for user {0}")]
    ProviderProfileNotFound(Uuid),

    #[error("Dispute {0} not found")]
    DisputeNotFound(Uuid),

    #[error("User {0} not found")]
    UserNotFound(Uuid),

    #[error("User {0} is not authorized to perform this action on job {1}")]
    UnauthorizedJobAccess(Uuid, Uuid),

    #[error("Bid is already accepted")]
    BidAlreadyAccepted,

    #[error("Another bid has already been accepted for this job")]
    JobAlreadyAssigned,

    #[error("You have already placed a bid on this job")]
    DuplicateBid,

    #[error("Job is not assigned to any service provider")]
    JobNotAssigned,

    #[error("Job is already marked complete")]
    AlreadyComplete,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payment provider error: {0}")]
    Payment(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::JobNotFound(_)
            | ServiceError::BidNotFound(_)
            | ServiceError::ProviderProfileNotFound(_)
            | ServiceError::DisputeNotFound(_)
            | ServiceError::UserNotFound(_) => HttpError::not_found(error.to_string()),

            ServiceError::BidAlreadyAccepted
            | ServiceError::JobAlreadyAssigned
            | ServiceError::DuplicateBid
            | ServiceError::JobNotAssigned
            | ServiceError::AlreadyComplete
            | ServiceError::Validation(_) => HttpError::bad_request(error.to_string()),

            ServiceError::UnauthorizedJobAccess(_, _) => HttpError::unauthorized(error.to_string()),

            ServiceError::Payment(_) => HttpError::bad_request(error.to_string()),

            _ => HttpError::server_error(error.to_string()),
        }
    }
}

impl From<String> for ServiceError {
    fn from(err: String) -> Self {
        ServiceError::Other(err)
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::JobNotFound(_)
            | ServiceError::BidNotFound(_)
            | ServiceError::ProviderProfileNotFound(_)
            | ServiceError::DisputeNotFound(_)
            | ServiceError::UserNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::BidAlreadyAccepted
            | ServiceError::JobAlreadyAssigned
            | ServiceError::DuplicateBid
            | ServiceError::JobNotAssigned
            | ServiceError::AlreadyComplete
            | ServiceError::Validation(_)
            | ServiceError::Payment(_) => StatusCode::BAD_REQUEST,

            ServiceError::UnauthorizedJobAccess(_, _) => StatusCode::UNAUTHORIZED,

            ServiceError::Database(_) | ServiceError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
