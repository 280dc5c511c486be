//! Service-layer error type
//!
//! `ServiceError` bridges store errors (`StoreError`) and the API-layer
//! error (`AppError`) so flows can use `?` on both. Typed store conflicts
//! become their specific conflict codes; infrastructure failures are logged
//! here and surface as `InternalError`.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::db::{StoreError, UniqueField};

#[derive(Debug)]
pub enum ServiceError {
    /// Store error (constraint violation or infrastructure failure)
    Store(StoreError),
    /// Business-rule error (already an AppError with the correct ErrorCode)
    App(AppError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Store(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<UniqueField> for ErrorCode {
    fn from(field: UniqueField) -> Self {
        match field {
            UniqueField::UserEmail => ErrorCode::EmailExists,
            UniqueField::RestaurantName => ErrorCode::RestaurantNameExists,
            UniqueField::BusinessNumber => ErrorCode::BusinessNumberExists,
            UniqueField::UrlSlug => ErrorCode::UrlSlugExists,
            UniqueField::DishName => ErrorCode::DishNameExists,
            UniqueField::RestaurantOwner => ErrorCode::RestaurantAlreadyAssigned,
            UniqueField::Other => ErrorCode::DuplicateEntry,
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Store(StoreError::Conflict(field)) => AppError::new(field.into()),
            ServiceError::Store(StoreError::Integrity(message)) => {
                tracing::warn!(%message, "Store integrity violation");
                AppError::new(ErrorCode::DuplicateEntry)
            }
            ServiceError::Store(StoreError::NotFound(what)) => AppError::not_found(what),
            ServiceError::Store(StoreError::Database(db_err)) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_conflicts_map_to_specific_codes() {
        let err: AppError = ServiceError::from(StoreError::Conflict(UniqueField::UserEmail)).into();
        assert_eq!(err.code, ErrorCode::EmailExists);
        assert_eq!(err.http_status(), StatusCode::CONFLICT);

        let err: AppError =
            ServiceError::from(StoreError::Conflict(UniqueField::BusinessNumber)).into();
        assert_eq!(err.code, ErrorCode::BusinessNumberExists);
    }

    #[test]
    fn test_integrity_maps_to_duplicate_entry() {
        let err: AppError =
            ServiceError::from(StoreError::Integrity("fk violation".to_string())).into();
        assert_eq!(err.code, ErrorCode::DuplicateEntry);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.message,
            "Database integrity error: Duplicate or invalid entry"
        );
    }

    #[test]
    fn test_database_error_is_internal() {
        let err: AppError =
            ServiceError::from(StoreError::Database(sqlx::Error::PoolTimedOut)).into();
        assert_eq!(err.code, ErrorCode::InternalError);
    }

    #[test]
    fn test_app_error_passes_through() {
        let err: AppError = ServiceError::from(AppError::new(ErrorCode::NotParentRestaurant)).into();
        assert_eq!(err.code, ErrorCode::NotParentRestaurant);
    }
}
