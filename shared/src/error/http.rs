//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::RestaurantNotFound
            | Self::NoRestaurantAssigned
            | Self::OperationsTimeNotFound
            | Self::UserNotFound
            | Self::DishNotFound
            | Self::CategoryNotFound
            | Self::AddonNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::RestaurantAlreadyAssigned
            | Self::RestaurantNameExists
            | Self::BusinessNumberExists
            | Self::UrlSlugExists
            | Self::EmailExists
            | Self::DishNameExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::EmailNotRegistered
            | Self::RefreshTokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::AccountInactive => StatusCode::FORBIDDEN,

            // 412 Precondition Failed
            Self::NotParentRestaurant => StatusCode::PRECONDITION_FAILED,

            // 413 Payload Too Large
            Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::FileStorageFailed => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (validation, malformed input, integrity violations)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
