//! Unified error codes for the menu platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Restaurant errors
//! - 4xxx: User errors
//! - 6xxx: Catalog errors (65xx: file upload)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so clients can match on
/// them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 6,

    // ==================== 1xxx: Auth ====================
    /// Missing, malformed or unverifiable credentials
    NotAuthenticated = 1001,
    /// Password does not match
    InvalidCredentials = 1002,
    /// Token (or its stored session) has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// No account for the given email
    EmailNotRegistered = 1005,
    /// Presented refresh token is not the live one
    RefreshTokenInvalid = 1006,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Account has been deactivated
    AccountInactive = 2002,

    // ==================== 3xxx: Restaurant ====================
    /// Restaurant not found
    RestaurantNotFound = 3001,
    /// Acting user owns no restaurant
    NoRestaurantAssigned = 3002,
    /// Acting user already owns a restaurant
    RestaurantAlreadyAssigned = 3003,
    /// Restaurant name taken
    RestaurantNameExists = 3004,
    /// Business number taken
    BusinessNumberExists = 3005,
    /// URL slug taken
    UrlSlugExists = 3006,
    /// Owned restaurant is itself a branch
    NotParentRestaurant = 3007,
    /// Branch creation requires an owner email
    BranchUserEmailRequired = 3008,
    /// Operations time entry not found
    OperationsTimeNotFound = 3009,

    // ==================== 4xxx: User ====================
    /// User not found
    UserNotFound = 4001,
    /// Email already registered
    EmailExists = 4002,
    /// Password shorter than the minimum
    PasswordTooShort = 4003,

    // ==================== 6xxx: Catalog ====================
    /// Dish not found
    DishNotFound = 6001,
    /// Dish name already used in this restaurant
    DishNameExists = 6002,
    /// Category not found
    CategoryNotFound = 6003,
    /// Add-on not found
    AddonNotFound = 6004,
    /// Price must be positive with at most two decimals
    InvalidPrice = 6005,

    // ==================== 65xx: Upload ====================
    /// Uploaded file exceeds the size ceiling
    FileTooLarge = 6501,
    /// File extension not in the allow-list
    UnsupportedFileFormat = 6502,
    /// File content could not be decoded as an image
    InvalidImageFile = 6503,
    /// File could not be written to storage
    FileStorageFailed = 6504,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// Unique or foreign-key constraint violated
    DuplicateEntry = 9101,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the English message shown to API clients by default
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "Could not validate credentials",
            ErrorCode::InvalidCredentials => "Invalid Login Credentials.",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Token is invalid",
            ErrorCode::EmailNotRegistered => "Email is not registered with us.",
            ErrorCode::RefreshTokenInvalid => "Invalid refresh token",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AccountInactive => "Your account is inactive. Please contact support.",

            // Restaurant
            ErrorCode::RestaurantNotFound => "Restaurant not found",
            ErrorCode::NoRestaurantAssigned => "This user is not a restaurant owner.",
            ErrorCode::RestaurantAlreadyAssigned => "You already have a restaurant assigned",
            ErrorCode::RestaurantNameExists => {
                "A restaurant with the provided name already exists."
            }
            ErrorCode::BusinessNumberExists => {
                "A restaurant with the provided business number already exists."
            }
            ErrorCode::UrlSlugExists => "A restaurant with the provided URL slug already exists.",
            ErrorCode::NotParentRestaurant => "User's restaurant is not a parent restaurant.",
            ErrorCode::BranchUserEmailRequired => "A user email is required to create a branch",
            ErrorCode::OperationsTimeNotFound => "Operations time not found",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::EmailExists => "A user with the provided email already exists.",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",

            // Catalog
            ErrorCode::DishNotFound => "Dish not found",
            ErrorCode::DishNameExists => "A dish already exist with the provided dish name.",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::AddonNotFound => "Add-on not found",
            ErrorCode::InvalidPrice => "Price must be greater than 0 with at most 2 decimals",

            // Upload
            ErrorCode::FileTooLarge => "File exceeds the maximum allowed size",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "File is not a valid image",
            ErrorCode::FileStorageFailed => "Failed to store file",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::DuplicateEntry => "Database integrity error: Duplicate or invalid entry",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::EmailNotRegistered),
            1006 => Ok(ErrorCode::RefreshTokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AccountInactive),

            // Restaurant
            3001 => Ok(ErrorCode::RestaurantNotFound),
            3002 => Ok(ErrorCode::NoRestaurantAssigned),
            3003 => Ok(ErrorCode::RestaurantAlreadyAssigned),
            3004 => Ok(ErrorCode::RestaurantNameExists),
            3005 => Ok(ErrorCode::BusinessNumberExists),
            3006 => Ok(ErrorCode::UrlSlugExists),
            3007 => Ok(ErrorCode::NotParentRestaurant),
            3008 => Ok(ErrorCode::BranchUserEmailRequired),
            3009 => Ok(ErrorCode::OperationsTimeNotFound),

            // User
            4001 => Ok(ErrorCode::UserNotFound),
            4002 => Ok(ErrorCode::EmailExists),
            4003 => Ok(ErrorCode::PasswordTooShort),

            // Catalog
            6001 => Ok(ErrorCode::DishNotFound),
            6002 => Ok(ErrorCode::DishNameExists),
            6003 => Ok(ErrorCode::CategoryNotFound),
            6004 => Ok(ErrorCode::AddonNotFound),
            6005 => Ok(ErrorCode::InvalidPrice),

            // Upload
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::InvalidImageFile),
            6504 => Ok(ErrorCode::FileStorageFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),
            9101 => Ok(ErrorCode::DuplicateEntry),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
