//! Unified error type for the order board.
//!
//! Every failure is scoped to the operation that produced it. `Error::kind`
//! groups variants so callers can decide whether to re-prompt, re-login or
//! re-issue the request.

use crate::entities::MenuCategory;
use thiserror::Error;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user input; nothing was changed.
    Validation,
    /// A rule about the current state refused the operation.
    Precondition,
    /// Username/pin mismatch or an expired session.
    Authentication,
    /// The acting administrator may not perform this operation.
    Authorization,
    /// The referenced record does not exist (anymore).
    NotFound,
    /// Backing store or file system failure. Not retried automatically.
    Persistence,
    /// Startup configuration problem.
    Configuration,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid unit price '{input}': must be a positive whole number")]
    InvalidPrice { input: String },

    #[error("Item name cannot be empty")]
    EmptyItemName,

    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("Amount too large: {item_name} would push the total past the supported maximum")]
    AmountTooLarge { item_name: String },

    #[error("Invalid cutoff time '{input}': expected HH:MM")]
    InvalidCutoffTime { input: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Please choose who is ordering")]
    MissingRequester,

    #[error("The cart is empty")]
    EmptyCart,

    #[error("Ordering is closed for {category:?}")]
    OrderingClosed { category: MenuCategory },

    #[error("Username '{username}' already exists")]
    DuplicateUsername { username: String },

    #[error("No orders to export")]
    NothingToExport,

    #[error("Invalid username or pin")]
    AuthenticationFailed,

    #[error("Administrator session has expired")]
    SessionExpired,

    #[error("Permission denied: {reason}")]
    PermissionDenied { reason: String },

    #[error("Order {id} not found")]
    OrderNotFound { id: i64 },

    #[error("Menu {id} not found")]
    MenuNotFound { id: i64 },

    #[error("Requester {id} not found")]
    RequesterNotFound { id: i64 },

    #[error("Administrator {id} not found")]
    AdministratorNotFound { id: i64 },

    #[error("Announcement {id} not found")]
    AnnouncementNotFound { id: i64 },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Returns the category this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } => ErrorKind::Configuration,
            Self::InvalidPrice { .. }
            | Self::EmptyItemName
            | Self::InvalidQuantity
            | Self::AmountTooLarge { .. }
            | Self::InvalidCutoffTime { .. }
            | Self::InvalidInput { .. } => ErrorKind::Validation,
            Self::MissingRequester
            | Self::EmptyCart
            | Self::OrderingClosed { .. }
            | Self::DuplicateUsername { .. }
            | Self::NothingToExport => ErrorKind::Precondition,
            Self::AuthenticationFailed | Self::SessionExpired => ErrorKind::Authentication,
            Self::PermissionDenied { .. } => ErrorKind::Authorization,
            Self::OrderNotFound { .. }
            | Self::MenuNotFound { .. }
            | Self::RequesterNotFound { .. }
            | Self::AdministratorNotFound { .. }
            | Self::AnnouncementNotFound { .. } => ErrorKind::NotFound,
            Self::Database(_) | Self::Io(_) | Self::Csv(_) => ErrorKind::Persistence,
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
