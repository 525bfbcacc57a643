//! Error types for xpanel-web
//!
//! Every variant is rendered into the response envelope by the controllers;
//! none of them ends the process.

use thiserror::Error;

/// Panel operation error
#[derive(Debug, Error)]
pub enum PanelError {
    /// Old username/password do not match the session identity
    #[error("incorrect_old_username_password")]
    IncorrectOldCredentials,

    /// New username or new password is empty
    #[error("new_username_password_empty")]
    EmptyNewCredentials,

    /// Login with an unknown username/password pair
    #[error("wrong_username_or_password")]
    WrongCredentials,

    /// Settings bundle rejected before persisting
    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    /// No server loop is listening for restart signals
    #[error("panel restart is unavailable: server loop has stopped")]
    RestartUnavailable,

    /// Settings or user store failure
    #[error(transparent)]
    Common(#[from] xpanel_common::Error),

    /// Host connection table query failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for panel operations
pub type PanelResult<T> = Result<T, PanelError>;
