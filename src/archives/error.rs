//! Error types exposed by the archives-room client layer.

use thiserror::Error;

/// Errors surfaced while configuring the client or talking to the server.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeskError {
    /// Configuration could not be loaded or is incomplete.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// The configured server URL could not be parsed.
    #[error("server URL is invalid: {0}")]
    InvalidUrl(String),

    /// The server rejected the supplied credentials.
    #[error("the server rejected the credentials: {message}")]
    Authentication {
        /// Failure message extracted from the 401/403 response.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("{message}")]
    Api {
        /// HTTP status code returned by the server.
        status: u16,
        /// User-facing failure message extracted from the response body.
        message: String,
    },

    /// The request never produced a response.
    #[error("network error talking to the server: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The response body did not match the expected JSON shape.
    #[error("unexpected response from the server: {message}")]
    Decode {
        /// Deserialisation error detail.
        message: String,
    },

    /// The server answered 200 but flagged the action as unsuccessful.
    #[error("{message}")]
    ActionRejected {
        /// Message returned alongside `success: false`.
        message: String,
    },

    /// A batch control is disabled because its previous submission is still
    /// in flight.
    #[error("{control} is busy; wait for the previous submission to finish")]
    ControlDisabled {
        /// Name of the disabled control.
        control: String,
    },

    /// A batch action was requested with nothing selected.
    #[error("no {queue} requests are selected")]
    EmptySelection {
        /// Label of the queue with the empty selection.
        queue: String,
    },

    /// A desk command line could not be turned into an action.
    #[error("invalid command: {message}")]
    InvalidCommand {
        /// What was wrong with the command.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}
