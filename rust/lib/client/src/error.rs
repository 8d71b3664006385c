use thiserror::Error;

/// Failures surfaced to the user by the client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Rejected by client-side form rules; nothing was sent.
    #[error("{0}")]
    Form(String),

    /// The server answered with a failure status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never produced a usable response.
    #[error("request failed: {0}")]
    Transport(String),

    /// No issue with that id is loaded on the board.
    #[error("No issue with ID {0} is loaded")]
    UnknownIssue(String),

    /// Saving requires an issue to be selected for editing.
    #[error("No issue is being edited")]
    NotEditing,
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}
