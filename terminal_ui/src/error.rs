use std::io;

use thiserror::Error;

/// Failure of a single round trip to the remote store.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("tarefas store unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("tarefas store answered HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response from tarefas store: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ApiError {
    /// Classifies an error raised while reading a response body.
    pub(crate) fn from_body(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err)
        } else {
            ApiError::Unreachable(err)
        }
    }

    /// Short reason shown in notifications.
    pub fn reason(&self) -> String {
        match self {
            ApiError::Unreachable(_) => "servidor inacessível".to_string(),
            ApiError::Status { status, .. } => format!("HTTP {}", status),
            ApiError::Decode(_) => "resposta inválida".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("base URL `{0}` cannot carry task ids")]
    BaseUrl(String),

    #[error("no tarefa with id {0}")]
    UnknownTarefa(String),

    #[error("logger already initialized: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_reports_code_and_body() {
        let err = ApiError::Status {
            status: 404,
            body: "not here".into(),
        };
        assert_eq!(err.to_string(), "tarefas store answered HTTP 404: not here");
        assert_eq!(err.reason(), "HTTP 404");
    }

    #[test]
    fn api_errors_lift_into_crate_error() {
        let err: Error = ApiError::Status {
            status: 500,
            body: String::new(),
        }
        .into();
        assert!(matches!(err, Error::Api(ApiError::Status { status: 500, .. })));
    }
}
