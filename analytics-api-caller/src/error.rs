#[derive(thiserror::Error, Debug)]
pub enum ApiCallError {
    #[error("{method} {url} failed with status {status}: {body}")]
    UnexpectedStatus {
        method: reqwest::Method,
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },
}

impl ApiCallError {
    #[must_use]
    pub fn status(&self) -> reqwest::StatusCode {
        match self {
            ApiCallError::UnexpectedStatus { status, .. } => *status,
        }
    }
}
