use std::fmt;

use hyper::StatusCode;

/// Why a page couldn't be built. Each variant becomes an HTTP status.
#[derive(Debug)]
pub enum PageError {
    NotFound(String),
    BadRequest(String),
    Internal(anyhow::Error),
}

impl PageError {
    pub fn status(&self) -> StatusCode {
        match self {
            PageError::NotFound(_) => StatusCode::NOT_FOUND,
            PageError::BadRequest(_) => StatusCode::BAD_REQUEST,
            PageError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// What the visitor sees. Internal details only go to the log.
    pub fn public_message(&self) -> String {
        match self {
            PageError::NotFound(msg) | PageError::BadRequest(msg) => msg.clone(),
            PageError::Internal(_) => "Something went wrong while drawing this page.".to_string(),
        }
    }
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PageError::NotFound(msg) => write!(f, "not found: {}", msg),
            PageError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            PageError::Internal(err) => write!(f, "{:#}", err),
        }
    }
}

impl From<anyhow::Error> for PageError {
    fn from(err: anyhow::Error) -> PageError {
        PageError::Internal(err)
    }
}
