use axum::http::StatusCode;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    Network { endpoint: String, message: String },
    Decode { endpoint: String, message: String },
    Validation(String),
}

impl ClientError {
    pub fn network(endpoint: &str, err: impl fmt::Display) -> Self {
        Self::Network {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }

    pub fn decode(endpoint: &str, err: impl fmt::Display) -> Self {
        Self::Decode {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }

    pub fn validation(prompt: impl Into<String>) -> Self {
        Self::Validation(prompt.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network { endpoint, message } => {
                write!(f, "network error calling {endpoint}: {message}")
            }
            Self::Decode { endpoint, message } => {
                write!(f, "unexpected response from {endpoint}: {message}")
            }
            Self::Validation(prompt) => f.write_str(prompt),
        }
    }
}

impl std::error::Error for ClientError {}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn busy(action: &str) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: format!("{action} is already running"),
        }
    }

    pub fn bad_gateway(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: err.to_string(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Validation(prompt) => Self::bad_request(prompt),
            other => Self::bad_gateway(other),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
