use reqwest::StatusCode;
use thiserror::Error;

/// Why a single weather submission failed.
///
/// `Display` renders the message shown to the user, so callers never need to
/// inspect the variant to produce output.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("City not found. Please try again.")]
    NotFound,

    #[error("Invalid API key. Please check your API key.")]
    Unauthorized,

    #[error("An error occurred. Please try again later.")]
    Server { status: StatusCode },

    /// The request never got a response.
    #[error("Network error. Please check your internet connection.")]
    Network {
        #[source]
        source: reqwest::Error,
    },

    /// Success status, but the body was not the expected shape.
    #[error("The weather service returned an unexpected response. Please try again later.")]
    Malformed {
        #[source]
        source: serde_json::Error,
    },

    #[error("An unexpected error occurred. Please try again later.")]
    Unexpected { detail: String },
}

/// Variant tag of [`FetchError`], for comparisons and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    NotFound,
    Unauthorized,
    Server,
    Network,
    Malformed,
    Unexpected,
}

impl FetchErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchErrorKind::NotFound => "not_found",
            FetchErrorKind::Unauthorized => "unauthorized",
            FetchErrorKind::Server => "server_error",
            FetchErrorKind::Network => "network_error",
            FetchErrorKind::Malformed => "malformed_response",
            FetchErrorKind::Unexpected => "unexpected",
        }
    }
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::NotFound => FetchErrorKind::NotFound,
            FetchError::Unauthorized => FetchErrorKind::Unauthorized,
            FetchError::Server { .. } => FetchErrorKind::Server,
            FetchError::Network { .. } => FetchErrorKind::Network,
            FetchError::Malformed { .. } => FetchErrorKind::Malformed,
            FetchError::Unexpected { .. } => FetchErrorKind::Unexpected,
        }
    }

    pub fn unexpected<S: Into<String>>(detail: S) -> Self {
        FetchError::Unexpected { detail: detail.into() }
    }

    /// Map a response status onto the taxonomy. `None` for success statuses.
    pub fn from_status(status: StatusCode) -> Option<Self> {
        if status.is_success() {
            return None;
        }

        Some(match status {
            StatusCode::NOT_FOUND => FetchError::NotFound,
            StatusCode::UNAUTHORIZED => FetchError::Unauthorized,
            _ => FetchError::Server { status },
        })
    }

    /// Map a failure that happened before any response was received.
    ///
    /// Builder errors mean the request was never sent, so they are not
    /// transport failures.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_builder() {
            FetchError::unexpected(err.to_string())
        } else {
            FetchError::Network { source: err }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_statuses_are_not_errors() {
        assert!(FetchError::from_status(StatusCode::OK).is_none());
        assert!(FetchError::from_status(StatusCode::NO_CONTENT).is_none());
    }

    #[test]
    fn not_found_and_unauthorized_have_dedicated_variants() {
        let err = FetchError::from_status(StatusCode::NOT_FOUND).unwrap();
        assert_eq!(err.kind(), FetchErrorKind::NotFound);
        assert_eq!(err.to_string(), "City not found. Please try again.");

        let err = FetchError::from_status(StatusCode::UNAUTHORIZED).unwrap();
        assert_eq!(err.kind(), FetchErrorKind::Unauthorized);
        assert_eq!(err.to_string(), "Invalid API key. Please check your API key.");
    }

    #[test]
    fn other_non_success_statuses_are_server_errors() {
        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::FORBIDDEN,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
        ] {
            let err = FetchError::from_status(status).unwrap();
            assert!(matches!(err, FetchError::Server { status: s } if s == status));
            assert_eq!(err.to_string(), "An error occurred. Please try again later.");
        }
    }

    #[test]
    fn malformed_body_message() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = FetchError::Malformed { source };
        assert_eq!(err.kind(), FetchErrorKind::Malformed);
        assert!(err.to_string().contains("unexpected response"));
    }

    #[test]
    fn unexpected_message() {
        let err = FetchError::unexpected("task panicked");
        assert_eq!(err.kind(), FetchErrorKind::Unexpected);
        assert_eq!(
            err.to_string(),
            "An unexpected error occurred. Please try again later."
        );
    }

    #[test]
    fn kind_names_are_stable() {
        assert_eq!(FetchErrorKind::Network.to_string(), "network_error");
        assert_eq!(FetchErrorKind::Server.as_str(), "server_error");
    }
}
