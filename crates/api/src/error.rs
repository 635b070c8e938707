use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),
    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("could not decode backend response: {0}")]
    Decode(String),
    #[error("could not encode request: {0}")]
    Encode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Builds a `Status` error from a non-2xx response body.
    ///
    /// The backend reports failures as `{"error": ...}`; any other body is
    /// kept verbatim.
    pub fn from_status(status: u16, body: &str) -> Self {
        let body = body.trim();
        let message = serde_json::from_str::<crate::MessageResponse>(body)
            .ok()
            .and_then(|r| r.error.or(r.message))
            .unwrap_or_else(|| {
                if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body.to_string()
                }
            });
        ApiError::Status { status, message }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_error_prefers_backend_error_field() {
        let e = ApiError::from_status(404, r#"{"error": "Layer not found"}"#);
        assert_eq!(
            e,
            ApiError::Status {
                status: 404,
                message: "Layer not found".into()
            }
        );
        assert!(e.is_not_found());
    }

    #[test]
    fn status_error_keeps_plain_bodies() {
        assert_eq!(
            ApiError::from_status(502, " Bad Gateway \n").to_string(),
            "backend returned 502: Bad Gateway"
        );
        assert_eq!(
            ApiError::from_status(500, ""),
            ApiError::Status {
                status: 500,
                message: "HTTP 500".into()
            }
        );
    }

    #[test]
    fn decode_errors_convert() {
        let err: ApiError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ApiError::Decode(_)));
        assert_eq!(err.status(), None);
    }
}
