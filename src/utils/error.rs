use std::fmt;

/// Failure of an upstream retrieval. Never stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalError {
    /// Transport-level failure (connect, timeout, TLS).
    Network(String),
    /// Upstream answered 404 for the requested resource.
    NotFound(String),
    /// Upstream answered with a non-success status other than 404.
    Status(u16),
    Decode(String),
    /// Upstream answered 200 but the decoded body carries no entity.
    EmptyPayload(String),
    InvalidUrl(String),
    /// The cached value under a key is of a different resource kind.
    UnexpectedPayload(String),
    /// The retrieval task panicked or was cancelled before finishing.
    Interrupted(String),
}

impl RetrievalError {
    /// Whether the caller should see this as "resource does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(self, RetrievalError::NotFound(_) | RetrievalError::EmptyPayload(_))
    }
}

impl fmt::Display for RetrievalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetrievalError::Network(msg) => write!(f, "Upstream request failed: {}", msg),
            RetrievalError::NotFound(what) => write!(f, "Not found: {}", what),
            RetrievalError::Status(code) => write!(f, "Upstream API error: status {}", code),
            RetrievalError::Decode(msg) => write!(f, "Failed to decode upstream response: {}", msg),
            RetrievalError::EmptyPayload(what) => write!(f, "Not found: {} (empty upstream payload)", what),
            RetrievalError::InvalidUrl(url) => write!(f, "Refusing to follow upstream URL: {}", url),
            RetrievalError::UnexpectedPayload(key) => write!(f, "Unexpected cached payload for key: {}", key),
            RetrievalError::Interrupted(msg) => write!(f, "Upstream retrieval interrupted: {}", msg),
        }
    }
}

impl std::error::Error for RetrievalError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_covers_empty_payloads() {
        assert!(RetrievalError::NotFound("pokemon/missingno".into()).is_not_found());
        assert!(RetrievalError::EmptyPayload("pokemon:0".into()).is_not_found());
        assert!(!RetrievalError::Status(503).is_not_found());
        assert!(!RetrievalError::Network("timeout".into()).is_not_found());
    }

    #[test]
    fn display_includes_context() {
        let err = RetrievalError::Status(429);
        assert_eq!(err.to_string(), "Upstream API error: status 429");
    }
}
