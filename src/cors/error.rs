use std::fmt;

/// CORS configuration error
///
/// Returned by [`CorsConfigBuilder::build`](super::CorsConfigBuilder::build)
/// when a value could never produce a valid header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsConfigError {
    /// Origin is neither `*` nor `scheme://host[:port]`
    InvalidOriginFormat {
        /// The invalid origin string
        origin: String,
    },
    /// Header name contains characters not allowed in a token
    InvalidHeaderName {
        /// The invalid header name
        header: String,
    },
    /// No origins were configured
    EmptyOrigins,
}

impl fmt::Display for CorsConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorsConfigError::InvalidOriginFormat { origin } => write!(
                f,
                "CORS configuration error: Invalid origin format '{origin}'. \
                Expected '*' or scheme://host:port (e.g., https://example.com)"
            ),
            CorsConfigError::InvalidHeaderName { header } => write!(
                f,
                "CORS configuration error: Invalid header name '{header}'"
            ),
            CorsConfigError::EmptyOrigins => write!(
                f,
                "CORS configuration error: At least one origin must be specified"
            ),
        }
    }
}

impl std::error::Error for CorsConfigError {}
