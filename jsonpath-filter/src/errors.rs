/// Error types for parsing and building filter terms
#[derive(Debug)]
pub enum FilterError {
    ParseError(String),
    InvalidArgument(String),
    SerdeJsonError(serde_json::Error),
}

impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        FilterError::SerdeJsonError(err)
    }
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            FilterError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            FilterError::SerdeJsonError(err) => write!(f, "Serde JSON error: {}", err),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FilterError::SerdeJsonError(err) => Some(err),
            _ => None,
        }
    }
}
