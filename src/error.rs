use thiserror::Error;

/// Errors that abort a grading run.
#[derive(Error, Debug)]
pub enum GradeError {
    #[error("config file not found: {0}")]
    ConfigNotFound(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("invalid repository address: {0}")]
    InvalidAddress(String),

    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GradeError {
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound(_) | Self::ConfigParse(_) | Self::Toml(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GradeError>;

/// Failure of a single collaborator call (network fetch, external process).
///
/// These never abort the batch: after bounded retries the evidence is treated
/// as absent for the repository being collected.
#[derive(Error, Debug)]
pub enum EvidenceError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("unexpected status {code} from {url}")]
    Status { code: u16, url: String },

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("command failed: {0}")]
    Command(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl EvidenceError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout(_) => true,
            Self::Status { code, .. } => *code == 429 || *code >= 500,
            Self::Decode(_) | Self::Command(_) | Self::Io(_) => false,
        }
    }
}

impl From<reqwest::Error> for EvidenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout(err.to_string());
        }
        match err.status() {
            Some(status) => Self::Status {
                code: status.as_u16(),
                url: err.url().map(|url| url.to_string()).unwrap_or_default(),
            },
            None => Self::Http(err.to_string()),
        }
    }
}

pub type EvidenceResult<T> = std::result::Result<T, EvidenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_and_rate_limits_are_retryable() {
        let server = EvidenceError::Status {
            code: 502,
            url: "https://api.github.com".to_string(),
        };
        let limited = EvidenceError::Status {
            code: 429,
            url: String::new(),
        };
        assert!(server.is_retryable());
        assert!(limited.is_retryable());
        assert!(EvidenceError::Timeout("gradle after 30s".to_string()).is_retryable());
    }

    #[test]
    fn client_errors_and_commands_are_not_retryable() {
        let forbidden = EvidenceError::Status {
            code: 403,
            url: String::new(),
        };
        assert!(!forbidden.is_retryable());
        assert!(!EvidenceError::Command("git exited with 128".to_string()).is_retryable());
        assert!(!EvidenceError::Decode("bad base64".to_string()).is_retryable());
    }

    #[test]
    fn config_errors_are_classified() {
        assert!(GradeError::ConfigParse("weights".to_string()).is_config());
        assert!(!GradeError::PathNotFound("repos.txt".to_string()).is_config());
    }
}
