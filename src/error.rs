use teloxide::RequestError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BalanceBotError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Parsing config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] RequestError),

    #[error("Dialing {endpoint} ({path}): {message}")]
    Dial {
        endpoint: String,
        path: String,
        message: String,
    },

    #[error("Liveness check for {endpoint} ({path}): {message}")]
    Liveness {
        endpoint: String,
        path: String,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BalanceBotError>;

impl BalanceBotError {
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn dial(
        endpoint: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Dial {
            endpoint: endpoint.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn liveness(
        endpoint: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Liveness {
            endpoint: endpoint.into(),
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_helpers() {
        let err = BalanceBotError::dial("mainnet", "http://localhost:8545", "refused");
        assert_eq!(
            err.to_string(),
            "Dialing mainnet (http://localhost:8545): refused"
        );

        let err = BalanceBotError::config_error("token cannot be empty");
        assert_eq!(
            err.to_string(),
            "Configuration error: token cannot be empty"
        );
    }
}
