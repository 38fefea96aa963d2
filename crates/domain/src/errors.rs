use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("invalid duration {input:?}: {reason}")]
    InvalidDuration { input: String, reason: String },

    #[error("unknown query type: {0}")]
    UnknownQueryType(String),

    #[error("unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    #[error("invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("dial {protocol} {address}: {reason}")]
    Dial {
        protocol: String,
        address: String,
        reason: String,
    },

    #[error("request to {address}: {reason}")]
    Request { address: String, reason: String },
}

impl ProbeError {
    pub fn invalid_duration(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDuration {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn dial(protocol: impl ToString, address: &str, reason: impl ToString) -> Self {
        Self::Dial {
            protocol: protocol.to_string(),
            address: address.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn request(address: &str, reason: impl ToString) -> Self {
        Self::Request {
            address: address.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Rejected before any network activity or metric emission.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidDuration { .. }
                | Self::UnknownQueryType(_)
                | Self::UnsupportedProtocol(_)
                | Self::InvalidDomainName(_)
        )
    }

    /// The query reached the network and failed there.
    pub fn is_attempted(&self) -> bool {
        matches!(self, Self::Dial { .. } | Self::Request { .. })
    }
}
