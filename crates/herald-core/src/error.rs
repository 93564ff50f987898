//! Error types shared by the channel framework.

use thiserror::Error;

/// Errors returned synchronously to callers of channel operations.
///
/// Delivery problems never show up here: by the time a message is
/// delivered, the producer has already returned.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel '{channel}' is not initialized")]
    NotInitialized { channel: String },

    #[error("unknown channel '{0}'")]
    UnknownChannel(String),

    #[error("channel '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("setup of channel '{channel}' failed: {source}")]
    Setup {
        channel: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("delivery worker of channel '{0}' has stopped")]
    WorkerStopped(String),

    #[error("status tracker error: {0}")]
    Status(#[source] anyhow::Error),
}

/// Failure reported by a notifier's `deliver`.
///
/// Caught by the delivery worker, logged, and the message dropped.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("rejected by destination: {0}")]
    Rejected(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_initialized_message() {
        let err = ChannelError::NotInitialized {
            channel: "telegram".into(),
        };
        assert_eq!(err.to_string(), "channel 'telegram' is not initialized");
    }

    #[test]
    fn test_setup_error_keeps_source() {
        let err = ChannelError::Setup {
            channel: "sms".into(),
            source: anyhow::anyhow!("missing token"),
        };
        assert!(err.to_string().contains("missing token"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_delivery_error_from_anyhow_is_transparent() {
        let err: DeliveryError = anyhow::anyhow!("connection reset").into();
        assert_eq!(err.to_string(), "connection reset");
    }
}
