use std::fmt;

/// Platform error codes from the W3C geolocation API
pub const PERMISSION_DENIED: u16 = 1;
pub const POSITION_UNAVAILABLE: u16 = 2;
pub const TIMEOUT: u16 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionError {
    /// The platform has no geolocation capability. Fatal for the session.
    Unsupported,
    PermissionDenied(String),
    PositionUnavailable(String),
    Timeout(String),
}

impl AcquisitionError {
    /// Unknown codes are reported as an unavailable position, keeping the message.
    pub fn from_platform(code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            PERMISSION_DENIED => Self::PermissionDenied(message),
            TIMEOUT => Self::Timeout(message),
            _ => Self::PositionUnavailable(message),
        }
    }

    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Unsupported => None,
            Self::PermissionDenied(_) => Some(PERMISSION_DENIED),
            Self::PositionUnavailable(_) => Some(POSITION_UNAVAILABLE),
            Self::Timeout(_) => Some(TIMEOUT),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Unsupported => "Geolocation is not supported by this browser",
            Self::PermissionDenied(message)
            | Self::PositionUnavailable(message)
            | Self::Timeout(message) => message,
        }
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

impl fmt::Display for AcquisitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code() {
            Some(code) => write!(f, "[{}] {}", code, self.message()),
            None => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for AcquisitionError {}

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerError {
    NoReadingAvailable,
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoReadingAvailable => write!(f, "No location reading available yet"),
        }
    }
}

impl std::error::Error for LedgerError {}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackerError {
    Acquisition(AcquisitionError),
    Ledger(LedgerError),
}

impl From<AcquisitionError> for TrackerError {
    fn from(value: AcquisitionError) -> Self {
        Self::Acquisition(value)
    }
}

impl From<LedgerError> for TrackerError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Acquisition(err) => write!(f, "Location error: {err}"),
            Self::Ledger(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TrackerError {}

#[derive(Debug)]
pub enum ConfigError {
    Parse(String),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "Failed to parse config: {msg}"),
            Self::Invalid(msg) => write!(f, "Invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_platform_codes() {
        assert_eq!(AcquisitionError::from_platform(1, "denied"), AcquisitionError::PermissionDenied("denied".into()));
        assert_eq!(AcquisitionError::from_platform(2, "no fix"), AcquisitionError::PositionUnavailable("no fix".into()));
        assert_eq!(AcquisitionError::from_platform(3, "slow"), AcquisitionError::Timeout("slow".into()));
        assert_eq!(AcquisitionError::from_platform(42, "odd"), AcquisitionError::PositionUnavailable("odd".into()));
    }

    #[test]
    fn surfaces_code_and_message_verbatim() {
        let err = AcquisitionError::from_platform(1, "User denied Geolocation");
        assert_eq!(err.to_string(), "[1] User denied Geolocation");
        assert!(err.is_retryable());

        assert_eq!(AcquisitionError::Unsupported.code(), None);
        assert!(!AcquisitionError::Unsupported.is_retryable());
    }
}
