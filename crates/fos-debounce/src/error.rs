//! Error types and argument guards

use std::str::FromStr;

/// Debounce and attachment errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A required value was missing or out of range.
    #[error("{message} | method: {method} | parameter: {parameter}")]
    InvalidArgument {
        message: String,
        parameter: String,
        method: String,
    },
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(message: &str, parameter: &str, method: &str) -> Self {
        Error::InvalidArgument {
            message: message.to_string(),
            parameter: parameter.to_string(),
            method: method.to_string(),
        }
    }

    /// Name of the offending parameter
    pub fn parameter(&self) -> &str {
        match self {
            Error::InvalidArgument { parameter, .. } => parameter,
        }
    }

    /// Name of the operation that rejected the argument
    pub fn method(&self) -> &str {
        match self {
            Error::InvalidArgument { method, .. } => method,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// A debounced call that will never receive an outcome.
///
/// Returned when the call was superseded by a later one, cleared, destroyed,
/// or issued against an already destroyed instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("debounced call was cancelled before it fired")]
pub struct Cancelled;

/// Argument guards bound to one operation name
#[derive(Debug, Clone, Copy)]
pub struct Ensure {
    method: &'static str,
}

impl Ensure {
    pub fn new(method: &'static str) -> Self {
        Self { method }
    }

    /// Require a value to be present
    pub fn exists<T>(&self, value: Option<T>, parameter: &str) -> Result<T> {
        value.ok_or_else(|| self.reject("Expected a value", parameter))
    }

    /// Require a present, non-empty string
    pub fn not_empty<'a>(&self, value: Option<&'a str>, parameter: &str) -> Result<&'a str> {
        match self.exists(value, parameter)? {
            "" => Err(self.reject("Expected a non-empty string", parameter)),
            value => Ok(value),
        }
    }

    /// Require a present number that is zero or greater
    pub fn not_negative(&self, value: Option<i64>, parameter: &str) -> Result<u64> {
        let number = self.exists(value, parameter)?;
        u64::try_from(number).map_err(|_| {
            tracing::debug!("{} | {} is negative: {}", self.method, parameter, number);
            self.reject("Expected a non-negative number", parameter)
        })
    }

    /// Require a name that parses into one of the recognised values of `T`
    pub fn recognized<T: FromStr>(&self, value: &str, parameter: &str) -> Result<T> {
        value.parse().map_err(|_| {
            tracing::debug!("{} | {} has unrecognized value: {:?}", self.method, parameter, value);
            self.reject("Unrecognized value", parameter)
        })
    }

    fn reject(&self, message: &str, parameter: &str) -> Error {
        tracing::debug!("{} | {}: {}", self.method, message, parameter);
        Error::invalid_argument(message, parameter, self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exists() {
        let ensure = Ensure::new("test");
        assert_eq!(ensure.exists(Some(3), "value"), Ok(3));

        let err = ensure.exists::<u8>(None, "value").unwrap_err();
        assert_eq!(err.parameter(), "value");
        assert_eq!(err.method(), "test");
    }

    #[test]
    fn test_not_empty() {
        let ensure = Ensure::new("test");
        assert_eq!(ensure.not_empty(Some("click"), "event"), Ok("click"));
        assert!(ensure.not_empty(Some(""), "event").is_err());
        assert!(ensure.not_empty(None, "event").is_err());
    }

    #[test]
    fn test_not_negative() {
        let ensure = Ensure::new("test");
        assert_eq!(ensure.not_negative(Some(0), "delay"), Ok(0));
        assert_eq!(ensure.not_negative(Some(250), "delay"), Ok(250));
        assert!(ensure.not_negative(Some(-1), "delay").is_err());
        assert!(ensure.not_negative(None, "delay").is_err());
    }

    #[test]
    fn test_error_message_names_method_and_parameter() {
        let err = Error::invalid_argument("Expected a value", "listener", "attach");
        assert_eq!(
            err.to_string(),
            "Expected a value | method: attach | parameter: listener"
        );
    }
}
