//! Resolution errors

use thiserror::Error;

use crate::results::ValueSource;
use crate::value::ValueError;

/// Errors that abort a resolution run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    /// An explicitly supplied command-line value did not parse
    #[error("invalid value for argument {name}: {error}")]
    InvalidArgument {
        name: String,
        #[source]
        error: ValueError,
    },

    /// An environment or secret value did not parse under the strict policy
    #[error("invalid value for {name} from {origin}: {error}")]
    InvalidSource {
        name: String,
        origin: ValueSource,
        #[source]
        error: ValueError,
    },

    /// Required parameters that no source provided, all of them
    #[error("missing required parameters: {}", .0.join(", "))]
    MissingRequired(Vec<String>),
}

impl ParamError {
    /// Names of the missing parameters, if this is a missing-required failure
    pub fn missing(&self) -> &[String] {
        match self {
            ParamError::MissingRequired(names) => names,
            _ => &[],
        }
    }
}

pub type ParamResult<T> = Result<T, ParamError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TypeTag;

    #[test]
    fn test_missing_required_message() {
        let err = ParamError::MissingRequired(vec!["HOST".into(), "TOKEN".into()]);
        assert_eq!(err.to_string(), "missing required parameters: HOST, TOKEN");
        assert_eq!(err.missing(), ["HOST".to_string(), "TOKEN".to_string()]);
    }

    #[test]
    fn test_invalid_argument_message() {
        let err = ParamError::InvalidArgument {
            name: "PORT".into(),
            error: ValueError::parse(TypeTag::Int, "abc", "invalid digit"),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for argument PORT: invalid int value \"abc\": invalid digit"
        );
        assert!(err.missing().is_empty());
    }

    #[test]
    fn test_invalid_source_message() {
        let err = ParamError::InvalidSource {
            name: "PORT".into(),
            origin: ValueSource::Environment,
            error: ValueError::range(TypeTag::Int, "99999999999"),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for PORT from environment: int value \"99999999999\" out of range"
        );
    }
}
