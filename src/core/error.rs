//! Error types for registration, parsing, and script loading.

/// Errors produced by the console engine.
///
/// Registration errors are returned to the registering caller. Parse errors
/// are caught at the command-invocation boundary and converted into
/// error-kind log items. Script errors are logged, never thrown past
/// [`run_script`](crate::core::ConsoleSystem::run_script).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// A malformed argument, with the offending input fragment.
    Parse { message: String, fragment: String },
    /// An invalid registration (duplicate, empty, or multi-word name).
    Registration { message: String },
    /// A script file that could not be read.
    Script { message: String, path: String },
}

impl ConsoleError {
    /// Create a parse error with the offending fragment.
    pub fn parse(message: impl Into<String>, fragment: impl Into<String>) -> Self {
        ConsoleError::Parse {
            message: message.into(),
            fragment: fragment.into(),
        }
    }

    /// Create a registration error.
    pub fn registration(message: impl Into<String>) -> Self {
        ConsoleError::Registration {
            message: message.into(),
        }
    }

    /// Create a script error for the given path.
    pub fn script(message: impl Into<String>, path: impl Into<String>) -> Self {
        ConsoleError::Script {
            message: message.into(),
            path: path.into(),
        }
    }
}

impl std::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsoleError::Parse { message, fragment } => {
                write!(f, "{}: '{}'", message, fragment)
            }
            ConsoleError::Registration { message } => write!(f, "{}", message),
            ConsoleError::Script { message, path } => write!(f, "{}: '{}'", message, path),
        }
    }
}

impl std::error::Error for ConsoleError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ConsoleError::parse("Missing or invalid i32 argument", "abc");
        assert_eq!(err.to_string(), "Missing or invalid i32 argument: 'abc'");
    }

    #[test]
    fn test_registration_error_display() {
        let err = ConsoleError::registration("Command 'quit' already exists");
        assert_eq!(err.to_string(), "Command 'quit' already exists");
    }

    #[test]
    fn test_script_error_display() {
        let err = ConsoleError::script("Failed to load script", "boot.cfg");
        assert_eq!(err.to_string(), "Failed to load script: 'boot.cfg'");
    }
}
