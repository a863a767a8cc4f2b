//! CLI errors and their process exit codes.
//!
//! | code | meaning |
//! |------|---------|
//! | 0    | success |
//! | 2    | argument parse error (raised by clap) |
//! | 10   | simulation error: unusable resolution |
//! | 11   | snapshot could not be written |
//! | 12   | bad user value: model, preset, journey, pattern, color or `--params` JSON |
//! | 13   | JSON output could not be serialized |

use rd_engine_core::EngineError;
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    Engine(EngineError),
    Io(String),
    Input(String),
    Serialization(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Engine(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "cannot write snapshot: {msg}"),
            CliError::Input(msg) | CliError::Serialization(msg) => f.write_str(msg),
        }
    }
}

/// Routes library errors by who is at fault: values the user typed become
/// input errors, write failures become I/O errors, the rest are engine errors.
impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Io(msg) => CliError::Io(msg),
            e @ (EngineError::UnknownModel(_)
            | EngineError::UnknownPreset { .. }
            | EngineError::UnknownJourney(_)
            | EngineError::UnknownPattern(_)
            | EngineError::InvalidColor(_)) => CliError::Input(e.to_string()),
            other => CliError::Engine(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_route_by_cause() {
        let cases = [
            (EngineError::UnknownModel("oregonator".into()), 12),
            (EngineError::InvalidDimensions, 10),
            (
                EngineError::UnknownPreset {
                    model: "brusselator".into(),
                    name: "Mitosis".into(),
                },
                12,
            ),
            (EngineError::Io("disk full".into()), 11),
            (EngineError::InvalidColor("#zz".into()), 12),
            (EngineError::UnknownJourney("zigzag".into()), 12),
            (EngineError::UnknownPattern("stripes".into()), 12),
        ];
        for (engine_err, code) in cases {
            let text = engine_err.to_string();
            let cli_err = CliError::from(engine_err);
            assert_eq!(cli_err.exit_code(), code, "{text}");
        }
    }

    #[test]
    fn messages_keep_the_library_detail() {
        let err = CliError::from(EngineError::Io("disk full".into()));
        assert_eq!(err.to_string(), "cannot write snapshot: disk full");
        let err = CliError::from(EngineError::UnknownJourney("zigzag".into()));
        assert!(err.to_string().contains("zigzag"));
    }

    #[test]
    fn serde_json_errors_are_serialization_errors() {
        let bad = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        assert_eq!(CliError::from(bad).exit_code(), 13);
    }
}
