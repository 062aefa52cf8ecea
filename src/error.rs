use std::{fmt, io};

use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use serde_yaml::Error as YamlError;
use thiserror::Error;

/// Fatal failures of an export run.
///
/// Anything recoverable (malformed lines, dangling pointers, duplicate ids) is reported as a
/// [`ParseDiagnostic`](crate::codec::ParseDiagnostic) instead and never reaches this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum LineageError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("You do not have permission to access this resource")]
    PermissionDenied,
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl LineageError {
    /// Process exit code used by the CLI adapter.
    pub fn exit_code(&self) -> i32 {
        match self {
            LineageError::Config(_) => 2,
            LineageError::NotFound(_) => 3,
            LineageError::PermissionDenied => 4,
            LineageError::Io(_) => 5,
            LineageError::Serialization(_) => 1,
        }
    }
}

impl From<toml::de::Error> for LineageError {
    fn from(src: toml::de::Error) -> LineageError {
        LineageError::Config(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for LineageError {
    fn from(src: toml::ser::Error) -> LineageError {
        LineageError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for LineageError {
    fn from(src: JsonError) -> LineageError {
        LineageError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<YamlError> for LineageError {
    fn from(src: YamlError) -> LineageError {
        LineageError::Serialization(format!("YAML front-matter error: {src}"))
    }
}

impl From<io::Error> for LineageError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => LineageError::NotFound(format!("{x}")),
            io::ErrorKind::PermissionDenied => LineageError::PermissionDenied,
            _ => LineageError::Io(format!("IOError: {}: {x}", x.kind())),
        }
    }
}

impl From<walkdir::Error> for LineageError {
    fn from(x: walkdir::Error) -> Self {
        let path = x.path().map(|p| p.display().to_string());
        match x.into_io_error() {
            Some(io_error) => io_error.into(),
            None => LineageError::Io(format!(
                "directory walk failed (filesystem loop) at {}",
                path.unwrap_or_else(|| "<unknown>".to_string())
            )),
        }
    }
}

impl From<fmt::Error> for LineageError {
    fn from(x: fmt::Error) -> Self {
        LineageError::Serialization(format!("{x}"))
    }
}
