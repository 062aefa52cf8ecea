use crate::error::LineageError;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    fs::read_to_string,
    path::{Path, PathBuf},
    str::FromStr,
};

pub const DEFAULT_OUTPUT_DIR: &str = "lineage-export";
pub const OUTPUT_DIR_ENV: &str = "LINEAGE_OUTPUT_DIR";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

impl OutputFormat {
    pub fn default_extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = LineageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            other => Err(LineageError::Config(format!(
                "unsupported output format `{other}`; expected markdown|json"
            ))),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Export settings. Every field has a default, so an empty TOML file is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Directory receiving one document per person; created when missing
    pub output_dir: PathBuf,
    /// File extension of written documents. `None` means the format's default.
    pub extension: Option<String>,
    /// Replace existing documents whose content differs
    pub overwrite: bool,
    pub format: OutputFormat,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            extension: None,
            overwrite: true,
            format: OutputFormat::default(),
        }
    }
}

impl ExportConfig {
    /// Load a TOML config file. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LineageError> {
        let path = path.as_ref();
        tracing::debug!("Attempting to read export config from: {:?}", path);
        if !path.exists() {
            tracing::debug!("Config file not found, using defaults.");
            return Ok(ExportConfig::default());
        }
        let content = read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, LineageError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, LineageError> {
        Ok(toml::to_string(self)?)
    }

    pub fn extension(&self) -> &str {
        self.extension
            .as_deref()
            .unwrap_or_else(|| self.format.default_extension())
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}
