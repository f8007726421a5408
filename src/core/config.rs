//! Configuration module for the RAW conversion and caption tools
//!
//! Supports loading configuration from a TOML file.
//! Configuration is stored in a standard location:
//! - Windows: %APPDATA%\raw_caption_tools\config.toml
//! - Linux: ~/.config/raw_caption_tools/config.toml
//! - macOS: ~/Library/Application Support/raw_caption_tools/config.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application name used for config directory
const APP_NAME: &str = "raw_caption_tools";

/// Default config file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Config files checked in the working directory before the standard location
const LOCAL_CONFIG_FILES: [&str; 2] = ["./raw_caption.toml", "./config.toml"];

/// Prompt sent to the captioning model. `{image}` is replaced by the JPEG path.
pub const DEFAULT_PROMPT: &str = "For this photo: {image}
1. Output a line starting with TAGS: followed by 10 short descriptive tags, comma-separated.
2. Output a line starting with CAPTION: with a short 1-line catchy caption.
3. Output a line starting with WRITEUP: with a 3-sentence writeup.
";

/// Get the standard configuration directory for the application.
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME))
}

/// Get the standard configuration file path.
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Batch conversion settings
    pub convert: ConvertConfig,

    /// RAW development settings
    pub develop: DevelopConfig,

    /// Captioning model settings
    pub caption: CaptionConfig,

    /// Text editor settings
    pub editor: EditorConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Batch conversion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    /// Skip inputs whose JPEG already exists in the output directory
    pub skip_existing: bool,
    /// Keep going after a file fails to convert
    pub continue_on_error: bool,
}

/// RAW development settings, passed to LibRaw. Defaults are LibRaw's own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DevelopConfig {
    /// Scale the image so the brightest 1% of pixels clip to white
    pub auto_bright: bool,
    /// Brightness multiplier
    pub brightness: f32,
    /// Use the white balance recorded by the camera
    pub use_camera_wb: bool,
}

/// Captioning model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    /// Program to run
    pub program: String,
    /// Arguments placed before the prompt
    pub args: Vec<String>,
    /// Prompt template; `{image}` is replaced by the JPEG path
    pub prompt: String,
    /// Treat a non-zero exit status from the model as an error
    pub fail_on_nonzero_exit: bool,
}

/// Text editor settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Editor command line, e.g. "code --wait". Falls back to $VISUAL / $EDITOR.
    pub command: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Mirror log output to a file
    pub log_to_file: bool,
    /// Log file path
    pub log_file: PathBuf,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 75,
            skip_existing: false,
            continue_on_error: true,
        }
    }
}

impl Default for DevelopConfig {
    fn default() -> Self {
        Self {
            auto_bright: true,
            brightness: 1.0,
            use_camera_wb: false,
        }
    }
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            program: "ollama".to_string(),
            args: vec!["run".to_string(), "llava".to_string()],
            prompt: DEFAULT_PROMPT.to_string(),
            fail_on_nonzero_exit: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: false,
            log_file: PathBuf::from("./raw_caption_tools.log"),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::ParseError(_, msg) => ConfigError::ParseError(path.to_path_buf(), msg),
            other => other,
        })
    }

    /// Parse configuration from TOML text and validate it
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(PathBuf::new(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./raw_caption.toml
    /// 2. ./config.toml
    /// 3. Standard config location
    ///
    /// If no config file is found, returns default configuration.
    pub fn load_default() -> Result<Self, ConfigError> {
        for path in LOCAL_CONFIG_FILES.iter().map(PathBuf::from) {
            if path.exists() {
                return Self::load(&path);
            }
        }

        if let Some(config_path) = get_config_path() {
            if config_path.exists() {
                return Self::load(&config_path);
            }
        }

        Ok(Self::default())
    }

    /// Load from an explicit path if given, otherwise from the default locations
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => Self::load_default(),
        }
    }

    /// Reject values that would only fail later in a confusing way
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.convert.jpeg_quality) {
            return Err(ConfigError::Invalid(format!(
                "convert.jpeg_quality must be between 1 and 100, got {}",
                self.convert.jpeg_quality
            )));
        }
        if !self.develop.brightness.is_finite() || self.develop.brightness <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "develop.brightness must be a positive number, got {}",
                self.develop.brightness
            )));
        }
        if self.caption.program.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "caption.program must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Generate a default config file with comments
    pub fn generate_default_config() -> String {
        include_str!("../../config.example.toml").to_string()
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file was not found at the specified path
    FileNotFound(PathBuf),
    /// Failed to read the configuration file
    ReadError(PathBuf, String),
    /// Failed to parse the configuration file (invalid TOML)
    ParseError(PathBuf, String),
    /// A value parsed but is out of range
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ReadError(path, err) => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::ParseError(path, err) => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
