//! Error types for the modpack fetcher with context and recovery information

use std::error::Error;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving inputs, talking to the catalog or writing files
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP transport errors with context
    #[error("HTTP request to '{url}' failed")]
    HttpRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered, but not with a success status
    #[error("Request to '{url}' returned {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Network timeout (only possible when a timeout is configured)
    #[error("Request to '{url}' timed out")]
    NetworkTimeout { url: String },

    /// File system I/O errors with file context
    #[error("Failed {operation} '{path}'")]
    FileSystem {
        path: PathBuf,
        operation: FileOperation,
        #[source]
        source: std::io::Error,
    },

    /// URL parsing errors with helpful suggestions
    #[error("Invalid URL '{url}': {suggestion}")]
    InvalidUrl {
        url: String,
        suggestion: String,
        #[source]
        source: url::ParseError,
    },

    /// A catalog response body did not have the expected shape
    #[error("Unexpected response from '{url}'")]
    ResponseDecode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("manifest.json not found at '{path}'")]
    ManifestNotFound { path: PathBuf },

    #[error("Could not parse manifest '{path}'")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Manifest '{path}' has no minecraft.version")]
    ManifestMissingVersion { path: PathBuf },

    /// Operator supplied a modlist path that cannot be used
    #[error("Invalid modlist path '{path}': {reason}")]
    InvalidModlistPath { path: String, reason: String },

    /// The credential does not have the expected structure
    #[error("Invalid API key: {reason}")]
    InvalidApiKey { reason: String },

    /// The catalog search returned no entry for a slug
    #[error("No catalog entry found for '{slug}'")]
    ModNotFound { slug: String },

    /// Credential persistence backend failure
    #[error("Credential store error: {message}")]
    CredentialStore {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
        suggestion: Option<String>,
    },

    /// Run stopped by the operator or a closed input stream
    #[error("Cancelled: {reason}")]
    Cancelled { reason: String },
}

/// Types of file operations for error context
#[derive(Debug, Clone, PartialEq)]
pub enum FileOperation {
    Read,
    Write,
    Create,
    Move,
    CreateDir,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Create => write!(f, "creating"),
            FileOperation::Move => write!(f, "moving"),
            FileOperation::CreateDir => write!(f, "creating directory"),
        }
    }
}

pub type Result<T> = std::result::Result<T, DownloadError>;

impl DownloadError {
    /// Build a file system error with path context
    pub fn file_system<P: Into<PathBuf>>(path: P, operation: FileOperation, source: std::io::Error) -> Self {
        DownloadError::FileSystem {
            path: path.into(),
            operation,
            source,
        }
    }

    /// Whether this error ends the whole run rather than a single mod
    ///
    /// Reading inputs and creating directories happen during run setup;
    /// other file operations belong to a single download.
    pub fn is_fatal(&self) -> bool {
        match self {
            DownloadError::FileSystem { operation, .. } => {
                matches!(operation, FileOperation::Read | FileOperation::CreateDir)
            }
            DownloadError::ManifestNotFound { .. }
            | DownloadError::ManifestParse { .. }
            | DownloadError::ManifestMissingVersion { .. }
            | DownloadError::InvalidModlistPath { .. }
            | DownloadError::InvalidApiKey { .. }
            | DownloadError::Configuration { .. }
            | DownloadError::Cancelled { .. } => true,
            DownloadError::HttpRequest { .. }
            | DownloadError::HttpStatus { .. }
            | DownloadError::NetworkTimeout { .. }
            | DownloadError::InvalidUrl { .. }
            | DownloadError::ResponseDecode { .. }
            | DownloadError::ModNotFound { .. }
            | DownloadError::CredentialStore { .. } => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            DownloadError::HttpRequest { .. } => "http_request",
            DownloadError::HttpStatus { .. } => "http_status",
            DownloadError::NetworkTimeout { .. } => "network_timeout",
            DownloadError::FileSystem { .. } => "file_system",
            DownloadError::InvalidUrl { .. } => "invalid_url",
            DownloadError::ResponseDecode { .. } => "response_decode",
            DownloadError::ManifestNotFound { .. } => "manifest_not_found",
            DownloadError::ManifestParse { .. } => "manifest_parse",
            DownloadError::ManifestMissingVersion { .. } => "manifest_missing_version",
            DownloadError::InvalidModlistPath { .. } => "invalid_modlist_path",
            DownloadError::InvalidApiKey { .. } => "invalid_api_key",
            DownloadError::ModNotFound { .. } => "mod_not_found",
            DownloadError::CredentialStore { .. } => "credential_store",
            DownloadError::Configuration { .. } => "configuration",
            DownloadError::Cancelled { .. } => "cancelled",
        }
    }

    /// Get severity level for error prioritization
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DownloadError::ModNotFound { .. } => ErrorSeverity::Low,
            DownloadError::Cancelled { .. } => ErrorSeverity::Low,
            DownloadError::CredentialStore { .. } => ErrorSeverity::Low,
            DownloadError::HttpRequest { .. } => ErrorSeverity::Medium,
            DownloadError::HttpStatus { .. } => ErrorSeverity::Medium,
            DownloadError::NetworkTimeout { .. } => ErrorSeverity::Medium,
            DownloadError::ResponseDecode { .. } => ErrorSeverity::Medium,
            DownloadError::InvalidUrl { .. } => ErrorSeverity::Medium,
            DownloadError::FileSystem { .. } => ErrorSeverity::High,
            DownloadError::InvalidModlistPath { .. } => ErrorSeverity::High,
            DownloadError::InvalidApiKey { .. } => ErrorSeverity::High,
            DownloadError::Configuration { .. } => ErrorSeverity::High,
            DownloadError::ManifestNotFound { .. } => ErrorSeverity::Critical,
            DownloadError::ManifestParse { .. } => ErrorSeverity::Critical,
            DownloadError::ManifestMissingVersion { .. } => ErrorSeverity::Critical,
        }
    }

    /// Get user-friendly suggestion for resolving the error
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            DownloadError::HttpStatus { status, .. } if status.as_u16() == 403 => {
                Some("Check that your CurseForge API key is valid")
            }
            DownloadError::InvalidUrl { suggestion, .. } => Some(suggestion),
            DownloadError::ManifestNotFound { .. } => {
                Some("Place manifest.json in the same directory as the modlist HTML file")
            }
            DownloadError::ManifestMissingVersion { .. } => {
                Some("The manifest must contain a \"minecraft\": { \"version\": ... } entry")
            }
            DownloadError::InvalidApiKey { .. } => {
                Some("Copy the key from console.curseforge.com; it starts with $2a$")
            }
            DownloadError::Configuration { suggestion, .. } => suggestion.as_deref(),
            _ => None,
        }
    }

    /// Create a detailed error report for debugging
    pub fn detailed_report(&self) -> String {
        let mut report = format!("Error: {}\n", self);
        report.push_str(&format!("Category: {}\n", self.category()));
        report.push_str(&format!("Severity: {:?}\n", self.severity()));
        report.push_str(&format!("Fatal: {}\n", self.is_fatal()));

        if let Some(suggestion) = self.suggestion() {
            report.push_str(&format!("Suggestion: {}\n", suggestion));
        }

        if let Some(source) = self.source() {
            report.push_str(&format!("Root cause: {}\n", source));
        }

        report
    }
}

/// Error severity levels for prioritization
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl From<reqwest::Error> for DownloadError {
    fn from(error: reqwest::Error) -> Self {
        let url = error.url().map(|u| u.to_string()).unwrap_or_else(|| "<unknown>".to_string());

        if error.is_timeout() {
            DownloadError::NetworkTimeout { url }
        } else {
            DownloadError::HttpRequest {
                url,
                source: error,
            }
        }
    }
}
