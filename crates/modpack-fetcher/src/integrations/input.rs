//! Operator input: the modlist path and the CurseForge API key
//!
//! Values passed up front (command line) are validated once and fail with an
//! explicit error. Missing values are prompted for until valid, unless the
//! resolver is non-interactive.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::credentials::{ApiKey, CredentialStore, API_KEY_ENV_VAR};
use crate::downloader::core::{DownloadError, Result};

/// Extension the modlist document must have
pub const MODLIST_EXTENSION: &str = "html";

const PATH_PROMPT: &str = "Enter the full path of the modlist HTML file: ";
const KEY_PROMPT: &str = "Enter your console.curseforge.com API key: ";

/// Line-based operator dialogue
pub trait Prompter {
    /// Show `message` and read one line; `Ok(None)` at end of input
    fn ask(&mut self, message: &str) -> io::Result<Option<String>>;

    /// Show an informational line
    fn tell(&mut self, message: &str) -> io::Result<()>;
}

/// Prompter over any reader/writer pair, stdin/stdout by default
pub struct ConsolePrompter<R, W> {
    reader: R,
    writer: W,
}

impl ConsolePrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn ask(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.writer, "{}", message)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn tell(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", message)
    }
}

/// Trim whitespace and wrapping quotes, as left by drag-and-drop or "Copy as path"
pub fn normalize_path_input(raw: &str) -> &str {
    raw.trim().trim_matches(|c: char| c == '"' || c == '\'').trim()
}

/// Check that `raw` names an existing `.html` file
pub fn validate_modlist_path(raw: &str) -> Result<PathBuf> {
    let normalized = normalize_path_input(raw);
    let invalid = |reason: &str| DownloadError::InvalidModlistPath {
        path: normalized.to_string(),
        reason: reason.to_string(),
    };

    if normalized.is_empty() {
        return Err(invalid("no path given"));
    }

    let path = Path::new(normalized);
    if !path.is_file() {
        return Err(invalid("file does not exist"));
    }

    let is_html = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(MODLIST_EXTENSION));
    if !is_html {
        return Err(invalid("expected an .html file"));
    }

    Ok(path.to_path_buf())
}

fn input_failed(e: io::Error) -> DownloadError {
    DownloadError::Cancelled {
        reason: format!("failed to read operator input: {}", e),
    }
}

fn end_of_input(what: &str) -> DownloadError {
    DownloadError::Cancelled {
        reason: format!("input closed before a valid {} was entered", what),
    }
}

/// Resolves the run inputs from arguments, the credential store and prompts
pub struct InputResolver<S, P> {
    store: S,
    prompter: P,
    interactive: bool,
}

impl<S: CredentialStore, P: Prompter> InputResolver<S, P> {
    pub fn new(store: S, prompter: P) -> Self {
        Self {
            store,
            prompter,
            interactive: true,
        }
    }

    /// Never prompt; missing or invalid input becomes an error
    pub fn non_interactive(mut self) -> Self {
        self.interactive = false;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_parts(self) -> (S, P) {
        (self.store, self.prompter)
    }

    /// Modlist path from `provided`, or from the operator until a valid one is entered
    pub fn resolve_modlist_path(&mut self, provided: Option<&str>) -> Result<PathBuf> {
        if let Some(raw) = provided {
            return validate_modlist_path(raw);
        }

        if !self.interactive {
            return Err(DownloadError::Configuration {
                message: "No modlist file given".to_string(),
                field: Some("modlist".to_string()),
                suggestion: Some("Pass the path of the saved modlist.html".to_string()),
            });
        }

        loop {
            let Some(raw) = self.prompter.ask(PATH_PROMPT).map_err(input_failed)? else {
                return Err(end_of_input("modlist path"));
            };

            match validate_modlist_path(&raw) {
                Ok(path) => return Ok(path),
                Err(e) => {
                    debug!("Rejected modlist path: {}", e);
                    self.prompter
                        .tell("Invalid file path. Please enter a valid HTML file.")
                        .map_err(input_failed)?;
                }
            }
        }
    }

    /// API key from `provided`, the credential store, or the operator
    ///
    /// A key that came from the argument or a prompt is saved to the store.
    pub fn resolve_api_key(&mut self, provided: Option<&str>) -> Result<ApiKey> {
        if let Some(raw) = provided {
            let key = ApiKey::parse(raw.trim())?;
            self.persist(&key);
            return Ok(key);
        }

        match self.store.load() {
            Ok(Some(raw)) => match ApiKey::parse(raw.trim()) {
                Ok(key) => {
                    self.prompter
                        .tell(&format!("Using API key from {}.", self.store.describe()))
                        .map_err(input_failed)?;
                    return Ok(key);
                }
                Err(e) => warn!("Ignoring stored API key: {}", e),
            },
            Ok(None) => debug!("No API key in {}", self.store.describe()),
            Err(e) => warn!("Could not read stored API key: {}", e),
        }

        if !self.interactive {
            return Err(DownloadError::Configuration {
                message: "No valid CurseForge API key available".to_string(),
                field: Some(API_KEY_ENV_VAR.to_string()),
                suggestion: Some(format!("Pass --api-key or set {}", API_KEY_ENV_VAR)),
            });
        }

        loop {
            let Some(raw) = self.prompter.ask(KEY_PROMPT).map_err(input_failed)? else {
                return Err(end_of_input("API key"));
            };

            match ApiKey::parse(raw.trim()) {
                Ok(key) => {
                    self.persist(&key);
                    return Ok(key);
                }
                Err(e) => {
                    debug!("Rejected API key: {}", e);
                    self.prompter
                        .tell("Invalid API key. Please enter a valid API key.")
                        .map_err(input_failed)?;
                }
            }
        }
    }

    fn persist(&self, key: &ApiKey) {
        if let Err(e) = self.store.save(key) {
            warn!("Could not save API key to {}: {}", self.store.describe(), e);
        }
    }
}
