//! High-level convenience APIs for a modpack run
//!
//! Input resolution for the operator, session folders, and the run
//! orchestrator that ties the catalog and downloader together.

pub mod input;
pub mod modlist;
pub mod session;

// Re-export main convenience APIs
pub use input::{normalize_path_input, validate_modlist_path, ConsolePrompter, InputResolver, Prompter};
pub use modlist::{ModOutcome, ModReport, ModlistDownloadBuilder, ModlistDownloadResult, ModlistOptions};
pub use session::{
    create_session_folder, default_output_root, FolderOpener, NoopFolderOpener, SessionId, SystemFolderOpener,
};
