//! Progress tracking and reporting for a modpack run

use std::path::PathBuf;
use std::sync::Arc;

/// Progress callback for run events
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Events emitted while a modpack run moves through its stages
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    ManifestLoaded {
        target_version: String,
        pack_name: Option<String>,
    },
    SessionFolderReady {
        path: PathBuf,
    },
    SlugsExtracted {
        count: usize,
        malformed: usize,
    },
    ModResolving {
        slug: String,
    },
    DownloadStarted {
        slug: String,
        url: String,
    },
    DownloadComplete {
        slug: String,
        path: PathBuf,
        size: u64,
    },
    ModSkipped {
        slug: String,
        reason: String,
    },
    ModFailed {
        slug: String,
        error: String,
    },
    Warning {
        message: String,
    },
    RunComplete {
        successful: usize,
        skipped: usize,
        failed: usize,
    },
}

/// Trait for progress reporting with more granular control
pub trait ProgressReporter: Send + Sync {
    fn on_manifest_loaded(&self, _target_version: &str, _pack_name: Option<&str>) {}
    fn on_session_folder_ready(&self, _path: &std::path::Path) {}
    fn on_slugs_extracted(&self, _count: usize, _malformed: usize) {}
    fn on_mod_resolving(&self, _slug: &str) {}
    fn on_download_started(&self, _slug: &str, _url: &str) {}
    fn on_download_complete(&self, _slug: &str, _path: &std::path::Path, _size: u64) {}
    fn on_mod_skipped(&self, _slug: &str, _reason: &str) {}
    fn on_mod_failed(&self, _slug: &str, _error: &str) {}
    fn on_warning(&self, _message: &str) {}
    fn on_run_complete(&self, _successful: usize, _skipped: usize, _failed: usize) {}
}

/// Extension trait to convert ProgressReporter to ProgressCallback
pub trait IntoProgressCallback {
    fn into_callback(self) -> ProgressCallback;
}

impl<T: ProgressReporter + 'static> IntoProgressCallback for T {
    fn into_callback(self) -> ProgressCallback {
        Arc::new(move |event| match event {
            ProgressEvent::ManifestLoaded { target_version, pack_name } => {
                self.on_manifest_loaded(&target_version, pack_name.as_deref());
            }
            ProgressEvent::SessionFolderReady { path } => {
                self.on_session_folder_ready(&path);
            }
            ProgressEvent::SlugsExtracted { count, malformed } => {
                self.on_slugs_extracted(count, malformed);
            }
            ProgressEvent::ModResolving { slug } => {
                self.on_mod_resolving(&slug);
            }
            ProgressEvent::DownloadStarted { slug, url } => {
                self.on_download_started(&slug, &url);
            }
            ProgressEvent::DownloadComplete { slug, path, size } => {
                self.on_download_complete(&slug, &path, size);
            }
            ProgressEvent::ModSkipped { slug, reason } => {
                self.on_mod_skipped(&slug, &reason);
            }
            ProgressEvent::ModFailed { slug, error } => {
                self.on_mod_failed(&slug, &error);
            }
            ProgressEvent::Warning { message } => {
                self.on_warning(&message);
            }
            ProgressEvent::RunComplete { successful, skipped, failed } => {
                self.on_run_complete(successful, skipped, failed);
            }
        })
    }
}

/// Console progress reporter, one line per event
#[derive(Debug, Default)]
pub struct ConsoleProgressReporter {
    pub verbose: bool,
}

impl ConsoleProgressReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn on_manifest_loaded(&self, target_version: &str, pack_name: Option<&str>) {
        if let Some(name) = pack_name {
            println!("Modpack: {}", name);
        }
        println!("Mods version: {}", target_version);
    }

    fn on_session_folder_ready(&self, path: &std::path::Path) {
        println!("Mods folder: {}", path.display());
    }

    fn on_slugs_extracted(&self, count: usize, malformed: usize) {
        if self.verbose || malformed > 0 {
            println!("Found {} mod links ({} malformed lines skipped)", count, malformed);
        }
    }

    fn on_mod_resolving(&self, slug: &str) {
        println!("Fetching mod: {}...", slug);
    }

    fn on_download_started(&self, _slug: &str, url: &str) {
        println!("Downloading {}...", url);
    }

    fn on_download_complete(&self, _slug: &str, path: &std::path::Path, size: u64) {
        if self.verbose {
            println!("Saved: {} ({} bytes)", path.display(), size);
        } else {
            println!("Saved: {}", path.display());
        }
    }

    fn on_mod_skipped(&self, slug: &str, reason: &str) {
        println!("Skipped {}: {}", slug, reason);
    }

    fn on_mod_failed(&self, slug: &str, error: &str) {
        eprintln!("Failed to process {}: {}", slug, error);
    }

    fn on_warning(&self, message: &str) {
        eprintln!("Warning: {}", message);
    }

    fn on_run_complete(&self, successful: usize, skipped: usize, failed: usize) {
        println!(
            "Download process completed: {} downloaded, {} skipped, {} failed.",
            successful, skipped, failed
        );
    }
}

/// Null progress reporter that does nothing
#[derive(Debug, Default)]
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {}
