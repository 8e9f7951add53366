//! High-level modpack download API
//!
//! Runs one session end to end: read the manifest, prepare the session
//! folder, extract mod slugs from the modlist page, then resolve and download
//! each mod in turn. A failing mod is recorded and the run moves on.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::credentials::ApiKey;
use crate::downloader::api::{CurseForgeAPI, ModCatalog};
use crate::downloader::config::DownloadConfig;
use crate::downloader::core::{
    ConsoleProgressReporter, DownloadError, HttpDownloader, IntoProgressCallback, ProgressCallback, ProgressEvent,
    ProgressReporter, Result, SavedFile,
};
use crate::integrations::session::{
    create_session_folder, default_output_root, FolderOpener, SessionId, SystemFolderOpener,
};
use crate::parse_modlist::{dedup_slugs, extract_slugs_from_file, manifest_path_for, MalformedLine, ModpackManifest};

/// Options for a modpack run
#[derive(Debug, Clone)]
pub struct ModlistOptions {
    /// Download each slug once even if the page lists it repeatedly (default: false)
    pub dedup_slugs: bool,
    /// Show the session folder in the file browser (default: true)
    pub open_folder: bool,
}

impl Default for ModlistOptions {
    fn default() -> Self {
        Self {
            dedup_slugs: false,
            open_folder: true,
        }
    }
}

/// What happened to one mod
#[derive(Debug, Clone, PartialEq)]
pub enum ModOutcome {
    Downloaded(SavedFile),
    /// The mod exists but has no downloadable file for the target version
    NoMatchingFile,
    /// The catalog search returned nothing for the slug
    NotInCatalog,
    Failed { error: String },
}

impl ModOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, ModOutcome::NoMatchingFile | ModOutcome::NotInCatalog)
    }
}

/// Outcome for a single slug
#[derive(Debug, Clone, PartialEq)]
pub struct ModReport {
    pub slug: String,
    pub outcome: ModOutcome,
}

/// Result of a modpack run
#[derive(Debug)]
pub struct ModlistDownloadResult {
    pub session_folder: PathBuf,
    pub target_version: String,
    /// Number of slugs processed
    pub total_mods: usize,
    pub successful_downloads: usize,
    /// No matching file, or not in the catalog
    pub skipped_downloads: usize,
    pub failed_downloads: usize,
    pub total_bytes_downloaded: u64,
    pub elapsed_time: Duration,
    /// One entry per processed slug, in processing order
    pub reports: Vec<ModReport>,
    pub malformed_lines: Vec<MalformedLine>,
    pub error_messages: Vec<String>,
}

impl ModlistDownloadResult {
    /// Paths written during the run, in download order
    pub fn saved_files(&self) -> impl Iterator<Item = &Path> {
        self.reports.iter().filter_map(|report| match &report.outcome {
            ModOutcome::Downloaded(saved) => Some(saved.path.as_path()),
            _ => None,
        })
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        format!(
            "{} of {} mods downloaded ({} skipped, {} failed, {} bytes) in {:.1}s",
            self.successful_downloads,
            self.total_mods,
            self.skipped_downloads,
            self.failed_downloads,
            self.total_bytes_downloaded,
            self.elapsed_time.as_secs_f64()
        )
    }
}

/// Fluent API builder for a modpack run
pub struct ModlistDownloadBuilder {
    modlist_path: PathBuf,
    api_key: Option<ApiKey>,
    catalog: Option<Box<dyn ModCatalog>>,
    output_root: Option<PathBuf>,
    session_id: Option<SessionId>,
    config: DownloadConfig,
    options: ModlistOptions,
    progress_callback: Option<ProgressCallback>,
    folder_opener: Option<Box<dyn FolderOpener>>,
}

impl ModlistDownloadBuilder {
    /// Create a new builder for the given modlist file
    pub fn new<P: AsRef<Path>>(modlist_path: P) -> Self {
        Self {
            modlist_path: modlist_path.as_ref().to_path_buf(),
            api_key: None,
            catalog: None,
            output_root: None,
            session_id: None,
            config: DownloadConfig::default(),
            options: ModlistOptions::default(),
            progress_callback: None,
            folder_opener: None,
        }
    }

    /// API key for the default CurseForge catalog
    pub fn api_key(mut self, api_key: ApiKey) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Use a custom catalog instead of the CurseForge API
    pub fn catalog<C: ModCatalog + 'static>(mut self, catalog: C) -> Self {
        self.catalog = Some(Box::new(catalog));
        self
    }

    /// Directory that receives the `Modpack_<session>` folder
    pub fn output_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.output_root = Some(root.as_ref().to_path_buf());
        self
    }

    pub fn session_id(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn config(mut self, config: DownloadConfig) -> Self {
        self.config = config;
        self
    }

    pub fn dedup_slugs(mut self, dedup: bool) -> Self {
        self.options.dedup_slugs = dedup;
        self
    }

    pub fn open_folder(mut self, open: bool) -> Self {
        self.options.open_folder = open;
        self
    }

    pub fn folder_opener<O: FolderOpener + 'static>(mut self, opener: O) -> Self {
        self.folder_opener = Some(Box::new(opener));
        self
    }

    /// Print progress lines to the console
    pub fn with_console_progress(self, verbose: bool) -> Self {
        self.with_progress_reporter(ConsoleProgressReporter::new(verbose))
    }

    pub fn with_progress_reporter<R: ProgressReporter + 'static>(mut self, reporter: R) -> Self {
        self.progress_callback = Some(reporter.into_callback());
        self
    }

    /// Use a custom progress callback
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressEvent) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(callback));
        self
    }

    /// Execute the run
    ///
    /// Setup failures (manifest, session folder, modlist file) end the run
    /// with an error. Per-mod failures are recorded in the result.
    pub async fn download(self) -> Result<ModlistDownloadResult> {
        let start_time = Instant::now();
        let progress = self.progress_callback;

        let client = self.config.build_client().map_err(|e| DownloadError::Configuration {
            message: format!("Failed to create HTTP client: {}", e),
            field: None,
            suggestion: None,
        })?;

        let catalog: Box<dyn ModCatalog> = match self.catalog {
            Some(catalog) => catalog,
            None => {
                let api_key = self.api_key.ok_or_else(|| DownloadError::Configuration {
                    message: "A CurseForge API key is required".to_string(),
                    field: Some("api_key".to_string()),
                    suggestion: Some("Call api_key() on the builder".to_string()),
                })?;
                Box::new(CurseForgeAPI::with_client(api_key, client.clone(), &self.config))
            }
        };

        // Nothing touches the disk until the target version is known.
        let manifest_path = manifest_path_for(&self.modlist_path);
        info!("Fetching version from {}", manifest_path.display());
        let manifest = ModpackManifest::load(&manifest_path).await?;
        let target_version = manifest
            .target_version()
            .ok_or_else(|| DownloadError::ManifestMissingVersion {
                path: manifest_path.clone(),
            })?
            .to_string();

        if let Some(loader) = manifest.primary_loader() {
            info!("Modpack targets {} with {}", target_version, loader);
        }
        emit(
            &progress,
            ProgressEvent::ManifestLoaded {
                target_version: target_version.clone(),
                pack_name: manifest.name().map(str::to_string),
            },
        );

        let output_root = match self.output_root {
            Some(root) => root,
            None => default_output_root()?,
        };
        let session_id = self.session_id.unwrap_or_else(SessionId::now);
        let session_folder = create_session_folder(&output_root, &session_id).await?;
        emit(
            &progress,
            ProgressEvent::SessionFolderReady {
                path: session_folder.clone(),
            },
        );

        if self.options.open_folder {
            let opener = self
                .folder_opener
                .unwrap_or_else(|| Box::new(SystemFolderOpener));
            if let Err(e) = opener.open(&session_folder) {
                warn!("Could not open {}: {}", session_folder.display(), e);
                emit(
                    &progress,
                    ProgressEvent::Warning {
                        message: format!("Could not open the mods folder: {}", e),
                    },
                );
            }
        }

        let scan = extract_slugs_from_file(&self.modlist_path).await?;
        let slugs = if self.options.dedup_slugs {
            dedup_slugs(scan.slugs)
        } else {
            scan.slugs
        };
        info!("Found {} mod references in {}", slugs.len(), self.modlist_path.display());
        emit(
            &progress,
            ProgressEvent::SlugsExtracted {
                count: slugs.len(),
                malformed: scan.malformed.len(),
            },
        );

        let downloader = HttpDownloader::new(client);
        let mut reports = Vec::with_capacity(slugs.len());
        let mut successful_downloads = 0;
        let mut skipped_downloads = 0;
        let mut failed_downloads = 0;
        let mut total_bytes_downloaded = 0;
        let mut error_messages = Vec::new();

        for slug in slugs {
            let outcome = process_mod(
                catalog.as_ref(),
                &downloader,
                &slug,
                &target_version,
                &session_folder,
                &progress,
            )
            .await;

            match &outcome {
                ModOutcome::Downloaded(saved) => {
                    successful_downloads += 1;
                    total_bytes_downloaded += saved.size;
                }
                ModOutcome::NoMatchingFile | ModOutcome::NotInCatalog => skipped_downloads += 1,
                ModOutcome::Failed { error } => {
                    failed_downloads += 1;
                    error_messages.push(format!("{}: {}", slug, error));
                }
            }

            reports.push(ModReport { slug, outcome });
        }

        emit(
            &progress,
            ProgressEvent::RunComplete {
                successful: successful_downloads,
                skipped: skipped_downloads,
                failed: failed_downloads,
            },
        );

        let result = ModlistDownloadResult {
            session_folder,
            target_version,
            total_mods: reports.len(),
            successful_downloads,
            skipped_downloads,
            failed_downloads,
            total_bytes_downloaded,
            elapsed_time: start_time.elapsed(),
            reports,
            malformed_lines: scan.malformed,
            error_messages,
        };
        info!("{}", result.summary());

        Ok(result)
    }
}

fn emit(progress: &Option<ProgressCallback>, event: ProgressEvent) {
    if let Some(callback) = progress {
        callback(event);
    }
}

/// Error text including the first underlying cause
fn describe_error(error: &DownloadError) -> String {
    match error.source() {
        Some(source) => format!("{}: {}", error, source),
        None => error.to_string(),
    }
}

/// Resolve and download a single mod; never fails the run
async fn process_mod(
    catalog: &dyn ModCatalog,
    downloader: &HttpDownloader,
    slug: &str,
    target_version: &str,
    session_folder: &Path,
    progress: &Option<ProgressCallback>,
) -> ModOutcome {
    emit(progress, ProgressEvent::ModResolving { slug: slug.to_string() });

    let url = match catalog.resolve_download_url(slug, target_version).await {
        Ok(Some(url)) => url,
        Ok(None) => {
            let reason = format!("No valid download found with version {}", target_version);
            emit(
                progress,
                ProgressEvent::ModSkipped {
                    slug: slug.to_string(),
                    reason,
                },
            );
            return ModOutcome::NoMatchingFile;
        }
        Err(e @ DownloadError::ModNotFound { .. }) => {
            emit(
                progress,
                ProgressEvent::ModSkipped {
                    slug: slug.to_string(),
                    reason: e.to_string(),
                },
            );
            return ModOutcome::NotInCatalog;
        }
        Err(e) => {
            let error = describe_error(&e);
            warn!("Failed to resolve {}: {}", slug, error);
            emit(
                progress,
                ProgressEvent::ModFailed {
                    slug: slug.to_string(),
                    error: error.clone(),
                },
            );
            return ModOutcome::Failed { error };
        }
    };

    emit(
        progress,
        ProgressEvent::DownloadStarted {
            slug: slug.to_string(),
            url: url.clone(),
        },
    );

    match downloader.download_to_dir(&url, session_folder).await {
        Ok(saved) => {
            emit(
                progress,
                ProgressEvent::DownloadComplete {
                    slug: slug.to_string(),
                    path: saved.path.clone(),
                    size: saved.size,
                },
            );
            ModOutcome::Downloaded(saved)
        }
        Err(e) => {
            let error = describe_error(&e);
            warn!("Failed to download {}: {}", slug, error);
            emit(
                progress,
                ProgressEvent::ModFailed {
                    slug: slug.to_string(),
                    error: error.clone(),
                },
            );
            ModOutcome::Failed { error }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::tests::sample_key;
    use crate::downloader::config::DownloadConfigBuilder;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::{tempdir, TempDir};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MANIFEST: &str = r#"{"minecraft":{"version":"1.20.1"},"name":"Test Pack"}"#;

    fn link(slug: &str) -> String {
        format!(r#"<li><a href="https://www.curseforge.com/minecraft/mc-mods/{}">{}</a></li>"#, slug, slug)
    }

    /// Writes modlist.html (and optionally manifest.json) into a fresh directory
    fn pack_dir(manifest: Option<&str>, slugs: &[&str]) -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        if let Some(manifest) = manifest {
            std::fs::write(dir.path().join("manifest.json"), manifest).unwrap();
        }
        let html: Vec<String> = slugs.iter().map(|s| link(s)).collect();
        let modlist = dir.path().join("modlist.html");
        std::fs::write(&modlist, format!("<ul>\n{}\n</ul>", html.join("\n"))).unwrap();
        (dir, modlist)
    }

    #[derive(Clone)]
    enum Canned {
        Url(String),
        NoMatch,
        NotFound,
        Status(u16),
    }

    /// Catalog answering from a fixed table and recording lookups
    struct FakeCatalog {
        answers: HashMap<String, Canned>,
        lookups: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl ModCatalog for FakeCatalog {
        async fn resolve_download_url(&self, slug: &str, _target_version: &str) -> Result<Option<String>> {
            self.lookups.lock().unwrap().push(slug.to_string());
            match self.answers.get(slug).cloned().unwrap_or(Canned::NotFound) {
                Canned::Url(url) => Ok(Some(url)),
                Canned::NoMatch => Ok(None),
                Canned::NotFound => Err(DownloadError::ModNotFound { slug: slug.to_string() }),
                Canned::Status(code) => Err(DownloadError::HttpStatus {
                    url: "https://api.example/v1/mods/search".to_string(),
                    status: reqwest::StatusCode::from_u16(code).unwrap(),
                }),
            }
        }
    }

    #[derive(Clone, Default)]
    struct RecordingOpener {
        opened: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl FolderOpener for RecordingOpener {
        fn open(&self, path: &Path) -> std::io::Result<()> {
            self.opened.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    struct FailingOpener;

    impl FolderOpener for FailingOpener {
        fn open(&self, _path: &Path) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no file browser"))
        }
    }

    fn fixed_session() -> SessionId {
        SessionId::from_naive(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(3, 4, 5)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn end_to_end_downloads_matching_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/mods/search"))
            .and(query_param("gameId", "432"))
            .and(query_param("slug", "jei"))
            .and(header("x-api-key", sample_key().expose()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "id": 123, "slug": "jei" }]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/mods/123/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{
                    "gameVersions": ["1.20.1"],
                    "downloadUrl": format!("{}/files/4712/866/jei-1.20.1.jar", server.uri())
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/files/4712/866/jei-1.20.1.jar"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jei jar".to_vec()))
            .mount(&server)
            .await;

        let (pack, modlist) = pack_dir(Some(MANIFEST), &["jei"]);
        let output = tempdir().unwrap();
        let events = Arc::new(Mutex::new(Vec::new()));
        let recorded = events.clone();
        let opener = RecordingOpener::default();

        let result = ModlistDownloadBuilder::new(&modlist)
            .api_key(sample_key())
            .config(DownloadConfigBuilder::new().api_base_url(server.uri()).build())
            .output_root(output.path())
            .session_id(fixed_session())
            .folder_opener(opener.clone())
            .with_progress(move |event| recorded.lock().unwrap().push(event))
            .download()
            .await
            .unwrap();

        let expected_folder = output.path().join("Modpack_20240102_030405");
        let expected_file = expected_folder.join("jei-1.20.1.jar");
        assert_eq!(result.session_folder, expected_folder);
        assert_eq!(result.target_version, "1.20.1");
        assert_eq!(result.successful_downloads, 1);
        assert_eq!(result.total_bytes_downloaded, 7);
        assert_eq!(result.saved_files().collect::<Vec<_>>(), vec![expected_file.as_path()]);
        assert_eq!(std::fs::read(&expected_file).unwrap(), b"jei jar");
        assert_eq!(*opener.opened.lock().unwrap(), vec![expected_folder.clone()]);

        let events = events.lock().unwrap();
        assert!(matches!(events.first(), Some(ProgressEvent::ManifestLoaded { target_version, .. }) if target_version == "1.20.1"));
        assert!(events.iter().any(|e| matches!(e, ProgressEvent::DownloadComplete { slug, .. } if slug == "jei")));
        assert!(matches!(events.last(), Some(ProgressEvent::RunComplete { successful: 1, skipped: 0, failed: 0 })));
        drop(pack);
    }

    #[tokio::test]
    async fn missing_manifest_aborts_before_creating_folder() {
        let (_pack, modlist) = pack_dir(None, &["jei"]);
        let output = tempdir().unwrap();
        let root = output.path().join("Minecraft Mods");
        let lookups = Arc::new(Mutex::new(Vec::new()));

        let err = ModlistDownloadBuilder::new(&modlist)
            .catalog(FakeCatalog {
                answers: HashMap::new(),
                lookups: lookups.clone(),
            })
            .output_root(&root)
            .open_folder(false)
            .download()
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::ManifestNotFound { .. }));
        assert!(!root.exists());
        assert!(lookups.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn manifest_without_version_aborts_before_creating_folder() {
        let (_pack, modlist) = pack_dir(Some(r#"{"minecraft":{}}"#), &["jei"]);
        let output = tempdir().unwrap();
        let root = output.path().join("Minecraft Mods");

        let err = ModlistDownloadBuilder::new(&modlist)
            .catalog(FakeCatalog {
                answers: HashMap::new(),
                lookups: Arc::default(),
            })
            .output_root(&root)
            .open_folder(false)
            .download()
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::ManifestMissingVersion { .. }));
        assert!(err.is_fatal());
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn per_mod_failures_do_not_stop_the_run() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok.jar"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gone.jar"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let answers = HashMap::from([
            ("first".to_string(), Canned::Status(500)),
            ("second".to_string(), Canned::NoMatch),
            ("fourth".to_string(), Canned::Url(format!("{}/gone.jar", server.uri()))),
            ("fifth".to_string(), Canned::Url(format!("{}/ok.jar", server.uri()))),
        ]);
        let lookups = Arc::new(Mutex::new(Vec::new()));
        let (_pack, modlist) = pack_dir(Some(MANIFEST), &["first", "second", "third", "fourth", "fifth"]);
        let output = tempdir().unwrap();

        let result = ModlistDownloadBuilder::new(&modlist)
            .catalog(FakeCatalog {
                answers,
                lookups: lookups.clone(),
            })
            .output_root(output.path())
            .open_folder(false)
            .download()
            .await
            .unwrap();

        assert_eq!(*lookups.lock().unwrap(), vec!["first", "second", "third", "fourth", "fifth"]);
        assert_eq!(result.total_mods, 5);
        assert_eq!(result.successful_downloads, 1);
        assert_eq!(result.skipped_downloads, 2);
        assert_eq!(result.failed_downloads, 2);
        assert_eq!(result.error_messages.len(), 2);
        assert!(result.error_messages[0].starts_with("first:"));

        let outcomes: Vec<_> = result.reports.iter().map(|r| &r.outcome).collect();
        assert!(matches!(outcomes[0], ModOutcome::Failed { .. }));
        assert_eq!(*outcomes[1], ModOutcome::NoMatchingFile);
        assert_eq!(*outcomes[2], ModOutcome::NotInCatalog);
        assert!(matches!(outcomes[3], ModOutcome::Failed { .. }));
        assert!(matches!(outcomes[4], ModOutcome::Downloaded(_)));
    }

    #[tokio::test]
    async fn duplicates_are_kept_unless_dedup_requested() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jei.jar"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jar".to_vec()))
            .mount(&server)
            .await;
        let answers = HashMap::from([("jei".to_string(), Canned::Url(format!("{}/jei.jar", server.uri())))]);
        let (_pack, modlist) = pack_dir(Some(MANIFEST), &["jei", "jei"]);

        for (dedup, expected) in [(false, 2), (true, 1)] {
            let output = tempdir().unwrap();
            let lookups = Arc::new(Mutex::new(Vec::new()));
            let result = ModlistDownloadBuilder::new(&modlist)
                .catalog(FakeCatalog {
                    answers: answers.clone(),
                    lookups: lookups.clone(),
                })
                .output_root(output.path())
                .open_folder(false)
                .dedup_slugs(dedup)
                .download()
                .await
                .unwrap();

            assert_eq!(lookups.lock().unwrap().len(), expected);
            assert_eq!(result.successful_downloads, expected);
            // Both downloads land on the same name; the folder holds one file.
            let files = std::fs::read_dir(&result.session_folder).unwrap().count();
            assert_eq!(files, 1);
        }
    }

    #[tokio::test]
    async fn opener_failure_is_only_a_warning() {
        let (_pack, modlist) = pack_dir(Some(MANIFEST), &[]);
        let output = tempdir().unwrap();
        let warnings = Arc::new(Mutex::new(Vec::new()));
        let recorded = warnings.clone();

        let result = ModlistDownloadBuilder::new(&modlist)
            .catalog(FakeCatalog {
                answers: HashMap::new(),
                lookups: Arc::default(),
            })
            .output_root(output.path())
            .folder_opener(FailingOpener)
            .with_progress(move |event| {
                if let ProgressEvent::Warning { message } = event {
                    recorded.lock().unwrap().push(message);
                }
            })
            .download()
            .await
            .unwrap();

        assert_eq!(result.total_mods, 0);
        assert!(result.session_folder.is_dir());
        assert_eq!(warnings.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_lines_are_reported_in_result() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("manifest.json"), MANIFEST).unwrap();
        let modlist = dir.path().join("modlist.html");
        std::fs::write(
            &modlist,
            "<a href=https://www.curseforge.com/minecraft/mc-mods/broken>\n<a href=\"https://www.curseforge.com/minecraft/mc-mods/ghost\">",
        )
        .unwrap();
        let output = tempdir().unwrap();

        let result = ModlistDownloadBuilder::new(&modlist)
            .catalog(FakeCatalog {
                answers: HashMap::new(),
                lookups: Arc::default(),
            })
            .output_root(output.path())
            .open_folder(false)
            .download()
            .await
            .unwrap();

        assert_eq!(result.malformed_lines.len(), 1);
        assert_eq!(result.malformed_lines[0].line_number, 1);
        assert_eq!(result.skipped_downloads, 1);
    }

    #[tokio::test]
    async fn missing_api_key_is_configuration_error() {
        let (_pack, modlist) = pack_dir(Some(MANIFEST), &["jei"]);
        let err = ModlistDownloadBuilder::new(&modlist)
            .open_folder(false)
            .download()
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Configuration { .. }));
    }

    #[test]
    fn summary_mentions_counts() {
        let result = ModlistDownloadResult {
            session_folder: PathBuf::from("/mods/Modpack_1"),
            target_version: "1.20.1".to_string(),
            total_mods: 3,
            successful_downloads: 2,
            skipped_downloads: 1,
            failed_downloads: 0,
            total_bytes_downloaded: 2048,
            elapsed_time: Duration::from_millis(1500),
            reports: Vec::new(),
            malformed_lines: Vec::new(),
            error_messages: Vec::new(),
        };
        assert_eq!(result.summary(), "2 of 3 mods downloaded (1 skipped, 0 failed, 2048 bytes) in 1.5s");
    }
}
