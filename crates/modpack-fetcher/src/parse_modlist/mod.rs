//! Modpack input parsing
//!
//! - `manifest`: the pack's `manifest.json` and its target Minecraft version
//! - `slugs`: mod references in the saved `modlist.html` page

pub mod manifest;
pub mod slugs;

pub use manifest::{manifest_path_for, read_target_version, ModLoader, ModpackManifest, MANIFEST_FILE_NAME};
pub use slugs::{dedup_slugs, extract_slugs, extract_slugs_from_file, MalformedLine, MalformedReason, SlugScan};
