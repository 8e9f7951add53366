//! Catalog API clients

pub mod curseforge_api;

pub use curseforge_api::{select_file_for_version, CatalogFile, CatalogMod, CurseForgeAPI, ModCatalog};
