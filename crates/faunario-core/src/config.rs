//! Centralized configuration for the Faunario catalog.
//!
//! Path layout, supported asset extensions, and network parameters live here
//! as constants so the pipeline and the CLI agree on a single canonical
//! on-disk structure.

use std::time::Duration;

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "Faunario";
    /// Placeholder used when the encyclopedia lookup fails or is disabled.
    pub const PLACEHOLDER_DESCRIPTION: &'static str =
        "Descripción no disponible todavía.";
}

/// Canonical directory and file names, relative to the project root.
pub struct PathsConfig;

impl PathsConfig {
    pub const DATA_DIR_NAME: &'static str = "data";
    pub const DB_FILENAME: &'static str = "fauna.db";
    pub const IMAGES_DIR_NAME: &'static str = "img";
    pub const MODELS_DIR_NAME: &'static str = "models";
    pub const STAGING_DIR_NAME: &'static str = "staging";
}

/// Asset file classification.
pub struct AssetConfig;

impl AssetConfig {
    /// Image extensions accepted by the stager (matched case-insensitively).
    pub const IMAGE_EXTENSIONS: &'static [&'static str] = &["png", "jpg", "jpeg"];
    /// 3D model extensions recognized inside a staged model folder.
    pub const MODEL_EXTENSIONS: &'static [&'static str] =
        &["obj", "stl", "ply", "glb", "gltf"];
}

/// Network-related configuration for the summary lookup.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    pub const SUMMARY_API_BASE: &'static str =
        "https://es.wikipedia.org/api/rest_v1/page/summary";
    pub const USER_AGENT: &'static str = "faunario/0.3";
}
