//! Asset staging: drain the operator's staging directory into the canonical
//! asset layout.
//!
//! The staging directory holds exactly one new image file and one model
//! folder. Both are renamed after the animal's canonical name and moved to
//! `img/` and `models/` respectively. Re-staging under the same name
//! overwrites the previous model folder, so a crashed or repeated run
//! converges on retry.

use crate::config::{AssetConfig, PathsConfig};
use crate::error::{CatalogError, Result};
use crate::naming::canonical_name;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Canonical relative paths produced by a staging run.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedAssets {
    /// `img/<name>.<ext>`, relative to the project root.
    pub image_path: String,
    /// `models/<name>/<name>.<ext>`, or just `models/<name>` when the folder
    /// held no recognizable model file.
    pub model_path: String,
}

/// Moves staged asset files into the canonical layout.
pub struct AssetStager {
    project_root: PathBuf,
}

impl AssetStager {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    fn staging_dir(&self) -> PathBuf {
        self.project_root.join(PathsConfig::STAGING_DIR_NAME)
    }

    /// Stage the image and model folder currently in the staging directory
    /// under the given canonical name.
    ///
    /// Fatal failures: staging dir absent (it is created on the way out so a
    /// subsequent run can succeed), staging dir empty, no image file, no
    /// model folder. A model folder without a recognizable model file is a
    /// soft degradation: the folder path is returned and a warning logged.
    pub fn stage(&self, name: &str) -> Result<StagedAssets> {
        let name = canonical_name(name);
        let staging = self.staging_dir();

        if !staging.exists() {
            std::fs::create_dir_all(&staging)
                .map_err(|e| CatalogError::io_with_path(e, &staging))?;
            return Err(CatalogError::StagingAreaMissing(staging));
        }

        let entries = Self::sorted_entries(&staging)?;
        if entries.is_empty() {
            return Err(CatalogError::StagingAreaEmpty(staging));
        }

        let image_path = self.place_image(&staging, &entries, &name)?;
        let model_path = self.place_model_folder(&staging, &entries, &name)?;

        Ok(StagedAssets {
            image_path,
            model_path,
        })
    }

    /// Directory entries sorted by file name, for deterministic selection.
    fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|e| CatalogError::io_with_path(e, dir))? {
            entries.push(entry.map_err(|e| CatalogError::io_with_path(e, dir))?.path());
        }
        entries.sort();
        Ok(entries)
    }

    fn place_image(&self, staging: &Path, entries: &[PathBuf], name: &str) -> Result<String> {
        let images: Vec<&PathBuf> = entries
            .iter()
            .filter(|p| p.is_file() && has_extension(p, AssetConfig::IMAGE_EXTENSIONS))
            .collect();

        let src = images
            .first()
            .ok_or_else(|| CatalogError::NoImageFound(staging.to_path_buf()))?;
        if images.len() > 1 {
            warn!(
                "Staging area holds {} image files, taking {}",
                images.len(),
                src.display()
            );
        }

        let ext = extension_lowercase(src).unwrap_or_default();
        let images_dir = self.project_root.join(PathsConfig::IMAGES_DIR_NAME);
        std::fs::create_dir_all(&images_dir)
            .map_err(|e| CatalogError::io_with_path(e, &images_dir))?;

        let dest = images_dir.join(format!("{}.{}", name, ext));
        std::fs::rename(src, &dest).map_err(|e| CatalogError::io_with_path(e, &dest))?;
        debug!("Staged image {} -> {}", src.display(), dest.display());

        Ok(format!(
            "{}/{}.{}",
            PathsConfig::IMAGES_DIR_NAME,
            name,
            ext
        ))
    }

    fn place_model_folder(
        &self,
        staging: &Path,
        entries: &[PathBuf],
        name: &str,
    ) -> Result<String> {
        let src = entries
            .iter()
            .find(|p| p.is_dir())
            .ok_or_else(|| CatalogError::NoModelFolder(staging.to_path_buf()))?;

        let models_dir = self.project_root.join(PathsConfig::MODELS_DIR_NAME);
        std::fs::create_dir_all(&models_dir)
            .map_err(|e| CatalogError::io_with_path(e, &models_dir))?;

        let target = models_dir.join(name);
        // Overwrite any previous folder of the same name: re-staging the same
        // animal must converge instead of failing.
        if target.exists() {
            std::fs::remove_dir_all(&target)
                .map_err(|e| CatalogError::io_with_path(e, &target))?;
        }
        std::fs::rename(src, &target).map_err(|e| CatalogError::io_with_path(e, &target))?;
        debug!("Staged model folder {} -> {}", src.display(), target.display());

        let folder_rel = format!("{}/{}", PathsConfig::MODELS_DIR_NAME, name);
        match self.find_model_file(&target)? {
            Some(found) => {
                let ext = extension_lowercase(&found).unwrap_or_default();
                let dest = target.join(format!("{}.{}", name, ext));
                if found != dest {
                    std::fs::rename(&found, &dest)
                        .map_err(|e| CatalogError::io_with_path(e, &dest))?;
                }
                Ok(format!("{}/{}.{}", folder_rel, name, ext))
            }
            None => {
                warn!(
                    "No model file with a known extension inside {}, keeping folder path",
                    target.display()
                );
                Ok(folder_rel)
            }
        }
    }

    /// First file under the moved folder with a model-asset extension.
    fn find_model_file(&self, folder: &Path) -> Result<Option<PathBuf>> {
        for entry in WalkDir::new(folder).sort_by_file_name() {
            let entry = entry.map_err(|e| CatalogError::Io {
                message: e.to_string(),
                path: Some(folder.to_path_buf()),
                source: None,
            })?;
            if entry.file_type().is_file()
                && has_extension(entry.path(), AssetConfig::MODEL_EXTENSIONS)
            {
                return Ok(Some(entry.path().to_path_buf()));
            }
        }
        Ok(None)
    }
}

fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    match extension_lowercase(path) {
        Some(ext) => allowed.contains(&ext.as_str()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        std::fs::write(path, b"x").unwrap();
    }

    /// Staging dir with one image and one model folder holding one OBJ.
    fn populate_staging(root: &Path) {
        let staging = root.join("staging");
        std::fs::create_dir_all(&staging).unwrap();
        touch(&staging.join("foto final.JPG"));
        let folder = staging.join("export_blender");
        std::fs::create_dir_all(&folder).unwrap();
        touch(&folder.join("mesh.obj"));
        touch(&folder.join("mesh.mtl"));
    }

    #[test]
    fn test_stage_happy_path() {
        let temp = TempDir::new().unwrap();
        populate_staging(temp.path());

        let stager = AssetStager::new(temp.path());
        let staged = stager.stage("Ajolote").unwrap();

        assert_eq!(staged.image_path, "img/ajolote.jpg");
        assert_eq!(staged.model_path, "models/ajolote/ajolote.obj");
        assert!(temp.path().join("img/ajolote.jpg").exists());
        assert!(temp.path().join("models/ajolote/ajolote.obj").exists());
        // Companion files travel with the folder.
        assert!(temp.path().join("models/ajolote/mesh.mtl").exists());

        // Staging area fully drained.
        let leftover: Vec<_> = std::fs::read_dir(temp.path().join("staging"))
            .unwrap()
            .collect();
        assert!(leftover.is_empty());
    }

    #[test]
    fn test_missing_staging_dir_is_fatal_and_created() {
        let temp = TempDir::new().unwrap();
        let stager = AssetStager::new(temp.path());

        let err = stager.stage("Ajolote").unwrap_err();
        assert!(matches!(err, CatalogError::StagingAreaMissing(_)));
        // Side effect: the directory now exists for the next attempt.
        assert!(temp.path().join("staging").is_dir());
    }

    #[test]
    fn test_empty_staging_dir_is_fatal() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("staging")).unwrap();

        let err = AssetStager::new(temp.path()).stage("Ajolote").unwrap_err();
        assert!(matches!(err, CatalogError::StagingAreaEmpty(_)));
    }

    #[test]
    fn test_no_image_is_fatal() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        std::fs::create_dir_all(staging.join("export_blender")).unwrap();
        touch(&staging.join("export_blender").join("mesh.obj"));

        let err = AssetStager::new(temp.path()).stage("Ajolote").unwrap_err();
        assert!(matches!(err, CatalogError::NoImageFound(_)));
    }

    #[test]
    fn test_no_model_folder_is_fatal() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        std::fs::create_dir_all(&staging).unwrap();
        touch(&staging.join("foto.png"));

        let err = AssetStager::new(temp.path()).stage("Ajolote").unwrap_err();
        assert!(matches!(err, CatalogError::NoModelFolder(_)));
    }

    #[test]
    fn test_two_images_takes_first_sorted() {
        let temp = TempDir::new().unwrap();
        populate_staging(temp.path());
        touch(&temp.path().join("staging").join("zzz_other.png"));

        let staged = AssetStager::new(temp.path()).stage("Ajolote").unwrap();
        // "foto final.JPG" sorts before "zzz_other.png".
        assert_eq!(staged.image_path, "img/ajolote.jpg");
    }

    #[test]
    fn test_restage_overwrites_existing_model_folder() {
        let temp = TempDir::new().unwrap();

        // A previous staging run left a folder behind.
        let old = temp.path().join("models/ajolote");
        std::fs::create_dir_all(&old).unwrap();
        touch(&old.join("stale.obj"));

        populate_staging(temp.path());
        let staged = AssetStager::new(temp.path()).stage("Ajolote").unwrap();

        assert_eq!(staged.model_path, "models/ajolote/ajolote.obj");
        assert!(!temp.path().join("models/ajolote/stale.obj").exists());
    }

    #[test]
    fn test_folder_without_model_file_degrades_softly() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        std::fs::create_dir_all(staging.join("textures_only")).unwrap();
        touch(&staging.join("foto.png"));
        touch(&staging.join("textures_only").join("skin.tga"));

        let staged = AssetStager::new(temp.path()).stage("Ajolote").unwrap();
        assert_eq!(staged.model_path, "models/ajolote");
        assert!(temp.path().join("models/ajolote/skin.tga").exists());
    }

    #[test]
    fn test_model_file_found_in_nested_subfolder() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        std::fs::create_dir_all(staging.join("export").join("lod0")).unwrap();
        touch(&staging.join("foto.png"));
        touch(&staging.join("export").join("lod0").join("mesh.glb"));

        let staged = AssetStager::new(temp.path()).stage("Tucán").unwrap();
        assert_eq!(staged.model_path, "models/tucan/tucan.glb");
        assert!(temp.path().join("models/tucan/tucan.glb").exists());
    }
}
