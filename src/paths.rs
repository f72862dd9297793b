use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/// Per-user directories of the gallery application.
pub struct AppPaths {
    pub config: PathBuf,
    pub data: PathBuf,
}

impl AppPaths {
    pub fn from_project_dirs() -> Option<Self> {
        ProjectDirs::from("com", "vowgallery", "VowGallery").map(|dirs| Self {
            config: dirs.config_dir().to_path_buf(),
            data: dirs.data_dir().to_path_buf(),
        })
    }

    /// Location of the optional `config.json`.
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }

    /// Default photo manifest looked up when none is configured.
    pub fn default_manifest(&self) -> PathBuf {
        self.data.join("photos.json")
    }

    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.config)?;
        fs::create_dir_all(&self.data)?;
        Ok(())
    }
}
