use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ProfileError;
use crate::profile::Profile;

const DEFAULT_DIR: &str = "~/.config/skulk/profiles";

/// One JSON document per profile under a user-owned directory.
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// Store at the conventional per-user location.
    pub fn default_location() -> Self {
        let expanded = shellexpand::tilde(DEFAULT_DIR);
        Self::open(Path::new(expanded.as_ref()))
    }

    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path(name).exists()
    }

    pub fn save(&self, profile: &Profile) -> Result<(), ProfileError> {
        fs::create_dir_all(&self.dir)?;
        let body = serde_json::to_string_pretty(profile)?;
        fs::write(self.path(&profile.name), body)?;
        debug!(name = %profile.name, "profile saved");
        Ok(())
    }

    pub fn load(&self, name: &str) -> Result<Profile, ProfileError> {
        if !self.exists(name) {
            return Err(ProfileError::NotFound(name.to_string()));
        }
        let body = fs::read_to_string(self.path(name))?;
        Ok(serde_json::from_str(&body)?)
    }

    pub fn remove(&self, name: &str) -> Result<(), ProfileError> {
        if !self.exists(name) {
            return Err(ProfileError::NotFound(name.to_string()));
        }
        Ok(fs::remove_file(self.path(name))?)
    }

    /// Rename a stored profile, rewriting its embedded name. Refuses to
    /// clobber an existing target.
    pub fn rename(&self, old_name: &str, new_name: &str) -> Result<(), ProfileError> {
        if self.exists(new_name) {
            return Err(ProfileError::AlreadyExists(new_name.to_string()));
        }
        let mut profile = self.load(old_name)?;
        profile.name = new_name.to_string();
        self.save(&profile)?;
        self.remove(old_name)
    }

    /// Names of every stored profile, sorted.
    pub fn list(&self) -> Result<Vec<String>, ProfileError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
