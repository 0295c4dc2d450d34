use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::to_string_pretty;
use crate::error::Result;

// The two durable slots the calculator owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    SelectedCourses,
    SavedSemesters,
}

impl Slot {
    pub fn file_name(self) -> &'static str {
        match self {
            Slot::SelectedCourses => "selected_courses.json",
            Slot::SavedSemesters => "saved_semesters.json",
        }
    }
}

/// JSON files in a data directory, one per [`Slot`].
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        LocalStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, slot: Slot) -> PathBuf {
        self.dir.join(slot.file_name())
    }

    // Reads a slot. Missing, empty or corrupt files all read as an empty list.
    pub fn load<T: DeserializeOwned>(&self, slot: Slot) -> Vec<T> {
        let file_path = self.path(slot);

        let file_exists_and_non_empty = file_path.exists() && fs::metadata(&file_path).map(|m| m.len() > 0).unwrap_or(false);
        if !file_exists_and_non_empty {
            debug!("No saved data in {}", file_path.display());
            return Vec::new();
        }

        let contents = match fs::read_to_string(&file_path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read {}: {}", file_path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(items) => items,
            Err(e) => {
                warn!("Ignoring corrupt data in {}: {}", file_path.display(), e);
                Vec::new()
            }
        }
    }

    // Writes a slot's temporary file. Nothing is visible until the returned
    // write is committed.
    pub fn stage<T: Serialize>(&self, slot: Slot, items: &[T]) -> Result<StagedWrite> {
        fs::create_dir_all(&self.dir)?;
        let file_path = self.path(slot);
        let tmp_path = file_path.with_extension("json.tmp");

        fs::write(&tmp_path, to_string_pretty(items)?)?;
        Ok(StagedWrite { tmp_path, file_path, entries: items.len() })
    }

    // Writes a slot through a temporary file and a rename, so readers never
    // see a half-written array.
    pub fn save<T: Serialize>(&self, slot: Slot, items: &[T]) -> Result<()> {
        self.stage(slot, items)?.commit()
    }

    /// Writes two slots together. Both temporary files are written before
    /// either is renamed into place, so a failed write changes neither slot.
    pub fn save_both<A: Serialize, B: Serialize>(&self, first: (Slot, &[A]), second: (Slot, &[B])) -> Result<()> {
        let staged_first = self.stage(first.0, first.1)?;
        let staged_second = match self.stage(second.0, second.1) {
            Ok(staged) => staged,
            Err(e) => {
                staged_first.abandon();
                return Err(e);
            }
        };

        if let Err(e) = staged_first.commit() {
            staged_second.abandon();
            return Err(e);
        }
        staged_second.commit()
    }
}

/// A slot write whose temporary file is on disk but not yet renamed into place.
#[derive(Debug)]
pub struct StagedWrite {
    tmp_path: PathBuf,
    file_path: PathBuf,
    entries: usize,
}

impl StagedWrite {
    pub fn commit(self) -> Result<()> {
        fs::rename(&self.tmp_path, &self.file_path)?;
        debug!("Saved {} entries to {}", self.entries, self.file_path.display());
        Ok(())
    }

    pub fn abandon(self) {
        if let Err(e) = fs::remove_file(&self.tmp_path) {
            warn!("Failed to remove {}: {}", self.tmp_path.display(), e);
        }
    }
}
