//! Save slots on disk.
//!
//! Each slot is one gzip-compressed JSON file `<slot>.json.gz` inside the save
//! directory. Plain `<slot>.json` files are accepted on load so hand-edited
//! saves still work.

use crate::error::{IoError, Result};
use crate::serialization::{from_json, read_json_file, to_json, write_json_file};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use squidmind_data::{SavedCreature, SAVE_FORMAT_VERSION};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Slot written on explicit user request.
pub const MANUAL_SLOT: &str = "manual";
/// Slot written by the autosave cadence.
pub const AUTOSAVE_SLOT: &str = "autosave";

const GZ_SUFFIX: &str = ".json.gz";
const PLAIN_SUFFIX: &str = ".json";

#[derive(Debug, Clone)]
pub struct SaveManager {
    dir: PathBuf,
}

impl SaveManager {
    /// Opens a save directory, creating it if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| {
            IoError::FileSystem(e).with_context(format!("creating save directory {dir:?}"))
        })?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn check_slot(slot: &str) -> Result<()> {
        let valid = !slot.is_empty()
            && slot
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(())
        } else {
            Err(IoError::validation(format!("invalid slot name {slot:?}")))
        }
    }

    fn gz_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}{GZ_SUFFIX}"))
    }

    fn plain_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}{PLAIN_SUFFIX}"))
    }

    /// Writes a save to `slot`, replacing any previous one.
    ///
    /// The blob goes to a temporary file first and is renamed into place, so
    /// a crash mid-write leaves the previous save intact. A failed write
    /// removes the temporary file.
    pub fn save(&self, slot: &str, saved: &SavedCreature) -> Result<PathBuf> {
        Self::check_slot(slot)?;
        let json = to_json(saved)?;
        let target = self.gz_path(slot);
        let tmp = self.dir.join(format!(".{slot}{GZ_SUFFIX}.tmp"));

        let written = write_gz(&tmp, json.as_bytes()).and_then(|()| {
            std::fs::rename(&tmp, &target)
                .map_err(|e| IoError::FileSystem(e).with_context(format!("replacing {target:?}")))
        });
        if let Err(e) = written {
            if tmp.exists() {
                if let Err(cleanup) = std::fs::remove_file(&tmp) {
                    tracing::warn!(path = ?tmp, error = %cleanup, "Could not remove temporary save");
                }
            }
            return Err(e);
        }

        tracing::info!(slot, path = ?target, bytes = json.len(), "Creature saved");
        Ok(target)
    }

    /// Writes `slot` as plain pretty-printed JSON for hand editing.
    ///
    /// [`SaveManager::load`] prefers a gzip save of the same slot, so the
    /// export is only picked up once that is deleted.
    pub fn export_plain(&self, slot: &str, saved: &SavedCreature) -> Result<PathBuf> {
        Self::check_slot(slot)?;
        let target = self.plain_path(slot);
        write_json_file(saved, &target)?;
        tracing::info!(slot, path = ?target, "Creature exported");
        Ok(target)
    }

    /// Reads the save in `slot`.
    pub fn load(&self, slot: &str) -> Result<SavedCreature> {
        Self::check_slot(slot)?;
        let gz = self.gz_path(slot);
        let plain = self.plain_path(slot);

        let saved: SavedCreature = if gz.exists() {
            let file = File::open(&gz)
                .map_err(|e| IoError::FileSystem(e).with_context(format!("opening {gz:?}")))?;
            let mut decoded = String::new();
            GzDecoder::new(file)
                .read_to_string(&mut decoded)
                .map_err(|e| IoError::compression(e.to_string()).with_context(format!("{gz:?}")))?;
            from_json(&decoded)?
        } else if plain.exists() {
            read_json_file(&plain)?
        } else {
            return Err(IoError::not_found(format!("save slot {slot}")));
        };

        if saved.version > SAVE_FORMAT_VERSION {
            return Err(IoError::validation(format!(
                "save format {} is newer than supported {}",
                saved.version, SAVE_FORMAT_VERSION
            )));
        }
        tracing::info!(slot, neurons = saved.neurons.len(), "Creature loaded");
        Ok(saved)
    }

    #[must_use]
    pub fn exists(&self, slot: &str) -> bool {
        Self::check_slot(slot).is_ok()
            && (self.gz_path(slot).exists() || self.plain_path(slot).exists())
    }

    /// Removes a slot. Returns whether anything was deleted.
    pub fn delete(&self, slot: &str) -> Result<bool> {
        Self::check_slot(slot)?;
        let mut removed = false;
        for path in [self.gz_path(slot), self.plain_path(slot)] {
            if path.exists() {
                std::fs::remove_file(&path)?;
                removed = true;
            }
        }
        Ok(removed)
    }

    /// Names of all slots present, sorted.
    pub fn list_slots(&self) -> Result<Vec<String>> {
        let mut slots = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let name = entry?.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with('.') {
                continue;
            }
            let slot = name
                .strip_suffix(GZ_SUFFIX)
                .or_else(|| name.strip_suffix(PLAIN_SUFFIX));
            if let Some(slot) = slot {
                slots.push(slot.to_string());
            }
        }
        slots.sort();
        slots.dedup();
        Ok(slots)
    }
}

fn write_gz(path: &Path, bytes: &[u8]) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| IoError::FileSystem(e).with_context(format!("creating {path:?}")))?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder
        .write_all(bytes)
        .map_err(|e| IoError::compression(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| IoError::compression(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use squidmind_data::NeurogenesisCounters;
    use uuid::Uuid;

    fn temp_manager() -> SaveManager {
        let dir = std::env::temp_dir().join(format!("squidmind-saves-{}", Uuid::new_v4()));
        SaveManager::new(dir).unwrap()
    }

    fn sample() -> SavedCreature {
        SavedCreature {
            version: SAVE_FORMAT_VERSION,
            id: Uuid::new_v4(),
            personality: "timid".into(),
            neurons: Vec::new(),
            weights: Vec::new(),
            ceilings: Default::default(),
            short_term: Vec::new(),
            long_term: Vec::new(),
            counters: NeurogenesisCounters {
                novelty: 1.5,
                stress: 0.2,
                reward: 0.0,
            },
            last_neuron_time: Some(42.0),
            saved_at: 100.0,
            config_fingerprint: "abc".into(),
        }
    }

    #[test]
    fn test_save_then_load() {
        let manager = temp_manager();
        let saved = sample();
        let path = manager.save(MANUAL_SLOT, &saved).unwrap();

        assert!(path.to_string_lossy().ends_with("manual.json.gz"));
        assert!(manager.exists(MANUAL_SLOT));
        assert_eq!(manager.load(MANUAL_SLOT).unwrap(), saved);
    }

    #[test]
    fn test_plain_json_fallback() {
        let manager = temp_manager();
        let saved = sample();
        let path = manager.export_plain("edited", &saved).unwrap();

        assert!(path.to_string_lossy().ends_with("edited.json"));
        assert_eq!(manager.load("edited").unwrap(), saved);
        assert_eq!(manager.list_slots().unwrap(), vec!["edited"]);
    }

    #[test]
    fn test_failed_save_leaves_no_temp_file() {
        let manager = temp_manager();
        // A directory in the way makes the final rename fail.
        let blocker = manager.dir().join(format!("{MANUAL_SLOT}{GZ_SUFFIX}"));
        std::fs::create_dir_all(blocker.join("occupied")).unwrap();

        assert!(manager.save(MANUAL_SLOT, &sample()).is_err());
        let leftovers: Vec<_> = std::fs::read_dir(manager.dir())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_missing_slot() {
        let manager = temp_manager();
        assert!(!manager.exists(AUTOSAVE_SLOT));
        assert!(matches!(
            manager.load(AUTOSAVE_SLOT),
            Err(IoError::NotFound(_))
        ));
    }

    #[test]
    fn test_rejects_path_like_slot() {
        let manager = temp_manager();
        assert!(matches!(
            manager.save("../escape", &sample()),
            Err(IoError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_newer_format() {
        let manager = temp_manager();
        let mut saved = sample();
        saved.version = SAVE_FORMAT_VERSION + 1;
        manager.save(MANUAL_SLOT, &saved).unwrap();
        assert!(matches!(
            manager.load(MANUAL_SLOT),
            Err(IoError::Validation(_))
        ));
    }

    #[test]
    fn test_list_and_delete() {
        let manager = temp_manager();
        manager.save(MANUAL_SLOT, &sample()).unwrap();
        manager.save(AUTOSAVE_SLOT, &sample()).unwrap();

        assert_eq!(manager.list_slots().unwrap(), vec!["autosave", "manual"]);
        assert!(manager.delete(MANUAL_SLOT).unwrap());
        assert!(!manager.delete(MANUAL_SLOT).unwrap());
        assert_eq!(manager.list_slots().unwrap(), vec!["autosave"]);
    }
}
