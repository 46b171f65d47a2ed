/// Trial state and persistence
///
/// `TrialStore` owns everything a trial accumulates outside the widgets: the
/// drawn line coordinates per sensation and image, the movement-direction
/// lines, the per-sensation descriptor values, and the trial counters. The
/// GUI layer mutates it through the lifecycle methods below; `save` flushes
/// the accumulated maps to the per-trial YAML files.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::trial::response::ResponseValue;

/// Display geometry of the annotated image, written at the top of the pixel
/// coordinate files so analysis can map window pixels back onto the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageGeometry {
    pub size: [f32; 2],
    pub pos: [f32; 2],
}

impl Default for ImageGeometry {
    fn default() -> Self {
        Self { size: [0.0, 0.0], pos: [0.0, 0.0] }
    }
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// What a save actually wrote (drives the status line and session log).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveOutcome {
    pub wrote_lines: bool,
    pub wrote_moves: bool,
    pub wrote_responses: bool,
}

impl SaveOutcome {
    pub fn wrote_anything(&self) -> bool {
        self.wrote_lines || self.wrote_moves || self.wrote_responses
    }
}

/// Trial-scoped mutable state.
#[derive(Debug, Clone)]
pub struct TrialStore {
    /// Root directory for per-trial output folders
    pub save_path: PathBuf,
    /// Folder (participant/condition id) the current trial saves into
    pub save_folder: String,
    /// Trial repetition counter, resumed from the config file
    pub rep_number: u32,
    /// Index of the sensation currently being annotated
    pub sensation_number: u32,
    /// Committed stroke coordinates, flattened `[x, y, x, y, ...]`,
    /// keyed `sensation{N}_{imageName}`
    pub line_map: BTreeMap<String, Vec<f32>>,
    /// Movement-direction coordinates, same key scheme
    pub move_map: BTreeMap<String, Vec<f32>>,
    /// Descriptor/slider values per completed sensation, keyed `Sensation{N}`
    pub response_map: BTreeMap<String, BTreeMap<String, ResponseValue>>,
    /// Responses for the in-progress sensation, flushed on add/save
    pub pending: BTreeMap<String, ResponseValue>,
    /// Folders that received annotations this session
    pub annotated_folders: BTreeSet<String>,
}

impl TrialStore {
    pub fn new(save_path: PathBuf, save_folder: String, last_rep: u32) -> Self {
        Self {
            save_path,
            save_folder,
            rep_number: last_rep,
            sensation_number: 0,
            line_map: BTreeMap::new(),
            move_map: BTreeMap::new(),
            response_map: BTreeMap::new(),
            pending: BTreeMap::new(),
            annotated_folders: BTreeSet::new(),
        }
    }

    /// Map key for the in-progress sensation on `image`.
    pub fn sensation_key(&self, image: &str) -> String {
        format!("sensation{}_{}", self.sensation_number, image)
    }

    fn response_key(&self) -> String {
        format!("Sensation{}", self.sensation_number)
    }

    /// Append a committed stroke for the in-progress sensation. Points are
    /// flattened onto any coordinates already recorded under the same key.
    pub fn commit_stroke(&mut self, image: &str, points: &[(f32, f32)]) {
        let entry = self.line_map.entry(self.sensation_key(image)).or_default();
        for &(x, y) in points {
            entry.push(x);
            entry.push(y);
        }
    }

    /// Record a movement-direction line. A redrawn direction replaces the
    /// previous one rather than extending it.
    pub fn commit_movement(&mut self, image: &str, points: &[(f32, f32)]) {
        let mut flat = Vec::with_capacity(points.len() * 2);
        for &(x, y) in points {
            flat.push(x);
            flat.push(y);
        }
        self.move_map.insert(self.sensation_key(image), flat);
    }

    /// Record one descriptor/slider value for the in-progress sensation.
    pub fn set_response(&mut self, key: &str, value: ResponseValue) {
        self.pending.insert(key.to_string(), value);
    }

    /// Blank a group's recorded text when its checkbox is deactivated. The
    /// key stays in the map (as an empty string) so the file shows the group
    /// was touched and then cleared.
    pub fn blank_response(&mut self, key: &str) {
        if self.pending.contains_key(key) {
            self.pending.insert(key.to_string(), ResponseValue::text(""));
        }
    }

    /// Drop the in-progress sensation's drawing on `image`: the line entry is
    /// removed outright, the movement entry (if any) is emptied.
    pub fn clear_current(&mut self, image: &str) {
        let key = self.sensation_key(image);
        self.line_map.remove(&key);
        if let Some(points) = self.move_map.get_mut(&key) {
            points.clear();
        }
    }

    /// Drop every drawn line and movement direction for all sensations.
    pub fn clear_all_drawings(&mut self) {
        self.line_map.clear();
        self.move_map.clear();
    }

    /// Copy the pending responses under the current `Sensation{N}` key and
    /// clear them. Called both when a sensation is added and right before a
    /// trial save, so the last (possibly still in-progress) sensation is
    /// captured too.
    pub fn commit_pending(&mut self) {
        let key = self.response_key();
        let taken = std::mem::take(&mut self.pending);
        self.response_map.insert(key, taken);
    }

    /// Finish the in-progress sensation and start the next one.
    /// Returns the new sensation index.
    pub fn add_sensation(&mut self) -> u32 {
        self.commit_pending();
        self.sensation_number += 1;
        self.sensation_number
    }

    /// Whether a save would write anything: any drawn line, or any recorded
    /// response for sensation 0.
    pub fn has_annotations(&self) -> bool {
        !self.line_map.is_empty()
            || self
                .response_map
                .get("Sensation0")
                .map(|m| !m.is_empty())
                .unwrap_or(false)
    }

    /// Directory the current trial's files land in.
    pub fn trial_dir(&self) -> PathBuf {
        self.save_path.join(&self.save_folder)
    }

    /// File-name stem for the current repetition,
    /// `<saveFolder>_R<rep:03>`.
    pub fn file_stem(&self) -> String {
        format!("{}_R{:03}", self.save_folder, self.rep_number)
    }

    /// Write the accumulated annotation maps to the per-trial YAML files and
    /// clear each map that was written. No-ops entirely (no directory, no
    /// files, nothing cleared) when the trial holds no annotations.
    pub fn save(&mut self, geometry: &ImageGeometry) -> Result<SaveOutcome, SaveError> {
        let mut outcome = SaveOutcome::default();
        if !self.has_annotations() {
            return Ok(outcome);
        }

        self.annotated_folders.insert(self.save_folder.clone());

        let dir = self.trial_dir();
        if !dir.exists() {
            std::fs::create_dir_all(&dir)?;
        }
        let base = dir.join(self.file_stem());

        if !self.line_map.is_empty() {
            write_geometry_and_map(&with_suffix(&base, "_imPixel.yml"), geometry, &self.line_map)?;
            self.line_map.clear();
            outcome.wrote_lines = true;
        }

        if !self.move_map.is_empty() {
            write_geometry_and_map(&with_suffix(&base, "_dirPixel.yml"), geometry, &self.move_map)?;
            self.move_map.clear();
            outcome.wrote_moves = true;
        }

        let has_responses = self
            .response_map
            .get("Sensation0")
            .map(|m| !m.is_empty())
            .unwrap_or(false);
        if has_responses {
            let yaml = serde_yaml::to_string(&self.response_map)?;
            std::fs::write(with_suffix(&base, "_RadioCheckSlider.yml"), yaml)?;
            self.response_map.clear();
            outcome.wrote_responses = true;
        }

        Ok(outcome)
    }

    /// Advance to the next trial: bump the repetition counter, restart the
    /// sensation counter. The annotation maps are expected to have been
    /// flushed by `save` (or discarded deliberately).
    pub fn reset_for_next_trial(&mut self) {
        self.rep_number += 1;
        self.sensation_number = 0;
        self.pending.clear();
        self.response_map.clear();
    }
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// The pixel files carry the image geometry mapping followed by the
/// coordinate map, as two concatenated YAML mappings (one document).
fn write_geometry_and_map(
    path: &Path,
    geometry: &ImageGeometry,
    map: &BTreeMap<String, Vec<f32>>,
) -> Result<(), SaveError> {
    let mut out = serde_yaml::to_string(geometry)?;
    out.push_str(&serde_yaml::to_string(map)?);
    std::fs::write(path, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> TrialStore {
        let dir = std::env::temp_dir().join(format!("perceptmap_test_{}", uuid::Uuid::new_v4()));
        TrialStore::new(dir, "subjA".to_string(), 0)
    }

    fn geometry() -> ImageGeometry {
        ImageGeometry { size: [400.0, 600.0], pos: [20.0, 30.0] }
    }

    #[test]
    fn test_new_sensation_keeps_earlier_lines() {
        let mut store = test_store();
        store.commit_stroke("Rpalmar", &[(1.0, 2.0), (3.0, 4.0)]);
        store.add_sensation();
        store.commit_stroke("Rpalmar", &[(5.0, 6.0)]);

        assert_eq!(
            store.line_map.get("sensation0_Rpalmar").unwrap(),
            &vec![1.0, 2.0, 3.0, 4.0]
        );
        assert_eq!(store.line_map.get("sensation1_Rpalmar").unwrap(), &vec![5.0, 6.0]);
    }

    #[test]
    fn test_commit_stroke_appends_to_existing_key() {
        let mut store = test_store();
        store.commit_stroke("Rdorsum", &[(1.0, 1.0)]);
        store.commit_stroke("Rdorsum", &[(2.0, 2.0)]);
        assert_eq!(
            store.line_map.get("sensation0_Rdorsum").unwrap(),
            &vec![1.0, 1.0, 2.0, 2.0]
        );
    }

    #[test]
    fn test_movement_replaces_instead_of_appending() {
        let mut store = test_store();
        store.commit_movement("Rpalmar", &[(1.0, 1.0), (2.0, 2.0)]);
        store.commit_movement("Rpalmar", &[(9.0, 9.0)]);
        assert_eq!(store.move_map.get("sensation0_Rpalmar").unwrap(), &vec![9.0, 9.0]);
    }

    #[test]
    fn test_pending_cleared_after_add() {
        let mut store = test_store();
        store.set_response("mechanical", ResponseValue::text("Touch"));
        store.set_response("mechIntensity", ResponseValue::Number(6.5));
        store.add_sensation();

        assert!(store.pending.is_empty(), "no stale carry-over into the next sensation");
        let s0 = store.response_map.get("Sensation0").unwrap();
        assert_eq!(s0.get("mechanical"), Some(&ResponseValue::text("Touch")));
        assert_eq!(s0.get("mechIntensity"), Some(&ResponseValue::Number(6.5)));
        assert_eq!(store.sensation_number, 1);
    }

    #[test]
    fn test_blank_response_only_touches_existing_keys() {
        let mut store = test_store();
        store.blank_response("tingle");
        assert!(store.pending.is_empty());

        store.set_response("tingle", ResponseValue::text("Itch"));
        store.blank_response("tingle");
        assert!(store.pending.get("tingle").unwrap().is_blank());
    }

    #[test]
    fn test_clear_current_removes_exactly_one_entry() {
        let mut store = test_store();
        store.commit_stroke("Rpalmar", &[(1.0, 1.0)]);
        store.commit_stroke("Rdorsum", &[(2.0, 2.0)]);
        store.add_sensation();
        store.commit_stroke("Rpalmar", &[(3.0, 3.0)]);
        store.commit_movement("Rpalmar", &[(4.0, 4.0)]);

        store.clear_current("Rpalmar");

        assert!(store.line_map.get("sensation1_Rpalmar").is_none());
        // Frozen sensation 0 untouched on both images
        assert!(store.line_map.contains_key("sensation0_Rpalmar"));
        assert!(store.line_map.contains_key("sensation0_Rdorsum"));
        // Movement entry emptied but kept
        assert_eq!(store.move_map.get("sensation1_Rpalmar").unwrap(), &Vec::<f32>::new());
    }

    #[test]
    fn test_save_is_noop_when_empty() {
        let mut store = test_store();
        store.commit_pending(); // leaves an empty Sensation0 entry, like a bare save
        let outcome = store.save(&geometry()).unwrap();
        assert!(!outcome.wrote_anything());
        assert!(!store.trial_dir().exists(), "no directory created for an empty trial");
        // The empty response entry survives (nothing was flushed)
        assert!(store.response_map.contains_key("Sensation0"));
    }

    #[test]
    fn test_save_writes_and_clears() {
        let mut store = test_store();
        store.commit_stroke("Rpalmar", &[(10.0, 20.0), (30.0, 40.0)]);
        store.commit_movement("Rpalmar", &[(1.0, 2.0)]);
        store.set_response("temperature", ResponseValue::text("Warm"));
        store.set_response("tempSlider", ResponseValue::Number(4.0));
        store.commit_pending();

        let outcome = store.save(&geometry()).unwrap();
        assert!(outcome.wrote_lines && outcome.wrote_moves && outcome.wrote_responses);
        assert!(store.line_map.is_empty());
        assert!(store.move_map.is_empty());
        assert!(store.response_map.is_empty());
        assert!(store.annotated_folders.contains("subjA"));

        let dir = store.trial_dir();
        let pixel = std::fs::read_to_string(dir.join("subjA_R000_imPixel.yml")).unwrap();
        assert!(pixel.contains("size:"));
        assert!(pixel.contains("pos:"));
        assert!(pixel.contains("sensation0_Rpalmar:"));

        let dir_pixel = std::fs::read_to_string(dir.join("subjA_R000_dirPixel.yml")).unwrap();
        assert!(dir_pixel.contains("sensation0_Rpalmar:"));

        let responses = std::fs::read_to_string(dir.join("subjA_R000_RadioCheckSlider.yml")).unwrap();
        assert!(responses.contains("Sensation0:"));
        assert!(responses.contains("temperature: Warm"));
        assert!(responses.contains("tempSlider: 4.0"));

        std::fs::remove_dir_all(store.save_path).unwrap();
    }

    #[test]
    fn test_save_with_lines_only_skips_other_files() {
        let mut store = test_store();
        store.commit_stroke("Farms", &[(0.0, 0.0)]);
        store.commit_pending();
        let outcome = store.save(&geometry()).unwrap();
        assert!(outcome.wrote_lines);
        assert!(!outcome.wrote_moves);
        assert!(!outcome.wrote_responses);
        let dir = store.trial_dir();
        assert!(dir.join("subjA_R000_imPixel.yml").exists());
        assert!(!dir.join("subjA_R000_dirPixel.yml").exists());
        assert!(!dir.join("subjA_R000_RadioCheckSlider.yml").exists());
        std::fs::remove_dir_all(store.save_path).unwrap();
    }

    #[test]
    fn test_reset_advances_rep_and_restarts_sensations() {
        let mut store = test_store();
        store.add_sensation();
        store.add_sensation();
        assert_eq!(store.sensation_number, 2);

        store.reset_for_next_trial();
        assert_eq!(store.rep_number, 1);
        assert_eq!(store.sensation_number, 0);
        assert!(store.pending.is_empty());
        assert!(store.response_map.is_empty());

        store.reset_for_next_trial();
        assert_eq!(store.rep_number, 2, "each reset advances by exactly one");
    }

    #[test]
    fn test_file_stem_formats_rep_number() {
        let mut store = test_store();
        store.rep_number = 7;
        assert_eq!(store.file_stem(), "subjA_R007");
        store.rep_number = 123;
        assert_eq!(store.file_stem(), "subjA_R123");
    }
}
