/// Application configuration
///
/// Read once at startup from `perceptmap.yml` in the working directory and
/// rewritten at shutdown with the updated trial repetition number. Keys absent
/// from the file fall back to the built-in defaults, so a hand-edited partial
/// config keeps working.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "perceptmap.yml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root directory for per-trial output folders
    pub save_path: PathBuf,
    /// Directory holding the body-diagram PNGs
    pub image_bank: PathBuf,
    /// Address of an external trigger host. Unused in manual mode; kept so
    /// configs written for auto-mode setups still parse.
    pub remote_host: String,
    pub window_size: [f32; 2],
    /// Window clear color, RGBA in 0.0–1.0
    pub window_color: [f32; 4],
    pub window_borderless: bool,
    /// Ordered base names of the body-diagram images (without extension)
    pub image_files: Vec<String>,
    /// Ordered tab display labels, parallel to `image_files`
    pub tab_labels: Vec<String>,
    /// Last-used trial repetition number; new sessions resume after it
    pub trial_number: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from("data"),
            image_bank: PathBuf::from("ImageBank"),
            remote_host: "localhost".to_string(),
            window_size: [1368.0, 912.0],
            window_color: [1.0, 1.0, 1.0, 1.0],
            window_borderless: false,
            image_files: vec![
                "Rpalmar".to_string(),
                "Rdorsum".to_string(),
                "Farms".to_string(),
                "Barms".to_string(),
                "Lpalmar".to_string(),
                "Ldorsum".to_string(),
            ],
            tab_labels: vec![
                "Right Palm".to_string(),
                "Right Dorsum".to_string(),
                "Arms Front".to_string(),
                "Arms Back".to_string(),
                "Left Palm".to_string(),
                "Left Dorsum".to_string(),
            ],
            trial_number: 0,
        }
    }
}

impl AppConfig {
    /// Load the config from `path`, falling back to defaults when the file is
    /// missing or unreadable. A missing file is the normal first-run case and
    /// is written back with defaults so the researcher has something to edit.
    pub fn load_or_create(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_yaml::from_str(&text) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Config parse error in {}: {} — using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                let config = Self::default();
                if let Err(e) = config.save(path) {
                    log::warn!("Could not write default config {}: {}", path.display(), e);
                } else {
                    log::info!("Wrote default config to {}", path.display());
                }
                config
            }
        }
    }

    /// Write the config back out (called at shutdown with the updated
    /// repetition number).
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, yaml)
    }

    /// Full path of one body-diagram image
    pub fn image_path(&self, base_name: &str) -> PathBuf {
        self.image_bank.join(format!("{}.png", base_name))
    }

    /// Tab label for image index `idx`, falling back to the base name when
    /// the label list is shorter than the image list.
    pub fn tab_label(&self, idx: usize) -> &str {
        self.tab_labels
            .get(idx)
            .map(String::as_str)
            .or_else(|| self.image_files.get(idx).map(String::as_str))
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.image_files.len(), config.tab_labels.len());
        assert_eq!(config.trial_number, 0);
        assert_eq!(config.save_path, PathBuf::from("data"));
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        // A partial config (only two keys) must still parse, with every other
        // field at its built-in default.
        let partial = "save_path: /tmp/percept\ntrial_number: 7\n";
        let config: AppConfig = serde_yaml::from_str(partial).unwrap();
        assert_eq!(config.save_path, PathBuf::from("/tmp/percept"));
        assert_eq!(config.trial_number, 7);
        assert_eq!(config.image_files, AppConfig::default().image_files);
        assert_eq!(config.window_size, [1368.0, 912.0]);
        assert!(!config.window_borderless);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = AppConfig::default();
        config.trial_number = 12;
        config.window_borderless = true;
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.trial_number, 12);
        assert!(parsed.window_borderless);
        assert_eq!(parsed.tab_labels, config.tab_labels);
    }

    #[test]
    fn test_image_path() {
        let config = AppConfig::default();
        assert_eq!(
            config.image_path("Rpalmar"),
            PathBuf::from("ImageBank").join("Rpalmar.png")
        );
    }

    #[test]
    fn test_tab_label_fallback() {
        let mut config = AppConfig::default();
        config.tab_labels.truncate(1);
        assert_eq!(config.tab_label(0), "Right Palm");
        assert_eq!(config.tab_label(1), "Rdorsum");
        assert_eq!(config.tab_label(99), "");
    }
}
