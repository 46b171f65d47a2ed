/// Descriptor vocabulary and response values
///
/// A sensation's descriptors are collected as a flat map from group/slider
/// key to value: radio selections store the selected text, sliders store the
/// released value. Both serialize to plain YAML scalars.

use serde::{Deserialize, Serialize};

/// One recorded response: radio text or slider number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    Number(f64),
    Text(String),
}

impl ResponseValue {
    pub fn text(s: impl Into<String>) -> Self {
        ResponseValue::Text(s.into())
    }

    /// True for the blanked-out marker left behind when a descriptor group is
    /// deactivated after a selection was made.
    pub fn is_blank(&self) -> bool {
        matches!(self, ResponseValue::Text(s) if s.is_empty())
    }
}

/// Intensity/rating slider attached to a descriptor group or the quality
/// section. Values run 0–10 and commit on release, rounded to 3 decimals.
#[derive(Debug, Clone, Copy)]
pub struct SliderSpec {
    /// Key the released value is recorded under
    pub id: &'static str,
    pub label: &'static str,
}

/// A modality descriptor group: a checkbox gating a mutually-exclusive radio
/// set plus an intensity slider.
#[derive(Debug, Clone, Copy)]
pub struct ModalityGroup {
    /// Key the selected radio text is recorded under
    pub key: &'static str,
    pub label: &'static str,
    pub options: &'static [&'static str],
    pub slider: SliderSpec,
}

pub const MODALITY_GROUPS: &[ModalityGroup] = &[
    ModalityGroup {
        key: "mechanical",
        label: "Mechanical",
        options: &["Touch", "Pressure", "Sharp", "Tap"],
        slider: SliderSpec { id: "mechIntensity", label: "Intensity" },
    },
    ModalityGroup {
        key: "tingle",
        label: "Tingle",
        options: &["Electrical", "Tickle", "Itch", "Pins and needles"],
        slider: SliderSpec { id: "tingleIntensity", label: "Intensity" },
    },
    ModalityGroup {
        key: "temperature",
        label: "Temperature",
        options: &["Warm", "Hot", "Cool", "Cold"],
        slider: SliderSpec { id: "tempSlider", label: "Intensity" },
    },
    ModalityGroup {
        key: "movement",
        label: "Movement",
        options: &["Radiating", "Sweeping", "Pulsing", "Vibration"],
        slider: SliderSpec { id: "moveIntensity", label: "Intensity" },
    },
];

/// Movement radio that does not open the direction-drawing popup.
pub const MOVEMENT_NO_POPUP: &str = "Vibration";

/// Quality-section radio groups (no gating checkbox, no slider).
#[derive(Debug, Clone, Copy)]
pub struct QualityGroup {
    pub key: &'static str,
    pub label: &'static str,
    pub options: &'static [&'static str],
}

pub const QUALITY_GROUPS: &[QualityGroup] = &[
    QualityGroup {
        key: "depth",
        label: "Depth",
        options: &["On the skin", "Beneath the skin"],
    },
    QualityGroup {
        key: "extent",
        label: "Extent",
        options: &["Localized", "Diffuse"],
    },
];

/// Quality-section rating sliders.
pub const QUALITY_SLIDERS: &[SliderSpec] = &[
    SliderSpec { id: "naturalSlider", label: "Naturalness" },
    SliderSpec { id: "painSlider", label: "Pain" },
    SliderSpec { id: "phantomSlider", label: "Phantom" },
];

pub const SLIDER_MAX: f64 = 10.0;

/// Round a slider value the way it is recorded (3 decimals).
pub fn round_slider(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_value_yaml_scalars() {
        let text = serde_yaml::to_string(&ResponseValue::text("Warm")).unwrap();
        assert_eq!(text.trim(), "Warm");
        let num = serde_yaml::to_string(&ResponseValue::Number(7.25)).unwrap();
        assert_eq!(num.trim(), "7.25");
    }

    #[test]
    fn test_response_value_untagged_parse() {
        let v: ResponseValue = serde_yaml::from_str("3.5").unwrap();
        assert_eq!(v, ResponseValue::Number(3.5));
        let v: ResponseValue = serde_yaml::from_str("Pins and needles").unwrap();
        assert_eq!(v, ResponseValue::text("Pins and needles"));
    }

    #[test]
    fn test_blank_marker() {
        assert!(ResponseValue::text("").is_blank());
        assert!(!ResponseValue::text("Touch").is_blank());
        assert!(!ResponseValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_group_keys_unique() {
        let mut keys: Vec<&str> = MODALITY_GROUPS.iter().map(|g| g.key).collect();
        keys.extend(QUALITY_GROUPS.iter().map(|g| g.key));
        keys.extend(MODALITY_GROUPS.iter().map(|g| g.slider.id));
        keys.extend(QUALITY_SLIDERS.iter().map(|s| s.id));
        let n = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), n, "descriptor keys must not collide");
    }

    #[test]
    fn test_round_slider() {
        assert_eq!(round_slider(3.14159), 3.142);
        assert_eq!(round_slider(0.0), 0.0);
        assert_eq!(round_slider(7.77777), 7.778);
    }
}
