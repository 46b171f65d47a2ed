/// Descriptor panel — accordion of sensation descriptor groups
///
/// Two sections: Modality (checkbox-gated radio groups with intensity
/// sliders) and Quality (depth/extent radios plus rating sliders). Exactly
/// one section is expanded at a time. Selections are reported as actions and
/// recorded by the app into the trial store's transient response map.

use crate::trial::response::{
    round_slider, MODALITY_GROUPS, MOVEMENT_NO_POPUP, QUALITY_GROUPS, QUALITY_SLIDERS, SLIDER_MAX,
};

/// Which accordion section is expanded
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AccordionSection {
    Modality,
    Quality,
}

/// UI state of one modality group
#[derive(Debug, Clone, Default)]
pub struct GroupState {
    pub enabled: bool,
    pub selected: Option<usize>,
    pub slider: f64,
}

/// State for the descriptor panel
#[derive(Debug, Clone)]
pub struct DescriptorPanelState {
    pub active_section: AccordionSection,
    /// Parallel to `MODALITY_GROUPS`
    pub modality: Vec<GroupState>,
    /// Parallel to `QUALITY_GROUPS`
    pub quality_selected: Vec<Option<usize>>,
    /// Parallel to `QUALITY_SLIDERS`
    pub quality_sliders: Vec<f64>,
}

impl Default for DescriptorPanelState {
    fn default() -> Self {
        Self {
            active_section: AccordionSection::Modality,
            modality: vec![GroupState::default(); MODALITY_GROUPS.len()],
            quality_selected: vec![None; QUALITY_GROUPS.len()],
            quality_sliders: vec![0.0; QUALITY_SLIDERS.len()],
        }
    }
}

impl DescriptorPanelState {
    /// Reset for the next sensation/trial: modality section expanded, quality
    /// collapsed, every checkbox and radio deactivated, all sliders at 0.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Actions triggered by the descriptor panel
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptorAction {
    None,
    /// A radio was selected within a mutually-exclusive group
    RadioSelected {
        group: &'static str,
        text: &'static str,
        open_movement_popup: bool,
    },
    /// A group's gating checkbox was deactivated
    GroupDisabled { group: &'static str },
    /// A slider was released
    SliderCommitted { id: &'static str, value: f64 },
}

/// Render the descriptor accordion and return any triggered action.
pub fn show_descriptor_panel(
    ui: &mut egui::Ui,
    state: &mut DescriptorPanelState,
) -> DescriptorAction {
    let mut action = DescriptorAction::None;

    ui.vertical_centered(|ui| {
        ui.heading("🖊 Sensation Descriptors");
    });
    ui.separator();

    // ── Modality section ──
    let modality_open = state.active_section == AccordionSection::Modality;
    let modality_resp = egui::CollapsingHeader::new("Modality")
        .open(Some(modality_open))
        .show(ui, |ui| {
            for (idx, group) in MODALITY_GROUPS.iter().enumerate() {
                let gs = &mut state.modality[idx];

                let checkbox = ui.checkbox(&mut gs.enabled, group.label);
                if checkbox.changed() && !gs.enabled {
                    // Deactivation resets the group's radios and slider and
                    // blanks its recorded text
                    gs.selected = None;
                    gs.slider = 0.0;
                    action = DescriptorAction::GroupDisabled { group: group.key };
                }

                // Siblings are dimmed and non-interactive until the checkbox
                // re-enables the group
                ui.add_enabled_ui(gs.enabled, |ui| {
                    ui.indent(group.key, |ui| {
                        ui.horizontal_wrapped(|ui| {
                            for (opt_idx, &option) in group.options.iter().enumerate() {
                                if ui.radio(gs.selected == Some(opt_idx), option).clicked() {
                                    gs.selected = Some(opt_idx);
                                    action = DescriptorAction::RadioSelected {
                                        group: group.key,
                                        text: option,
                                        open_movement_popup: group.key == "movement"
                                            && option != MOVEMENT_NO_POPUP,
                                    };
                                }
                            }
                        });
                        let slider = ui.add(
                            egui::Slider::new(&mut gs.slider, 0.0..=SLIDER_MAX)
                                .text(group.slider.label)
                                .fixed_decimals(1),
                        );
                        if slider.drag_stopped() {
                            action = DescriptorAction::SliderCommitted {
                                id: group.slider.id,
                                value: round_slider(gs.slider),
                            };
                        }
                    });
                });
                ui.add_space(4.0);
            }
        });
    if modality_resp.header_response.clicked() {
        state.active_section = AccordionSection::Modality;
    }

    // ── Quality section ──
    let quality_open = state.active_section == AccordionSection::Quality;
    let quality_resp = egui::CollapsingHeader::new("Quality")
        .open(Some(quality_open))
        .show(ui, |ui| {
            for (idx, group) in QUALITY_GROUPS.iter().enumerate() {
                ui.label(
                    egui::RichText::new(group.label).size(12.5).strong(),
                );
                ui.horizontal_wrapped(|ui| {
                    for (opt_idx, &option) in group.options.iter().enumerate() {
                        if ui
                            .radio(state.quality_selected[idx] == Some(opt_idx), option)
                            .clicked()
                        {
                            state.quality_selected[idx] = Some(opt_idx);
                            action = DescriptorAction::RadioSelected {
                                group: group.key,
                                text: option,
                                open_movement_popup: false,
                            };
                        }
                    }
                });
                ui.add_space(4.0);
            }

            ui.separator();
            for (idx, spec) in QUALITY_SLIDERS.iter().enumerate() {
                let slider = ui.add(
                    egui::Slider::new(&mut state.quality_sliders[idx], 0.0..=SLIDER_MAX)
                        .text(spec.label)
                        .fixed_decimals(1),
                );
                if slider.drag_stopped() {
                    action = DescriptorAction::SliderCommitted {
                        id: spec.id,
                        value: round_slider(state.quality_sliders[idx]),
                    };
                }
            }
        });
    if quality_resp.header_response.clicked() {
        state.active_section = AccordionSection::Quality;
    }

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_matches_group_tables() {
        let state = DescriptorPanelState::default();
        assert_eq!(state.modality.len(), MODALITY_GROUPS.len());
        assert_eq!(state.quality_selected.len(), QUALITY_GROUPS.len());
        assert_eq!(state.quality_sliders.len(), QUALITY_SLIDERS.len());
        assert_eq!(state.active_section, AccordionSection::Modality);
    }

    #[test]
    fn test_reset_clears_everything_and_reopens_modality() {
        let mut state = DescriptorPanelState::default();
        state.active_section = AccordionSection::Quality;
        state.modality[0].enabled = true;
        state.modality[0].selected = Some(2);
        state.modality[0].slider = 7.5;
        state.quality_selected[0] = Some(1);
        state.quality_sliders[1] = 3.0;

        state.reset();

        assert_eq!(state.active_section, AccordionSection::Modality);
        assert!(state.modality.iter().all(|g| !g.enabled && g.selected.is_none() && g.slider == 0.0));
        assert!(state.quality_selected.iter().all(Option::is_none));
        assert!(state.quality_sliders.iter().all(|v| *v == 0.0));
    }
}
