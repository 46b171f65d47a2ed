/// Main application state and eframe::App implementation
///
/// Ties together all subsystems: configuration, trial store, image canvases,
/// descriptor panel, movement popup, and session logging.

use std::path::PathBuf;

use eframe::egui;

use crate::config::{AppConfig, CONFIG_FILE};
use crate::gui::canvas_view::{self, CanvasAction, CanvasViewState};
use crate::gui::descriptor_panel::{self, DescriptorAction, DescriptorPanelState};
use crate::gui::movement_dialog::{self, MovementAction, MovementDialogState};
use crate::gui::snapshot;
use crate::gui::theme::{self, sensation_color, AppTheme, ThemeColors};
use crate::gui::toolbar::{self, ToolbarAction};
use crate::log::session::SessionLog;
use crate::trial::response::ResponseValue;
use crate::trial::store::{ImageGeometry, TrialStore};

/// One configured body-diagram image
struct ImageSlot {
    /// Base name, used in map keys and output file names
    name: String,
    /// Tab display label
    label: String,
    /// Source PNG path
    path: PathBuf,
    /// file:// URI for the egui image loader
    uri: String,
    /// Native pixel dimensions, None when the file could not be read
    native_size: Option<[u32; 2]>,
}

/// The main application
pub struct PerceptApp {
    config: AppConfig,
    config_path: PathBuf,

    /// Trial-scoped annotation state
    store: TrialStore,
    /// Session event log
    session_log: SessionLog,

    /// Configured body-diagram images with their canvases
    images: Vec<ImageSlot>,
    canvas_states: Vec<CanvasViewState>,
    /// Selected image tab
    active_tab: usize,

    /// GUI sub-states
    descriptor_state: DescriptorPanelState,
    movement_dialog_state: MovementDialogState,

    /// Status messages
    status_message: String,
    show_log_window: bool,
    show_about: bool,

    /// Current theme
    current_theme: AppTheme,
    theme_colors: ThemeColors,
}

impl PerceptApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, config_path: PathBuf) -> Self {
        // ── Apply default theme ──
        let default_theme = AppTheme::Light;
        theme::apply_theme(&cc.egui_ctx, default_theme);
        let theme_colors = ThemeColors::from_theme(default_theme);

        // ── Typography: scale for monitor DPI ──
        let ppi = cc.egui_ctx.pixels_per_point();
        let base_size = if ppi > 1.5 { 14.0 } else { 13.0 };
        let mut style = (*cc.egui_ctx.style()).clone();
        style.text_styles.insert(
            egui::TextStyle::Body,
            egui::FontId::new(base_size, egui::FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            egui::FontId::new(base_size, egui::FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Heading,
            egui::FontId::new(base_size * 1.25, egui::FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Small,
            egui::FontId::new(base_size * 0.85, egui::FontFamily::Proportional),
        );
        style.spacing.item_spacing = egui::vec2(8.0, 5.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
        style.spacing.indent = 18.0;
        cc.egui_ctx.set_style(style);

        // Body-diagram PNGs load through the egui image loaders
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let mut images = Vec::with_capacity(config.image_files.len());
        for (idx, name) in config.image_files.iter().enumerate() {
            let path = config.image_path(name);
            let native_size = match image::image_dimensions(&path) {
                Ok((w, h)) => Some([w, h]),
                Err(e) => {
                    log::warn!("Body diagram {} not readable: {}", path.display(), e);
                    None
                }
            };
            images.push(ImageSlot {
                name: name.clone(),
                label: config.tab_label(idx).to_string(),
                uri: format!("file://{}", path.display()),
                path,
                native_size,
            });
        }
        let canvas_states = vec![CanvasViewState::default(); images.len()];

        let store = TrialStore::new(
            config.save_path.clone(),
            "default".to_string(),
            config.trial_number,
        );
        let mut session_log = SessionLog::new();
        session_log.set_save_folder(&store.save_folder);
        log::info!(
            "Session started at rep {} with {} images",
            store.rep_number,
            images.len()
        );

        Self {
            config,
            config_path,
            store,
            session_log,
            images,
            canvas_states,
            active_tab: 0,
            descriptor_state: DescriptorPanelState::default(),
            movement_dialog_state: MovementDialogState::default(),
            status_message:
                "Ready — draw on the diagram and describe the sensation, then Add Sensation"
                    .to_string(),
            show_log_window: false,
            show_about: false,
            current_theme: default_theme,
            theme_colors,
        }
    }

    fn active_image_name(&self) -> String {
        self.images
            .get(self.active_tab)
            .map(|s| s.name.clone())
            .unwrap_or_default()
    }

    /// Display geometry of the first image, written at the top of the pixel
    /// coordinate files.
    fn image_geometry(&self) -> ImageGeometry {
        match self.canvas_states.first().and_then(|s| s.display_rect) {
            Some(rect) => ImageGeometry {
                size: [rect.width(), rect.height()],
                pos: [rect.min.x, rect.min.y],
            },
            None => ImageGeometry::default(),
        }
    }

    /// Re-export the active image's annotated snapshot into the trial folder.
    fn export_active_snapshot(&mut self) {
        let slot = &self.images[self.active_tab];
        let state = &self.canvas_states[self.active_tab];
        let Some(rect) = state.display_rect else {
            return;
        };
        let out = self
            .store
            .trial_dir()
            .join(format!("{}_{}.png", self.store.file_stem(), slot.name));
        match snapshot::export_snapshot(
            &slot.path,
            &out,
            rect,
            &state.strokes,
            &state.movement_strokes,
            self.store.sensation_number,
        ) {
            Ok(()) => log::debug!("Snapshot exported: {}", out.display()),
            Err(e) => {
                log::error!("Snapshot export failed for {}: {}", slot.name, e);
                self.status_message = format!("Snapshot export failed: {}", e);
            }
        }
    }

    /// A finished stroke on the active canvas: record the coordinates and
    /// refresh the snapshot.
    fn handle_stroke_committed(&mut self, points: Vec<egui::Pos2>) {
        let name = self.active_image_name();
        let pairs: Vec<(f32, f32)> = points.iter().map(|p| (p.x, p.y)).collect();
        self.store.commit_stroke(&name, &pairs);
        self.session_log.add_entry(
            "Stroke",
            &format!(
                "Sensation {}: {} points on {}",
                self.store.sensation_number,
                points.len(),
                name
            ),
        );
        self.export_active_snapshot();
    }

    /// Finish the in-progress sensation and start the next one.
    fn add_sensation(&mut self) {
        let finished = self.store.sensation_number;
        let next = self.store.add_sensation();
        self.descriptor_state.reset();
        self.session_log.add_entry(
            "Add Sensation",
            &format!("Sensation {} recorded, sensation {} started", finished, next),
        );
        self.status_message = format!(
            "Sensation {} added — new drawings use the next color",
            finished
        );
    }

    /// Drop the in-progress sensation's drawing on the active image.
    fn clear_current_drawing(&mut self) {
        let name = self.active_image_name();
        self.store.clear_current(&name);
        let current = self.store.sensation_number;
        self.canvas_states[self.active_tab].clear_sensation(current);
        self.session_log.add_entry(
            "Clear Drawing",
            &format!("Sensation {} cleared on {}", current, name),
        );
        self.status_message = format!("Cleared sensation {} on {}", current, name);
    }

    /// Save the trial files, then reset everything for the next repetition.
    /// A failed save keeps the trial state so nothing is lost.
    fn save_and_reset(&mut self) {
        if self.store.save_folder.trim().is_empty() {
            self.status_message = "Enter a participant folder name first".to_string();
            return;
        }

        self.session_log.set_save_folder(&self.store.save_folder);
        self.store.commit_pending();
        let geometry = self.image_geometry();
        match self.store.save(&geometry) {
            Ok(outcome) => {
                if outcome.wrote_anything() {
                    let mut parts = Vec::new();
                    if outcome.wrote_lines {
                        parts.push("imPixel");
                    }
                    if outcome.wrote_moves {
                        parts.push("dirPixel");
                    }
                    if outcome.wrote_responses {
                        parts.push("RadioCheckSlider");
                    }
                    self.session_log.add_entry(
                        "Save Trial",
                        &format!("{}: wrote {}", self.store.file_stem(), parts.join(" + ")),
                    );
                    self.status_message =
                        format!("Saved {} ({})", self.store.file_stem(), parts.join(" + "));
                } else {
                    self.status_message = "Nothing to save — trial reset".to_string();
                }
            }
            Err(e) => {
                log::error!("Trial save failed: {}", e);
                self.status_message = format!("Save failed: {} — trial kept", e);
                return;
            }
        }

        for state in &mut self.canvas_states {
            state.clear_all();
        }
        self.descriptor_state.reset();
        self.movement_dialog_state = MovementDialogState::default();
        self.store.reset_for_next_trial();
        self.active_tab = 0;
        self.session_log.add_entry(
            "Reset",
            &format!("Trial advanced to rep {}", self.store.rep_number),
        );
    }

    /// The movement popup was finished: record the direction line, transfer
    /// it onto the active canvas, refresh the snapshot.
    fn handle_movement_finished(&mut self) {
        self.movement_dialog_state.open = false;
        let points = std::mem::take(&mut self.movement_dialog_state.line);
        if !points.is_empty() {
            let name = self.active_image_name();
            let pairs: Vec<(f32, f32)> = points.iter().map(|p| (p.x, p.y)).collect();
            self.store.commit_movement(&name, &pairs);
            self.canvas_states[self.active_tab]
                .movement_strokes
                .push((self.store.sensation_number, points));
            self.session_log.add_entry(
                "Movement",
                &format!(
                    "Sensation {}: direction recorded on {}",
                    self.store.sensation_number, name
                ),
            );
            self.status_message = "Movement direction recorded".to_string();
        }
        self.export_active_snapshot();
    }

    /// Handle descriptor panel actions
    fn handle_descriptor_action(&mut self, action: DescriptorAction) {
        match action {
            DescriptorAction::RadioSelected {
                group,
                text,
                open_movement_popup,
            } => {
                self.store.set_response(group, ResponseValue::text(text));
                self.status_message = format!("{} — {}", group, text);
                if open_movement_popup {
                    self.movement_dialog_state.begin();
                }
            }
            DescriptorAction::GroupDisabled { group } => {
                self.store.blank_response(group);
                self.status_message = format!("{} deselected", group);
            }
            DescriptorAction::SliderCommitted { id, value } => {
                self.store.set_response(id, ResponseValue::Number(value));
                self.status_message = format!("{} = {:.1}", id, value);
            }
            DescriptorAction::None => {}
        }
    }

    /// Handle toolbar actions
    fn handle_toolbar_action(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::ChooseOutputDir => {
                if let Some(dir) = toolbar::choose_output_dialog() {
                    self.store.save_path = dir.clone();
                    self.config.save_path = dir;
                    self.session_log.add_entry(
                        "Output Folder",
                        &format!("Now saving under {}", self.store.save_path.display()),
                    );
                    self.status_message =
                        format!("Output folder: {}", self.store.save_path.display());
                }
            }
            ToolbarAction::SaveAndReset => self.save_and_reset(),
            ToolbarAction::ClearAllDrawings => {
                self.store.clear_all_drawings();
                for state in &mut self.canvas_states {
                    state.clear_all();
                }
                self.session_log.add_entry("Clear All", "All drawings erased");
                self.status_message = "All drawings cleared".to_string();
            }
            ToolbarAction::ResetDescriptors => {
                self.descriptor_state.reset();
                self.store.pending.clear();
                self.status_message = "Descriptors reset".to_string();
            }
            ToolbarAction::ExportSessionLog => {
                if let Some(path) = toolbar::save_log_dialog() {
                    let ext = path
                        .extension()
                        .map(|e| e.to_string_lossy().to_lowercase())
                        .unwrap_or_default();
                    let result = match ext.as_str() {
                        "json" => self.session_log.save_json(&path),
                        _ => self.session_log.save_text(&path),
                    };
                    match result {
                        Ok(_) => {
                            self.status_message = format!("Log saved: {}", path.display());
                        }
                        Err(e) => {
                            self.status_message = format!("Error saving log: {}", e);
                        }
                    }
                }
            }
            ToolbarAction::ThemeToggle => {
                self.current_theme = self.current_theme.next();
                self.theme_colors = ThemeColors::from_theme(self.current_theme);
            }
            ToolbarAction::ShowAbout => {
                self.show_about = true;
            }
            ToolbarAction::None => {}
        }
    }
}

impl eframe::App for PerceptApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Re-apply theme each frame (ensures toggle takes effect) ──
        theme::apply_theme(ctx, self.current_theme);

        // ── Movement Popup ──
        let movement_action = movement_dialog::show_movement_dialog(
            ctx,
            &mut self.movement_dialog_state,
            self.theme_colors.movement_pen,
        );
        if movement_action == MovementAction::Finished {
            self.handle_movement_finished();
        }

        // ── Toolbar ──
        let theme_label = self.current_theme.label();
        let toolbar_action = toolbar::show_toolbar(ctx, theme_label, &mut self.store.save_folder);
        if toolbar_action != ToolbarAction::None {
            self.handle_toolbar_action(toolbar_action);
        }

        // ── Status Bar ──
        let tc = &self.theme_colors;
        let sb_bg = tc.status_bar_bg;
        let sb_text = tc.status_text;
        let sb_muted = tc.text_muted;
        let sb_accent = tc.accent;
        let rep = self.store.rep_number;
        let sensation = self.store.sensation_number;
        let annotated = self.store.annotated_folders.len();
        let log_len = self.session_log.len();

        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                egui::Frame::new()
                    .fill(sb_bg)
                    .inner_margin(egui::Margin::symmetric(12, 4)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.5)
                            .color(sb_text),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("📋 Log").clicked() {
                            self.show_log_window = !self.show_log_window;
                        }
                        ui.label(
                            egui::RichText::new(format!("{} events", log_len))
                                .size(11.0)
                                .color(sb_muted),
                        );
                        ui.separator();
                        if annotated > 0 {
                            ui.label(
                                egui::RichText::new(format!("{} folders annotated", annotated))
                                    .size(11.0)
                                    .color(sb_muted),
                            );
                            ui.separator();
                        }
                        ui.label(
                            egui::RichText::new(format!("Rep {:03} · Sensation {}", rep, sensation))
                                .size(11.5)
                                .color(sb_accent),
                        );
                    });
                });
            });

        // ── Right Panel: Descriptors + Sensation Controls ──
        let mut descriptor_action = DescriptorAction::None;
        let mut add_clicked = false;
        let mut clear_clicked = false;
        let mut save_clicked = false;
        let current_color = sensation_color(self.store.sensation_number);
        let sensation_number = self.store.sensation_number;

        egui::SidePanel::right("response_panel")
            .resizable(true)
            .default_width(320.0)
            .min_width(260.0)
            .max_width(440.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        descriptor_action =
                            descriptor_panel::show_descriptor_panel(ui, &mut self.descriptor_state);

                        ui.add_space(8.0);
                        ui.separator();

                        // Current sensation indicator with its drawing color
                        ui.horizontal(|ui| {
                            let (resp, painter) = ui.allocate_painter(
                                egui::vec2(16.0, 16.0),
                                egui::Sense::hover(),
                            );
                            painter.circle_filled(resp.rect.center(), 7.0, current_color);
                            ui.label(
                                egui::RichText::new(format!("Sensation {}", sensation_number))
                                    .strong(),
                            );
                        });

                        ui.add_space(4.0);
                        ui.horizontal(|ui| {
                            if ui.button("➕ Add Sensation").clicked() {
                                add_clicked = true;
                            }
                            if ui.button("✕ Clear Drawing").clicked() {
                                clear_clicked = true;
                            }
                        });
                        ui.add_space(4.0);
                        if ui.button("💾 Save Trial & Reset").clicked() {
                            save_clicked = true;
                        }
                    });
            });

        // ── Central Panel: Image Tabs + Drawing Canvas ──
        let tab_active_bg = self.theme_colors.tab_active_bg;
        let tab_active_text = self.theme_colors.tab_active_text;
        let tab_inactive_bg = self.theme_colors.tab_inactive_bg;
        let tab_inactive_text = self.theme_colors.tab_inactive_text;
        let mut stroke_committed: Option<Vec<egui::Pos2>> = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.add_space(4.0);
                for idx in 0..self.images.len() {
                    let active = idx == self.active_tab;
                    let label = egui::RichText::new(&self.images[idx].label)
                        .size(13.0)
                        .color(if active { tab_active_text } else { tab_inactive_text });
                    let button = egui::Button::new(label)
                        .fill(if active { tab_active_bg } else { tab_inactive_bg })
                        .corner_radius(6.0);
                    if ui.add(button).clicked() && !active {
                        self.active_tab = idx;
                        log::debug!("Switched to image tab {}", self.images[idx].name);
                    }
                    ui.add_space(4.0);
                }
            });
            ui.add_space(2.0);

            if let (Some(slot), Some(state)) = (
                self.images.get(self.active_tab),
                self.canvas_states.get_mut(self.active_tab),
            ) {
                let action = canvas_view::show_image_canvas(
                    ui,
                    &slot.uri,
                    slot.native_size,
                    state,
                    sensation_number,
                    &self.theme_colors,
                );
                if let CanvasAction::StrokeCommitted(points) = action {
                    stroke_committed = Some(points);
                }
            } else {
                // Welcome/empty screen when no images are configured
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() * 0.28);
                    ui.heading(
                        egui::RichText::new("🖐 PerceptMap")
                            .size(26.0)
                            .color(self.theme_colors.text_heading),
                    );
                    ui.add_space(16.0);
                    ui.label(
                        egui::RichText::new("No body-diagram images configured")
                            .size(14.5)
                            .color(self.theme_colors.text_muted),
                    );
                    ui.label(
                        egui::RichText::new("Add image base names to perceptmap.yml")
                            .size(14.5)
                            .color(self.theme_colors.text_muted),
                    );
                });
            }
        });

        // Handle deferred actions
        if let Some(points) = stroke_committed {
            self.handle_stroke_committed(points);
        }
        if descriptor_action != DescriptorAction::None {
            self.handle_descriptor_action(descriptor_action);
        }
        if add_clicked {
            self.add_sensation();
        }
        if clear_clicked {
            self.clear_current_drawing();
        }
        if save_clicked {
            self.save_and_reset();
        }

        // ── Log Window ──
        if self.show_log_window {
            egui::Window::new("📋 Session Log")
                .open(&mut self.show_log_window)
                .default_size([560.0, 400.0])
                .resizable(true)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("💾 Save as Text").clicked() {
                            if let Some(path) = toolbar::save_log_dialog() {
                                let _ = self.session_log.save_text(&path);
                            }
                        }
                        if ui.button("💾 Save as JSON").clicked() {
                            if let Some(path) = toolbar::save_log_dialog() {
                                let _ = self.session_log.save_json(&path);
                            }
                        }
                    });
                    ui.separator();

                    egui::ScrollArea::vertical().show(ui, |ui| {
                        ui.style_mut().override_font_id = Some(egui::FontId::monospace(12.0));
                        ui.label(self.session_log.to_text());
                    });
                });
        }

        // ── About Dialog ──
        if self.show_about {
            egui::Window::new("About")
                .open(&mut self.show_about)
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.heading("🖐 PerceptMap");
                    ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                    ui.add_space(10.0);
                    ui.label("Built with Rust + egui");
                    ui.add_space(10.0);
                    ui.label("Features:");
                    ui.label("• Color-coded sensation drawing on body diagrams");
                    ui.label("• Modality / quality descriptors and intensity sliders");
                    ui.label("• Movement-direction capture");
                    ui.label("• Per-trial YAML + PNG snapshot export");
                    ui.label("• Session event logging");
                });
        }

        // Handle keyboard shortcuts
        let mut save_shortcut = false;
        ctx.input(|i| {
            if (i.modifiers.ctrl || i.modifiers.command) && i.key_pressed(egui::Key::S) {
                save_shortcut = true;
            }
        });
        if save_shortcut {
            self.save_and_reset();
        }
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        self.config.window_color
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Persist the advanced repetition counter so the next session resumes
        // after the last saved trial
        self.config.trial_number = self.store.rep_number;
        match self.config.save(&self.config_path) {
            Ok(()) => log::info!(
                "Config rewritten to {} (trial_number = {})",
                self.config_path.display(),
                self.config.trial_number
            ),
            Err(e) => log::error!("Could not rewrite config {}: {}", CONFIG_FILE, e),
        }
    }
}
