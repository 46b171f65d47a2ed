/// Toolbar — top menu bar with trial operations and quick actions

use std::path::PathBuf;

/// Actions that can be triggered from the toolbar
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarAction {
    None,
    ChooseOutputDir,
    SaveAndReset,
    ClearAllDrawings,
    ResetDescriptors,
    ExportSessionLog,
    ThemeToggle,
    ShowAbout,
}

/// Render the toolbar and return any triggered action
pub fn show_toolbar(
    ctx: &egui::Context,
    theme_label: &str,
    save_folder: &mut String,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            // File menu
            ui.menu_button("📁 File", |ui| {
                if ui.button("📂 Choose Output Folder…").clicked() {
                    action = ToolbarAction::ChooseOutputDir;
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("💾 Save Trial & Reset").clicked() {
                    action = ToolbarAction::SaveAndReset;
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("📋 Export Session Log…").clicked() {
                    action = ToolbarAction::ExportSessionLog;
                    ui.close_menu();
                }
            });

            // Edit menu
            ui.menu_button("✏️ Edit", |ui| {
                if ui.button("🧽 Clear All Drawings").clicked() {
                    action = ToolbarAction::ClearAllDrawings;
                    ui.close_menu();
                }
                if ui.button("↺ Reset Descriptors").clicked() {
                    action = ToolbarAction::ResetDescriptors;
                    ui.close_menu();
                }
            });

            // View menu
            ui.menu_button("🔍 View", |ui| {
                if ui.button(format!("🎨 Theme: {}", theme_label)).clicked() {
                    action = ToolbarAction::ThemeToggle;
                    ui.close_menu();
                }
            });

            // Help menu
            ui.menu_button("❓ Help", |ui| {
                if ui.button("ℹ About").clicked() {
                    action = ToolbarAction::ShowAbout;
                    ui.close_menu();
                }
            });

            ui.separator();
            ui.label("Participant:");
            ui.add(
                egui::TextEdit::singleline(save_folder)
                    .desired_width(120.0)
                    .hint_text("folder name"),
            );

            // Spacer + quick theme toggle
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add(
                        egui::Button::new(egui::RichText::new(theme_label).size(12.0))
                            .corner_radius(12.0),
                    )
                    .clicked()
                {
                    action = ToolbarAction::ThemeToggle;
                }
                ui.separator();
                ui.label(
                    egui::RichText::new("PerceptMap")
                        .color(egui::Color32::from_rgb(0x70, 0x75, 0x80))
                        .size(12.0),
                );
            });
        });
    });

    action
}

/// Show folder picker dialog for the trial output root
pub fn choose_output_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Choose Trial Output Folder")
        .pick_folder()
}

/// Show save dialog for session log export
pub fn save_log_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Export Session Log")
        .add_filter("Text File", &["txt"])
        .add_filter("JSON", &["json"])
        .save_file()
}
