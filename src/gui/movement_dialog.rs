/// Movement-direction popup — opened when a movement descriptor other than
/// "Vibration" is selected. The participant draws one direction line; each
/// new stroke replaces the previous one. Closing transfers the line onto the
/// active image canvas and into the trial's movement map.

/// Pen width for the direction line
pub const MOVEMENT_STROKE_WIDTH: f32 = 5.0;

/// State for the movement-direction popup
#[derive(Debug, Clone, Default)]
pub struct MovementDialogState {
    pub open: bool,
    /// Stroke currently under the pointer
    pub active_stroke: Vec<egui::Pos2>,
    /// The committed direction line; a redrawn line replaces it
    pub line: Vec<egui::Pos2>,
}

impl MovementDialogState {
    /// Open for a fresh direction entry.
    pub fn begin(&mut self) {
        self.open = true;
        self.active_stroke.clear();
        self.line.clear();
    }
}

/// Actions from the movement popup
#[derive(Debug, Clone, PartialEq)]
pub enum MovementAction {
    None,
    /// The participant pressed "Finished Entering Direction"
    Finished,
}

/// Show the movement popup. Returns `Finished` when the button is pressed;
/// the window has no close button (the original popup was not dismissable
/// either).
pub fn show_movement_dialog(
    ctx: &egui::Context,
    state: &mut MovementDialogState,
    pen: egui::Color32,
) -> MovementAction {
    let mut action = MovementAction::None;

    if !state.open {
        return action;
    }

    egui::Window::new("Draw Movement Direction")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::RIGHT_CENTER, [-24.0, 0.0])
        .default_size([420.0, 520.0])
        .show(ctx, |ui| {
            ui.label("Draw the direction the sensation moved:");
            ui.add_space(4.0);

            let size = egui::vec2(380.0, 420.0);
            let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
            let rect = response.rect;
            painter.rect_filled(rect, 4.0, ui.visuals().faint_bg_color);
            painter.rect_stroke(
                rect,
                4.0,
                egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color),
                egui::StrokeKind::Inside,
            );

            if response.drag_started() {
                if let Some(pos) = response.interact_pointer_pos() {
                    if rect.contains(pos) {
                        state.active_stroke = vec![pos];
                    }
                }
            } else if response.dragged() && !state.active_stroke.is_empty() {
                if let Some(pos) = response.interact_pointer_pos() {
                    if rect.contains(pos) && state.active_stroke.last() != Some(&pos) {
                        state.active_stroke.push(pos);
                    }
                }
            }
            if response.drag_stopped() && !state.active_stroke.is_empty() {
                state.line = std::mem::take(&mut state.active_stroke);
            }

            let clipped = painter.with_clip_rect(rect);
            paint_movement_stroke(&clipped, &state.line, pen);
            paint_movement_stroke(&clipped, &state.active_stroke, pen);

            ui.add_space(6.0);
            ui.vertical_centered_justified(|ui| {
                if ui.button("Finished Entering Direction").clicked() {
                    action = MovementAction::Finished;
                }
            });
        });

    action
}

fn paint_movement_stroke(painter: &egui::Painter, points: &[egui::Pos2], pen: egui::Color32) {
    match points {
        [] => {}
        [p] => {
            painter.circle_filled(*p, MOVEMENT_STROKE_WIDTH * 0.5, pen);
        }
        _ => {
            painter.add(egui::Shape::line(
                points.to_vec(),
                egui::Stroke::new(MOVEMENT_STROKE_WIDTH, pen),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_clears_previous_entry() {
        let mut state = MovementDialogState::default();
        state.line = vec![egui::pos2(1.0, 1.0)];
        state.active_stroke = vec![egui::pos2(2.0, 2.0)];
        state.begin();
        assert!(state.open);
        assert!(state.line.is_empty());
        assert!(state.active_stroke.is_empty());
    }
}
