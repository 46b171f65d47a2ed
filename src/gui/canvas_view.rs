/// Per-image annotation canvas — a body-diagram bitmap with pointer-drawn
/// strokes layered on top. Strokes of completed sensations render dimmed and
/// cannot be edited; the in-progress sensation draws in its palette color.

use crate::gui::theme::{sensation_color, ThemeColors};

/// Painted stroke width, matching the exported snapshot thickness
pub const STROKE_WIDTH: f32 = 4.0;
/// Opacity multiplier for strokes of completed (frozen) sensations
pub const FROZEN_ALPHA: f32 = 0.45;

/// Per-image canvas state. The committed coordinate data lives in the trial
/// store; this holds what the canvas needs to repaint and the stroke being
/// drawn right now.
#[derive(Debug, Clone, Default)]
pub struct CanvasViewState {
    /// Stroke currently under the pointer
    pub active_stroke: Vec<egui::Pos2>,
    /// Committed strokes: (sensation index, screen-space points)
    pub strokes: Vec<(u32, Vec<egui::Pos2>)>,
    /// Movement-direction lines transferred from the popup
    pub movement_strokes: Vec<(u32, Vec<egui::Pos2>)>,
    /// Where the image was displayed last frame (save geometry + snapshots)
    pub display_rect: Option<egui::Rect>,
}

impl CanvasViewState {
    /// Un-draw the given sensation's strokes (the clear-drawing action).
    pub fn clear_sensation(&mut self, sensation: u32) {
        self.active_stroke.clear();
        self.strokes.retain(|(s, _)| *s != sensation);
        self.movement_strokes.retain(|(s, _)| *s != sensation);
    }

    /// Un-draw everything.
    pub fn clear_all(&mut self) {
        self.active_stroke.clear();
        self.strokes.clear();
        self.movement_strokes.clear();
    }
}

/// Result of one canvas frame
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasAction {
    None,
    /// A stroke was finished and should be committed to the trial store
    StrokeCommitted(Vec<egui::Pos2>),
}

/// Largest rect of the image's aspect ratio centered inside `avail`.
pub fn fit_rect(native: [u32; 2], avail: egui::Rect) -> egui::Rect {
    let (w, h) = (native[0] as f32, native[1] as f32);
    if w <= 0.0 || h <= 0.0 || avail.width() <= 0.0 || avail.height() <= 0.0 {
        return avail;
    }
    let scale = (avail.width() / w).min(avail.height() / h);
    let size = egui::vec2(w * scale, h * scale);
    egui::Rect::from_center_size(avail.center(), size)
}

/// Show one annotated image and capture pointer strokes over it.
pub fn show_image_canvas(
    ui: &mut egui::Ui,
    image_uri: &str,
    native_size: Option<[u32; 2]>,
    state: &mut CanvasViewState,
    current_sensation: u32,
    colors: &ThemeColors,
) -> CanvasAction {
    let avail = ui.available_rect_before_wrap();

    let Some(native) = native_size else {
        ui.centered_and_justified(|ui| {
            ui.colored_label(colors.error, "Image not found — check the image_bank path");
        });
        state.display_rect = None;
        return CanvasAction::None;
    };

    let rect = fit_rect(native, avail);
    state.display_rect = Some(rect);

    let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
    egui::Image::new(image_uri)
        .fit_to_exact_size(rect.size())
        .paint_at(ui, rect);
    // Clip strokes to the image bounds (stencil behavior)
    let painter = ui.painter_at(rect);
    painter.rect_stroke(
        rect,
        2.0,
        egui::Stroke::new(1.0, colors.canvas_frame),
        egui::StrokeKind::Inside,
    );

    // ── Committed strokes: frozen sensations dimmed, current one full ──
    for (sensation, points) in state.strokes.iter().chain(state.movement_strokes.iter()) {
        let mut color = sensation_color(*sensation);
        if *sensation < current_sensation {
            color = color.gamma_multiply(FROZEN_ALPHA);
        }
        paint_stroke(&painter, points, color);
    }

    // ── Stroke in progress ──
    let mut action = CanvasAction::None;

    if response.drag_started() {
        if let Some(pos) = response.interact_pointer_pos() {
            if rect.contains(pos) {
                state.active_stroke = vec![pos];
            }
        }
    } else if response.dragged() && !state.active_stroke.is_empty() {
        if let Some(pos) = response.interact_pointer_pos() {
            // Points append only while the pointer stays inside the image
            if rect.contains(pos) && state.active_stroke.last() != Some(&pos) {
                state.active_stroke.push(pos);
            }
        }
    }

    if !state.active_stroke.is_empty() {
        paint_stroke(&painter, &state.active_stroke, sensation_color(current_sensation));
    }

    if response.drag_stopped() && !state.active_stroke.is_empty() {
        let points = std::mem::take(&mut state.active_stroke);
        state.strokes.push((current_sensation, points.clone()));
        action = CanvasAction::StrokeCommitted(points);
    } else if response.clicked() {
        // A tap without movement still marks a single point
        if let Some(pos) = response.interact_pointer_pos() {
            if rect.contains(pos) {
                let points = vec![pos];
                state.strokes.push((current_sensation, points.clone()));
                action = CanvasAction::StrokeCommitted(points);
            }
        }
    }

    action
}

/// Paint one stroke; single points render as dots.
pub fn paint_stroke(painter: &egui::Painter, points: &[egui::Pos2], color: egui::Color32) {
    match points {
        [] => {}
        [p] => {
            painter.circle_filled(*p, STROKE_WIDTH * 0.5, color);
        }
        _ => {
            painter.add(egui::Shape::line(
                points.to_vec(),
                egui::Stroke::new(STROKE_WIDTH, color),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_rect_keeps_aspect_and_centers() {
        let avail = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 400.0));
        let rect = fit_rect([100, 100], avail);
        assert_eq!(rect.width(), 400.0);
        assert_eq!(rect.height(), 400.0);
        assert_eq!(rect.center(), avail.center());

        let wide = fit_rect([200, 50], avail);
        assert_eq!(wide.width(), 800.0);
        assert_eq!(wide.height(), 200.0);
    }

    #[test]
    fn test_fit_rect_degenerate_falls_back_to_avail() {
        let avail = egui::Rect::from_min_size(egui::pos2(10.0, 10.0), egui::vec2(100.0, 100.0));
        assert_eq!(fit_rect([0, 100], avail), avail);
    }

    #[test]
    fn test_clear_sensation_removes_only_that_index() {
        let mut state = CanvasViewState::default();
        state.strokes.push((0, vec![egui::pos2(1.0, 1.0)]));
        state.strokes.push((1, vec![egui::pos2(2.0, 2.0)]));
        state.movement_strokes.push((1, vec![egui::pos2(3.0, 3.0)]));

        state.clear_sensation(1);
        assert_eq!(state.strokes.len(), 1);
        assert_eq!(state.strokes[0].0, 0);
        assert!(state.movement_strokes.is_empty());
    }
}
