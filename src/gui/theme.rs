/// Theme system — switchable color themes for the application
///
/// Provides a Light ("Clinic") and a Dark theme, plus the fixed sensation
/// color palette used to tell drawn sensations apart.

/// Available themes
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AppTheme {
    Light,
    Dark,
}

impl AppTheme {
    pub fn label(&self) -> &'static str {
        match self {
            AppTheme::Light => "☀ Light",
            AppTheme::Dark => "🌙 Dark",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            AppTheme::Light => AppTheme::Dark,
            AppTheme::Dark => AppTheme::Light,
        }
    }
}

/// All colors a theme needs to provide
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Panels & backgrounds
    pub panel_fill: egui::Color32,
    pub window_fill: egui::Color32,
    pub faint_bg: egui::Color32,

    // Widgets
    pub widget_bg: egui::Color32,
    pub widget_bg_stroke: egui::Color32,
    pub widget_inactive_bg: egui::Color32,
    pub widget_inactive_stroke: egui::Color32,
    pub widget_hovered_bg: egui::Color32,
    pub widget_hovered_stroke: egui::Color32,
    pub widget_active_bg: egui::Color32,
    pub widget_active_fg: egui::Color32,

    // Selection
    pub selection_bg: egui::Color32,
    pub selection_stroke: egui::Color32,

    // Text
    pub text_secondary: egui::Color32,
    pub text_muted: egui::Color32,
    pub text_heading: egui::Color32,

    // Accent colors
    pub accent: egui::Color32,
    pub accent_dim: egui::Color32,
    pub success: egui::Color32,
    pub warning: egui::Color32,
    pub error: egui::Color32,

    // Canvas
    pub canvas_frame: egui::Color32,
    pub movement_pen: egui::Color32,

    // Tab buttons
    pub tab_active_bg: egui::Color32,
    pub tab_active_text: egui::Color32,
    pub tab_inactive_bg: egui::Color32,
    pub tab_inactive_text: egui::Color32,

    // Status bar
    pub status_bar_bg: egui::Color32,
    pub status_text: egui::Color32,

    // Shadow
    pub shadow_color: egui::Color32,

    // Whether this is a dark theme
    pub is_dark: bool,
}

impl ThemeColors {
    pub fn from_theme(theme: AppTheme) -> Self {
        match theme {
            AppTheme::Light => Self::light(),
            AppTheme::Dark => Self::dark(),
        }
    }

    fn light() -> Self {
        Self {
            panel_fill: egui::Color32::from_rgb(0xF7, 0xF7, 0xF8),
            window_fill: egui::Color32::from_rgb(0xFF, 0xFF, 0xFF),
            faint_bg: egui::Color32::from_rgb(0xF0, 0xF1, 0xF3),

            widget_bg: egui::Color32::from_rgb(0xEB, 0xEC, 0xEE),
            widget_bg_stroke: egui::Color32::from_rgb(0xD0, 0xD2, 0xD6),
            widget_inactive_bg: egui::Color32::from_rgb(0xE3, 0xE5, 0xE8),
            widget_inactive_stroke: egui::Color32::from_rgb(0xC8, 0xCA, 0xCE),
            widget_hovered_bg: egui::Color32::from_rgb(0xD8, 0xDD, 0xE6),
            widget_hovered_stroke: egui::Color32::from_rgb(0x5B, 0x9B, 0xD5),
            widget_active_bg: egui::Color32::from_rgb(0x3B, 0x7D, 0xC0),
            widget_active_fg: egui::Color32::WHITE,

            selection_bg: egui::Color32::from_rgba_premultiplied(0x3B, 0x7D, 0xC0, 0x40),
            selection_stroke: egui::Color32::from_rgb(0x3B, 0x7D, 0xC0),

            text_secondary: egui::Color32::from_rgb(0x44, 0x48, 0x52),
            text_muted: egui::Color32::from_rgb(0x88, 0x8C, 0x94),
            text_heading: egui::Color32::from_rgb(0x2A, 0x2E, 0x36),

            accent: egui::Color32::from_rgb(0x3B, 0x7D, 0xC0),
            accent_dim: egui::Color32::from_rgb(0x70, 0x75, 0x80),
            success: egui::Color32::from_rgb(0x27, 0x8B, 0x4A),
            warning: egui::Color32::from_rgb(0xB8, 0x8B, 0x00),
            error: egui::Color32::from_rgb(0xD0, 0x30, 0x30),

            canvas_frame: egui::Color32::from_rgb(0xC8, 0xCA, 0xCE),
            movement_pen: egui::Color32::from_rgb(0x10, 0x10, 0x10),

            tab_active_bg: egui::Color32::from_rgb(0x3B, 0x7D, 0xC0),
            tab_active_text: egui::Color32::WHITE,
            tab_inactive_bg: egui::Color32::from_rgb(0xE8, 0xEA, 0xED),
            tab_inactive_text: egui::Color32::from_rgb(0x55, 0x58, 0x62),

            status_bar_bg: egui::Color32::from_rgb(0xF0, 0xF1, 0xF3),
            status_text: egui::Color32::from_rgb(0x44, 0x48, 0x52),

            shadow_color: egui::Color32::from_rgba_premultiplied(0, 0, 0, 25),

            is_dark: false,
        }
    }

    fn dark() -> Self {
        Self {
            panel_fill: egui::Color32::from_rgb(0x16, 0x18, 0x1D),
            window_fill: egui::Color32::from_rgb(0x1B, 0x1E, 0x24),
            faint_bg: egui::Color32::from_rgb(0x20, 0x23, 0x2A),

            widget_bg: egui::Color32::from_rgb(0x24, 0x28, 0x30),
            widget_bg_stroke: egui::Color32::from_rgb(0x38, 0x3D, 0x48),
            widget_inactive_bg: egui::Color32::from_rgb(0x2A, 0x2E, 0x38),
            widget_inactive_stroke: egui::Color32::from_rgb(0x40, 0x45, 0x52),
            widget_hovered_bg: egui::Color32::from_rgb(0x33, 0x3A, 0x48),
            widget_hovered_stroke: egui::Color32::from_rgb(0x5B, 0x9B, 0xD5),
            widget_active_bg: egui::Color32::from_rgb(0x3B, 0x7D, 0xC0),
            widget_active_fg: egui::Color32::WHITE,

            selection_bg: egui::Color32::from_rgba_premultiplied(0x3B, 0x7D, 0xC0, 0x50),
            selection_stroke: egui::Color32::from_rgb(0x5B, 0x9B, 0xD5),

            text_secondary: egui::Color32::from_rgb(0xB8, 0xBC, 0xC6),
            text_muted: egui::Color32::from_rgb(0x78, 0x7C, 0x88),
            text_heading: egui::Color32::from_rgb(0xE6, 0xE8, 0xEE),

            accent: egui::Color32::from_rgb(0x5B, 0x9B, 0xD5),
            accent_dim: egui::Color32::from_rgb(0x8A, 0x90, 0x9C),
            success: egui::Color32::from_rgb(0x3E, 0xB8, 0x6A),
            warning: egui::Color32::from_rgb(0xD8, 0xAE, 0x30),
            error: egui::Color32::from_rgb(0xE0, 0x50, 0x50),

            canvas_frame: egui::Color32::from_rgb(0x40, 0x45, 0x52),
            movement_pen: egui::Color32::from_rgb(0xF0, 0xF0, 0xF0),

            tab_active_bg: egui::Color32::from_rgb(0x3B, 0x7D, 0xC0),
            tab_active_text: egui::Color32::WHITE,
            tab_inactive_bg: egui::Color32::from_rgb(0x2A, 0x2E, 0x38),
            tab_inactive_text: egui::Color32::from_rgb(0x9A, 0x9E, 0xAA),

            status_bar_bg: egui::Color32::from_rgb(0x12, 0x14, 0x18),
            status_text: egui::Color32::from_rgb(0xB8, 0xBC, 0xC6),

            shadow_color: egui::Color32::from_rgba_premultiplied(0, 0, 0, 60),

            is_dark: true,
        }
    }
}

/// Apply a theme to the egui context
pub fn apply_theme(ctx: &egui::Context, theme: AppTheme) {
    let c = ThemeColors::from_theme(theme);

    let mut visuals = if c.is_dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };

    visuals.panel_fill = c.panel_fill;
    visuals.window_fill = c.window_fill;
    visuals.faint_bg_color = c.faint_bg;

    visuals.widgets.noninteractive.bg_fill = c.widget_bg;
    visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(0.5, c.widget_bg_stroke);
    visuals.widgets.noninteractive.corner_radius = egui::CornerRadius::same(3);
    visuals.widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, c.text_secondary);

    visuals.widgets.inactive.bg_fill = c.widget_inactive_bg;
    visuals.widgets.inactive.bg_stroke = egui::Stroke::new(0.5, c.widget_inactive_stroke);
    visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(4);

    visuals.widgets.hovered.bg_fill = c.widget_hovered_bg;
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, c.widget_hovered_stroke);

    visuals.widgets.active.bg_fill = c.widget_active_bg;
    visuals.widgets.active.fg_stroke = egui::Stroke::new(1.5, c.widget_active_fg);

    visuals.selection.bg_fill = c.selection_bg;
    visuals.selection.stroke = egui::Stroke::new(1.5, c.selection_stroke);

    visuals.window_shadow = egui::epaint::Shadow {
        offset: [0, 2],
        blur: 8,
        spread: 0,
        color: c.shadow_color,
    };

    ctx.set_visuals(visuals);
}

/// Fixed sensation palette: purple, cyan, green, red, blue, yellow, orange,
/// pink, brown, aqua-green, magenta, salmon, teal. Sensation `k` draws in
/// entry `k mod 13`.
pub const SENSATION_PALETTE: [egui::Color32; 13] = [
    egui::Color32::from_rgb(128, 0, 204),
    egui::Color32::from_rgb(41, 199, 224),
    egui::Color32::from_rgb(79, 161, 15),
    egui::Color32::from_rgb(242, 94, 99),
    egui::Color32::from_rgb(89, 89, 209),
    egui::Color32::from_rgb(252, 230, 13),
    egui::Color32::from_rgb(237, 138, 36),
    egui::Color32::from_rgb(237, 61, 227),
    egui::Color32::from_rgb(163, 97, 0),
    egui::Color32::from_rgb(31, 189, 122),
    egui::Color32::from_rgb(237, 46, 140),
    egui::Color32::from_rgb(250, 115, 94),
    egui::Color32::from_rgb(23, 56, 64),
];

/// Stroke color for a sensation index.
pub fn sensation_color(index: u32) -> egui::Color32 {
    SENSATION_PALETTE[(index % 13) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensation_color_wraps_mod_13() {
        assert_eq!(sensation_color(0), SENSATION_PALETTE[0]);
        assert_eq!(sensation_color(12), SENSATION_PALETTE[12]);
        assert_eq!(sensation_color(13), SENSATION_PALETTE[0]);
        assert_eq!(sensation_color(27), SENSATION_PALETTE[1]);
        for k in 0..100u32 {
            assert_eq!(sensation_color(k), SENSATION_PALETTE[(k % 13) as usize]);
        }
    }

    #[test]
    fn test_theme_toggle_cycles() {
        assert_eq!(AppTheme::Light.next(), AppTheme::Dark);
        assert_eq!(AppTheme::Light.next().next(), AppTheme::Light);
    }
}
