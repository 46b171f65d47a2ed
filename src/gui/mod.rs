pub mod canvas_view;
pub mod descriptor_panel;
pub mod movement_dialog;
pub mod snapshot;
pub mod theme;
pub mod toolbar;
