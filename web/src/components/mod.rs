pub mod detail_popup;
pub mod heatmap_grid;
pub mod nav;
pub mod stats_panel;
pub mod workout_form;
