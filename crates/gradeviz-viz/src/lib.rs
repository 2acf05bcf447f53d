//! egui viewer for identifier-keyed statistics series.
//!
//! The window carries three surfaces: the identifier input row, the bar
//! chart (or placeholder prompt / error banner, depending on the session
//! phase), and a hover-activated detail panel with an animated transition.

mod app;
mod chart;
mod controller;
mod hover_panel;

pub use app::GradeVizApp;
pub use controller::FetchController;
