#[cfg(feature = "egui")]
mod egui_integration;

#[cfg(feature = "egui")]
pub use egui_integration::{EguiOverlay, EguiRenderTarget};

#[cfg(feature = "egui")]
pub use egui;
