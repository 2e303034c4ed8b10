//! Shared window, renderer and overlay for the celestial viewers
//!
//! The viewers own a `celestial::System` and a `celestial::Camera`; this crate
//! turns them into pixels each frame.

pub mod error;
pub mod graphics;
pub mod input;
pub mod overlay;
pub mod renderer;

pub use error::GraphicsError;
pub use graphics::*;
pub use input::{scroll_notches, track_held_key};
pub use overlay::{draw_body_labels, draw_help_window, draw_info_panel, InfoLine, Overlay};
pub use renderer::{BodyInstance, CameraUniform, Scene, SceneRenderer};
