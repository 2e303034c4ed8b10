//! Celestial motion core
//!
//! Keplerian and Newtonian bodies orbiting a central mass, the fixed-size
//! trails used to draw where they have been, and the orbit camera the
//! viewers steer. Nothing here touches the GPU; the viewer crates read body
//! state, trails and the camera transform each frame and draw them.

pub mod body;
pub mod camera;
pub mod clock;
pub mod config;
pub mod error;
pub mod scenario;
pub mod scenery;
pub mod system;
pub mod trail;

pub use body::{Body, BodyKind, KeplerOrbit, Motion};
pub use camera::{Camera, CameraInput, HeldKeys, Projection, ScreenPoint};
pub use clock::SimClock;
pub use config::{
    CameraSettings, ClockConfig, GridConfig, PhotonBeam, PhysicsConfig, ProjectionConfig,
    SimConfig, TrailConfig,
};
pub use error::{ConfigError, Result};
pub use system::{System, TickReport};
pub use trail::{FadePolicy, TrailBuffer};
