//! winit input mapped onto the camera's held-key snapshot

use celestial::HeldKeys;
use winit::{event::MouseScrollDelta, keyboard::KeyCode};

/// Pixels of trackpad scroll counted as one wheel notch
const PIXELS_PER_NOTCH: f64 = 100.0;

/// Record a press or release of a camera key.
///
/// Returns false for keys that do not steer the camera, so the caller can
/// treat them as commands.
pub fn track_held_key(keys: &mut HeldKeys, key: KeyCode, pressed: bool) -> bool {
    match key {
        KeyCode::ArrowLeft => keys.left = pressed,
        KeyCode::ArrowRight => keys.right = pressed,
        KeyCode::ArrowUp => keys.up = pressed,
        KeyCode::ArrowDown => keys.down = pressed,
        KeyCode::ControlLeft | KeyCode::ControlRight => keys.ctrl = pressed,
        KeyCode::KeyQ => keys.roll_left = pressed,
        KeyCode::KeyE => keys.roll_right = pressed,
        _ => return false,
    }
    true
}

/// Wheel notches, positive away from the user
pub fn scroll_notches(delta: &MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => *y,
        MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_NOTCH) as f32,
    }
}
