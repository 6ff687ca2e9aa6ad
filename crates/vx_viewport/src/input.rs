//! Pointer, wheel and keyboard handling for the preview area.
//!
//! Raw events go in, [`CameraCommand`]s come out. The tracker only keeps the
//! drag state; it never touches the camera itself.

use glam::Vec2;

/// Wheel delta multiplier
const WHEEL_SCALE: f32 = 0.08;
/// Largest zoom step from a single wheel event
const MAX_WHEEL_STEP: f32 = 0.25;
/// Step used when a wheel event scales down to nothing
const MIN_WHEEL_STEP: f32 = 0.15;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    F,
    A,
    Other,
}

/// Input event delivered by the host UI
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportInput {
    PointerDown { button: PointerButton, position: Vec2 },
    PointerMove { position: Vec2 },
    PointerUp { button: PointerButton },
    PointerLeave,
    Wheel { delta_y: f32 },
    KeyDown(KeyCode),
}

/// Camera operation requested by input
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraCommand {
    Orbit(Vec2),
    Pan(Vec2),
    Zoom(f32),
    Frame { recenter: bool },
    ResetView,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Drag {
    #[default]
    Idle,
    Orbiting,
    Panning,
}

/// Drag state machine: primary button orbits, middle button pans
#[derive(Clone, Copy, Debug, Default)]
pub struct InputTracker {
    drag: Drag,
    last_position: Vec2,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one event. `scene_displayed` gates drag starts and zoom.
    pub fn handle(&mut self, input: ViewportInput, scene_displayed: bool) -> Option<CameraCommand> {
        match input {
            ViewportInput::PointerDown { button, position } => {
                if !scene_displayed {
                    return None;
                }
                self.drag = match button {
                    PointerButton::Primary => Drag::Orbiting,
                    PointerButton::Middle => Drag::Panning,
                    PointerButton::Secondary => return None,
                };
                self.last_position = position;
                None
            }
            ViewportInput::PointerMove { position } => {
                let delta = position - self.last_position;
                match self.drag {
                    Drag::Idle => None,
                    Drag::Orbiting => {
                        self.last_position = position;
                        Some(CameraCommand::Orbit(delta))
                    }
                    Drag::Panning => {
                        self.last_position = position;
                        Some(CameraCommand::Pan(delta))
                    }
                }
            }
            ViewportInput::PointerUp { button } => {
                match (self.drag, button) {
                    (Drag::Orbiting, PointerButton::Primary)
                    | (Drag::Panning, PointerButton::Middle) => {
                        self.drag = Drag::Idle;
                    }
                    _ => {}
                }
                None
            }
            ViewportInput::PointerLeave => {
                self.cancel();
                None
            }
            ViewportInput::Wheel { delta_y } => {
                scene_displayed.then(|| CameraCommand::Zoom(normalize_wheel(delta_y)))
            }
            ViewportInput::KeyDown(KeyCode::F) => Some(CameraCommand::Frame { recenter: true }),
            ViewportInput::KeyDown(KeyCode::A) => Some(CameraCommand::ResetView),
            ViewportInput::KeyDown(KeyCode::Other) => None,
        }
    }

    /// Drop any drag in progress
    pub fn cancel(&mut self) {
        self.drag = Drag::Idle;
    }

    #[inline]
    pub fn is_orbiting(&self) -> bool {
        self.drag == Drag::Orbiting
    }

    #[inline]
    pub fn is_panning(&self) -> bool {
        self.drag == Drag::Panning
    }
}

/// Turn a raw wheel delta into a zoom step in `[-0.25, 0.25]`.
///
/// Tiny deltas still zoom by a fixed step in their direction.
pub fn normalize_wheel(delta_y: f32) -> f32 {
    let delta = (delta_y * WHEEL_SCALE).clamp(-MAX_WHEEL_STEP, MAX_WHEEL_STEP);
    if delta.abs() <= f32::EPSILON {
        if delta_y > 0.0 {
            MIN_WHEEL_STEP
        } else {
            -MIN_WHEEL_STEP
        }
    } else {
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(button: PointerButton, x: f32, y: f32) -> ViewportInput {
        ViewportInput::PointerDown {
            button,
            position: Vec2::new(x, y),
        }
    }

    fn moved(x: f32, y: f32) -> ViewportInput {
        ViewportInput::PointerMove {
            position: Vec2::new(x, y),
        }
    }

    #[test]
    fn test_primary_drag_orbits() {
        let mut input = InputTracker::new();
        assert_eq!(input.handle(down(PointerButton::Primary, 10.0, 10.0), true), None);
        assert_eq!(
            input.handle(moved(15.0, 8.0), true),
            Some(CameraCommand::Orbit(Vec2::new(5.0, -2.0)))
        );
        assert_eq!(
            input.handle(moved(16.0, 8.0), true),
            Some(CameraCommand::Orbit(Vec2::new(1.0, 0.0)))
        );

        input.handle(ViewportInput::PointerUp { button: PointerButton::Primary }, true);
        assert_eq!(input.handle(moved(30.0, 30.0), true), None);
    }

    #[test]
    fn test_middle_drag_pans_and_leave_cancels() {
        let mut input = InputTracker::new();
        input.handle(down(PointerButton::Middle, 0.0, 0.0), true);
        assert!(input.is_panning());
        assert_eq!(
            input.handle(moved(3.0, 4.0), true),
            Some(CameraCommand::Pan(Vec2::new(3.0, 4.0)))
        );

        input.handle(ViewportInput::PointerLeave, true);
        assert!(!input.is_panning());
        assert_eq!(input.handle(moved(9.0, 9.0), true), None);
    }

    #[test]
    fn test_no_drag_without_scene() {
        let mut input = InputTracker::new();
        input.handle(down(PointerButton::Primary, 0.0, 0.0), false);
        assert!(!input.is_orbiting());
        assert_eq!(input.handle(ViewportInput::Wheel { delta_y: 3.0 }, false), None);
    }

    #[test]
    fn test_wheel_normalization() {
        assert_eq!(normalize_wheel(1.0), 0.08);
        assert_eq!(normalize_wheel(100.0), 0.25);
        assert_eq!(normalize_wheel(-100.0), -0.25);
        assert_eq!(normalize_wheel(1e-9), 0.15);
        assert_eq!(normalize_wheel(0.0), -0.15);
    }

    #[test]
    fn test_keys() {
        let mut input = InputTracker::new();
        assert_eq!(
            input.handle(ViewportInput::KeyDown(KeyCode::F), true),
            Some(CameraCommand::Frame { recenter: true })
        );
        assert_eq!(
            input.handle(ViewportInput::KeyDown(KeyCode::A), true),
            Some(CameraCommand::ResetView)
        );
        assert_eq!(input.handle(ViewportInput::KeyDown(KeyCode::Other), true), None);
    }
}
