// src/engine_lib/controller.rs

use winit::{
    event::{ElementState, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// What the user asked the animation to do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlAction {
    TogglePause,
    StepOnce,
    Restart,
    Quit,
    /// Left click at a window position (origin top-left).
    ClickAt { x: f32, y: f32 },
}

#[derive(Debug, Default)]
pub struct AnimationController {
    cursor_position: Option<(f32, f32)>,
}

impl AnimationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) -> Option<ControlAction> {
        match event {
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if key_event.state != ElementState::Pressed || key_event.repeat {
                    return None;
                }
                Self::action_for_key(key_event.physical_key)
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = Some((position.x as f32, position.y as f32));
                None
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor_position = None;
                None
            }
            WindowEvent::MouseInput { state: ElementState::Pressed, button: MouseButton::Left, .. } => {
                self.cursor_position.map(|(x, y)| ControlAction::ClickAt { x, y })
            }
            _ => None,
        }
    }

    fn action_for_key(key: PhysicalKey) -> Option<ControlAction> {
        match key {
            PhysicalKey::Code(KeyCode::Space) => Some(ControlAction::TogglePause),
            PhysicalKey::Code(KeyCode::ArrowRight) => Some(ControlAction::StepOnce),
            PhysicalKey::Code(KeyCode::KeyR) => Some(ControlAction::Restart),
            PhysicalKey::Code(KeyCode::Escape) => Some(ControlAction::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_actions() {
        let map = AnimationController::action_for_key;
        assert_eq!(map(PhysicalKey::Code(KeyCode::Space)), Some(ControlAction::TogglePause));
        assert_eq!(map(PhysicalKey::Code(KeyCode::ArrowRight)), Some(ControlAction::StepOnce));
        assert_eq!(map(PhysicalKey::Code(KeyCode::KeyR)), Some(ControlAction::Restart));
        assert_eq!(map(PhysicalKey::Code(KeyCode::Escape)), Some(ControlAction::Quit));
        assert_eq!(map(PhysicalKey::Code(KeyCode::KeyW)), None);
    }
}
