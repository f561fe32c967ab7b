use glam::Vec2;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};

use super::controller::PointerEvent;

/// Adapter that bridges Winit mouse and touch events to [`PointerEvent`]s
#[derive(Debug, Clone, Default)]
pub struct WinitPointer {
    /// Last known cursor position
    cursor: Option<Vec2>,
    /// Id of the touch currently steering, further fingers are ignored
    primary_touch: Option<u64>,
}

impl WinitPointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate a window event, `None` for events that are not pointer input
    pub fn translate(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::MouseInput { state, button, .. } => self.on_button(*state, *button),
            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor(Vec2::new(position.x as f32, position.y as f32))
            }
            WindowEvent::CursorLeft { .. } => self.on_cursor_left(),
            WindowEvent::Touch(touch) => self.on_touch(
                touch.phase,
                touch.id,
                Vec2::new(touch.location.x as f32, touch.location.y as f32),
            ),
            _ => None,
        }
    }

    pub fn on_button(&mut self, state: ElementState, button: MouseButton) -> Option<PointerEvent> {
        if button != MouseButton::Left {
            return None;
        }
        match state {
            ElementState::Pressed => self.cursor.map(PointerEvent::Pressed),
            ElementState::Released => Some(PointerEvent::Released),
        }
    }

    pub fn on_cursor(&mut self, position: Vec2) -> Option<PointerEvent> {
        self.cursor = Some(position);
        Some(PointerEvent::Moved(position))
    }

    pub fn on_cursor_left(&mut self) -> Option<PointerEvent> {
        self.cursor = None;
        Some(PointerEvent::Left)
    }

    pub fn on_touch(&mut self, phase: TouchPhase, id: u64, position: Vec2) -> Option<PointerEvent> {
        match phase {
            TouchPhase::Started => {
                if self.primary_touch.is_some() {
                    return None;
                }
                self.primary_touch = Some(id);
                Some(PointerEvent::Pressed(position))
            }
            _ if self.primary_touch != Some(id) => None,
            TouchPhase::Moved => Some(PointerEvent::Moved(position)),
            TouchPhase::Ended => {
                self.primary_touch = None;
                Some(PointerEvent::Released)
            }
            TouchPhase::Cancelled => {
                self.primary_touch = None;
                Some(PointerEvent::Left)
            }
        }
    }
}
