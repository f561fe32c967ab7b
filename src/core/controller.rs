use glam::Vec2;

/// Pointer input the hero scene reacts to. Mouse and touch are folded into
/// the same events; positions are in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed(Vec2),
    Moved(Vec2),
    Released,
    /// Pointer left the surface or the touch was cancelled
    Left,
}

/// Anything that consumes pointer input
pub trait PointerHandler {
    fn handle_pointer(&mut self, event: PointerEvent);
}
