use std::cell::Cell;
use std::rc::Rc;

use super::clock::Clock;

/// Timing of one rendered frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Seconds since the loop started
    pub time: f32,
    pub delta: f32,
}

/// Cancellation token for a running frame loop.
///
/// Clones share the flag. Stopping is idempotent and can happen from any
/// clone, including from inside a frame callback.
#[derive(Debug, Clone)]
pub struct LoopHandle {
    active: Rc<Cell<bool>>,
}

impl LoopHandle {
    fn new() -> Self {
        Self {
            active: Rc::new(Cell::new(true)),
        }
    }

    pub fn stop(&self) {
        self.active.set(false);
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

/// Per-frame scheduler state. The host requests redraws; the loop decides
/// whether a frame still runs and at what time.
#[derive(Debug)]
pub struct FrameLoop {
    clock: Clock,
    handle: LoopHandle,
    number: u64,
    last_time: f32,
}

impl FrameLoop {
    /// Start a loop with its clock at zero
    pub fn start() -> Self {
        Self {
            clock: Clock::new(),
            handle: LoopHandle::new(),
            number: 0,
            last_time: 0.0,
        }
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_active()
    }

    pub fn frames(&self) -> u64 {
        self.number
    }

    /// Next frame on the wall clock, `None` once stopped
    pub fn next_frame(&mut self) -> Option<FrameInfo> {
        let time = self.clock.elapsed();
        self.frame_at(time)
    }

    /// Next frame at an explicit time, `None` once stopped
    pub fn frame_at(&mut self, time: f32) -> Option<FrameInfo> {
        if !self.handle.is_active() {
            return None;
        }

        let delta = (time - self.last_time).max(0.0);
        self.last_time = time;
        self.number += 1;

        Some(FrameInfo {
            number: self.number,
            time,
            delta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_count_up() {
        let mut frames = FrameLoop::start();
        let a = frames.frame_at(0.5).unwrap();
        let b = frames.frame_at(0.75).unwrap();

        assert_eq!((a.number, b.number), (1, 2));
        assert!((b.delta - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut frames = FrameLoop::start();
        let handle = frames.handle();

        handle.stop();
        handle.stop();
        frames.handle().stop();

        assert!(!frames.is_active());
        assert_eq!(frames.frame_at(1.0), None);
        assert_eq!(frames.frames(), 0);
    }

    #[test]
    fn test_time_going_backwards_clamps_delta() {
        let mut frames = FrameLoop::start();
        frames.frame_at(2.0);
        assert_eq!(frames.frame_at(1.0).unwrap().delta, 0.0);
    }
}
