use std::time::Instant;

/// Monotonic scene clock - elapsed time since mount
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    /// Create new clock starting now
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Seconds since the clock started
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn clock_measures_elapsed() {
        let clock = Clock::new();

        thread::sleep(Duration::from_millis(10));
        let elapsed = clock.elapsed();

        assert!(elapsed >= 0.009);
    }
}
