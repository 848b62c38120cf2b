use std::time::{Duration, Instant};

/// The timing information of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the clock has been started.
    pub elapsed: f32,

    /// Seconds since the previous frame.
    pub delta: f32,
}

/// Measures the time between the frames of the host loop.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last_tick: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            last_tick: Duration::ZERO,
        }
    }

    /// Call this once per frame.
    pub fn tick(&mut self) -> FrameTime {
        let elapsed = self.start.elapsed();
        let delta = elapsed.saturating_sub(self.last_tick);
        self.last_tick = elapsed;

        FrameTime {
            elapsed: elapsed.as_secs_f32(),
            delta: delta.as_secs_f32(),
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_add_up_to_elapsed() {
        let mut clock = FrameClock::new();

        let mut sum = 0.;
        let mut elapsed = 0.;
        for _ in 0..3 {
            std::thread::sleep(Duration::from_millis(2));
            let time = clock.tick();
            assert!(time.delta > 0.);

            sum += time.delta;
            elapsed = time.elapsed;
        }

        approx::assert_relative_eq!(sum, elapsed, epsilon = 1e-4);
    }
}
