use std::time::Duration;

/// Frame rate estimate refreshed once per second of accumulated frame time.
///
/// Fed with frame deltas rather than reading a clock itself, so the host's
/// [`Clock`](crate::Clock) stays the only time source.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frame_count: u32,
    accumulated_time: Duration,
    pub current_fps: f32,
}

impl FpsCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one frame. Returns the new estimate whenever a full second has
    /// accumulated.
    pub fn update(&mut self, delta: Duration) -> Option<f32> {
        self.frame_count += 1;
        self.accumulated_time += delta;

        if self.accumulated_time.as_secs_f32() >= 1.0 {
            self.current_fps = self.frame_count as f32 / self.accumulated_time.as_secs_f32();

            self.accumulated_time = Duration::ZERO;
            self.frame_count = 0;

            return Some(self.current_fps);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_second() {
        let mut fps = FpsCounter::new();
        let step = Duration::from_millis(10);

        let reports: Vec<f32> = (0..250).filter_map(|_| fps.update(step)).collect();
        assert_eq!(reports.len(), 2);
        assert!((reports[0] - 100.0).abs() < 0.5);
    }
}
