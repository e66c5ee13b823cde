use crate::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
    /// Values are stored as `[in_tangent, value, out_tangent]` per keyframe.
    CubicSpline,
}

/// Keyframes scanned linearly from the cursor before falling back to a
/// binary search.
const MAX_SCAN_OFFSET: usize = 3;

/// Remembers the last keyframe interval a track was sampled in.
///
/// Playback moves forward a little each frame, so the next sample almost
/// always lands in the same or the following interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    /// For `CubicSpline`, `times.len() * 3` entries.
    pub values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    /// Whether the value count matches the keyframe count for the mode and
    /// the track has at least one keyframe.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let expected = match self.interpolation {
            InterpolationMode::CubicSpline => self.times.len() * 3,
            _ => self.times.len(),
        };
        !self.times.is_empty() && self.values.len() == expected
    }

    /// Time of the last keyframe (0 for an empty track).
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Stateless sample using a binary search. `None` for a malformed track.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        if !self.is_well_formed() {
            return None;
        }
        let next_idx = self.times.partition_point(|&t| t <= time);
        Some(self.sample_at_frame(next_idx.saturating_sub(1), time))
    }

    /// Samples using and updating `cursor`. `None` for a malformed track.
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        if !self.is_well_formed() {
            return None;
        }

        let len = self.times.len();
        if len == 1 {
            return Some(self.value_at(0));
        }

        // A cursor from another track (or a shorter clip) may be out of range.
        let i = cursor.last_index.min(len - 1);

        let found = if time >= self.times[i] {
            // Playing forward: check [i, i+1), [i+1, i+2), ...
            (0..=MAX_SCAN_OFFSET).map(|offset| i + offset).find_map(|idx| {
                if idx >= len - 1 {
                    (time >= self.times[len - 1]).then_some(len - 1)
                } else {
                    (time < self.times[idx + 1]).then_some(idx)
                }
            })
        } else {
            // Playing backward or wrapped around.
            (0..=MAX_SCAN_OFFSET)
                .filter_map(|offset| i.checked_sub(offset))
                .find(|&idx| time >= self.times[idx])
        };

        let index = found.unwrap_or_else(|| {
            self.times
                .partition_point(|&t| t <= time)
                .saturating_sub(1)
        });

        cursor.last_index = index;
        Some(self.sample_at_frame(index, time))
    }

    fn value_at(&self, index: usize) -> T {
        match self.interpolation {
            InterpolationMode::CubicSpline => self.values[index * 3 + 1],
            _ => self.values[index],
        }
    }

    fn sample_at_frame(&self, index: usize, time: f32) -> T {
        let len = self.times.len();
        if index >= len - 1 {
            return self.value_at(len - 1);
        }

        let next = index + 1;
        let t0 = self.times[index];
        let t1 = self.times[next];
        let dt = t1 - t0;

        let t = if dt > 1e-6 { (time - t0) / dt } else { 0.0 };
        let t = t.clamp(0.0, 1.0);

        match self.interpolation {
            InterpolationMode::Step => self.value_at(index),
            InterpolationMode::Linear => T::interpolate_linear(self.value_at(index), self.value_at(next), t),
            InterpolationMode::CubicSpline => {
                let prev = index * 3;
                let next = next * 3;
                T::interpolate_cubic(
                    self.values[prev + 1],
                    self.values[prev + 2],
                    self.values[next],
                    self.values[next + 1],
                    t,
                    dt,
                )
            }
        }
    }
}
