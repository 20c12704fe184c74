use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
    CubicSpline,
}

/// How many neighbouring frames the cursor probes before giving up and
/// falling back to a binary search.
const MAX_SCAN_OFFSET: usize = 3;

/// Remembers the last keyframe hit so that sequential playback samples in O(1).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    /// For `CubicSpline`, holds `[in_tangent, value, out_tangent]` per keyframe.
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

    /// Time of the last keyframe, or 0 for an empty track.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty() || self.values.is_empty()
    }

    /// Number of values the keyframe times call for: one per keyframe, or
    /// three for `CubicSpline`.
    #[must_use]
    pub fn expected_value_count(&self) -> usize {
        match self.interpolation {
            InterpolationMode::CubicSpline => self.times.len() * 3,
            InterpolationMode::Linear | InterpolationMode::Step => self.times.len(),
        }
    }

    /// Non-empty, with exactly as many values as the keyframes need.
    /// Only well-formed tracks produce samples.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.times.is_empty() && self.values.len() == self.expected_value_count()
    }

    /// Stateless sample. Returns `None` for an empty or malformed track.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        if !self.is_well_formed() {
            return None;
        }
        let next_idx = self.times.partition_point(|&t| t <= time);
        let idx = next_idx.saturating_sub(1);
        Some(self.sample_at_frame(idx, time))
    }

    /// Samples the track, reusing and updating `cursor`.
    ///
    /// Forward playback usually lands within a few frames of the previous hit,
    /// so a short linear probe is tried first in the direction of travel.
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        if !self.is_well_formed() {
            return None;
        }

        let len = self.times.len();
        if len == 1 {
            return Some(*self.value_at(0));
        }

        let i = cursor.last_index.min(len - 1);
        let found = if time >= self.times[i] {
            self.scan_forward(i, time)
        } else {
            self.scan_backward(i, time)
        };

        let idx = found.unwrap_or_else(|| {
            let next_idx = self.times.partition_point(|&t| t <= time);
            next_idx.saturating_sub(1)
        });
        cursor.last_index = idx;

        Some(self.sample_at_frame(idx, time))
    }

    fn scan_forward(&self, start: usize, time: f32) -> Option<usize> {
        let len = self.times.len();
        for idx in start..=start + MAX_SCAN_OFFSET {
            if idx >= len - 1 {
                return (time >= self.times[len - 1]).then_some(len - 1);
            }
            if time < self.times[idx + 1] {
                return Some(idx);
            }
        }
        None
    }

    fn scan_backward(&self, start: usize, time: f32) -> Option<usize> {
        (0..=MAX_SCAN_OFFSET)
            .take_while(|&offset| offset <= start)
            .map(|offset| start - offset)
            .find(|&idx| time >= self.times[idx])
    }

    fn value_at(&self, index: usize) -> &T {
        match self.interpolation {
            InterpolationMode::CubicSpline => &self.values[index * 3 + 1],
            _ => &self.values[index],
        }
    }

    fn sample_at_frame(&self, index: usize, time: f32) -> T {
        let len = self.times.len();
        if index >= len - 1 {
            return *self.value_at(len - 1);
        }

        let next_idx = index + 1;
        let t0 = self.times[index];
        let t1 = self.times[next_idx];
        let dt = t1 - t0;

        let t = if dt > 1e-6 { (time - t0) / dt } else { 0.0 };
        let t = t.clamp(0.0, 1.0);

        match self.interpolation {
            InterpolationMode::Step => *self.value_at(index),
            InterpolationMode::Linear => {
                T::interpolate_linear(*self.value_at(index), *self.value_at(next_idx), t)
            }
            InterpolationMode::CubicSpline => {
                let i_prev = index * 3;
                let i_next = next_idx * 3;

                T::interpolate_cubic(
                    self.values[i_prev + 1],
                    self.values[i_prev + 2],
                    self.values[i_next],
                    self.values[i_next + 1],
                    t,
                    dt,
                )
            }
        }
    }
}
