//! Range mapping between motion values and style values

/// Map `value` linearly from `input` onto `output`, clamped at both ends.
///
/// Ranges may be descending (`[50, -50]`). A degenerate input range or a
/// NaN value yields the start of the output range.
pub fn map_range(value: f32, input: [f32; 2], output: [f32; 2]) -> f32 {
    let [in_start, in_end] = input;
    let [out_start, out_end] = output;
    let span = in_end - in_start;
    if value.is_nan() || span == 0.0 || !span.is_finite() {
        return out_start;
    }
    let progress = ((value - in_start) / span).clamp(0.0, 1.0);
    out_start + (out_end - out_start) * progress
}

/// A stored input/output range pair
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeMap {
    pub input: [f32; 2],
    pub output: [f32; 2],
}

impl RangeMap {
    pub const fn new(input: [f32; 2], output: [f32; 2]) -> Self {
        Self { input, output }
    }

    pub fn apply(&self, value: f32) -> f32 {
        map_range(value, self.input, self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_range_is_clamped() {
        let rotate = RangeMap::new([-500.0, 500.0], [-15.0, 15.0]);
        assert_eq!(rotate.apply(0.0), 0.0);
        assert_eq!(rotate.apply(250.0), 7.5);
        assert_eq!(rotate.apply(-500.0), -15.0);
        assert_eq!(rotate.apply(2000.0), 15.0);
        assert_eq!(rotate.apply(-2000.0), -15.0);
    }

    #[test]
    fn test_descending_output() {
        assert_eq!(map_range(0.25, [0.25, 0.5], [50.0, -50.0]), 50.0);
        assert_eq!(map_range(0.375, [0.25, 0.5], [50.0, -50.0]), 0.0);
        assert_eq!(map_range(0.9, [0.25, 0.5], [50.0, -50.0]), -50.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(map_range(3.0, [1.0, 1.0], [4.0, 8.0]), 4.0);
        assert_eq!(map_range(f32::NAN, [0.0, 1.0], [4.0, 8.0]), 4.0);
        assert_eq!(map_range(f32::INFINITY, [0.0, 1.0], [4.0, 8.0]), 8.0);
    }
}
