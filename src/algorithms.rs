/// Finds the index of the last knot which is less than or equal to the test
/// value, in a slice sorted ascending. Returns 0 when the test value precedes
/// every knot, and `knots.len() - 1` when it follows every knot.
pub fn preceding_index(knots: &[f64], test_value: f64) -> usize {
    knots
        .partition_point(|k| *k <= test_value)
        .saturating_sub(1)
}

/// Clamps the result of `preceding_index` to a valid segment start, so that
/// `knots[i]..knots[i + 1]` always exists. Queries outside the knot range map
/// onto the first or last segment, which is what the interpolators rely on for
/// their extrapolation behavior.
pub fn segment_index(knots: &[f64], test_value: f64) -> usize {
    preceding_index(knots, test_value).min(knots.len().saturating_sub(2))
}
