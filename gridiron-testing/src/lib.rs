//! Float assertions shared by the gridiron test suites.

use assert_float_eq::*;

fn assert_same_len(expected: &[f64], actual: &[f64]) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "slices differ in length: expected {}, got {}",
        expected.len(),
        actual.len()
    );
}

/// Element-wise relative comparison. Exactly equal elements always pass, including zeros.
pub fn assert_slice_f64_relative(expected: &[f64], actual: &[f64], epsilon: f64) {
    assert_same_len(expected, actual);
    for (&expected, &actual) in expected.iter().zip(actual) {
        if expected != actual {
            assert_float_relative_eq!(expected, actual, epsilon);
        }
    }
}

/// Element-wise absolute comparison, for values that straddle zero.
pub fn assert_slice_f64_absolute(expected: &[f64], actual: &[f64], epsilon: f64) {
    assert_same_len(expected, actual);
    for (index, (&expected, &actual)) in expected.iter().zip(actual).enumerate() {
        assert!(
            (expected - actual).abs() <= epsilon,
            "element {index}: expected {expected}, got {actual} (epsilon {epsilon})"
        );
    }
}

/// Asserts that the values in a slice average out to zero, within `epsilon`.
pub fn assert_zero_mean(values: &[f64], epsilon: f64) {
    assert!(!values.is_empty(), "cannot take the mean of an empty slice");
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    assert_float_absolute_eq!(0.0, mean, epsilon);
}
