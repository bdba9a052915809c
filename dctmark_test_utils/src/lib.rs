//! Small assertion helpers shared by the transform and core test suites.

/// Asserts that a scalar pair is equal within `max_error`.
#[macro_export]
macro_rules! assert_almost_eq {
    ($left:expr, $right:expr, $max_error:expr $(,)?) => {
        match (&$left, &$right) {
            (left_val, right_val) => {
                let diff: f64 = (*left_val as f64 - *right_val as f64).abs();
                if !(diff <= $max_error as f64) {
                    panic!(
                        "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n max_error: `{:?}`",
                        left_val, right_val, $max_error
                    );
                }
            }
        }
    };
}

/// Asserts that two same-length slices of floats are element-wise equal within `max_error`.
#[macro_export]
macro_rules! assert_all_almost_eq {
    ($left:expr, $right:expr, $max_error:expr $(,)?) => {{
        let left_owned: Vec<f64> = $left.as_ref().to_vec();
        let right_owned: Vec<f64> = $right.as_ref().to_vec();
        assert_eq!(
            left_owned.len(),
            right_owned.len(),
            "slice length mismatch"
        );
        for (idx, (l, r)) in left_owned.iter().zip(right_owned.iter()).enumerate() {
            $crate::assert_almost_eq!(*l, *r, $max_error);
            let _ = idx;
        }
    }};
}
