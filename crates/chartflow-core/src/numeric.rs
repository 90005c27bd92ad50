//! Small numeric helpers shared by sources, aggregators and publishers

/// Round half away from zero to a fixed number of decimals
///
/// ```
/// use chartflow_core::numeric::round_to;
/// assert_eq!(round_to(74.059999, 2), 74.06);
/// assert_eq!(round_to(-2.345, 1), -2.3);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// `n` evenly spaced values from `start` to `end`, both inclusive
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Format a number for serialization
///
/// With a precision the value is printed with exactly that many decimals,
/// otherwise the shortest representation that round-trips is used.
pub fn format_number(value: f64, decimals: Option<u32>) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    match decimals {
        Some(d) => format!("{:.*}", d as usize, value),
        None => format!("{value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(74.06, 2), 74.06);
        assert_eq!(round_to(10.939999999, 2), 10.94);
        assert_eq!(round_to(523.4, 0), 523.0);
        assert!(round_to(f64::NAN, 2).is_nan());
    }

    #[test]
    fn test_linspace() {
        let xs = linspace(0.0, 10.0, 5);
        assert_eq!(xs.len(), 5);
        assert_abs_diff_eq!(xs[1], 2.5, epsilon = 1e-12);
        assert_eq!(xs[4], 10.0);

        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(0.9, 0.1, 1), vec![0.9]);

        let down = linspace(0.9, 0.1, 3);
        assert_abs_diff_eq!(down[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(12.0, Some(1)), "12.0");
        assert_eq!(format_number(523.0, Some(0)), "523");
        assert_eq!(format_number(72.26, None), "72.26");
        assert_eq!(format_number(100.0, None), "100");
        assert_eq!(format_number(f64::NAN, Some(3)), "NaN");
    }
}
