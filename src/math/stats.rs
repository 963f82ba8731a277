//! Small summary statistics used by the optimisers.

/// Mean and population standard deviation.
///
/// Returns `None` for an empty slice.
pub fn mean_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    Some((mean, var.sqrt()))
}

/// Index of the smallest finite value; ties resolve to the lowest index.
pub fn argmin(values: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            continue;
        }
        match best {
            Some(b) if values[b] <= v => {}
            _ => best = Some(i),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_std_basic() {
        let (m, s) = mean_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((m - 5.0).abs() < 1e-12);
        assert!((s - 2.0).abs() < 1e-12);
        assert!(mean_std(&[]).is_none());
    }

    #[test]
    fn argmin_skips_non_finite_and_keeps_first_tie() {
        assert_eq!(argmin(&[f64::NAN, 3.0, 1.0, 1.0, f64::INFINITY]), Some(2));
        assert_eq!(argmin(&[f64::INFINITY]), None);
    }
}
