//! Min–max scaling of a single numeric column.

/// Scales `values` into `[0, 1]` using the column's own minimum and maximum.
///
/// A column with zero range (all values equal, or fewer than two values) is
/// returned unchanged. The input is treated as fully present: callers filter
/// missing values first.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let Some((min, max)) = bounds(values) else {
        return Vec::new();
    };

    let range = max - min;
    if range == 0.0 {
        return values.to_vec();
    }

    if range.is_finite() {
        return values.iter().map(|v| (v - min) / range).collect();
    }

    // Span wider than f64::MAX: halve everything first so the range stays finite.
    let (lo, hi) = (min / 2.0, max / 2.0);
    let half_range = hi - lo;
    values
        .iter()
        .map(|v| ((v / 2.0 - lo) / half_range).clamp(0.0, 1.0))
        .collect()
}

fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn single_value_passes_through() {
        assert_eq!(normalize(&[42.5]), vec![42.5]);
    }

    #[test]
    fn constant_column_passes_through_unchanged() {
        assert_eq!(normalize(&[3.0, 3.0, 3.0]), vec![3.0, 3.0, 3.0]);
        assert_eq!(normalize(&[5.0, 5.0]), vec![5.0, 5.0]);
    }

    #[test]
    fn scales_min_to_zero_and_max_to_one() {
        let out = normalize(&[10.0, 5.0, 7.5]);
        assert_eq!(out, vec![1.0, 0.0, 0.5]);
    }

    #[test]
    fn negative_values_are_scaled() {
        let out = normalize(&[-4.0, 0.0, 4.0]);
        assert_eq!(out, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn span_wider_than_f64_max_stays_finite() {
        let out = normalize(&[-1e308, 0.0, 1e308]);
        assert_eq!(out, vec![0.0, 0.5, 1.0]);

        let out = normalize(&[f64::MAX, -f64::MAX, 0.0]);
        assert_eq!(out, vec![1.0, 0.0, 0.5]);
    }

    #[test]
    fn output_stays_within_unit_interval() {
        let columns: [&[f64]; 6] = [
            &[0.001, 1e9, 17.0, 3.3],
            &[-1e6, -1e6 + 1.0],
            &[2.0, 1.0, 2.0, 1.0, 1.5],
            &[0.1, 0.2, 0.30000000000000004, 0.3],
            &[-1e308, 0.0, 1e308],
            &[f64::MAX, -f64::MAX],
        ];
        for column in columns {
            let out = normalize(column);
            assert_eq!(out.len(), column.len());
            assert!(
                out.iter().all(|v| (0.0..=1.0).contains(v)),
                "out of range for {column:?}: {out:?}"
            );
            assert!(out.contains(&0.0) && out.contains(&1.0), "{out:?}");
        }
    }
}
