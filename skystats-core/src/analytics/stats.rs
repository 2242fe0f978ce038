//! Small numeric helpers shared by the analytics modules.

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (divisor `n`, not `n - 1`). `None` for an empty slice.
pub fn population_variance(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let sum_sq = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>();
    Some(sum_sq / values.len() as f64)
}

/// Ordinary least squares slope of `values` against their ordinal index
/// (0, 1, 2, ...). `None` with fewer than two points.
///
/// Regressing on the index rather than calendar distance keeps the slope
/// stable across sparse series with missing days.
pub fn ols_slope(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let n_f = n as f64;
    let x_mean = (n_f - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n_f;

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }

    Some(num / den)
}

/// Pearson correlation coefficient over paired samples.
///
/// `None` with fewer than two pairs, or when either series is constant
/// (zero variance makes the coefficient undefined).
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }

    let x_mean = xs[..n].iter().sum::<f64>() / n as f64;
    let y_mean = ys[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = xs[i] - x_mean;
        let dy = ys[i] - y_mean;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
        assert!(close(mean(&[20.0, 24.0]).unwrap(), 22.0));
    }

    #[test]
    fn population_variance_uses_n_divisor() {
        // values 2, 4, 6: mean 4, squared deviations 4+0+4, variance 8/3
        let v = population_variance(&[2.0, 4.0, 6.0]).unwrap();
        assert!(close(v, 8.0 / 3.0));
        assert!(close(population_variance(&[5.0]).unwrap(), 0.0));
        assert_eq!(population_variance(&[]), None);
    }

    #[test]
    fn slope_of_linear_series_is_exact() {
        let slope = ols_slope(&[10.0, 11.0, 12.0, 13.0]).unwrap();
        assert!(close(slope, 1.0));

        let slope = ols_slope(&[19.0, 17.0, 15.0]).unwrap();
        assert!(close(slope, -2.0));

        assert!(close(ols_slope(&[7.0, 7.0, 7.0]).unwrap(), 0.0));
    }

    #[test]
    fn slope_needs_two_points() {
        assert_eq!(ols_slope(&[]), None);
        assert_eq!(ols_slope(&[1.0]), None);
    }

    #[test]
    fn pearson_detects_sign() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let up = [2.0, 4.0, 6.0, 8.0];
        let down = [8.0, 6.0, 4.0, 2.0];

        assert!(close(pearson(&xs, &up).unwrap(), 1.0));
        assert!(close(pearson(&xs, &down).unwrap(), -1.0));
    }

    #[test]
    fn pearson_undefined_for_constant_series() {
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[2.0, 3.0, 4.0]), None);
        assert_eq!(pearson(&[1.0], &[2.0]), None);
    }
}
