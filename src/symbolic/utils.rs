/// `num_values` evenly spaced points from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    match num_values {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num_values as f64 - 1.0);
            (0..num_values).map(|i| start + i as f64 * step).collect()
        }
    }
}

/*
    central differences of f(u, v) at a point
    let grad = numerical_derivative_multi(|p: &[f64]| p[0] * p[1], &[1.0, 2.0], 1e-6);
*/
pub fn numerical_derivative_multi<F>(f: F, x_values: &[f64], h: f64) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let mut derivatives = Vec::with_capacity(x_values.len());
    for i in 0..x_values.len() {
        let mut x_plus_h = x_values.to_vec();
        let mut x_minus_h = x_values.to_vec();

        x_plus_h[i] += h;
        x_minus_h[i] -= h;

        let derivative = (f(&x_plus_h) - f(&x_minus_h)) / (2.0 * h);
        derivatives.push(derivative);
    }

    derivatives
}

/// largest absolute componentwise difference of two equally long vectors
pub fn max_abs_diff(x: &[f64], y: &[f64]) -> f64 {
    assert_eq!(x.len(), y.len());
    x.iter()
        .zip(y.iter())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max)
}
