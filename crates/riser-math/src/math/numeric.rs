//! Numerical primitives shared by the PDF, density and range modules.

/// Trapezoidal integral of `y` over the sample points `x`.
///
/// Extra elements in the longer slice are ignored.
pub fn trapezoid(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| 0.5 * (xs[1] - xs[0]) * (ys[0] + ys[1]))
        .sum()
}

/// Running trapezoidal integral, starting at 0 for the first point.
pub fn cumulative_trapezoid(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len().min(y.len());
    let mut out = Vec::with_capacity(n);
    if n == 0 {
        return out;
    }
    let mut running = 0.0;
    out.push(running);
    for i in 1..n {
        running += 0.5 * (x[i] - x[i - 1]) * (y[i] + y[i - 1]);
        out.push(running);
    }
    out
}

/// `count` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            // Pin the end point so callers can rely on it exactly.
            values[count - 1] = end;
            values
        }
    }
}

/// Linear interpolation of `(xs, ys)` at `x`.
///
/// `xs` must be sorted ascending. Points outside `[xs[0], xs[last]]`
/// (and NaN) evaluate to `outside`.
pub fn interp(x: f64, xs: &[f64], ys: &[f64], outside: f64) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return outside;
    }
    let upper = xs[..n].partition_point(|&v| v <= x);
    if upper == 0 {
        return outside;
    }
    if upper == n {
        return if x == xs[n - 1] { ys[n - 1] } else { outside };
    }
    let lower = upper - 1;
    let t = (x - xs[lower]) / (xs[upper] - xs[lower]);
    ys[lower] + t * (ys[upper] - ys[lower])
}

/// Quantile of an ascending-sorted sample using linear interpolation
/// between closest ranks.
///
/// Returns NaN for an empty sample.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() || q.is_nan() {
        return f64::NAN;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + frac * (sorted[upper] - sorted[lower])
}

/// Arithmetic mean. NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator). Zero for fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}
