//! Least-squares trend line

/// `y = slope * x + y_intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendLine {
    pub slope: f64,
    pub y_intercept: f64,
}

/// Fits the ordinary least-squares line through `points`
///
/// Returns `None` for fewer than two points or when every x is equal, where
/// the slope is undefined.
pub fn fit_trend_line(points: &[[f32; 2]]) -> Option<TrendLine> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xx, mut sum_xy) = (0.0, 0.0, 0.0, 0.0);
    for [x, y] in points {
        let (x, y) = (f64::from(*x), f64::from(*y));
        sum_x += x;
        sum_y += y;
        sum_xx += x * x;
        sum_xy += x * y;
    }

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator.abs() < f64::EPSILON {
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let y_intercept = (sum_y - slope * sum_x) / n;
    Some(TrendLine { slope, y_intercept })
}
