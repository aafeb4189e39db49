/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Divides a distress count by surveyed miles. Undefined (`None`) when no
/// length was surveyed.
pub fn per_mile(quantity: u64, miles: f64) -> Option<f64> {
    if miles > 0.0 {
        Some(quantity as f64 / miles)
    } else {
        None
    }
}

/// Largest present value, skipping gaps.
pub fn max_present(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    values.into_iter().flatten().reduce(f64::max)
}
