/// Converts a condition score (0–100) into the PMIS condition class.
///
/// | Range       | Class     |
/// |-------------|-----------|
/// | >= 90       | Very Good |
/// | >= 70       | Good      |
/// | >= 50       | Fair      |
/// | >= 35       | Poor      |
/// | < 35        | Very Poor |
pub fn condition_class(score: f64) -> String {
    match score {
        s if s >= 90.0 => "Very Good".into(),
        s if s >= 70.0 => "Good".into(),
        s if s >= 50.0 => "Fair".into(),
        s if s >= 35.0 => "Poor".into(),
        _ => "Very Poor".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_class_boundaries() {
        assert_eq!(condition_class(100.0), "Very Good");
        assert_eq!(condition_class(90.0), "Very Good");
        assert_eq!(condition_class(89.9), "Good");
        assert_eq!(condition_class(70.0), "Good");
        assert_eq!(condition_class(69.9), "Fair");
        assert_eq!(condition_class(50.0), "Fair");
        assert_eq!(condition_class(49.9), "Poor");
        assert_eq!(condition_class(35.0), "Poor");
        assert_eq!(condition_class(34.9), "Very Poor");
        assert_eq!(condition_class(0.0), "Very Poor");
    }
}
