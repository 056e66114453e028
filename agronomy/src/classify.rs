//! Status classification of readings against target ranges.
//!
//! Pure comparisons with no hidden state: the same value and range always
//! produce the same status.

use crate::types::{NutrientStatus, Range, RangeRecord, Reading, StatusEntry};

/// Classify one measured value against its target range.
///
/// Bounds are inclusive: a value sitting exactly on `min` or `max` is
/// `Adequate`. Returns `None` for non-finite values (NaN, infinities), which
/// are excluded from classification rather than forced into a status.
pub fn classify(value: f64, range: &Range) -> Option<NutrientStatus> {
    if !value.is_finite() {
        return None;
    }
    Some(if value < range.min {
        NutrientStatus::Deficient
    } else if value > range.max {
        NutrientStatus::Excess
    } else {
        NutrientStatus::Adequate
    })
}

/// Classify a full reading against a target record.
///
/// Parameters are excluded entirely when the record has no target for them
/// or the measured value is not finite; absence from the result means
/// "insufficient data", which callers must keep distinct from any of the
/// three statuses. Entries come back in parameter display order.
pub fn classify_reading(reading: &Reading, record: &RangeRecord) -> Vec<StatusEntry> {
    reading
        .iter()
        .filter_map(|(parameter, value)| {
            let range = record.get(parameter)?;
            let status = classify(value, &range)?;
            Some(StatusEntry {
                parameter,
                value,
                range,
                status,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParameterKey;

    #[test]
    fn test_boundaries_are_adequate() {
        let range = Range::new(6.0, 7.5);
        assert_eq!(classify(6.0, &range), Some(NutrientStatus::Adequate));
        assert_eq!(classify(7.5, &range), Some(NutrientStatus::Adequate));
    }

    #[test]
    fn test_epsilon_outside_bounds() {
        let range = Range::new(6.0, 7.5);
        assert_eq!(classify(5.9999, &range), Some(NutrientStatus::Deficient));
        assert_eq!(classify(7.5001, &range), Some(NutrientStatus::Excess));
    }

    #[test]
    fn test_non_finite_values_are_excluded() {
        let range = Range::new(0.0, 100.0);
        assert_eq!(classify(f64::NAN, &range), None);
        assert_eq!(classify(f64::INFINITY, &range), None);
        assert_eq!(classify(f64::NEG_INFINITY, &range), None);
    }

    #[test]
    fn test_reading_classification_excludes_unknown_parameters() {
        let record = RangeRecord::new()
            .with(ParameterKey::Ph, 6.0, 7.5)
            .with(ParameterKey::Moisture, 55.0, 65.0);

        let reading = Reading::new()
            .with(ParameterKey::Ph, 5.2)
            .with(ParameterKey::Moisture, 60.0)
            // No target range for nitrogen in the record
            .with(ParameterKey::Nitrogen, 140.0)
            // Malformed sensor value
            .with(ParameterKey::Potassium, f64::NAN);

        let entries = classify_reading(&reading, &record);
        assert_eq!(entries.len(), 2);

        let ph = entries.iter().find(|e| e.parameter == ParameterKey::Ph).unwrap();
        assert_eq!(ph.status, NutrientStatus::Deficient);

        let moisture = entries
            .iter()
            .find(|e| e.parameter == ParameterKey::Moisture)
            .unwrap();
        assert_eq!(moisture.status, NutrientStatus::Adequate);

        assert!(!entries.iter().any(|e| e.parameter == ParameterKey::Nitrogen));
        assert!(!entries.iter().any(|e| e.parameter == ParameterKey::Potassium));
    }

    #[test]
    fn test_classification_is_deterministic() {
        let range = Range::new(800.0, 2200.0);
        for _ in 0..10 {
            assert_eq!(classify(2500.0, &range), Some(NutrientStatus::Excess));
        }
    }
}
