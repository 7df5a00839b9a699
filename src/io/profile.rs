//! Write experimental profiles to JSON.
//!
//! The export is the portable form of what the evaluator compares against:
//! fit coefficients with their x mapping plus the endpoint and rate
//! descriptors. The schema is `domain::ProfileSummary`.

use std::fs::File;
use std::path::Path;

use crate::domain::ProfileSummary;
use crate::error::AppError;
use crate::objective::ExperimentalProfile;

/// Write all profiles as a pretty-printed JSON array.
pub fn write_profiles_json(path: &Path, profiles: &[ExperimentalProfile]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create profile JSON '{}': {e}", path.display())))?;
    let summaries: Vec<ProfileSummary> = profiles.iter().map(ExperimentalProfile::summary).collect();
    serde_json::to_writer_pretty(file, &summaries)
        .map_err(|e| AppError::io(format!("Failed to write profile JSON: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Curve, MinRateSource, TestCase};
    use crate::objective::build_profile;

    fn read_profiles_json(path: &Path) -> Vec<ProfileSummary> {
        let file = File::open(path).unwrap();
        serde_json::from_reader(file).unwrap()
    }

    #[test]
    fn written_profiles_read_back() {
        let x: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&t| 0.01 * t + 1e-4 * t * t).collect();
        let case = TestCase {
            name: "g1".to_string(),
            stress: 70.0,
            curve: Curve::new(x, y).unwrap(),
        };
        let profile = build_profile(&case, MinRateSource::FiniteDifference).unwrap();

        let path = std::env::temp_dir().join(format!("creep-calib-profiles-{}.json", std::process::id()));
        write_profiles_json(&path, std::slice::from_ref(&profile)).unwrap();
        let back = read_profiles_json(&path);
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].name, "g1");
        assert_eq!(back[0].coeffs.len(), 16);
        assert_eq!(back[0].min_rate_source, MinRateSource::FiniteDifference);
        assert_eq!(back[0].x_end, 29.0);
    }
}
