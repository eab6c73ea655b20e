//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Crops offered by the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CropType {
    #[default]
    Wheat,
    Rice,
    Maize,
    Soybean,
}

impl CropType {
    pub const ALL: [CropType; 4] = [
        CropType::Wheat,
        CropType::Rice,
        CropType::Maize,
        CropType::Soybean,
    ];
}

impl std::fmt::Display for CropType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CropType::Wheat => write!(f, "Wheat"),
            CropType::Rice => write!(f, "Rice"),
            CropType::Maize => write!(f, "Maize"),
            CropType::Soybean => write!(f, "Soybean"),
        }
    }
}

/// Display severity of an advisory line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Act now
    Critical,
    /// Act soon or monitor closely
    Warning,
    /// Nothing to do
    Ok,
}

/// Round half away from zero to `places` decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// `count` evenly spaced values over `[start, end]`, both ends included
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_two_places() {
        assert_eq!(round_to(3.14159, 2), 3.14);
        assert_eq!(round_to(2.0, 2), 2.0);
        assert_eq!(round_to(-1.006, 2), -1.01);
    }

    #[test]
    fn test_linspace_includes_both_ends() {
        let points = linspace(0.0, 500.0, 20);
        assert_eq!(points.len(), 20);
        assert_eq!(points[0], 0.0);
        assert_eq!(points[19], 500.0);
        assert!((points[1] - 500.0 / 19.0).abs() < 1e-9);
    }

    #[test]
    fn test_linspace_degenerate_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
    }
}
