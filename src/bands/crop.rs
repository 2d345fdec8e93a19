//! Crop recommendation bands
//!
//! Score-range table mapping a soil health score to a list of suitable
//! crops. The default table mirrors the four long-standing score bands.

use super::BandRange;
use crate::error::{Result, SoilHealthError};
use serde::{Deserialize, Serialize};

pub const NO_CROP_RECOMMENDATION: &str =
    "No specific crop recommendation found for the given soil health score.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropBand {
    pub min_score: f64,
    /// `None` leaves the band open above
    pub max_score: Option<f64>,
    pub crops: String,
}

impl CropBand {
    pub fn new(min_score: f64, max_score: Option<f64>, crops: &str) -> Self {
        Self {
            min_score,
            max_score,
            crops: crops.to_string(),
        }
    }

    pub fn range(&self) -> BandRange {
        BandRange {
            min: self.min_score,
            max: self.max_score,
        }
    }
}

/// Ordered crop bands; the first matching band wins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CropBand>", into = "Vec<CropBand>")]
pub struct CropBands {
    bands: Vec<CropBand>,
}

impl CropBands {
    pub fn new(bands: Vec<CropBand>) -> Result<Self> {
        if bands.is_empty() {
            return Err(SoilHealthError::configuration("crop band table is empty"));
        }
        for (i, band) in bands.iter().enumerate() {
            band.range().validate(&format!("crop band {i}"))?;
        }
        Ok(Self { bands })
    }

    pub fn bands(&self) -> &[CropBand] {
        &self.bands
    }

    pub fn lookup(&self, score: f64) -> Option<&CropBand> {
        self.bands.iter().find(|band| band.range().contains(score))
    }

    /// Crop list for a score, or the fallback text when no band matches
    pub fn recommend(&self, score: f64) -> &str {
        match self.lookup(score) {
            Some(band) => &band.crops,
            None => {
                tracing::warn!("No crop band covers score {:.4}", score);
                NO_CROP_RECOMMENDATION
            }
        }
    }
}

impl Default for CropBands {
    fn default() -> Self {
        Self {
            bands: vec![
                CropBand::new(0.0, Some(0.4), "Green Manure Crops, Legumes, Cowpea, Sesbania"),
                CropBand::new(0.4, Some(0.6), "Millets(Pearl Millet, Sorghum), Maize, Soybean, Groundnut"),
                CropBand::new(0.6, Some(0.8), "Rice, Wheat, Cotton, Sugarcane, Mustard, Sunflower"),
                CropBand::new(0.8, None, "Vegetables, Fruits, Spices, Pulses, Oilseeds"),
            ],
        }
    }
}

impl TryFrom<Vec<CropBand>> for CropBands {
    type Error = SoilHealthError;

    fn try_from(bands: Vec<CropBand>) -> Result<Self> {
        Self::new(bands)
    }
}

impl From<CropBands> for Vec<CropBand> {
    fn from(table: CropBands) -> Self {
        table.bands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bands() {
        let bands = CropBands::default();
        assert_eq!(bands.recommend(0.0), "Green Manure Crops, Legumes, Cowpea, Sesbania");
        assert_eq!(bands.recommend(0.3999), "Green Manure Crops, Legumes, Cowpea, Sesbania");
        assert_eq!(
            bands.recommend(0.4),
            "Millets(Pearl Millet, Sorghum), Maize, Soybean, Groundnut"
        );
        assert_eq!(bands.recommend(0.7), "Rice, Wheat, Cotton, Sugarcane, Mustard, Sunflower");
        assert_eq!(bands.recommend(0.8), "Vegetables, Fruits, Spices, Pulses, Oilseeds");
        assert_eq!(bands.recommend(1.0), "Vegetables, Fruits, Spices, Pulses, Oilseeds");
    }

    #[test]
    fn test_first_match_wins() {
        let bands = CropBands::new(vec![
            CropBand::new(0.0, Some(0.5), "first"),
            CropBand::new(0.2, Some(1.0), "second"),
        ])
        .unwrap();
        assert_eq!(bands.recommend(0.3), "first");
        assert_eq!(bands.recommend(0.5), "second");
    }

    #[test]
    fn test_gap_falls_back() {
        let bands = CropBands::new(vec![
            CropBand::new(0.0, Some(0.4), "low"),
            CropBand::new(0.6, None, "high"),
        ])
        .unwrap();
        assert_eq!(bands.recommend(0.5), NO_CROP_RECOMMENDATION);
        assert!(bands.lookup(0.5).is_none());
    }

    #[test]
    fn test_rejects_malformed_tables() {
        assert!(CropBands::new(Vec::new()).is_err());
        assert!(CropBands::new(vec![CropBand::new(0.5, Some(0.5), "empty")]).is_err());
    }

    #[test]
    fn test_json_shape() {
        let json = r#"[
            {"min_score": 0.0, "max_score": 0.5, "crops": "Cowpea"},
            {"min_score": 0.5, "max_score": null, "crops": "Rice"}
        ]"#;
        let bands: CropBands = serde_json::from_str(json).unwrap();
        assert_eq!(bands.recommend(0.75), "Rice");
    }
}
