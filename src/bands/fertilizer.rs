//! Fertilizer recommendation table
//!
//! Keyed by raw indicator values, not by the composite score: a row matches
//! when every one of the 8 values lies inside that row's window. Rows are
//! tried in order and the first match wins.
//!
//! Default ordering: strongly acidic, single-indicator deficiencies,
//! alkaline, saline, the balanced "High" row, slightly alkaline, then a
//! "Medium" catch-all that covers every sample. Deficiency and alkaline
//! windows line up with the fertility bins, so the matched row's class
//! equals `classify_fertility` for every sample.

use super::fertility::FertilityClass;
use super::BandRange;
use crate::error::{Result, SoilHealthError};
use crate::indicators::{Indicator, IndicatorValues, PartialIndicatorValues, INDICATOR_COUNT};
use serde::{Deserialize, Serialize};

pub const NO_FERTILIZER_RECOMMENDATION: &str =
    "No specific fertilizer recommendation found for the given soil health indicators.";

const LIME: &str = "Apply lime (e.g., calcium carbonate) at a rate of 1-2 t/ha to increase soil pH. \
    Use nitrogen-rich fertilizers (e.g., urea, ammonium sulfate) at a rate of 40-60 kg/ha. \
    Include phosphorus fertilizers (e.g., single superphosphate, diammonium phosphate) at a rate of 20-30 kg/ha.";

const NPK_MODERATE: &str = "Apply nitrogen-rich fertilizers (e.g., urea, ammonium sulfate) at a rate of 60-80 kg/ha. \
    Include phosphorus fertilizers (e.g., single superphosphate, diammonium phosphate) at a rate of 30-40 kg/ha \
    and potassium fertilizers (e.g., muriate of potash, potassium sulfate) at a rate of 40-60 kg/ha.";

const NPK_BALANCED: &str = "Apply balanced NPK fertilizers (e.g., 15-15-15, 19-19-19) at a rate of 125-175 kg/ha. \
    Consider fertigation or foliar application for precise nutrient management. \
    Include micronutrients (e.g., zinc, boron) based on soil test results.";

const REDUCE_NITROGEN: &str = "Reduce nitrogen application to 40-60 kg/ha and focus on balanced fertilization. \
    Apply potassium fertilizers (e.g., muriate of potash, potassium sulfate) at a rate of 60-80 kg/ha. \
    Consider organic amendments (e.g., compost, vermicompost) to improve soil structure and fertility.";

const ALKALINE: &str = "Avoid applying nitrogenous fertilizers due to high pH levels. \
    Focus on soil amendments such as gypsum (1-2 t/ha), sulfur (100-200 kg/ha), or organic matter to improve soil conditions. \
    Apply potassium fertilizers (e.g., muriate of potash, potassium sulfate) at a rate of 80-100 kg/ha.";

const SALINE: &str = "Soil highly alkaline and saline. Avoid applying fertilizers. \
    Focus on soil reclamation using gypsum (2-4 t/ha), sulfur (200-400 kg/ha), and organic amendments. \
    Consult with local agriculture experts for specific recommendations based on crop and soil type.";

/// EC from which a sample is treated as saline (dS/m)
pub const SALINE_EC: f64 = 2.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerRow {
    pub class: FertilityClass,
    pub label: String,
    /// One window per indicator, registry order
    pub windows: [BandRange; INDICATOR_COUNT],
    pub recommendation: String,
}

impl FertilizerRow {
    pub fn new(
        class: FertilityClass,
        label: &str,
        windows: [BandRange; INDICATOR_COUNT],
        recommendation: &str,
    ) -> Self {
        Self {
            class,
            label: label.to_string(),
            windows,
            recommendation: recommendation.to_string(),
        }
    }

    /// Row that only constrains one indicator
    fn single(
        class: FertilityClass,
        label: &str,
        indicator: Indicator,
        window: BandRange,
        recommendation: &str,
    ) -> Self {
        let mut windows = [BandRange::ANY; INDICATOR_COUNT];
        windows[indicator.index()] = window;
        Self::new(class, label, windows, recommendation)
    }

    pub fn window(&self, indicator: Indicator) -> BandRange {
        self.windows[indicator.index()]
    }

    pub fn matches(&self, values: &IndicatorValues) -> bool {
        self.windows
            .iter()
            .zip(values.iter())
            .all(|(window, &value)| window.contains(value))
    }

    /// Like `matches`, for samples with absent readings
    ///
    /// An absent reading only satisfies an unconstrained window, so a row
    /// that keys on a missing indicator never matches.
    pub fn matches_partial(&self, values: &PartialIndicatorValues) -> bool {
        self.windows
            .iter()
            .zip(values.iter())
            .all(|(window, value)| match value {
                Some(v) => window.contains(*v),
                None => window.is_unbounded(),
            })
    }
}

/// Ordered fertilizer rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FertilizerRow>", into = "Vec<FertilizerRow>")]
pub struct FertilizerTable {
    rows: Vec<FertilizerRow>,
}

impl FertilizerTable {
    pub fn new(rows: Vec<FertilizerRow>) -> Result<Self> {
        if rows.is_empty() {
            return Err(SoilHealthError::configuration("fertilizer table is empty"));
        }
        for (i, row) in rows.iter().enumerate() {
            for indicator in Indicator::ALL {
                row.window(indicator).validate(&format!(
                    "fertilizer row {} ({}) {} window",
                    i,
                    row.label,
                    indicator.key()
                ))?;
            }
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[FertilizerRow] {
        &self.rows
    }

    pub fn lookup(&self, values: &IndicatorValues) -> Option<&FertilizerRow> {
        self.rows.iter().find(|row| row.matches(values))
    }

    /// Recommendation text, or the fallback when no row matches
    pub fn recommend(&self, values: &IndicatorValues) -> &str {
        match self.lookup(values) {
            Some(row) => &row.recommendation,
            None => {
                tracing::warn!("No fertilizer row covers sample {:?}", values);
                NO_FERTILIZER_RECOMMENDATION
            }
        }
    }

    pub fn lookup_partial(&self, values: &PartialIndicatorValues) -> Option<&FertilizerRow> {
        self.rows.iter().find(|row| row.matches_partial(values))
    }

    pub fn recommend_partial(&self, values: &PartialIndicatorValues) -> &str {
        match self.lookup_partial(values) {
            Some(row) => &row.recommendation,
            None => {
                tracing::warn!("No fertilizer row covers partial sample {:?}", values);
                NO_FERTILIZER_RECOMMENDATION
            }
        }
    }
}

impl Default for FertilizerTable {
    fn default() -> Self {
        use FertilityClass::{High, Low, Medium};

        let rows = vec![
            FertilizerRow::single(Low, "Strongly acidic", Indicator::Ph, BandRange::below(5.5), LIME),
            FertilizerRow::single(
                Low,
                "Nitrogen deficient",
                Indicator::Nitrogen,
                BandRange::below(100.0),
                NPK_MODERATE,
            ),
            FertilizerRow::single(
                Low,
                "Phosphorus deficient",
                Indicator::Phosphorus,
                BandRange::below(10.0),
                NPK_MODERATE,
            ),
            FertilizerRow::single(
                Low,
                "Potassium deficient",
                Indicator::Potassium,
                BandRange::below(50.0),
                NPK_MODERATE,
            ),
            FertilizerRow::single(
                Low,
                "Low soluble salts",
                Indicator::ElectricalConductivity,
                BandRange::below(0.5),
                NPK_MODERATE,
            ),
            FertilizerRow::single(
                Low,
                "Cool soil",
                Indicator::Temperature,
                BandRange::below(20.0),
                NPK_MODERATE,
            ),
            FertilizerRow::single(Low, "Dry soil", Indicator::Moisture, BandRange::below(30.0), NPK_MODERATE),
            FertilizerRow::single(Low, "Dry air", Indicator::Humidity, BandRange::below(30.0), NPK_MODERATE),
            FertilizerRow::single(Low, "Alkaline", Indicator::Ph, BandRange::at_least(8.5), ALKALINE),
            // No Low condition holds past this point, so these rows are Medium
            FertilizerRow::single(
                Medium,
                "Saline",
                Indicator::ElectricalConductivity,
                BandRange::at_least(SALINE_EC),
                SALINE,
            ),
            FertilizerRow::new(
                High,
                "Balanced and fertile",
                [
                    BandRange::new(6.5, 7.5),
                    BandRange::new(150.0, 200.0),
                    BandRange::new(20.0, 30.0),
                    BandRange::new(100.0, 150.0),
                    BandRange::new(1.0, 1.5),
                    BandRange::new(25.0, 30.0),
                    BandRange::new(50.0, 70.0),
                    BandRange::new(50.0, 70.0),
                ],
                NPK_BALANCED,
            ),
            FertilizerRow::single(
                Medium,
                "Slightly alkaline",
                Indicator::Ph,
                BandRange::new(7.5, 8.5),
                REDUCE_NITROGEN,
            ),
            FertilizerRow::new(
                Medium,
                "Moderately fertile",
                [BandRange::ANY; INDICATOR_COUNT],
                NPK_MODERATE,
            ),
        ];

        Self { rows }
    }
}

impl TryFrom<Vec<FertilizerRow>> for FertilizerTable {
    type Error = SoilHealthError;

    fn try_from(rows: Vec<FertilizerRow>) -> Result<Self> {
        Self::new(rows)
    }
}

impl From<FertilizerTable> for Vec<FertilizerRow> {
    fn from(table: FertilizerTable) -> Self {
        table.rows
    }
}
