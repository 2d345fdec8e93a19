//! Configuration loading for soil health assessment
//!
//! Everything here is optional: an empty `AssessmentConfig` yields the
//! embedded expert matrix, indicator registry and band tables.
//!
//! Formats:
//! - JSON (`AssessmentConfig::load`): any subset of the overridable tables
//! - CSV via Polars: crop bands (`min_score,max_score,crops`) and fertilizer
//!   rows (`class,label,<key>_min,<key>_max × 8,recommendation`). An empty
//!   min cell leaves the window open below, an empty max cell open above.

use crate::bands::{BandRange, CropBand, CropBands, FertilityClass, FertilizerRow, FertilizerTable};
use crate::fahp::FuzzyComparisonMatrix;
use crate::indicators::{Indicator, IndicatorRegistry, INDICATOR_COUNT};
use crate::scorer::MissingIndicatorPolicy;
use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Optional overrides for the embedded defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentConfig {
    pub indicators: Option<IndicatorRegistry>,
    pub comparison_matrix: Option<FuzzyComparisonMatrix>,
    pub crop_bands: Option<CropBands>,
    pub fertilizer_rows: Option<FertilizerTable>,
    pub missing_policy: Option<MissingIndicatorPolicy>,
}

impl AssessmentConfig {
    /// Load config from JSON file
    ///
    /// Tables are validated while parsing, so a malformed matrix or band
    /// table fails here rather than at assessment time.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read assessment config: {:?}", path))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse assessment config JSON: {:?}", path))
    }

    pub fn with_crop_bands_csv(mut self, path: &Path) -> Result<Self> {
        self.crop_bands = Some(load_crop_bands_csv(path)?);
        Ok(self)
    }

    pub fn with_fertilizer_csv(mut self, path: &Path) -> Result<Self> {
        self.fertilizer_rows = Some(load_fertilizer_table_csv(path)?);
        Ok(self)
    }
}

/// Load crop bands from CSV
///
/// Columns: min_score, max_score (empty = unbounded), crops
pub fn load_crop_bands_csv(path: &Path) -> Result<CropBands> {
    let df = read_csv(path)?;
    let min_scores = f64_column(&df, "min_score")?;
    let max_scores = f64_column(&df, "max_score")?;
    let crops = df
        .column("crops")
        .with_context(|| "Column 'crops' not found")?
        .str()
        .with_context(|| "Column 'crops' is not string type")?;

    let mut bands = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let min_score = min_scores
            .get(idx)
            .with_context(|| format!("Crop band row {}: min_score is empty", idx))?;
        let crop_list = crops
            .get(idx)
            .with_context(|| format!("Crop band row {}: crops is empty", idx))?;
        bands.push(CropBand::new(min_score, max_scores.get(idx), crop_list));
    }

    let table = CropBands::new(bands)
        .with_context(|| format!("Invalid crop band table: {:?}", path))?;
    tracing::info!("Loaded {} crop bands from {:?}", table.bands().len(), path);
    Ok(table)
}

/// Load fertilizer rows from CSV
///
/// Columns: class (Low/Medium/High), label, `<key>_min` and `<key>_max` for
/// every indicator key, recommendation
pub fn load_fertilizer_table_csv(path: &Path) -> Result<FertilizerTable> {
    let df = read_csv(path)?;
    let classes = df
        .column("class")
        .with_context(|| "Column 'class' not found")?
        .str()
        .with_context(|| "Column 'class' is not string type")?;
    let labels = df
        .column("label")
        .with_context(|| "Column 'label' not found")?
        .str()
        .with_context(|| "Column 'label' is not string type")?;
    let recommendations = df
        .column("recommendation")
        .with_context(|| "Column 'recommendation' not found")?
        .str()
        .with_context(|| "Column 'recommendation' is not string type")?;

    let mut window_columns = Vec::with_capacity(INDICATOR_COUNT);
    for indicator in Indicator::ALL {
        let min = f64_column(&df, &format!("{}_min", indicator.key()))?;
        let max = f64_column(&df, &format!("{}_max", indicator.key()))?;
        window_columns.push((min, max));
    }

    let mut rows = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let class_label = classes.get(idx).unwrap_or("");
        let class = FertilityClass::parse(class_label).with_context(|| {
            format!("Fertilizer row {}: unknown fertility class '{}'", idx, class_label)
        })?;

        let mut windows = [BandRange::ANY; INDICATOR_COUNT];
        for (i, (min, max)) in window_columns.iter().enumerate() {
            // Empty min means the window is open below
            windows[i] = BandRange {
                min: min.get(idx).unwrap_or(f64::NEG_INFINITY),
                max: max.get(idx),
            };
        }

        rows.push(FertilizerRow::new(
            class,
            labels.get(idx).unwrap_or(""),
            windows,
            recommendations.get(idx).unwrap_or(""),
        ));
    }

    let table = FertilizerTable::new(rows)
        .with_context(|| format!("Invalid fertilizer table: {:?}", path))?;
    tracing::info!("Loaded {} fertilizer rows from {:?}", table.rows().len(), path);
    Ok(table)
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.into()))
        .with_context(|| format!("Failed to create CSV reader: {:?}", path))?
        .finish()
        .with_context(|| format!("Failed to load CSV: {:?}", path))
}

/// Numeric column as f64; an all-empty column parses as string and casts to nulls
fn f64_column(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{}' is not numeric", name))?;
    Ok(column.f64()?.clone())
}
