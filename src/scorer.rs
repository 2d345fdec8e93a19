//! Soil Health Assessor - Main coordinator for scoring soil samples
//!
//! Pipeline per sample:
//! 1. Range validation against the indicator registry
//! 2. Min-max normalization
//! 3. Weighted sum with the FAHP weight vector
//! 4. Rating, crop and fertilizer lookups
//!
//! Weights, the consistency diagnostic and the band tables are computed or
//! validated once in the constructor and never mutated afterwards, so one
//! assessor can be shared across threads. Includes both sequential and
//! parallel (Rayon) batch implementations.

use crate::bands::{classify_fertility, CropBands, FertilityClass, FertilizerTable, Rating};
use crate::data::AssessmentConfig;
use crate::error::{ConsistencyCheckUnavailable, Result, SoilHealthError};
use crate::fahp::{
    check_consistency, derive_weights, ConsistencyReport, FahpBreakdown, FuzzyComparisonMatrix,
    TriangularFuzzyNumber, WeightVector,
};
use crate::indicators::{
    Indicator, IndicatorRegistry, IndicatorValues, PartialIndicatorValues, INDICATOR_COUNT,
};
use crate::utils::normalization::{normalize, normalize_value, NormalizedValues};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Composite soil health score: Σ weight[i] × normalized[i]
///
/// Lies in [0, 1] whenever every normalized value does.
pub fn score(normalized: &NormalizedValues, weights: &WeightVector) -> f64 {
    weighted_sum(normalized, weights.as_array())
}

fn weighted_sum(normalized: &NormalizedValues, weights: &[f64; INDICATOR_COUNT]) -> f64 {
    normalized
        .iter()
        .zip(weights.iter())
        .map(|(n, w)| n * w)
        .sum()
}

/// What to do when a reading is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingIndicatorPolicy {
    /// Absent reading → `MissingIndicator` error
    #[default]
    RequireAll,
    /// Drop absent indicators and rescale the remaining weights to sum to 1
    Renormalize,
}

impl MissingIndicatorPolicy {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "require_all" | "requireall" => Some(MissingIndicatorPolicy::RequireAll),
            "renormalize" => Some(MissingIndicatorPolicy::Renormalize),
            _ => None,
        }
    }
}

/// Assessment result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub score: f64,
    pub rating: Rating,
    pub crop_recommendation: String,
    pub fertilizer_recommendation: String,
    /// `None` when some readings were absent
    pub fertility_class: Option<FertilityClass>,
}

/// One row of the calculation breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorContribution {
    pub indicator: Indicator,
    pub name: String,
    pub raw_value: f64,
    pub normalized: f64,
    pub geometric_mean: TriangularFuzzyNumber,
    pub fuzzy_weight: TriangularFuzzyNumber,
    pub weight: f64,
    pub contribution: f64,
}

/// Assessment result plus every intermediate value behind the score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentBreakdown {
    pub result: AssessmentResult,
    pub indicators: Vec<IndicatorContribution>,
    /// `None` when the consistency check was unavailable
    pub consistency: Option<ConsistencyReport>,
}

/// Main soil health assessor
#[derive(Debug, Clone)]
pub struct SoilHealthAssessor {
    registry: IndicatorRegistry,
    matrix: FuzzyComparisonMatrix,
    weights: WeightVector,
    fahp: FahpBreakdown,
    consistency: std::result::Result<ConsistencyReport, ConsistencyCheckUnavailable>,
    crop_bands: CropBands,
    fertilizer_table: FertilizerTable,
    policy: MissingIndicatorPolicy,
}

impl SoilHealthAssessor {
    /// Build an assessor, taking embedded defaults for anything the config
    /// leaves unset
    ///
    /// Fails fast on a degenerate indicator range or a matrix that is not
    /// 8×8. The consistency check is logged but never fails construction.
    pub fn new(config: &AssessmentConfig) -> Result<Self> {
        let registry = config.indicators.clone().unwrap_or_default();
        let matrix = config.comparison_matrix.clone().unwrap_or_default();
        let crop_bands = config.crop_bands.clone().unwrap_or_default();
        let fertilizer_table = config.fertilizer_rows.clone().unwrap_or_default();
        let policy = config.missing_policy.unwrap_or_default();

        for (_, spec) in registry.iter() {
            normalize_value(spec.min_value, spec)?;
        }

        let (weights, fahp) = if config.comparison_matrix.is_some() {
            (WeightVector::from_matrix(&matrix)?, derive_weights(&matrix)?)
        } else {
            (
                *WeightVector::expert_default(),
                FahpBreakdown::expert_default().clone(),
            )
        };

        let consistency = check_consistency(&matrix);
        match &consistency {
            Ok(report) if report.is_consistent() => {
                tracing::info!(
                    "Comparison matrix consistency ratio {:.4} (lambda_max {:.4})",
                    report.consistency_ratio,
                    report.lambda_max
                );
            }
            Ok(report) => {
                tracing::warn!(
                    "Comparison matrix is inconsistent: CR {:.4} exceeds 0.1 (lambda_max {:.4})",
                    report.consistency_ratio,
                    report.lambda_max
                );
            }
            Err(e) => tracing::warn!("{}", e),
        }

        tracing::info!(
            "Soil health assessor initialized: weights {:?}, policy {:?}, {} crop bands, {} fertilizer rows",
            weights.as_array(),
            policy,
            crop_bands.bands().len(),
            fertilizer_table.rows().len()
        );

        Ok(Self {
            registry,
            matrix,
            weights,
            fahp,
            consistency,
            crop_bands,
            fertilizer_table,
            policy,
        })
    }

    /// Shared assessor with every embedded default, built once per process
    pub fn shared_default() -> &'static SoilHealthAssessor {
        static DEFAULT_ASSESSOR: OnceLock<SoilHealthAssessor> = OnceLock::new();
        DEFAULT_ASSESSOR.get_or_init(SoilHealthAssessor::default)
    }

    pub fn registry(&self) -> &IndicatorRegistry {
        &self.registry
    }

    pub fn matrix(&self) -> &FuzzyComparisonMatrix {
        &self.matrix
    }

    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    pub fn fahp_breakdown(&self) -> &FahpBreakdown {
        &self.fahp
    }

    pub fn consistency(&self) -> std::result::Result<&ConsistencyReport, &ConsistencyCheckUnavailable> {
        self.consistency.as_ref()
    }

    pub fn crop_bands(&self) -> &CropBands {
        &self.crop_bands
    }

    pub fn fertilizer_table(&self) -> &FertilizerTable {
        &self.fertilizer_table
    }

    pub fn policy(&self) -> MissingIndicatorPolicy {
        self.policy
    }

    /// Assess one complete sample
    pub fn assess(&self, values: &IndicatorValues) -> Result<AssessmentResult> {
        self.registry.check_all(values)?;
        let normalized = normalize(values, &self.registry)?;
        let score = score(&normalized, &self.weights);
        Ok(self.classify(score, values))
    }

    /// Assess a sample given as a slice; it must hold exactly 8 values
    pub fn assess_slice(&self, values: &[f64]) -> Result<AssessmentResult> {
        let values: IndicatorValues =
            values
                .try_into()
                .map_err(|_| SoilHealthError::VectorLength {
                    expected: INDICATOR_COUNT,
                    actual: values.len(),
                })?;
        self.assess(&values)
    }

    /// Assess a sample where some readings may be absent, per the policy
    pub fn assess_partial(&self, values: &PartialIndicatorValues) -> Result<AssessmentResult> {
        if let Some(complete) = complete_values(values) {
            return self.assess(&complete);
        }

        match self.policy {
            MissingIndicatorPolicy::RequireAll => {
                let missing = Indicator::ALL
                    .iter()
                    .find(|ind| values[ind.index()].is_none())
                    .map(|ind| self.registry.spec(*ind).name.clone())
                    .unwrap_or_default();
                Err(SoilHealthError::MissingIndicator { indicator: missing })
            }
            MissingIndicatorPolicy::Renormalize => {
                let mut normalized = [0.0; INDICATOR_COUNT];
                let mut present = [false; INDICATOR_COUNT];
                for (indicator, spec) in self.registry.iter() {
                    let i = indicator.index();
                    if let Some(value) = values[i] {
                        self.registry.check(indicator, value)?;
                        normalized[i] = normalize_value(value, spec)?;
                        present[i] = true;
                    }
                }
                let weights = self.weights.renormalized_over(&present)?;
                let score = weighted_sum(&normalized, &weights);
                tracing::debug!(
                    "Partial sample scored over {} of {} indicators: {:.4}",
                    present.iter().filter(|&&p| p).count(),
                    INDICATOR_COUNT,
                    score
                );

                let rating = Rating::from_score(score);
                Ok(AssessmentResult {
                    score,
                    rating,
                    crop_recommendation: self.crop_bands.recommend(score).to_string(),
                    fertilizer_recommendation: self
                        .fertilizer_table
                        .recommend_partial(values)
                        .to_string(),
                    fertility_class: None,
                })
            }
        }
    }

    /// Assess one sample and return the per-indicator calculation table
    pub fn assess_detailed(&self, values: &IndicatorValues) -> Result<AssessmentBreakdown> {
        self.registry.check_all(values)?;
        let normalized = normalize(values, &self.registry)?;
        let score = score(&normalized, &self.weights);

        let indicators = self
            .registry
            .iter()
            .map(|(indicator, spec)| {
                let i = indicator.index();
                let weight = self.weights.get(indicator);
                IndicatorContribution {
                    indicator,
                    name: spec.name.clone(),
                    raw_value: values[i],
                    normalized: normalized[i],
                    geometric_mean: self.fahp.geometric_means[i],
                    fuzzy_weight: self.fahp.fuzzy_weights[i],
                    weight,
                    contribution: weight * normalized[i],
                }
            })
            .collect();

        Ok(AssessmentBreakdown {
            result: self.classify(score, values),
            indicators,
            consistency: self.consistency.as_ref().ok().cloned(),
        })
    }

    /// Assess samples one after another
    pub fn assess_batch(&self, samples: &[IndicatorValues]) -> Vec<Result<AssessmentResult>> {
        samples.iter().map(|values| self.assess(values)).collect()
    }

    /// Assess samples IN PARALLEL using Rayon
    ///
    /// The assessor is immutable, so every worker reads the same weights and
    /// tables without locking. Output order matches input order.
    pub fn assess_batch_parallel(&self, samples: &[IndicatorValues]) -> Vec<Result<AssessmentResult>> {
        let results: Vec<Result<AssessmentResult>> =
            samples.par_iter().map(|values| self.assess(values)).collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        tracing::info!(
            "Batch assessment finished: {} samples, {} rejected",
            samples.len(),
            failed
        );
        results
    }

    fn classify(&self, score: f64, values: &IndicatorValues) -> AssessmentResult {
        let rating = Rating::from_score(score);
        tracing::debug!("Sample {:?} scored {:.4} ({})", values, score, rating);

        AssessmentResult {
            score,
            rating,
            crop_recommendation: self.crop_bands.recommend(score).to_string(),
            fertilizer_recommendation: self.fertilizer_table.recommend(values).to_string(),
            fertility_class: Some(classify_fertility(values)),
        }
    }
}

impl Default for SoilHealthAssessor {
    fn default() -> Self {
        let registry = IndicatorRegistry::default();
        let matrix = FuzzyComparisonMatrix::expert_default();
        let consistency = check_consistency(&matrix);

        Self {
            registry,
            matrix,
            weights: *WeightVector::expert_default(),
            fahp: FahpBreakdown::expert_default().clone(),
            consistency,
            crop_bands: CropBands::default(),
            fertilizer_table: FertilizerTable::default(),
            policy: MissingIndicatorPolicy::default(),
        }
    }
}

fn complete_values(values: &PartialIndicatorValues) -> Option<IndicatorValues> {
    let mut complete = [0.0; INDICATOR_COUNT];
    for (slot, value) in complete.iter_mut().zip(values.iter()) {
        *slot = (*value)?;
    }
    Some(complete)
}

/// Assess a sample with the embedded defaults
pub fn assess(values: &IndicatorValues) -> Result<AssessmentResult> {
    SoilHealthAssessor::shared_default().assess(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::NO_CROP_RECOMMENDATION;
    use approx::assert_relative_eq;

    const BALANCED: IndicatorValues = [7.0, 175.0, 25.0, 125.0, 1.25, 27.0, 60.0, 60.0];

    #[test]
    fn test_score_is_weighted_sum() {
        let weights = WeightVector::expert_default();
        assert_relative_eq!(score(&[0.0; INDICATOR_COUNT], weights), 0.0);
        assert_relative_eq!(score(&[1.0; INDICATOR_COUNT], weights), 1.0, epsilon = 1e-12);
        assert_relative_eq!(score(&[0.5; INDICATOR_COUNT], weights), 0.5, epsilon = 1e-12);

        let mut only_ph = [0.0; INDICATOR_COUNT];
        only_ph[Indicator::Ph.index()] = 1.0;
        assert_relative_eq!(score(&only_ph, weights), weights.get(Indicator::Ph));
    }

    #[test]
    fn test_default_assessor_matches_explicit_config() {
        let from_config = SoilHealthAssessor::new(&AssessmentConfig::default()).unwrap();
        let default = SoilHealthAssessor::default();
        assert_eq!(from_config.weights(), default.weights());
        assert_eq!(from_config.fahp_breakdown(), default.fahp_breakdown());
        assert_eq!(from_config.assess(&BALANCED).unwrap(), default.assess(&BALANCED).unwrap());
    }

    #[test]
    fn test_extremes() {
        let assessor = SoilHealthAssessor::default();
        let registry = assessor.registry().clone();

        let low = assessor.assess(&registry.minimums()).unwrap();
        assert_relative_eq!(low.score, 0.0);
        assert_eq!(low.rating, Rating::VeryPoor);
        assert_eq!(low.crop_recommendation, "Green Manure Crops, Legumes, Cowpea, Sesbania");

        let high = assessor.assess(&registry.maximums()).unwrap();
        assert_relative_eq!(high.score, 1.0, epsilon = 1e-12);
        assert_eq!(high.rating, Rating::Excellent);
    }

    #[test]
    fn test_out_of_range_names_indicator() {
        let assessor = SoilHealthAssessor::default();
        let mut values = BALANCED;
        values[Indicator::Nitrogen.index()] = 9.0;
        match assessor.assess(&values).unwrap_err() {
            SoilHealthError::OutOfRange { indicator, value, min, max } => {
                assert_eq!(indicator, "Nitrogen (N)");
                assert_eq!(value, 9.0);
                assert_eq!(min, 10.0);
                assert_eq!(max, 500.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_slice_length_is_checked() {
        let assessor = SoilHealthAssessor::default();
        let err = assessor.assess_slice(&BALANCED[..7]).unwrap_err();
        assert_eq!(err, SoilHealthError::VectorLength { expected: 8, actual: 7 });
        assert!(assessor.assess_slice(&BALANCED).is_ok());
    }

    #[test]
    fn test_require_all_rejects_missing() {
        let assessor = SoilHealthAssessor::default();
        let mut values: PartialIndicatorValues = BALANCED.map(Some);
        values[Indicator::Potassium.index()] = None;
        let err = assessor.assess_partial(&values).unwrap_err();
        assert_eq!(
            err,
            SoilHealthError::MissingIndicator {
                indicator: "Potassium (K)".to_string()
            }
        );
    }

    #[test]
    fn test_complete_partial_sample_matches_assess() {
        let assessor = SoilHealthAssessor::default();
        let partial = assessor.assess_partial(&BALANCED.map(Some)).unwrap();
        assert_eq!(partial, assessor.assess(&BALANCED).unwrap());
    }

    #[test]
    fn test_renormalize_policy() {
        let config = AssessmentConfig {
            missing_policy: Some(MissingIndicatorPolicy::Renormalize),
            ..AssessmentConfig::default()
        };
        let assessor = SoilHealthAssessor::new(&config).unwrap();
        let registry = assessor.registry().clone();

        // Every present indicator at its maximum still scores 1.0
        let mut values: PartialIndicatorValues = registry.maximums().map(Some);
        values[Indicator::Ph.index()] = None;
        values[Indicator::Humidity.index()] = None;
        let result = assessor.assess_partial(&values).unwrap();
        assert_relative_eq!(result.score, 1.0, epsilon = 1e-12);
        assert_eq!(result.fertility_class, None);

        let none: PartialIndicatorValues = [None; INDICATOR_COUNT];
        assert!(assessor.assess_partial(&none).is_err());
    }

    #[test]
    fn test_detailed_contributions_sum_to_score() {
        let assessor = SoilHealthAssessor::default();
        let breakdown = assessor.assess_detailed(&BALANCED).unwrap();
        assert_eq!(breakdown.indicators.len(), INDICATOR_COUNT);
        let total: f64 = breakdown.indicators.iter().map(|c| c.contribution).sum();
        assert_relative_eq!(total, breakdown.result.score, epsilon = 1e-12);
        assert_eq!(breakdown.indicators[0].name, "Soil pH");
        assert!(breakdown.consistency.is_some());
    }

    #[test]
    fn test_parallel_batch_matches_sequential() {
        let assessor = SoilHealthAssessor::default();
        let registry = assessor.registry().clone();
        let mut bad = BALANCED;
        bad[0] = -1.0;
        let samples = vec![BALANCED, registry.minimums(), bad, registry.maximums()];

        let sequential = assessor.assess_batch(&samples);
        let parallel = assessor.assess_batch_parallel(&samples);
        assert_eq!(sequential, parallel);
        assert!(parallel[2].is_err());
    }

    #[test]
    fn test_crop_gap_falls_back() {
        let config = AssessmentConfig {
            crop_bands: Some(
                CropBands::new(vec![crate::bands::CropBand::new(0.9, None, "Orchards")]).unwrap(),
            ),
            ..AssessmentConfig::default()
        };
        let assessor = SoilHealthAssessor::new(&config).unwrap();
        let result = assessor.assess(&BALANCED).unwrap();
        assert_eq!(result.crop_recommendation, NO_CROP_RECOMMENDATION);
    }

    #[test]
    fn test_policy_names() {
        assert_eq!(
            MissingIndicatorPolicy::parse("Renormalize"),
            Some(MissingIndicatorPolicy::Renormalize)
        );
        assert_eq!(
            MissingIndicatorPolicy::parse("require-all"),
            Some(MissingIndicatorPolicy::RequireAll)
        );
        assert_eq!(MissingIndicatorPolicy::parse("ignore"), None);
    }
}
