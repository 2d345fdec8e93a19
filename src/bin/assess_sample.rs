// Soil sample assessment CLI
//
// Purpose: Score one soil sample and print the result as JSON
// Usage: cargo run --bin assess_sample -- [--detailed] <ph> <n> <p> <k> <ec> <temperature> <moisture> <humidity>
//
// A reading of NA (or "-", "?") marks it as missing. Whether such a sample
// is rejected or rescored over the present readings follows MISSING_POLICY.

use anyhow::{bail, Context};
use soil_health_fahp::{
    AssessmentConfig, MissingIndicatorPolicy, PartialIndicatorValues, SoilHealthAssessor,
    INDICATOR_COUNT,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soil_health_fahp=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut detailed = false;
    let mut readings = Vec::with_capacity(INDICATOR_COUNT);
    for arg in std::env::args().skip(1) {
        if arg == "--detailed" {
            detailed = true;
        } else {
            readings.push(parse_reading(&arg)?);
        }
    }
    let values = sample_from_readings(&readings)?;

    // Configuration from environment variables
    let mut config = match std::env::var("SOIL_HEALTH_CONFIG") {
        Ok(path) => AssessmentConfig::load(&PathBuf::from(path))?,
        Err(_) => AssessmentConfig::default(),
    };
    if let Ok(path) = std::env::var("CROP_BANDS_CSV") {
        config = config.with_crop_bands_csv(&PathBuf::from(path))?;
    }
    if let Ok(path) = std::env::var("FERTILIZER_BANDS_CSV") {
        config = config.with_fertilizer_csv(&PathBuf::from(path))?;
    }
    if let Ok(name) = std::env::var("MISSING_POLICY") {
        let policy = MissingIndicatorPolicy::parse(&name)
            .with_context(|| format!("Unknown MISSING_POLICY '{}'", name))?;
        config.missing_policy = Some(policy);
    }

    let assessor = SoilHealthAssessor::new(&config)?;

    let output = if detailed {
        let Some(complete) = complete_sample(&values) else {
            bail!("--detailed needs all {} readings", INDICATOR_COUNT);
        };
        serde_json::to_string_pretty(&assessor.assess_detailed(&complete)?)?
    } else {
        serde_json::to_string_pretty(&assessor.assess_partial(&values)?)?
    };
    println!("{}", output);

    Ok(())
}

/// One command-line reading; a missing-value marker yields `None`
fn parse_reading(arg: &str) -> anyhow::Result<Option<f64>> {
    let arg = arg.trim();
    if arg.eq_ignore_ascii_case("na") || arg == "-" || arg == "?" {
        return Ok(None);
    }
    let value: f64 = arg
        .parse()
        .with_context(|| format!("Not a number: '{}'", arg))?;
    Ok(Some(value))
}

fn sample_from_readings(readings: &[Option<f64>]) -> anyhow::Result<PartialIndicatorValues> {
    readings.try_into().map_err(|_| {
        anyhow::anyhow!(
            "Expected {} indicator values, got {}",
            INDICATOR_COUNT,
            readings.len()
        )
    })
}

fn complete_sample(values: &PartialIndicatorValues) -> Option<[f64; INDICATOR_COUNT]> {
    let mut complete = [0.0; INDICATOR_COUNT];
    for (slot, value) in complete.iter_mut().zip(values) {
        *slot = (*value)?;
    }
    Some(complete)
}
