//! Correction factor inspection command.

use std::path::PathBuf;

use anyhow::Result;
use plateloc_correct::driver::format_fixed;
use plateloc_correct::{AdjustmentSummary, Axis, CorrectionFactors, ReferenceCalibration};

use super::load_config;
use crate::GeometryArgs;

pub fn run(geometry: &GeometryArgs, config: Option<PathBuf>, json: bool) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let geometry = geometry.apply(config.geometry);
    let factors = CorrectionFactors::compute(&ReferenceCalibration::STUDY, &geometry);

    if json {
        let value = serde_json::json!({
            "geometry": geometry,
            "factors": factors,
            "summary": AdjustmentSummary::new(&geometry, &factors),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", AdjustmentSummary::new(&geometry, &factors));
    println!();
    println!("Distance ratio:   {}", format_fixed(factors.distance_ratio, 6));
    println!("Distance scaling: {}", format_fixed(factors.distance_scaling, 6));
    println!();
    println!(
        "{:<8} {:>10} {:>12} {:>12} {:>10} {:>10}",
        "Axis", "Scale", "CorrectAvg", "MiscalAvg", "Slope", "Intercept"
    );
    println!("{:-<67}", "");
    for axis in Axis::ALL {
        let f = factors.axis(axis);
        println!(
            "{:<8} {:>10} {:>12} {:>12} {:>10} {:>10}",
            axis.to_string(),
            format_fixed(f.scale, 6),
            format_fixed(f.correct_avg, 6),
            format_fixed(f.miscal_avg, 6),
            format_fixed(f.slope(), 6),
            format_fixed(f.intercept(), 6)
        );
    }

    if !factors.is_finite() {
        tracing::warn!("factors are not finite; setup distance must be non-zero");
    }

    Ok(())
}
