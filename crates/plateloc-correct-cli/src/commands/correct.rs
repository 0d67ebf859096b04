//! CSV correction command.

use anyhow::{Context, Result};
use plateloc_correct::report::save_column;
use plateloc_correct::{
    AdjustmentSummary, CorrectionReport, OutputFormat, ReaderMode, Session, extract,
};

use super::load_config;
use crate::CorrectArgs;

pub fn run(args: CorrectArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    config.geometry = args.geometry.apply(config.geometry);
    config.strict |= args.strict;
    if args.quoted {
        config.reader = ReaderMode::Quoted;
    }
    config.check().context("Geometry rejected in strict mode")?;

    let geometry = config.geometry;
    let reader = config.reader;

    tracing::debug!(?geometry, ?reader, "correcting {}", args.input.display());

    let extracted = extract::load_path(&args.input, reader)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    tracing::info!(
        rows = extracted.rows.len(),
        height_column = %extracted.height_header,
        side_column = %extracted.side_header,
        "Successfully loaded {}",
        args.input.display()
    );

    let session = Session::new(geometry).with_rows(extracted.rows);
    let report = CorrectionReport::from_session(&session, Some(&args.input));

    let results_to_stdout =
        args.output.is_none() && args.heights_out.is_none() && args.sides_out.is_none();

    if !args.no_summary && (args.format == OutputFormat::Text || !results_to_stdout) {
        println!("{}", AdjustmentSummary::new(session.params(), session.factors()));
        println!();
    }

    if let Some(path) = &args.heights_out {
        save_column(path, &report.heights)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
        println!("Corrected heights saved to: {}", path.display());
    }

    if let Some(path) = &args.sides_out {
        save_column(path, &report.sides)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
        println!("Corrected sides saved to: {}", path.display());
    }

    if let Some(path) = &args.output {
        report
            .save(path, args.format)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
        println!("Saved to: {}", path.display());
    }

    if results_to_stdout {
        let stdout = std::io::stdout();
        report.write(args.format, stdout.lock())?;
    }

    Ok(())
}
