use anyhow::Result;
use pylonmap_core::ConversionOptions;
use pylonmap_io::{convert, ConversionRequest};
use tracing::info;

use pylonmap_cli::{ConvertArgs, PylonmapConfig};

pub fn handle(args: &ConvertArgs, config: &PylonmapConfig) -> Result<()> {
    let options = effective_options(args, &config.conversion);
    let mut request = ConversionRequest::new(&args.input, &args.output);
    if let Some(voltage) = &args.voltage {
        request = request.with_voltage(voltage);
    }
    if let Some(path) = &args.missing_log {
        request = request.with_missing_log(path);
    }
    if let Some(path) = &args.report {
        request = request.with_report(path);
    }

    info!(
        "Converting {} to {} ({} schema)",
        args.input.display(),
        args.output.display(),
        options.property_schema.name()
    );
    let summary = convert(&request, &options, &config.schema)?;

    let features = summary.features;
    println!(
        "Wrote {} features ({} supports, {} spans, {} sections, {} power lines) to {}",
        features.total(),
        features.supports,
        features.spans,
        features.sections,
        features.power_lines,
        summary.output.display()
    );
    if summary.missing_supports > 0 {
        match &summary.missing_log {
            Some(path) => println!(
                "{} supports without coordinates listed in {}",
                summary.missing_supports,
                path.display()
            ),
            None => println!("{} supports without coordinates", summary.missing_supports),
        }
    }
    if summary.diagnostics.has_issues() {
        println!("Diagnostics: {}", summary.diagnostics.summary());
    }
    Ok(())
}

/// Config file values with command-line flags applied on top.
fn effective_options(args: &ConvertArgs, base: &ConversionOptions) -> ConversionOptions {
    let mut options = base.clone();
    if args.no_voltage {
        options.include_voltage = false;
    }
    if args.missing_coordinates || args.missing_log.is_some() {
        options.emit_missing_coordinates = true;
    }
    if let Some(schema) = args.schema {
        options.property_schema = schema.into();
    }
    options
}
