use std::io::{self, Write};

use anyhow::{Context, Result};
use pylonmap_core::ConversionDiagnostics;
use pylonmap_io::inspect;
use tabwriter::TabWriter;

use pylonmap_cli::{InspectArgs, OutputFormat, PylonmapConfig};

pub fn handle(args: &InspectArgs, config: &PylonmapConfig) -> Result<()> {
    let diagnostics = inspect(&args.input, args.voltage.as_deref(), &config.schema)?;
    match args.format {
        OutputFormat::Plain => print_table(&diagnostics),
        OutputFormat::Json => print_json(&diagnostics),
    }
}

fn print_table(diagnostics: &ConversionDiagnostics) -> Result<()> {
    let stats = &diagnostics.stats;
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "LEVEL\tCLASSIFIED\tVALID")?;
    writeln!(writer, "power lines\t{}\t{}", stats.power_lines, stats.valid_power_lines)?;
    writeln!(writer, "sections\t{}\t{}", stats.sections, stats.valid_sections)?;
    writeln!(writer, "spans\t{}\t{}", stats.spans, stats.valid_spans)?;
    writeln!(writer, "supports\t{}\t{}", stats.supports, stats.valid_supports)?;
    writer.flush()?;

    println!();
    let rows = [
        ("Objects", stats.objects),
        ("Unclassified", stats.unclassified),
        ("Without ref", stats.skipped_without_ref),
        ("Duplicate refs", stats.duplicate_refs),
        ("Ungrouped", stats.ungrouped),
        ("Unlinked lines", stats.unlinked_power_lines),
        ("Voltage classes", stats.voltage_classes),
    ];
    for (label, value) in rows {
        println!("{label:<15}: {value}");
    }
    println!();
    print!("{diagnostics}");
    Ok(())
}

fn print_json(diagnostics: &ConversionDiagnostics) -> Result<()> {
    serde_json::to_writer_pretty(io::stdout(), diagnostics)
        .context("serializing inspection result to JSON")?;
    println!();
    Ok(())
}
