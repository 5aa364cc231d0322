mod error;
mod fonts;

pub mod csv_source;
pub mod model;
pub mod normalize;
pub mod paginate;
pub mod pdf;
pub mod templates;
pub mod wrap;

pub use error::Error;
pub use fonts::{FontConfig, LoadedFont, load_font};
pub use model::{
    AddressRecord, ColumnInfo, FieldMapping, FontFamily, LabelTemplate, ManualEntry, MappingArea,
    MappingDraft, PrintJob, RecipientSegment, SenderData,
};
pub use pdf::{output_file_name, render, render_with_config, render_with_font};

use std::path::Path;
use std::time::Instant;

/// Normalize CSV text through `draft`, render the job and write the PDF to `output`.
pub fn convert_csv_to_pdf(
    csv_text: &str,
    draft: &MappingDraft,
    settings: PrintJob,
    config: &FontConfig,
    output: &Path,
) -> Result<(), Error> {
    let t0 = Instant::now();

    let table = csv_source::load_table(csv_text)?;
    if draft.is_empty() {
        return Err(Error::Mapping("no columns are mapped".into()));
    }
    let records = normalize::from_mapped_rows(&table.rows, draft);
    let t_parse = t0.elapsed();

    write_job(PrintJob { records, ..settings }, config, output, t0, t_parse)
}

/// Normalize hand-typed entries, render the job and write the PDF to `output`.
pub fn convert_entries_to_pdf(
    entries: &[ManualEntry],
    settings: PrintJob,
    config: &FontConfig,
    output: &Path,
) -> Result<(), Error> {
    let t0 = Instant::now();

    let records = normalize::from_manual_entries(entries)?;
    let t_parse = t0.elapsed();

    write_job(PrintJob { records, ..settings }, config, output, t0, t_parse)
}

fn write_job(
    job: PrintJob,
    config: &FontConfig,
    output: &Path,
    t0: Instant,
    t_parse: std::time::Duration,
) -> Result<(), Error> {
    let bytes = render_with_config(&job, config)?;
    let t_render = t0.elapsed();

    std::fs::write(output, &bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: normalize={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_render - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
    );

    Ok(())
}
