mod layout;

use std::collections::HashSet;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::error::Error;
use crate::fonts::{FaceMeasure, FontConfig, LoadedFont, embed_font, encode_as_gids, load_font};
use crate::model::PrintJob;
use crate::paginate::{page_count, paginate};
use crate::templates::position_of;
use crate::wrap::TextMeasure;

pub use layout::{MM_TO_PT, PAGE_HEIGHT, PAGE_WIDTH, TextOp, plan_cell};

/// Text to draw on one sheet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PagePlan {
    pub ops: Vec<TextOp>,
}

/// Reject jobs that cannot produce a meaningful document before any font work.
pub fn validate_job(job: &PrintJob) -> Result<(), Error> {
    let template = &job.template;
    debug_assert_eq!(
        template.rows * template.cols,
        template.total_labels,
        "template {} geometry is inconsistent",
        template.code
    );
    if job.records.is_empty() {
        return Err(Error::Input("no address records to print".into()));
    }
    if job.start_position == 0 || job.start_position > template.total_labels {
        return Err(Error::Input(format!(
            "start position {} is outside 1..={} for template {}",
            job.start_position, template.total_labels, template.code
        )));
    }
    Ok(())
}

/// Paginate the job's records and lay out every occupied cell.
/// Returns one plan per sheet; trailing cells on the last sheet stay empty.
pub fn plan_document(job: &PrintJob, measure: &impl TextMeasure) -> Vec<PagePlan> {
    let template = &job.template;
    let n_pages = page_count(job.records.len(), template.total_labels, job.start_position);
    let mut pages = vec![PagePlan::default(); n_pages];
    let sender = job.effective_sender();

    for placement in paginate(&job.records, template, job.start_position) {
        let position = position_of(template, placement.cell_index, job.offset_x, job.offset_y);
        let ops = plan_cell(placement.record, position, template, sender, measure);
        pages[placement.page_index].ops.extend(ops);
    }
    pages
}

/// Render with fonts resolved from the environment (`ATENA_FONTS`, cache, download).
pub fn render(job: &PrintJob) -> Result<Vec<u8>, Error> {
    render_with_config(job, &FontConfig::from_env())
}

pub fn render_with_config(job: &PrintJob, config: &FontConfig) -> Result<Vec<u8>, Error> {
    validate_job(job)?;
    let t0 = std::time::Instant::now();
    let font = load_font(job.font_family, config)?;
    log::info!(
        "Font load: {:.1}ms ({})",
        t0.elapsed().as_secs_f64() * 1000.0,
        font.name
    );
    render_with_font(job, &font)
}

/// Render against font bytes already in memory.
pub fn render_with_font(job: &PrintJob, font: &LoadedFont) -> Result<Vec<u8>, Error> {
    validate_job(job)?;
    let t0 = std::time::Instant::now();
    let face = font.face()?;
    let measure = FaceMeasure::new(&face);

    let pages = plan_document(job, &measure);
    let t_layout = t0.elapsed();

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    let used_chars: HashSet<char> = pages
        .iter()
        .flat_map(|p| p.ops.iter())
        .flat_map(|op| op.text.chars())
        .collect();
    let entry = embed_font(&mut pdf, font, &face, "F1".to_string(), &used_chars, &mut alloc)?;
    let t_fonts = t0.elapsed();

    let n = pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, page) in pages.iter().enumerate() {
        let mut content = Content::new();
        content.set_fill_gray(0.0);
        for op in &page.ops {
            content.begin_text();
            content.set_font(Name(entry.pdf_name.as_bytes()), op.size);
            content.next_line(op.x, op.y);
            content.show(Str(&encode_as_gids(&op.text, &entry.char_to_gid)));
            content.end_text();
        }
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);
    pdf.document_info(info_id)
        .producer(TextStr(concat!("atena-label ", env!("CARGO_PKG_VERSION"))));

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT))
            .parent(pages_id)
            .contents(content_ids[i]);
        page.resources()
            .fonts()
            .pair(Name(entry.pdf_name.as_bytes()), entry.font_ref);
    }

    let t_assembly = t0.elapsed();
    log::info!(
        "Render phases: layout={:.1}ms, font_embed={:.1}ms, assembly={:.1}ms ({} pages, {} records)",
        t_layout.as_secs_f64() * 1000.0,
        (t_fonts - t_layout).as_secs_f64() * 1000.0,
        (t_assembly - t_fonts).as_secs_f64() * 1000.0,
        n,
        job.records.len(),
    );

    Ok(pdf.finish())
}

/// Download name for a document generated on `date`.
pub fn output_file_name(date: chrono::NaiveDate) -> String {
    format!("atena_label_{}.pdf", date.format("%Y%m%d"))
}
