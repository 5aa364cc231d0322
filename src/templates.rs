use crate::model::{CellPosition, LabelTemplate};

static TEMPLATES: [LabelTemplate; 3] = [
    LabelTemplate {
        code: "28382",
        name: "エーワン 28382（12面）",
        rows: 4,
        cols: 3,
        total_labels: 12,
        label_width: 63.5,
        label_height: 72.0,
        margin_top: 15.5,
        margin_left: 12.5,
        margin_right: 12.5,
        margin_bottom: 15.5,
        horizontal_gap: 2.5,
        vertical_gap: 0.0,
    },
    LabelTemplate {
        code: "28386",
        name: "エーワン 28386（24面）",
        rows: 6,
        cols: 4,
        total_labels: 24,
        label_width: 48.3,
        label_height: 46.6,
        margin_top: 15.5,
        margin_left: 10.0,
        margin_right: 10.0,
        margin_bottom: 15.5,
        horizontal_gap: 2.5,
        vertical_gap: 2.5,
    },
    LabelTemplate {
        code: "28387",
        name: "エーワン 28387（10面）",
        rows: 5,
        cols: 2,
        total_labels: 10,
        label_width: 86.4,
        label_height: 50.8,
        margin_top: 20.5,
        margin_left: 18.8,
        margin_right: 18.8,
        margin_bottom: 20.5,
        horizontal_gap: 0.0,
        vertical_gap: 5.0,
    },
];

pub fn list_templates() -> &'static [LabelTemplate] {
    &TEMPLATES
}

pub fn find_template(code: &str) -> Option<&'static LabelTemplate> {
    TEMPLATES.iter().find(|t| t.code == code)
}

pub fn default_template() -> &'static LabelTemplate {
    &TEMPLATES[0]
}

/// Top-left corner of cell `cell_index` (0-based within a page), in mm.
/// Callers guarantee `cell_index < total_labels`.
pub fn position_of(
    template: &LabelTemplate,
    cell_index: usize,
    offset_x: f32,
    offset_y: f32,
) -> CellPosition {
    debug_assert!(cell_index < template.total_labels);
    let row = cell_index / template.cols;
    let col = cell_index % template.cols;

    let x = template.margin_left
        + col as f32 * (template.label_width + template.horizontal_gap)
        + offset_x;
    let y = template.margin_top
        + row as f32 * (template.label_height + template.vertical_gap)
        + offset_y;

    CellPosition { x, y }
}
