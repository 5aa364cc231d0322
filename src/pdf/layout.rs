use crate::model::{AddressRecord, CellPosition, LabelTemplate, SenderData};
use crate::wrap::{TextMeasure, split_recipient_block, wrap};

pub const MM_TO_PT: f32 = 2.83465;
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;

const CELL_PADDING: f32 = 3.0; // mm
const POSTAL_MARK: char = '〒';

const POSTAL_FONT_SIZE: f32 = 9.0;
const ADDRESS_FONT_SIZE: f32 = 10.0;
const RECIPIENT_FONT_SIZE: f32 = 12.0;
const SENDER_FONT_SIZE: f32 = 7.0;

const POSTAL_ADVANCE: f32 = 5.0; // mm
const ADDRESS_ADVANCE: f32 = 4.5; // mm
const RECIPIENT_GAP: f32 = 2.0; // mm
const RECIPIENT_ADVANCE: f32 = 5.0; // mm
const SENDER_ADVANCE: f32 = 3.0; // mm
const SENDER_BOTTOM_INSET: f32 = 12.0; // mm above the bottom padding

/// One string drawn at a baseline position, in PDF points (origin bottom-left).
#[derive(Clone, Debug, PartialEq)]
pub struct TextOp {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// `ddd-dddd` or `ddddddd`, nothing else.
pub(super) fn is_bare_postal_code(line: &str) -> bool {
    let bytes = line.as_bytes();
    let digits = |s: &[u8]| s.iter().all(u8::is_ascii_digit);
    match bytes.len() {
        7 => digits(bytes),
        8 => bytes[3] == b'-' && digits(&bytes[..3]) && digits(&bytes[4..]),
        _ => false,
    }
}

/// Text and size for an address line; only the first line gets postal treatment.
fn address_line_style(index: usize, line: &str) -> (String, f32) {
    if index == 0 {
        if line.starts_with(POSTAL_MARK) {
            return (line.to_string(), POSTAL_FONT_SIZE);
        }
        if is_bare_postal_code(line) {
            return (format!("{POSTAL_MARK}{line}"), POSTAL_FONT_SIZE);
        }
    }
    (line.to_string(), ADDRESS_FONT_SIZE)
}

/// Recipient chunks, each split independently. Segments accumulate until one
/// carries a break flag; without break information everything is one chunk.
fn recipient_chunks(record: &AddressRecord) -> Vec<String> {
    if !record.recipient_breaks_known {
        let joined: String = record.recipient_lines().collect();
        return if joined.is_empty() { Vec::new() } else { vec![joined] };
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let last = record.recipient.len().saturating_sub(1);
    for (i, segment) in record.recipient.iter().enumerate() {
        current.push_str(&segment.text);
        if (segment.break_after || i == last) && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
    }
    chunks
}

/// Lay out one label cell: address block, recipient block, then the optional
/// right-aligned sender block near the bottom.
pub fn plan_cell(
    record: &AddressRecord,
    position: CellPosition,
    template: &LabelTemplate,
    sender: Option<&SenderData>,
    measure: &impl TextMeasure,
) -> Vec<TextOp> {
    let mut ops = Vec::new();

    let content_x = (position.x + CELL_PADDING) * MM_TO_PT;
    let content_width = (template.label_width - CELL_PADDING * 2.0) * MM_TO_PT;
    let mut cursor_y = PAGE_HEIGHT - (position.y + CELL_PADDING) * MM_TO_PT;

    for (index, line) in record.address_lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let (text, size) = address_line_style(index, line);
        let advance = if size == POSTAL_FONT_SIZE {
            POSTAL_ADVANCE
        } else {
            ADDRESS_ADVANCE
        };
        for physical in wrap(&text, content_width, measure, size) {
            ops.push(TextOp {
                text: physical,
                x: content_x,
                y: cursor_y,
                size,
            });
            cursor_y -= advance * MM_TO_PT;
        }
    }

    if record.has_recipient() {
        cursor_y -= RECIPIENT_GAP * MM_TO_PT;
        for chunk in recipient_chunks(record) {
            for line in split_recipient_block(&chunk, content_width, measure, RECIPIENT_FONT_SIZE) {
                ops.push(TextOp {
                    text: line,
                    x: content_x,
                    y: cursor_y,
                    size: RECIPIENT_FONT_SIZE,
                });
                cursor_y -= RECIPIENT_ADVANCE * MM_TO_PT;
            }
        }
    }

    if let Some(sender) = sender.filter(|s| !s.name.is_empty()) {
        let right_x = (position.x + template.label_width - CELL_PADDING) * MM_TO_PT;
        let mut sender_y = PAGE_HEIGHT
            - (position.y + template.label_height - CELL_PADDING - SENDER_BOTTOM_INSET) * MM_TO_PT;

        let postal = (!sender.postal_code.is_empty())
            .then(|| format!("{POSTAL_MARK}{}", sender.postal_code));
        let address = (!sender.address.is_empty()).then(|| sender.address.clone());
        let lines = postal
            .into_iter()
            .chain(address)
            .chain(std::iter::once(sender.name.clone()));

        for text in lines {
            let width = measure.text_width(&text, SENDER_FONT_SIZE);
            ops.push(TextOp {
                text,
                x: right_x - width,
                y: sender_y,
                size: SENDER_FONT_SIZE,
            });
            sender_y -= SENDER_ADVANCE * MM_TO_PT;
        }
    }

    ops
}
