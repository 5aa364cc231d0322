use serde::{Deserialize, Serialize};

/// One piece of the recipient block, e.g. company, title or name+honorific.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipientSegment {
    pub text: String,
    /// Start a new recipient line after this segment.
    pub break_after: bool,
}

/// One mailing target, ready for layout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddressRecord {
    pub address_lines: Vec<String>,
    pub recipient: Vec<RecipientSegment>,
    /// False when the record was built without usable break flags; the
    /// renderer then joins every segment and splits the result as one unit.
    pub recipient_breaks_known: bool,
}

impl AddressRecord {
    /// Build a record from the legacy parallel-array shape. A missing or
    /// length-mismatched `breaks` list disables forced breaks entirely.
    pub fn from_parallel(
        address_lines: Vec<String>,
        recipient_lines: Vec<String>,
        breaks: Option<Vec<bool>>,
    ) -> Self {
        let breaks = breaks.filter(|b| b.len() == recipient_lines.len());
        let recipient_breaks_known = breaks.is_some();
        let breaks = breaks.unwrap_or_default();
        let recipient = recipient_lines
            .into_iter()
            .enumerate()
            .filter(|(_, text)| !text.is_empty())
            .map(|(i, text)| RecipientSegment {
                text,
                break_after: breaks.get(i).copied().unwrap_or(false),
            })
            .collect();
        AddressRecord {
            address_lines: address_lines.into_iter().filter(|l| !l.is_empty()).collect(),
            recipient,
            recipient_breaks_known,
        }
    }

    pub fn recipient_lines(&self) -> impl Iterator<Item = &str> {
        self.recipient.iter().map(|s| s.text.as_str())
    }

    pub fn has_recipient(&self) -> bool {
        !self.recipient.is_empty()
    }
}

/// A named, fixed label sheet geometry. All lengths in millimeters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelTemplate {
    pub code: &'static str,
    pub name: &'static str,
    pub rows: usize,
    pub cols: usize,
    pub total_labels: usize,
    pub label_width: f32,
    pub label_height: f32,
    pub margin_top: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    pub horizontal_gap: f32,
    pub vertical_gap: f32,
}

/// Top-left corner of a cell, in millimeters from the top-left of the sheet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellPosition {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderData {
    pub postal_code: String,
    pub address: String,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub column_index: usize,
    pub column_name: String,
    pub order: usize,
    #[serde(default)]
    pub default_value: String,
    #[serde(default)]
    pub line_break_after: bool,
}

/// A source column as offered to the mapping step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub index: usize,
    pub name: String,
    #[serde(default)]
    pub sample: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingArea {
    Recipient,
    Address,
}

/// In-progress assignment of source columns to the recipient and address areas.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingDraft {
    pub columns: Vec<ColumnInfo>,
    pub recipient_fields: Vec<FieldMapping>,
    pub address_fields: Vec<FieldMapping>,
}

impl MappingDraft {
    pub fn new(columns: Vec<ColumnInfo>) -> Self {
        MappingDraft {
            columns,
            ..Default::default()
        }
    }

    pub fn fields(&self, area: MappingArea) -> &[FieldMapping] {
        match area {
            MappingArea::Recipient => &self.recipient_fields,
            MappingArea::Address => &self.address_fields,
        }
    }

    fn fields_mut(&mut self, area: MappingArea) -> &mut Vec<FieldMapping> {
        match area {
            MappingArea::Recipient => &mut self.recipient_fields,
            MappingArea::Address => &mut self.address_fields,
        }
    }

    /// Append `column` to the end of `area`. Returns false for an unknown column.
    pub fn assign(&mut self, area: MappingArea, column: usize) -> bool {
        let Some(col) = self.columns.iter().find(|c| c.index == column) else {
            return false;
        };
        let column_name = col.name.clone();
        let fields = self.fields_mut(area);
        let order = fields.len();
        fields.push(FieldMapping {
            column_index: column,
            column_name,
            order,
            default_value: String::new(),
            line_break_after: false,
        });
        true
    }

    pub fn remove(&mut self, area: MappingArea, index: usize) -> Option<FieldMapping> {
        let fields = self.fields_mut(area);
        if index >= fields.len() {
            return None;
        }
        let removed = fields.remove(index);
        renumber(fields);
        Some(removed)
    }

    /// Move a field to the end of another (or the same) area, keeping its
    /// default value and break flag.
    pub fn move_field(&mut self, from: MappingArea, index: usize, to: MappingArea) -> bool {
        let Some(mut field) = self.remove(from, index) else {
            return false;
        };
        let target = self.fields_mut(to);
        field.order = target.len();
        target.push(field);
        true
    }

    pub fn set_default(&mut self, area: MappingArea, index: usize, value: &str) -> bool {
        match self.fields_mut(area).get_mut(index) {
            Some(f) => {
                f.default_value = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_line_break(&mut self, area: MappingArea, index: usize, flag: bool) -> bool {
        match self.fields_mut(area).get_mut(index) {
            Some(f) => {
                f.line_break_after = flag;
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.recipient_fields.is_empty() && self.address_fields.is_empty()
    }
}

fn renumber(fields: &mut [FieldMapping]) {
    for (i, f) in fields.iter_mut().enumerate() {
        f.order = i;
    }
}

/// One address typed in by hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualEntry {
    pub postal_code: String,
    pub prefecture: String,
    pub city: String,
    pub address_line1: String,
    pub address_line2: String,
    pub company_name: String,
    pub title: String,
    pub recipient_name: String,
    pub honorific: String,
    pub line_break_after_company: bool,
    pub line_break_after_title: bool,
}

impl Default for ManualEntry {
    fn default() -> Self {
        ManualEntry {
            postal_code: String::new(),
            prefecture: String::new(),
            city: String::new(),
            address_line1: String::new(),
            address_line2: String::new(),
            company_name: String::new(),
            title: String::new(),
            recipient_name: String::new(),
            honorific: "様".to_string(),
            line_break_after_company: false,
            line_break_after_title: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    Mincho,
    #[default]
    Gothic,
}

/// Everything one document-generation run needs.
#[derive(Clone, Debug)]
pub struct PrintJob {
    pub template: LabelTemplate,
    /// 1-based absolute position of the first record.
    pub start_position: usize,
    pub offset_x: f32,
    pub offset_y: f32,
    pub include_sender: bool,
    pub sender: Option<SenderData>,
    pub font_family: FontFamily,
    pub records: Vec<AddressRecord>,
}

impl PrintJob {
    pub fn new(template: LabelTemplate, records: Vec<AddressRecord>) -> Self {
        PrintJob {
            template,
            start_position: 1,
            offset_x: 0.0,
            offset_y: 0.0,
            include_sender: false,
            sender: None,
            font_family: FontFamily::default(),
            records,
        }
    }

    /// The sender block to draw, if any. A sender without a name is never drawn.
    pub fn effective_sender(&self) -> Option<&SenderData> {
        if !self.include_sender {
            return None;
        }
        self.sender.as_ref().filter(|s| !s.name.is_empty())
    }
}
