use crate::error::Error;
use crate::model::{AddressRecord, FieldMapping, ManualEntry, MappingDraft, RecipientSegment};

/// Upper bound on hand-typed entries per job.
pub const MAX_MANUAL_ENTRIES: usize = 20;

pub fn from_manual_entry(entry: &ManualEntry) -> AddressRecord {
    let mut recipient = Vec::new();
    if !entry.company_name.is_empty() {
        recipient.push(RecipientSegment {
            text: entry.company_name.clone(),
            break_after: entry.line_break_after_company,
        });
    }
    if !entry.title.is_empty() {
        recipient.push(RecipientSegment {
            text: entry.title.clone(),
            break_after: entry.line_break_after_title,
        });
    }
    recipient.push(RecipientSegment {
        text: format!("{}{}", entry.recipient_name, entry.honorific),
        break_after: false,
    });

    let address_lines = [
        entry.postal_code.clone(),
        format!("{}{}", entry.prefecture, entry.city),
        entry.address_line1.clone(),
        entry.address_line2.clone(),
    ]
    .into_iter()
    .filter(|l| !l.is_empty())
    .collect();

    AddressRecord {
        address_lines,
        recipient,
        recipient_breaks_known: true,
    }
}

/// Normalize hand-typed entries. Entries without a name are skipped; if none
/// remain the whole batch is rejected.
pub fn from_manual_entries(entries: &[ManualEntry]) -> Result<Vec<AddressRecord>, Error> {
    if entries.len() > MAX_MANUAL_ENTRIES {
        return Err(Error::Input(format!(
            "at most {MAX_MANUAL_ENTRIES} manual entries are supported, got {}",
            entries.len()
        )));
    }
    let records: Vec<AddressRecord> = entries
        .iter()
        .filter(|e| !e.recipient_name.trim().is_empty())
        .map(from_manual_entry)
        .collect();
    if records.is_empty() {
        return Err(Error::Input("no entry has a recipient name".into()));
    }
    log::debug!(
        "Manual input: {} of {} entries kept",
        records.len(),
        entries.len()
    );
    Ok(records)
}

fn resolve<'a>(row: &'a [String], field: &'a FieldMapping) -> &'a str {
    match row.get(field.column_index).map(String::as_str) {
        Some(v) if !v.is_empty() => v,
        _ => field.default_value.as_str(),
    }
}

pub fn from_mapped_row(row: &[String], draft: &MappingDraft) -> AddressRecord {
    let recipient = draft
        .recipient_fields
        .iter()
        .filter_map(|field| {
            let value = resolve(row, field);
            (!value.is_empty()).then(|| RecipientSegment {
                text: value.to_string(),
                break_after: field.line_break_after,
            })
        })
        .collect();

    let address_lines = draft
        .address_fields
        .iter()
        .map(|field| resolve(row, field))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();

    AddressRecord {
        address_lines,
        recipient,
        recipient_breaks_known: true,
    }
}

/// One record per row. Unlike manual input, rows without a recipient are kept.
pub fn from_mapped_rows(rows: &[Vec<String>], draft: &MappingDraft) -> Vec<AddressRecord> {
    rows.iter().map(|row| from_mapped_row(row, draft)).collect()
}
