use crate::error::Error;
use crate::model::ColumnInfo;

/// Parsed CSV content: the column list for mapping and the data rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub columns: Vec<ColumnInfo>,
    pub rows: Vec<Vec<String>>,
    pub has_header: bool,
}

/// Tokenize CSV text into trimmed cells. Blank lines are skipped and rows may
/// have differing lengths.
pub fn read_rows(text: &str) -> Result<Vec<Vec<String>>, Error> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn is_japanese(ch: char) -> bool {
    matches!(ch,
        '\u{3041}'..='\u{3093}'   // hiragana
        | '\u{30A1}'..='\u{30F6}' // katakana
        | '\u{30FC}'              // prolonged sound mark
        | '\u{4E00}'..='\u{9FA0}')
}

/// A first row counts as a header when any cell contains Japanese text or one
/// of the usual English column words.
pub fn detect_header(first_row: &[String]) -> bool {
    first_row.iter().any(|cell| {
        if cell.chars().any(is_japanese) {
            return true;
        }
        let lower = cell.to_ascii_lowercase();
        ["name", "address", "postal"]
            .iter()
            .any(|kw| lower.contains(kw))
    })
}

pub fn load_table(text: &str) -> Result<CsvTable, Error> {
    let mut parsed = read_rows(text)?;
    if parsed.is_empty() {
        return Err(Error::Csv("no rows found".into()));
    }

    let has_header = detect_header(&parsed[0]);
    let header = if has_header {
        parsed.remove(0)
    } else {
        (1..=parsed[0].len()).map(|i| format!("列{i}")).collect()
    };

    let columns = header
        .into_iter()
        .enumerate()
        .map(|(index, name)| ColumnInfo {
            index,
            name,
            sample: parsed
                .first()
                .and_then(|row| row.get(index))
                .cloned()
                .unwrap_or_default(),
        })
        .collect();

    log::debug!(
        "CSV: {} data rows, header {}",
        parsed.len(),
        if has_header { "detected" } else { "not detected" }
    );

    Ok(CsvTable {
        columns,
        rows: parsed,
        has_header,
    })
}
