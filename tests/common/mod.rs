#![allow(dead_code)]

use std::path::{Path, PathBuf};

use atena_label::{AddressRecord, LoadedFont, RecipientSegment};

/// Every character is one em wide: `size` points per char.
pub fn full_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size
}

pub fn record(address: &[&str], recipient: &[(&str, bool)]) -> AddressRecord {
    AddressRecord {
        address_lines: address.iter().map(|s| s.to_string()).collect(),
        recipient: recipient
            .iter()
            .map(|(text, brk)| RecipientSegment {
                text: text.to_string(),
                break_after: *brk,
            })
            .collect(),
        recipient_breaks_known: true,
    }
}

/// `n` distinct single-line records named 宛先1, 宛先2, ...
pub fn numbered_records(n: usize) -> Vec<AddressRecord> {
    (1..=n)
        .map(|i| record(&["東京都"], &[(&format!("宛先{i}様"), false)]))
        .collect()
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

/// Font for PDF smoke tests: ATENA_TEST_FONT, else the first usable .ttf in
/// the usual system font directories. Tests skip when neither exists.
pub fn test_font_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var("ATENA_TEST_FONT")
        .ok()
        .map(PathBuf::from)
        .filter(|p| p.exists())
    {
        return Some(path);
    }
    let mut dirs = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/Library/Fonts"),
        PathBuf::from("/System/Library/Fonts"),
        PathBuf::from("C:\\Windows\\Fonts"),
    ];
    if let Ok(home) = std::env::var("HOME") {
        dirs.push(PathBuf::from(home).join(".local/share/fonts"));
    }
    dirs.iter().find_map(|dir| first_usable_font(dir))
}

fn first_usable_font(dir: &Path) -> Option<PathBuf> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .flatten()
        .map(|e| e.path())
        .collect();
    entries.sort();
    for path in &entries {
        let is_ttf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ttf"));
        if is_ttf
            && let Ok(data) = std::fs::read(path)
            && LoadedFont::from_bytes(data).is_ok()
        {
            return Some(path.clone());
        }
    }
    entries
        .iter()
        .filter(|p| p.is_dir())
        .find_map(|p| first_usable_font(p))
}

/// Smallest sfnt that parses as a face: head, hhea and maxp, no outlines.
/// `magic` is 0x00010000 (TrueType) or `OTTO` (CFF).
pub fn outline_less_font(magic: &[u8; 4]) -> Vec<u8> {
    let mut head = vec![0u8; 54];
    head[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    head[12..16].copy_from_slice(&0x5F0F_3CF5u32.to_be_bytes());
    head[18..20].copy_from_slice(&1000u16.to_be_bytes());
    let mut hhea = vec![0u8; 36];
    hhea[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    hhea[34..36].copy_from_slice(&1u16.to_be_bytes());
    let mut maxp = 0x0000_5000u32.to_be_bytes().to_vec();
    maxp.extend_from_slice(&1u16.to_be_bytes());

    let tables: [(&[u8; 4], Vec<u8>); 3] = [(b"head", head), (b"hhea", hhea), (b"maxp", maxp)];
    let mut out = Vec::new();
    out.extend_from_slice(magic);
    out.extend_from_slice(&(tables.len() as u16).to_be_bytes());
    out.extend_from_slice(&[0u8; 6]);

    let mut offset = 12 + 16 * tables.len();
    let mut body = Vec::new();
    for (tag, data) in &tables {
        out.extend_from_slice(*tag);
        out.extend_from_slice(&0u32.to_be_bytes());
        out.extend_from_slice(&(offset as u32).to_be_bytes());
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        body.extend_from_slice(data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = 12 + 16 * tables.len() + body.len();
    }
    out.extend_from_slice(&body);
    out
}
