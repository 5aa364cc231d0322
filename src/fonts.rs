use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use memmap2::Mmap;
use pdf_writer::{Filter, Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::error::Error;
use crate::model::FontFamily;
use crate::wrap::TextMeasure;

impl FontFamily {
    /// Fixed download location for this family.
    pub fn url(self) -> &'static str {
        match self {
            FontFamily::Mincho => {
                "https://fonts.gstatic.com/s/notoserifhk/v2/BngdUXBETWXI6LwlBZGcqL-B_KuJFNoGRv7f9w.ttf"
            }
            FontFamily::Gothic => {
                "https://fonts.gstatic.com/s/notosansjp/v52/-F6jfjtqLzI2JPCgQBnw7HFyzSD-AsregP8VFBEi75vY0rw-oME.ttf"
            }
        }
    }

    /// Family names accepted when searching local font directories.
    pub fn family_names(self) -> &'static [&'static str] {
        match self {
            FontFamily::Mincho => &["Noto Serif HK", "Noto Serif JP", "IPAexMincho", "IPAMincho"],
            FontFamily::Gothic => &["Noto Sans JP", "IPAexGothic", "IPAGothic"],
        }
    }

    fn cache_file_name(self) -> &'static str {
        match self {
            FontFamily::Mincho => "mincho.ttf",
            FontFamily::Gothic => "gothic.ttf",
        }
    }
}

impl std::str::FromStr for FontFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "mincho" => Ok(FontFamily::Mincho),
            "gothic" => Ok(FontFamily::Gothic),
            other => Err(Error::Input(format!(
                "unknown font family '{other}' (expected mincho or gothic)"
            ))),
        }
    }
}

/// Where to look for font bytes, resolved once per job.
#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Explicit font file; skips every other source.
    pub font_path: Option<PathBuf>,
    pub font_dirs: Vec<PathBuf>,
    pub use_cache: bool,
    pub allow_fetch: bool,
    pub fetch_timeout: Duration,
}

impl Default for FontConfig {
    fn default() -> Self {
        FontConfig {
            font_path: None,
            font_dirs: Vec::new(),
            use_cache: true,
            allow_fetch: cfg!(feature = "fetch"),
            fetch_timeout: Duration::from_secs(60),
        }
    }
}

impl FontConfig {
    /// Defaults plus `ATENA_FONTS` (path list) and `ATENA_NO_FONT_CACHE`.
    pub fn from_env() -> Self {
        let mut config = FontConfig::default();
        if let Ok(val) = std::env::var("ATENA_FONTS") {
            let sep = if cfg!(windows) { ';' } else { ':' };
            for part in val.split(sep) {
                let trimmed = part.trim();
                if !trimmed.is_empty() {
                    config.font_dirs.push(PathBuf::from(trimmed));
                }
            }
        }
        if std::env::var("ATENA_NO_FONT_CACHE").is_ok() {
            config.use_cache = false;
        }
        config
    }
}

/// Raw font bytes that parsed successfully as a single TrueType-outline face.
pub struct LoadedFont {
    pub name: String,
    pub data: Vec<u8>,
}

impl LoadedFont {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, Error> {
        if ttf_parser::fonts_in_collection(&data).is_some() {
            return Err(Error::Font(
                "font collections (.ttc) are not supported, use a single .ttf or .otf".into(),
            ));
        }
        let face = Face::parse(&data, 0)
            .map_err(|e| Error::Font(format!("unusable font data: {e}")))?;
        // Glyph IDs are written as CIDs with an Identity CIDToGIDMap, which
        // only holds for glyf outlines.
        if !has_truetype_outlines(&face) {
            return Err(Error::Font(
                "only TrueType-outline fonts are supported, CFF-based .otf fonts cannot be embedded"
                    .into(),
            ));
        }
        let name = font_family_name(&face).unwrap_or_else(|| "AtenaFont".to_string());
        Ok(LoadedFont { name, data })
    }

    pub fn face(&self) -> Result<Face<'_>, Error> {
        Face::parse(&self.data, 0).map_err(|e| Error::Font(format!("unusable font data: {e}")))
    }
}

/// Measures text with the face's horizontal advances.
pub(crate) struct FaceMeasure<'a> {
    face: &'a Face<'a>,
    units: f32,
}

impl<'a> FaceMeasure<'a> {
    pub(crate) fn new(face: &'a Face<'a>) -> Self {
        FaceMeasure {
            face,
            units: face.units_per_em() as f32,
        }
    }

    fn char_width_1000(&self, ch: char) -> f32 {
        let gid = self.face.glyph_index(ch).unwrap_or(ttf_parser::GlyphId(0));
        self.face
            .glyph_hor_advance(gid)
            .map(|adv| adv as f32 / self.units * 1000.0)
            .unwrap_or(0.0)
    }
}

impl TextMeasure for FaceMeasure<'_> {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }
}

fn font_family_name(face: &Face) -> Option<String> {
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::FAMILY
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s);
        }
    }
    None
}

fn has_truetype_outlines(face: &Face) -> bool {
    face.tables().glyf.is_some()
}

fn is_font_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("ttf" | "otf")
    )
}

fn cache_dir() -> Option<PathBuf> {
    let dir = if cfg!(target_os = "macos") {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join("Library/Caches/atena-label"))
    } else if cfg!(target_os = "windows") {
        std::env::var("LOCALAPPDATA")
            .ok()
            .map(|d| PathBuf::from(d).join("atena-label/cache"))
    } else {
        std::env::var("XDG_CACHE_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".cache"))
            })
            .map(|d| d.join("atena-label"))
    };
    dir.map(|d| d.join("fonts"))
}

/// Walk `dirs` for a single-face font whose family matches one of `families`.
fn find_in_dirs(dirs: &[PathBuf], families: &[&str]) -> Option<PathBuf> {
    let wanted: Vec<String> = families.iter().map(|f| f.to_lowercase()).collect();
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut stack: Vec<PathBuf> = dirs.to_vec();
    let mut best: Option<(usize, PathBuf)> = None;

    while let Some(dir) = stack.pop() {
        if !visited.insert(dir.clone()) {
            continue;
        }
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if !is_font_file(&path) {
                continue;
            }
            let Ok(file) = std::fs::File::open(&path) else {
                continue;
            };
            let Ok(data) = (unsafe { Mmap::map(&file) }) else {
                continue;
            };
            let Some(family) = Face::parse(&data, 0)
                .ok()
                .filter(has_truetype_outlines)
                .and_then(|face| font_family_name(&face))
            else {
                continue;
            };
            let family = family.to_lowercase();
            if let Some(rank) = wanted.iter().position(|w| *w == family)
                && best.as_ref().is_none_or(|(r, _)| rank < *r)
            {
                best = Some((rank, path));
            }
        }
    }
    best.map(|(_, path)| path)
}

#[cfg(feature = "fetch")]
fn fetch_bytes(url: &str, timeout: Duration) -> Result<Vec<u8>, Error> {
    use std::io::Read;

    let agent = ureq::AgentBuilder::new()
        .timeout_connect(timeout)
        .timeout_read(timeout)
        .build();
    let response = agent
        .get(url)
        .call()
        .map_err(|e| Error::Font(format!("font download failed: {e}")))?;
    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| Error::Font(format!("font download failed: {e}")))?;
    Ok(bytes)
}

#[cfg(not(feature = "fetch"))]
fn fetch_bytes(url: &str, _timeout: Duration) -> Result<Vec<u8>, Error> {
    Err(Error::Font(format!(
        "no local font found and downloading is disabled (would fetch {url})"
    )))
}

fn store_in_cache(path: &Path, bytes: &[u8]) {
    if let Some(dir) = path.parent()
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        log::warn!("Cannot create font cache dir {}: {e}", dir.display());
        return;
    }
    let tmp = path.with_extension("part");
    let result = std::fs::write(&tmp, bytes).and_then(|_| std::fs::rename(&tmp, path));
    if let Err(e) = result {
        log::warn!("Cannot write font cache {}: {e}", path.display());
        let _ = std::fs::remove_file(&tmp);
    }
}

/// Resolve `family` to usable font bytes: explicit file, local directories,
/// download cache, then the network. Any failure ends the job.
pub fn load_font(family: FontFamily, config: &FontConfig) -> Result<LoadedFont, Error> {
    let t0 = std::time::Instant::now();

    if let Some(path) = &config.font_path {
        let data = std::fs::read(path)
            .map_err(|e| Error::Font(format!("{}: {e}", path.display())))?;
        log::debug!("Font {family:?}: using {}", path.display());
        return LoadedFont::from_bytes(data);
    }

    if let Some(path) = find_in_dirs(&config.font_dirs, family.family_names()) {
        log::debug!("Font {family:?}: found {}", path.display());
        let data = std::fs::read(&path)
            .map_err(|e| Error::Font(format!("{}: {e}", path.display())))?;
        return LoadedFont::from_bytes(data);
    }

    let cached = config
        .use_cache
        .then(cache_dir)
        .flatten()
        .map(|d| d.join(family.cache_file_name()));

    if let Some(path) = &cached
        && let Ok(data) = std::fs::read(path)
    {
        match LoadedFont::from_bytes(data) {
            Ok(font) => {
                log::debug!("Font {family:?}: cache hit {}", path.display());
                return Ok(font);
            }
            Err(e) => log::warn!("Ignoring cached font {}: {e}", path.display()),
        }
    }

    if !config.allow_fetch {
        return Err(Error::Font(format!(
            "no local font for {family:?} and downloading is disabled"
        )));
    }

    let url = family.url();
    log::info!("Downloading font {family:?} from {url}");
    let data = fetch_bytes(url, config.fetch_timeout)?;
    let font = LoadedFont::from_bytes(data)?;
    if let Some(path) = &cached {
        store_in_cache(path, &font.data);
    }
    log::info!(
        "Font {family:?} ready in {:.1}ms ({} bytes)",
        t0.elapsed().as_secs_f64() * 1000.0,
        font.data.len()
    );
    Ok(font)
}

/// Font as written into the PDF: resource name plus the glyph map used to
/// encode content-stream strings.
pub(crate) struct FontEntry {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
    pub(crate) char_to_gid: HashMap<char, u16>,
}

/// Encode UTF-8 text as big-endian 2-byte glyph IDs for CIDFont content streams.
pub(crate) fn encode_as_gids(text: &str, char_to_gid: &HashMap<char, u16>) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for ch in text.chars() {
        let gid = char_to_gid.get(&ch).copied().unwrap_or(0);
        out.push((gid >> 8) as u8);
        out.push((gid & 0xFF) as u8);
    }
    out
}

/// Embed the whole font as a CIDFontType2 (Type0 composite) with Identity-H
/// encoding. Glyph IDs are the font's own, so CIDToGIDMap is Identity.
pub(crate) fn embed_font(
    pdf: &mut Pdf,
    font: &LoadedFont,
    face: &Face,
    pdf_name: String,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<FontEntry, Error> {
    let font_ref = alloc();
    let descriptor_ref = alloc();
    let data_ref = alloc();
    let cid_font_ref = alloc();
    let tounicode_ref = alloc();

    let units = face.units_per_em() as f32;
    let ascent = face.ascender() as f32 / units * 1000.0;
    let descent = face.descender() as f32 / units * 1000.0;
    let cap_height = face
        .capital_height()
        .map(|h| h as f32 / units * 1000.0)
        .unwrap_or(700.0);

    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        bb.x_min as f32 / units * 1000.0,
        bb.y_min as f32 / units * 1000.0,
        bb.x_max as f32 / units * 1000.0,
        bb.y_max as f32 / units * 1000.0,
    );

    let mut char_to_gid = HashMap::new();
    let mut gid_widths: Vec<(u16, f32)> = Vec::new();
    for &ch in used_chars {
        if let Some(gid) = face.glyph_index(ch) {
            char_to_gid.insert(ch, gid.0);
            let w = face
                .glyph_hor_advance(gid)
                .map(|adv| adv as f32 / units * 1000.0)
                .unwrap_or(0.0);
            gid_widths.push((gid.0, w));
        } else {
            log::debug!("No glyph for {ch:?} in {}", font.name);
        }
    }
    gid_widths.sort_by_key(|&(gid, _)| gid);
    gid_widths.dedup_by_key(|&mut (gid, _)| gid);

    let raw_len = i32::try_from(font.data.len())
        .map_err(|_| Error::Pdf(format!("font {} is too large to embed", font.name)))?;
    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&font.data, 6);
    {
        let mut stream = pdf.stream(data_ref, &compressed);
        stream.filter(Filter::FlateDecode);
        stream.pair(Name(b"Length1"), raw_len);
    }

    let ps_name: String = font.name.chars().filter(|c| !c.is_whitespace()).collect();

    {
        let mut descriptor = pdf.font_descriptor(descriptor_ref);
        descriptor
            .name(Name(ps_name.as_bytes()))
            .flags(pdf_writer::types::FontFlags::SYMBOLIC)
            .bbox(bbox)
            .italic_angle(0.0)
            .ascent(ascent)
            .descent(descent)
            .cap_height(cap_height)
            .stem_v(80.0)
            .font_file2(data_ref);
    }

    let system_info = pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    };
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info);
        cid.font_descriptor(descriptor_ref);
        cid.default_width(1000.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let cmap_name = format!("{}-UTF16", ps_name);
    let mut cmap = pdf_writer::types::UnicodeCmap::new(
        Name(cmap_name.as_bytes()),
        pdf_writer::types::SystemInfo {
            registry: pdf_writer::Str(b"Adobe"),
            ordering: pdf_writer::Str(b"Identity"),
            supplement: 0,
        },
    );
    for (&ch, &gid) in &char_to_gid {
        cmap.pair(gid, ch);
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    Ok(FontEntry {
        pdf_name,
        font_ref,
        char_to_gid,
    })
}
