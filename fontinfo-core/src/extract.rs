//! Naming-table and stylistic-set extraction (made by FontLab https://www.fontlab.com/)

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use read_fonts::tables::layout::FeatureParams;
use read_fonts::tables::name::{Name, NameRecord};
use read_fonts::types::NameId;
use read_fonts::{FileRef, FontData, FontRef, TableProvider};
use tracing::{debug, warn};

use crate::decode::{decode_name, PLATFORM_WINDOWS};
use crate::discovery::{file_name_of, FontSourceRef};
use crate::names::name_label;
use crate::tags::{is_stylistic_set_tag, tag_to_string};

/// Marker shown in place of data for files that could not be parsed.
pub const INVALID_FONT: &str = "Invalid Font";
/// Marker for a value the font does not provide.
pub const NOT_AVAILABLE: &str = "N/A";
/// Separator between distinct values under [`NamePolicy::AllPlatforms`].
pub const VALUE_SEPARATOR: &str = "; ";

/// How naming-table records sharing a nameID are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamePolicy {
    /// Windows-platform records only; the first record per nameID wins.
    #[default]
    WindowsFirst,
    /// Every platform; distinct decoded values are sorted and joined.
    AllPlatforms,
}

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub policy: NamePolicy,
    pub stylistic_sets: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            policy: NamePolicy::default(),
            stylistic_sets: true,
        }
    }
}

/// One row of the naming table as it will be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEntry {
    pub name_id: u16,
    pub label: String,
    pub value: String,
}

/// A `ssXX` feature and its UI label, when the font provides one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylisticSet {
    pub tag: String,
    pub ui_name: Option<String>,
}

/// Metadata for a single face (collections have several).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceInfo {
    pub ttc_index: Option<u32>,
    pub names: Vec<NameEntry>,
    pub stylistic_sets: Vec<StylisticSet>,
}

impl FaceInfo {
    pub fn value(&self, name_id: u16) -> Option<&str> {
        self.names
            .iter()
            .find(|entry| entry.name_id == name_id)
            .map(|entry| entry.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Parsed(Vec<FaceInfo>),
    Invalid { reason: String },
}

/// Everything learned about one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontReport {
    pub path: PathBuf,
    pub extraction: Extraction,
}

impl FontReport {
    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.extraction, Extraction::Parsed(_))
    }
}

/// Full name and version of a file, for the tabular report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSummary {
    pub path: PathBuf,
    pub full_name: String,
    pub version: String,
}

impl FontSummary {
    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }
}

/// Extract metadata from every source, one file at a time.
pub fn extract_all(sources: &[FontSourceRef], opts: &ExtractOptions) -> Vec<FontReport> {
    sources
        .iter()
        .map(|source| extract(&source.path, opts))
        .collect()
}

/// Extract metadata from one file. Failures become [`Extraction::Invalid`].
///
/// The file is read whole, unwrapped if it arrives as WOFF or WOFF2, and then
/// every face gets its naming table decoded record by record. Nothing here
/// panics on a hostile file: a truncated directory, a missing `name` table or
/// a collection with no faces all end up as a polite reason string.
///
/// ```no_run
/// use fontinfo_core::extract::{extract, ExtractOptions};
///
/// let report = extract("Example-Regular.ttf".as_ref(), &ExtractOptions::default());
/// println!("{} parsed: {}", report.file_name(), report.is_valid());
/// ```
pub fn extract(path: &Path, opts: &ExtractOptions) -> FontReport {
    debug!(path = %path.display(), "extracting");
    let extraction = match load_faces(path, opts) {
        Ok(faces) => Extraction::Parsed(faces),
        Err(err) => {
            debug!(path = %path.display(), "invalid font: {err:#}");
            Extraction::Invalid {
                reason: format!("{err:#}"),
            }
        }
    };

    FontReport {
        path: path.to_path_buf(),
        extraction,
    }
}

/// Read only the full name (nameID 4) and version (nameID 5).
///
/// A file that cannot be parsed still yields a row: `("Invalid Font", "N/A")`.
///
/// Windows records are preferred, any platform will do after that, and a
/// name that is simply absent reads `N/A`. Collections answer for their
/// first face only; the table has one row per file, not per face.
pub fn summarize(path: &Path) -> FontSummary {
    let (full_name, version) = match load_summary(path) {
        Ok(pair) => pair,
        Err(err) => {
            debug!(path = %path.display(), "invalid font: {err:#}");
            (INVALID_FONT.to_string(), NOT_AVAILABLE.to_string())
        }
    };

    FontSummary {
        path: path.to_path_buf(),
        full_name,
        version,
    }
}

fn load_faces(path: &Path, opts: &ExtractOptions) -> Result<Vec<FaceInfo>> {
    let raw = fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    let data = sfnt_bytes(&raw)?;

    let mut faces = Vec::new();
    match FileRef::new(&data).context("parsing font")? {
        FileRef::Font(font) => faces.push(read_face(&font, None, opts)?),
        FileRef::Collection(collection) => {
            for idx in 0..collection.len() {
                let font = collection
                    .get(idx)
                    .with_context(|| format!("parsing face {idx}"))?;
                faces.push(read_face(&font, Some(idx), opts)?);
            }
        }
    }

    ensure!(!faces.is_empty(), "font collection has no faces");
    Ok(faces)
}

fn load_summary(path: &Path) -> Result<(String, String)> {
    let raw = fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    let data = sfnt_bytes(&raw)?;
    let font = FontRef::from_index(&data, 0).context("parsing font")?;
    let name = font.name().context("reading name table")?;

    let pick = |id: NameId| preferred_value(&name, id).unwrap_or_else(|| NOT_AVAILABLE.into());
    Ok((pick(NameId::FULL_NAME), pick(NameId::VERSION_STRING)))
}

#[cfg(feature = "woff")]
fn sfnt_bytes(raw: &[u8]) -> Result<Cow<'_, [u8]>> {
    crate::woff::to_sfnt(raw)
}

#[cfg(not(feature = "woff"))]
fn sfnt_bytes(raw: &[u8]) -> Result<Cow<'_, [u8]>> {
    Ok(Cow::Borrowed(raw))
}

/// Read names (and optionally stylistic sets) from an already parsed face.
pub fn read_face(
    font: &FontRef,
    ttc_index: Option<u32>,
    opts: &ExtractOptions,
) -> Result<FaceInfo> {
    let name = font.name().context("reading name table")?;
    let names = collect_names(&name, opts.policy);
    let stylistic_sets = if opts.stylistic_sets {
        collect_stylistic_sets(font, &name)
    } else {
        Vec::new()
    };

    debug!(
        ?ttc_index,
        names = names.len(),
        stylistic_sets = stylistic_sets.len(),
        "face read"
    );
    Ok(FaceInfo {
        ttc_index,
        names,
        stylistic_sets,
    })
}

fn collect_names(name: &Name, policy: NamePolicy) -> Vec<NameEntry> {
    let data = name.string_data();

    let values: BTreeMap<u16, String> = match policy {
        NamePolicy::WindowsFirst => {
            let mut first = BTreeMap::new();
            for record in name.name_record() {
                if record.platform_id() != PLATFORM_WINDOWS {
                    continue;
                }
                first
                    .entry(record.name_id().to_u16())
                    .or_insert_with(|| decode_record(record, data));
            }
            first
        }
        NamePolicy::AllPlatforms => {
            let mut union: BTreeMap<u16, BTreeSet<String>> = BTreeMap::new();
            for record in name.name_record() {
                union
                    .entry(record.name_id().to_u16())
                    .or_default()
                    .insert(decode_record(record, data));
            }
            union
                .into_iter()
                .map(|(id, distinct)| (id, join_values(distinct)))
                .collect()
        }
    };

    values
        .into_iter()
        .map(|(name_id, value)| NameEntry {
            name_id,
            label: name_label(name_id),
            value,
        })
        .collect()
}

fn join_values(distinct: BTreeSet<String>) -> String {
    distinct.into_iter().collect::<Vec<_>>().join(VALUE_SEPARATOR)
}

/// First Windows record for `id`, else the first record of any platform.
fn preferred_value(name: &Name, id: NameId) -> Option<String> {
    let data = name.string_data();
    let records = name.name_record();
    records
        .iter()
        .find(|r| r.name_id() == id && r.platform_id() == PLATFORM_WINDOWS)
        .or_else(|| records.iter().find(|r| r.name_id() == id))
        .map(|r| decode_record(r, data))
}

fn collect_stylistic_sets(font: &FontRef, name: &Name) -> Vec<StylisticSet> {
    let Ok(gsub) = font.gsub() else {
        return Vec::new();
    };
    let Ok(list) = gsub.feature_list() else {
        return Vec::new();
    };

    let mut sets: Vec<StylisticSet> = Vec::new();
    for record in list.feature_records() {
        let tag = record.feature_tag();
        if !is_stylistic_set_tag(tag) {
            continue;
        }

        let ui_name = record
            .feature(list.offset_data())
            .ok()
            .and_then(|feature| feature.feature_params())
            .and_then(|params| params.ok())
            .and_then(|params| match params {
                FeatureParams::StylisticSet(ss) => Some(ss.ui_name_id()),
                _ => None,
            })
            .and_then(|id| lookup_name(name, id));

        let tag = tag_to_string(tag);
        match sets.iter_mut().find(|set| set.tag == tag) {
            Some(existing) => {
                if existing.ui_name.is_none() {
                    existing.ui_name = ui_name;
                }
            }
            None => sets.push(StylisticSet { tag, ui_name }),
        }
    }
    sets
}

/// First record carrying `id`, in table order, regardless of platform.
fn lookup_name(name: &Name, id: NameId) -> Option<String> {
    let data = name.string_data();
    name.name_record()
        .iter()
        .find(|record| record.name_id() == id)
        .map(|record| decode_record(record, data))
}

fn decode_record(record: &NameRecord, data: FontData<'_>) -> String {
    decode_name(
        record.platform_id(),
        record.encoding_id(),
        record_bytes(record, data),
    )
}

fn record_bytes<'a>(record: &NameRecord, data: FontData<'a>) -> &'a [u8] {
    let start = record.string_offset().to_u32() as usize;
    let end = start + record.length() as usize;
    match data.as_bytes().get(start..end) {
        Some(bytes) => bytes,
        None => {
            warn!(
                name_id = record.name_id().to_u16(),
                "name record points outside string storage"
            );
            &[]
        }
    }
}
