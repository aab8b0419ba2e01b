//! In-memory font fixtures: just enough `name` and `GSUB` to exercise extraction.
#![allow(dead_code)]

use fontinfo_core::sfnt::{assemble, TRUETYPE_FLAVOR};
use read_fonts::types::Tag;

/// A naming-table record before it is laid out.
#[derive(Debug, Clone)]
pub struct NameRec {
    pub platform: u16,
    pub encoding: u16,
    pub language: u16,
    pub name_id: u16,
    pub bytes: Vec<u8>,
}

/// Windows Unicode BMP record, English (US).
pub fn win(name_id: u16, text: &str) -> NameRec {
    NameRec {
        platform: 3,
        encoding: 1,
        language: 0x0409,
        name_id,
        bytes: text.encode_utf16().flat_map(|u| u.to_be_bytes()).collect(),
    }
}

/// Macintosh Roman record, English. Only ASCII text is expected here.
pub fn mac(name_id: u16, text: &str) -> NameRec {
    NameRec {
        platform: 1,
        encoding: 0,
        language: 0,
        name_id,
        bytes: text.as_bytes().to_vec(),
    }
}

pub fn raw(platform: u16, encoding: u16, name_id: u16, bytes: &[u8]) -> NameRec {
    NameRec {
        platform,
        encoding,
        language: 0,
        name_id,
        bytes: bytes.to_vec(),
    }
}

pub fn name_table(records: &[NameRec]) -> Vec<u8> {
    let storage_offset = 6 + 12 * records.len();
    let mut out = Vec::new();
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&(records.len() as u16).to_be_bytes());
    out.extend_from_slice(&(storage_offset as u16).to_be_bytes());

    let mut offset = 0usize;
    for rec in records {
        for field in [rec.platform, rec.encoding, rec.language, rec.name_id] {
            out.extend_from_slice(&field.to_be_bytes());
        }
        out.extend_from_slice(&(rec.bytes.len() as u16).to_be_bytes());
        out.extend_from_slice(&(offset as u16).to_be_bytes());
        offset += rec.bytes.len();
    }
    for rec in records {
        out.extend_from_slice(&rec.bytes);
    }
    out
}

/// GSUB 1.0 with empty script and lookup lists and the given feature records.
///
/// `Some(id)` attaches stylistic-set params pointing at UI nameID `id`.
pub fn gsub_table(features: &[(&[u8; 4], Option<u16>)]) -> Vec<u8> {
    const SCRIPT_LIST: u16 = 10;
    const LOOKUP_LIST: u16 = 12;
    const FEATURE_LIST: u16 = 14;

    let mut out = Vec::new();
    out.extend_from_slice(&[0, 1, 0, 0]);
    out.extend_from_slice(&SCRIPT_LIST.to_be_bytes());
    out.extend_from_slice(&FEATURE_LIST.to_be_bytes());
    out.extend_from_slice(&LOOKUP_LIST.to_be_bytes());
    out.extend_from_slice(&[0, 0]); // ScriptList: no scripts
    out.extend_from_slice(&[0, 0]); // LookupList: no lookups

    let mut tables: Vec<Vec<u8>> = Vec::new();
    for (_, ui_name) in features {
        let table = match ui_name {
            Some(id) => {
                let mut t = vec![0, 4, 0, 0, 0, 0];
                t.extend_from_slice(&id.to_be_bytes());
                t
            }
            None => vec![0, 0, 0, 0],
        };
        tables.push(table);
    }

    out.extend_from_slice(&(features.len() as u16).to_be_bytes());
    let mut offset = 2 + 6 * features.len();
    for ((tag, _), table) in features.iter().zip(&tables) {
        out.extend_from_slice(*tag);
        out.extend_from_slice(&(offset as u16).to_be_bytes());
        offset += table.len();
    }
    for table in tables {
        out.extend_from_slice(&table);
    }
    out
}

/// Tables for a face with a naming table and, optionally, GSUB features.
pub fn face_tables(
    records: &[NameRec],
    features: Option<&[(&[u8; 4], Option<u16>)]>,
) -> Vec<(Tag, Vec<u8>)> {
    let mut tables = vec![(Tag::new(b"name"), name_table(records))];
    if let Some(features) = features {
        tables.push((Tag::new(b"GSUB"), gsub_table(features)));
    }
    tables
}

pub fn font(records: &[NameRec]) -> Vec<u8> {
    assemble(TRUETYPE_FLAVOR, face_tables(records, None))
}

pub fn font_with_features(records: &[NameRec], features: &[(&[u8; 4], Option<u16>)]) -> Vec<u8> {
    assemble(TRUETYPE_FLAVOR, face_tables(records, Some(features)))
}

/// Join standalone sfnt binaries into a TTC, rebasing their table offsets.
pub fn collection(faces: &[Vec<u8>]) -> Vec<u8> {
    let header_len = 12 + 4 * faces.len();
    let mut bases = Vec::new();
    let mut base = header_len;
    for face in faces {
        bases.push(base);
        base += face.len();
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"ttcf");
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&(faces.len() as u32).to_be_bytes());
    for base in &bases {
        out.extend_from_slice(&(*base as u32).to_be_bytes());
    }

    for (face, base) in faces.iter().zip(&bases) {
        let mut face = face.clone();
        let num_tables = u16::from_be_bytes([face[4], face[5]]) as usize;
        for i in 0..num_tables {
            let pos = 12 + 16 * i + 8;
            let old = u32::from_be_bytes([face[pos], face[pos + 1], face[pos + 2], face[pos + 3]]);
            let new = old + *base as u32;
            face[pos..pos + 4].copy_from_slice(&new.to_be_bytes());
        }
        out.extend_from_slice(&face);
    }
    out
}

/// WOFF 1.0 with every table stored uncompressed.
pub fn woff(tables: &[(Tag, Vec<u8>)]) -> Vec<u8> {
    const HEADER_LEN: usize = 44;
    const ENTRY_LEN: usize = 20;

    let mut out = Vec::new();
    out.extend_from_slice(b"wOFF");
    out.extend_from_slice(&TRUETYPE_FLAVOR.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(&(tables.len() as u16).to_be_bytes());
    out.resize(HEADER_LEN, 0);

    let mut offset = HEADER_LEN + ENTRY_LEN * tables.len();
    for (tag, data) in tables {
        out.extend_from_slice(&tag.to_be_bytes());
        out.extend_from_slice(&(offset as u32).to_be_bytes());
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes());
        offset += (data.len() + 3) & !3;
    }
    for (_, data) in tables {
        out.extend_from_slice(data);
        out.resize((out.len() + 3) & !3, 0);
    }
    out
}
