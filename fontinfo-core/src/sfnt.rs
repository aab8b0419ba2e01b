//! Minimal sfnt writer for fonts rebuilt from web containers (made by FontLab https://www.fontlab.com/)

use read_fonts::types::Tag;

/// sfnt version for TrueType outlines.
pub const TRUETYPE_FLAVOR: u32 = 0x0001_0000;
/// Largest table count whose binary-search header still fits in 16 bits.
pub const MAX_TABLES: usize = 4095;

const HEADER_LEN: usize = 12;
const RECORD_LEN: usize = 16;

/// Lay out `tables` as a standalone sfnt binary.
///
/// Tables are written in tag order, each padded to a 4-byte boundary, with
/// checksums filled in. `head.checkSumAdjustment` is left untouched.
pub fn assemble(flavor: u32, mut tables: Vec<(Tag, Vec<u8>)>) -> Vec<u8> {
    tables.sort_by_key(|(tag, _)| *tag);

    let num_tables = tables.len() as u16;
    let (search_range, entry_selector, range_shift) = binary_search_params(num_tables);

    let dir_len = HEADER_LEN + RECORD_LEN * tables.len();
    let body_len: usize = tables.iter().map(|(_, data)| padded_len(data.len())).sum();
    let mut out = Vec::with_capacity(dir_len + body_len);

    out.extend_from_slice(&flavor.to_be_bytes());
    out.extend_from_slice(&num_tables.to_be_bytes());
    out.extend_from_slice(&search_range.to_be_bytes());
    out.extend_from_slice(&entry_selector.to_be_bytes());
    out.extend_from_slice(&range_shift.to_be_bytes());

    let mut offset = dir_len;
    for (tag, data) in &tables {
        out.extend_from_slice(&tag.to_be_bytes());
        out.extend_from_slice(&checksum(data).to_be_bytes());
        out.extend_from_slice(&(offset as u32).to_be_bytes());
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        offset += padded_len(data.len());
    }

    for (_, data) in &tables {
        out.extend_from_slice(data);
        out.resize(out.len() + padded_len(data.len()) - data.len(), 0);
    }

    out
}

/// OpenType table checksum: wrapping sum of big-endian u32 words, zero padded.
pub fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

fn binary_search_params(num_tables: u16) -> (u16, u16, u16) {
    if num_tables == 0 {
        return (0, 0, 0);
    }
    let num_tables = u32::from(num_tables);
    let entry_selector = 31 - num_tables.leading_zeros();
    let search_range = (1u32 << entry_selector) * 16;
    let range_shift = num_tables * 16 - search_range;
    let clamp = |value: u32| u16::try_from(value).unwrap_or(u16::MAX);
    (clamp(search_range), entry_selector as u16, clamp(range_shift))
}
