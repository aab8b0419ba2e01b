//! WOFF and WOFF2 unwrapping (made by FontLab https://www.fontlab.com/)
//!
//! Web fonts are rebuilt into a plain sfnt so read-fonts can parse them.
//! Only what inspection needs survives: WOFF2 tables stored with a
//! `glyf`/`loca`/`hmtx` transform are dropped rather than reconstructed.

use std::borrow::Cow;
use std::io::Read;

use anyhow::{anyhow, bail, ensure, Context, Result};
use brotli_decompressor::Decompressor;
use read_fonts::types::Tag;
use tracing::debug;

use crate::sfnt;

pub const WOFF_SIGNATURE: [u8; 4] = *b"wOFF";
pub const WOFF2_SIGNATURE: [u8; 4] = *b"wOF2";

const WOFF_HEADER_LEN: usize = 44;
const WOFF2_HEADER_LEN: usize = 48;
const COLLECTION_FLAVOR: u32 = 0x7474_6366; // 'ttcf'

/// Tags addressable by index in a WOFF2 table directory.
const WOFF2_KNOWN_TAGS: [&[u8; 4]; 63] = [
    b"cmap", b"head", b"hhea", b"hmtx", b"maxp", b"name", b"OS/2", b"post", b"cvt ", b"fpgm",
    b"glyf", b"loca", b"prep", b"CFF ", b"VORG", b"EBDT", b"EBLC", b"gasp", b"hdmx", b"kern",
    b"LTSH", b"PCLT", b"VDMX", b"vhea", b"vmtx", b"BASE", b"GDEF", b"GPOS", b"GSUB", b"EBSC",
    b"JSTF", b"MATH", b"CBDT", b"CBLC", b"COLR", b"CPAL", b"SVG ", b"sbix", b"acnt", b"avar",
    b"bdat", b"bloc", b"bsln", b"cvar", b"fdsc", b"feat", b"fmtx", b"fvar", b"gvar", b"hsty",
    b"just", b"lcar", b"mort", b"morx", b"opbd", b"prop", b"trak", b"Zapf", b"Silf", b"Glat",
    b"Gloc", b"Feat", b"Sill",
];

/// Which web container, if any, `data` is wrapped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Sfnt,
    Woff,
    Woff2,
}

pub fn sniff(data: &[u8]) -> Container {
    match data.get(..4) {
        Some(sig) if sig == WOFF_SIGNATURE => Container::Woff,
        Some(sig) if sig == WOFF2_SIGNATURE => Container::Woff2,
        _ => Container::Sfnt,
    }
}

/// Return sfnt bytes, unwrapping WOFF/WOFF2 when needed.
pub fn to_sfnt(data: &[u8]) -> Result<Cow<'_, [u8]>> {
    match sniff(data) {
        Container::Sfnt => Ok(Cow::Borrowed(data)),
        Container::Woff => decode_woff(data).map(Cow::Owned),
        Container::Woff2 => decode_woff2(data).map(Cow::Owned),
    }
}

/// Rebuild the sfnt stored in a WOFF 1.0 file.
pub fn decode_woff(data: &[u8]) -> Result<Vec<u8>> {
    ensure!(data.len() >= WOFF_HEADER_LEN, "truncated WOFF header");
    let mut header = Reader::new(data);
    let signature = header.u32()?;
    ensure!(signature.to_be_bytes() == WOFF_SIGNATURE, "not a WOFF file");
    let flavor = header.u32()?;
    let _length = header.u32()?;
    let num_tables = header.u16()?;
    ensure!(
        usize::from(num_tables) <= sfnt::MAX_TABLES,
        "WOFF directory lists {num_tables} tables"
    );

    let mut tables = Vec::with_capacity(num_tables as usize);
    let mut dir = Reader::at(data, WOFF_HEADER_LEN);
    for _ in 0..num_tables {
        let tag = Tag::new(&dir.take::<4>()?);
        let offset = dir.u32()? as usize;
        let comp_length = dir.u32()? as usize;
        let orig_length = dir.u32()? as usize;
        let _checksum = dir.u32()?;

        let stored = data
            .get(offset..offset + comp_length)
            .ok_or_else(|| anyhow!("WOFF table {tag} lies outside the file"))?;

        let table = if comp_length < orig_length {
            let inflated = inflate::inflate_bytes_zlib(stored)
                .map_err(|err| anyhow!("inflating WOFF table {tag}: {err}"))?;
            ensure!(
                inflated.len() == orig_length,
                "WOFF table {tag} inflated to {} bytes, expected {orig_length}",
                inflated.len()
            );
            inflated
        } else if comp_length == orig_length {
            stored.to_vec()
        } else {
            bail!("WOFF table {tag} is larger compressed than uncompressed");
        };
        tables.push((tag, table));
    }

    debug!(tables = tables.len(), "unwrapped WOFF");
    Ok(sfnt::assemble(flavor, tables))
}

#[derive(Debug)]
struct Woff2Entry {
    tag: Tag,
    orig_length: u32,
    transform_length: Option<u32>,
}

/// Rebuild an sfnt from a WOFF 2.0 file, keeping untransformed tables.
pub fn decode_woff2(data: &[u8]) -> Result<Vec<u8>> {
    ensure!(data.len() >= WOFF2_HEADER_LEN, "truncated WOFF2 header");
    let mut header = Reader::new(data);
    let signature = header.u32()?;
    ensure!(signature.to_be_bytes() == WOFF2_SIGNATURE, "not a WOFF2 file");
    let flavor = header.u32()?;
    let _length = header.u32()?;
    let num_tables = header.u16()?;
    let _reserved = header.u16()?;
    let total_sfnt_size = header.u32()? as usize;
    let total_compressed_size = header.u32()? as usize;

    if flavor == COLLECTION_FLAVOR {
        bail!("WOFF2 font collections are not supported");
    }
    ensure!(
        usize::from(num_tables) <= sfnt::MAX_TABLES,
        "WOFF2 directory lists {num_tables} tables"
    );

    let mut dir = Reader::at(data, WOFF2_HEADER_LEN);
    let mut entries = Vec::with_capacity(num_tables as usize);
    for _ in 0..num_tables {
        entries.push(read_woff2_entry(&mut dir)?);
    }

    let compressed = data
        .get(dir.pos..dir.pos + total_compressed_size)
        .context("WOFF2 compressed stream is truncated")?;
    let mut stream = Vec::with_capacity(total_sfnt_size.min(compressed.len() * 16));
    Decompressor::new(compressed, 4096)
        .read_to_end(&mut stream)
        .context("decompressing WOFF2 table stream")?;

    let mut tables = Vec::with_capacity(entries.len());
    let mut pos = 0usize;
    for entry in &entries {
        let len = entry.transform_length.unwrap_or(entry.orig_length) as usize;
        let table = stream
            .get(pos..pos + len)
            .ok_or_else(|| anyhow!("WOFF2 table {} overruns the stream", entry.tag))?;
        pos += len;

        if entry.transform_length.is_some() {
            debug!(tag = %entry.tag, "skipping transformed WOFF2 table");
            continue;
        }
        tables.push((entry.tag, table.to_vec()));
    }

    debug!(tables = tables.len(), "unwrapped WOFF2");
    Ok(sfnt::assemble(flavor, tables))
}

fn read_woff2_entry(dir: &mut Reader<'_>) -> Result<Woff2Entry> {
    let flags = dir.u8()?;
    let tag_index = (flags & 0x3F) as usize;
    let tag = if tag_index == 0x3F {
        Tag::new(&dir.take::<4>()?)
    } else {
        Tag::new(WOFF2_KNOWN_TAGS[tag_index])
    };
    let orig_length = dir.uint_base128()?;

    let version = flags >> 6;
    let transformed = if tag == Tag::new(b"glyf") || tag == Tag::new(b"loca") {
        version != 3
    } else {
        version != 0
    };
    let transform_length = if transformed {
        Some(dir.uint_base128()?)
    } else {
        None
    };

    Ok(Woff2Entry {
        tag,
        orig_length,
        transform_length,
    })
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self::at(data, 0)
    }

    fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self
            .data
            .get(self.pos..self.pos + N)
            .ok_or_else(|| anyhow!("unexpected end of data at offset {}", self.pos))?;
        self.pos += N;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take::<1>()?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        self.take().map(u16::from_be_bytes)
    }

    fn u32(&mut self) -> Result<u32> {
        self.take().map(u32::from_be_bytes)
    }

    fn uint_base128(&mut self) -> Result<u32> {
        let mut acc: u32 = 0;
        for i in 0..5 {
            let byte = self.u8()?;
            ensure!(!(i == 0 && byte == 0x80), "UIntBase128 has leading zeros");
            ensure!(acc & 0xFE00_0000 == 0, "UIntBase128 overflows u32");
            acc = (acc << 7) | u32::from(byte & 0x7F);
            if byte & 0x80 == 0 {
                return Ok(acc);
            }
        }
        bail!("UIntBase128 is longer than 5 bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use read_fonts::{FontRef, TableProvider};

    const WOFF_ENTRY_LEN: usize = 20;

    fn name_table() -> Vec<u8> {
        // format 0, one Windows record (nameID 1) holding "Ab" in UTF-16BE
        let mut t = vec![0, 0, 0, 1, 0, 18];
        t.extend_from_slice(&[0, 3, 0, 1, 0x04, 0x09, 0, 1, 0, 4, 0, 0]);
        t.extend_from_slice(&[0, b'A', 0, b'b']);
        t
    }

    fn woff1(flavor: u32, tables: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&WOFF_SIGNATURE);
        out.extend_from_slice(&flavor.to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes());
        out.extend_from_slice(&(tables.len() as u16).to_be_bytes());
        out.resize(WOFF_HEADER_LEN, 0);

        let mut offset = WOFF_HEADER_LEN + WOFF_ENTRY_LEN * tables.len();
        for (tag, data) in tables {
            out.extend_from_slice(*tag);
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

    /// A brotli stream made of one uncompressed meta-block.
    fn brotli_stored(data: &[u8]) -> Vec<u8> {
        let bits = (((data.len() - 1) as u32) << 4) | (1 << 20);
        let mut out = vec![bits as u8, (bits >> 8) as u8, (bits >> 16) as u8];
        out.extend_from_slice(data);
        out.push(0x03);
        out
    }

    #[test]
    fn sniffs_containers() {
        assert_eq!(sniff(b"wOFF...."), Container::Woff);
        assert_eq!(sniff(b"wOF2...."), Container::Woff2);
        assert_eq!(sniff(&[0, 1, 0, 0]), Container::Sfnt);
        assert_eq!(sniff(b""), Container::Sfnt);
    }

    #[test]
    fn stored_woff_tables_round_trip_into_sfnt() {
        let woff = woff1(sfnt::TRUETYPE_FLAVOR, &[(b"name", name_table())]);
        let bytes = decode_woff(&woff).expect("decode woff");

        let font = FontRef::new(&bytes).expect("parse sfnt");
        let name = font.name().expect("name");
        assert_eq!(name.name_record().len(), 1);
        assert_eq!(name.name_record()[0].name_id().to_u16(), 1);
    }

    #[test]
    fn truncated_woff_is_rejected() {
        let mut woff = woff1(sfnt::TRUETYPE_FLAVOR, &[(b"name", name_table())]);
        woff.truncate(WOFF_HEADER_LEN + 8);
        assert!(decode_woff(&woff).is_err());
        assert!(decode_woff(b"wOFF").is_err());
    }

    #[test]
    fn woff2_keeps_plain_tables_and_drops_transformed_ones() {
        let name = name_table();
        let glyf_transformed = vec![9u8; 4];
        let mut stream = name.clone();
        stream.extend_from_slice(&glyf_transformed);
        let compressed = brotli_stored(&stream);

        let mut dir = Vec::new();
        dir.push(5); // name, null transform
        dir.push(name.len() as u8);
        dir.push(10); // glyf, transform version 0
        dir.push(8); // origLength
        dir.push(4); // transformLength

        let mut file = Vec::new();
        file.extend_from_slice(&WOFF2_SIGNATURE);
        file.extend_from_slice(&sfnt::TRUETYPE_FLAVOR.to_be_bytes());
        file.extend_from_slice(&0u32.to_be_bytes());
        file.extend_from_slice(&2u16.to_be_bytes());
        file.extend_from_slice(&0u16.to_be_bytes());
        file.extend_from_slice(&64u32.to_be_bytes());
        file.extend_from_slice(&(compressed.len() as u32).to_be_bytes());
        file.resize(WOFF2_HEADER_LEN, 0);
        file.extend_from_slice(&dir);
        file.extend_from_slice(&compressed);

        let bytes = decode_woff2(&file).expect("decode woff2");
        let font = FontRef::new(&bytes).expect("parse sfnt");
        assert!(font.table_data(Tag::new(b"glyf")).is_none());
        assert_eq!(font.name().expect("name").name_record().len(), 1);
    }

    #[test]
    fn oversized_directories_are_rejected() {
        let mut woff = Vec::new();
        woff.extend_from_slice(&WOFF_SIGNATURE);
        woff.extend_from_slice(&sfnt::TRUETYPE_FLAVOR.to_be_bytes());
        woff.extend_from_slice(&0u32.to_be_bytes());
        woff.extend_from_slice(&4096u16.to_be_bytes());
        woff.resize(WOFF_HEADER_LEN, 0);
        let err = decode_woff(&woff).unwrap_err();
        assert!(err.to_string().contains("4096 tables"));

        let mut woff2 = Vec::new();
        woff2.extend_from_slice(&WOFF2_SIGNATURE);
        woff2.extend_from_slice(&sfnt::TRUETYPE_FLAVOR.to_be_bytes());
        woff2.extend_from_slice(&0u32.to_be_bytes());
        woff2.extend_from_slice(&u16::MAX.to_be_bytes());
        woff2.resize(WOFF2_HEADER_LEN, 0);
        assert!(decode_woff2(&woff2).is_err());
    }

    #[test]
    fn huge_declared_sfnt_size_is_not_trusted() {
        let name = name_table();
        let compressed = brotli_stored(&name);

        let mut file = Vec::new();
        file.extend_from_slice(&WOFF2_SIGNATURE);
        file.extend_from_slice(&sfnt::TRUETYPE_FLAVOR.to_be_bytes());
        file.extend_from_slice(&0u32.to_be_bytes());
        file.extend_from_slice(&1u16.to_be_bytes());
        file.extend_from_slice(&0u16.to_be_bytes());
        file.extend_from_slice(&u32::MAX.to_be_bytes());
        file.extend_from_slice(&(compressed.len() as u32).to_be_bytes());
        file.resize(WOFF2_HEADER_LEN, 0);
        file.extend_from_slice(&[5, name.len() as u8]);
        file.extend_from_slice(&compressed);

        let bytes = decode_woff2(&file).expect("decode woff2");
        assert!(FontRef::new(&bytes).is_ok());
    }

    #[test]
    fn woff2_collections_are_unsupported() {
        let mut file = Vec::new();
        file.extend_from_slice(&WOFF2_SIGNATURE);
        file.extend_from_slice(&COLLECTION_FLAVOR.to_be_bytes());
        file.resize(WOFF2_HEADER_LEN, 0);

        let err = decode_woff2(&file).unwrap_err();
        assert!(err.to_string().contains("collections"));
    }

    #[test]
    fn uint_base128_rules() {
        assert_eq!(Reader::new(&[0x3F]).uint_base128().unwrap(), 63);
        assert_eq!(Reader::new(&[0x81, 0x00]).uint_base128().unwrap(), 128);
        assert!(Reader::new(&[0x80, 0x01]).uint_base128().is_err());
        assert!(Reader::new(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF]).uint_base128().is_err());
    }
}
