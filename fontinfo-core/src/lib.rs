//! fontinfo-core: The patient reader of font name tables
//!
//! Every font carries a little passport: who made it, what it is called,
//! which version it claims to be, and which alternate letterforms it keeps
//! up its sleeve. This library opens those passports and reads them aloud,
//! so font authors can check what they are about to ship.
//!
//! ## Three Acts of Font Inspection
//!
//! **Discovery**: Finding the fonts worth reading
//! - Lists a directory with an optional filename glob, sorted like a catalogue
//! - Expands glob patterns (including `**`) and drops duplicates politely
//!
//! **Extraction**: Reading the passport
//! - Decodes every naming-table record with its declared encoding
//! - Falls back to forgiving UTF-8 when a record lies about its encoding
//! - Looks for stylistic sets (`ss01`–`ss20`) and their UI names
//! - Unwraps WOFF and WOFF2 containers before reading
//!
//! **Output**: Telling the story
//! - One block per font, rows sorted by nameID
//! - A compact name/version table for quick release checks
//!
//! ## A Sample Conversation
//!
//! ```rust,no_run
//! use fontinfo_core::discovery::{DirDiscovery, FontDiscovery};
//! use fontinfo_core::extract::{extract, ExtractOptions};
//! use fontinfo_core::output::{write_report, ReportOptions};
//!
//! let fonts = DirDiscovery::new(".").discover()?;
//! let reports: Vec<_> = fonts
//!     .iter()
//!     .map(|font| extract(&font.path, &ExtractOptions::default()))
//!     .collect();
//!
//! write_report(&reports, std::io::stdout(), &ReportOptions::default())?;
//! #
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Playground Rules
//!
//! Binary parsing is left to read-fonts; this crate only walks tables that
//! are already parsed. One broken font never spoils the rest of the batch.
//!
//! ---
//!
//! Crafted with care at FontLab https://www.fontlab.com/

pub mod decode;
pub mod discovery;
pub mod extract;
pub mod names;
pub mod output;
pub mod sfnt;
pub mod tags;
#[cfg(feature = "woff")]
pub mod woff;
