//! Font discovery helpers for fontinfo-core (made by FontLab https://www.fontlab.com/)

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Patterns used when the caller supplies none.
pub const DEFAULT_PATTERNS: [&str; 4] = ["*.ttf", "*.otf", "*.ttc", "*.woff*"];

/// Path to a candidate font file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSourceRef {
    pub path: PathBuf,
}

impl FontSourceRef {
    /// Final path component, used as the report header.
    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }
}

/// Trait for enumerating fonts from some backing store.
pub trait FontDiscovery {
    fn discover(&self) -> Result<Vec<FontSourceRef>>;
}

/// Flat listing of one directory, optionally filtered by a filename glob.
#[derive(Debug, Clone)]
pub struct DirDiscovery {
    dir: PathBuf,
    name_pattern: Option<Pattern>,
    case_sensitive: bool,
}

impl DirDiscovery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            name_pattern: None,
            case_sensitive: true,
        }
    }

    /// Keep only files whose basename matches `pattern` (shell glob syntax).
    pub fn with_name_pattern(mut self, pattern: &str) -> Result<Self> {
        let compiled =
            Pattern::new(pattern).with_context(|| format!("invalid name pattern: {pattern}"))?;
        self.name_pattern = Some(compiled);
        Ok(self)
    }

    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    fn name_matches(&self, name: &str) -> bool {
        match &self.name_pattern {
            Some(pattern) => pattern.matches_with(
                name,
                MatchOptions {
                    case_sensitive: self.case_sensitive,
                    require_literal_separator: false,
                    require_literal_leading_dot: false,
                },
            ),
            None => true,
        }
    }
}

impl FontDiscovery for DirDiscovery {
    fn discover(&self) -> Result<Vec<FontSourceRef>> {
        if !self.dir.is_dir() {
            warn!(dir = %self.dir.display(), "font directory does not exist");
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.with_context(|| format!("listing {}", self.dir.display()))?;
            let path = entry.path();
            if !path.is_file() || !is_sfnt_font(path) {
                continue;
            }
            if !self.name_matches(&file_name_of(path)) {
                continue;
            }
            found.push(FontSourceRef {
                path: path.to_path_buf(),
            });
        }

        sort_sources(&mut found);
        debug!(count = found.len(), dir = %self.dir.display(), "directory scan finished");
        Ok(found)
    }
}

/// Expands glob patterns (with `**` support) into a deduplicated file list.
#[derive(Debug, Clone)]
pub struct GlobDiscovery {
    patterns: Vec<String>,
}

impl GlobDiscovery {
    /// An empty pattern list falls back to [`DEFAULT_PATTERNS`].
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        if patterns.is_empty() {
            patterns = DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect();
        }
        Self { patterns }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl FontDiscovery for GlobDiscovery {
    fn discover(&self) -> Result<Vec<FontSourceRef>> {
        let mut unique = BTreeSet::new();

        for pattern in &self.patterns {
            let paths = glob::glob_with(pattern, MatchOptions::new())
                .with_context(|| format!("invalid glob pattern: {pattern}"))?;

            for entry in paths {
                match entry {
                    Ok(path) if path.is_file() => {
                        unique.insert(path);
                    }
                    Ok(_) => {}
                    Err(err) => warn!(%pattern, "skipping unreadable path: {err}"),
                }
            }
        }

        let mut found: Vec<FontSourceRef> = unique
            .into_iter()
            .map(|path| FontSourceRef { path })
            .collect();
        sort_sources(&mut found);
        debug!(count = found.len(), "glob expansion finished");
        Ok(found)
    }
}

fn sort_sources(sources: &mut [FontSourceRef]) {
    sources.sort_by(|a, b| {
        a.file_name()
            .to_lowercase()
            .cmp(&b.file_name().to_lowercase())
            .then_with(|| a.path.cmp(&b.path))
    });
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn is_sfnt_font(path: &Path) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return false,
    };

    matches!(ext.as_str(), "ttf" | "otf" | "ttc")
}
