//! Font tags, read aloud
//!
//! OpenType names its tables and features with four-byte tags. Stylistic
//! sets are the well-behaved ones: always `ss` followed by two digits.
//!
//! Made with curiosity at FontLab https://www.fontlab.com/

use read_fonts::types::Tag;

/// Render a tag as text, replacing bytes that are not valid UTF-8.
pub fn tag_to_string(tag: Tag) -> String {
    String::from_utf8_lossy(&tag.to_be_bytes()).to_string()
}

/// `ss` followed by exactly two ASCII digits (`ss01`, `ss20`, ...).
pub fn is_stylistic_set_tag(tag: Tag) -> bool {
    let [a, b, c, d] = tag.to_be_bytes();
    a == b's' && b == b's' && c.is_ascii_digit() && d.is_ascii_digit()
}
