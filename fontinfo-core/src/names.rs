//! Human labels for naming-table IDs (made by FontLab https://www.fontlab.com/)

/// Labels for the nameIDs defined by OpenType, in ascending order.
///
/// nameID 15 is reserved and deliberately absent.
pub static NAME_LABELS: &[(u16, &str)] = &[
    (0, "Copyright Notice"),
    (1, "Font Family"),
    (2, "Font Subfamily"),
    (3, "Unique Identifier"),
    (4, "Full Font Name"),
    (5, "Version"),
    (6, "PostScript Name"),
    (7, "Trademark"),
    (8, "Manufacturer Name"),
    (9, "Designer Name"),
    (10, "Description"),
    (11, "Vendor URL"),
    (12, "Designer URL"),
    (13, "License Description"),
    (14, "License URL"),
    (16, "Typographic Family"),
    (17, "Typographic Subfamily"),
    (18, "Compatible Full (Macintosh)"),
    (19, "Sample Text"),
    (20, "PostScript CID findfont Name"),
    (21, "WWS Family Name"),
    (22, "WWS Subfamily Name"),
    (23, "Light Background Palette"),
    (24, "Dark Background Palette"),
    (25, "Variations PostScript Name Prefix"),
];

/// Label for a known nameID, if it has one.
pub fn known_label(name_id: u16) -> Option<&'static str> {
    NAME_LABELS
        .binary_search_by_key(&name_id, |(id, _)| *id)
        .ok()
        .map(|idx| NAME_LABELS[idx].1)
}

/// Label for any nameID; unknown and reserved IDs still get a row.
pub fn name_label(name_id: u16) -> String {
    match known_label(name_id) {
        Some(label) => label.to_string(),
        None => format!("Unknown/reserved ID {name_id}"),
    }
}
