//! Item record types and text rendering
//!
//! This module defines the structured record produced for each catalog item
//! and its serialized plain-text form:
//! - `ItemRecord`: one record per detail page, immutable once built
//! - `LinkCategory`: the fixed download-link groupings
//! - `LinkEntry`: a single categorized download link

use std::collections::BTreeMap;
use std::fmt;

/// Placeholder value for fields absent from a detail page
pub const UNKNOWN: &str = "Unknown";

/// The fixed download-link groupings, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LinkCategory {
    BaseGame,
    Update,
    Fix,
    Torrent,
}

impl LinkCategory {
    /// All categories in the order they appear in rendered output
    pub const ALL: [LinkCategory; 4] = [
        LinkCategory::BaseGame,
        LinkCategory::Update,
        LinkCategory::Fix,
        LinkCategory::Torrent,
    ];

    /// The section label used in rendered output
    pub fn label(&self) -> &'static str {
        match self {
            LinkCategory::BaseGame => "Base Game",
            LinkCategory::Update => "Update",
            LinkCategory::Fix => "Fix",
            LinkCategory::Torrent => "Torrent",
        }
    }
}

/// A single download link: target href plus its anchor text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    pub href: String,
    pub label: String,
}

impl fmt::Display for LinkEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.href, self.label)
    }
}

/// Structured metadata extracted from one detail page
///
/// Missing optional fields hold the `Unknown` sentinel rather than being
/// omitted; `sizes` stays empty when no size tokens were found (the sentinel
/// is applied at render time). Categories with no links are absent from
/// `link_groups` entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    /// The detail page this record was extracted from
    pub source_url: String,

    /// Display title, or `Unknown`
    pub name: String,

    /// Attribute-table fields, each defaulting to `Unknown`
    pub version: String,
    pub language: String,
    pub firmware: String,

    /// Human-readable size tokens in order of appearance on the page
    pub sizes: Vec<String>,

    /// Categorized download links in document order within each category
    pub link_groups: BTreeMap<LinkCategory, Vec<LinkEntry>>,
}

impl ItemRecord {
    /// Creates a record for `source_url` with every field at its sentinel
    pub fn unknown(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            name: UNKNOWN.to_string(),
            version: UNKNOWN.to_string(),
            language: UNKNOWN.to_string(),
            firmware: UNKNOWN.to_string(),
            sizes: Vec::new(),
            link_groups: BTreeMap::new(),
        }
    }

    /// Appends a link to the given category's group
    pub fn push_link(&mut self, category: LinkCategory, entry: LinkEntry) {
        self.link_groups.entry(category).or_default().push(entry);
    }

    /// Renders the record as its on-disk text block
    ///
    /// Layout: URL and attribute lines, a "Detected Sizes" section listing
    /// each size (or the sentinel), then a "Download Links" section with one
    /// labeled subsection per non-empty category. Lines are joined with a
    /// single newline; empty categories are omitted rather than emitted empty.
    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("URL: {}", self.source_url),
            format!("Game Name: {}", self.name),
            format!("Game Version: {}", self.version),
            format!("Language: {}", self.language),
            format!("Required firmware: {}", self.firmware),
            "\nDetected Sizes:".to_string(),
        ];

        if self.sizes.is_empty() {
            lines.push(format!("- {}", UNKNOWN));
        } else {
            for size in &self.sizes {
                lines.push(format!("- {}", size));
            }
        }

        lines.push("\nDownload Links:".to_string());
        for category in LinkCategory::ALL {
            if let Some(links) = self.link_groups.get(&category) {
                if links.is_empty() {
                    continue;
                }
                lines.push(format!("\n[{}]", category.label()));
                for link in links {
                    lines.push(format!("- {}", link));
                }
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ItemRecord {
        let mut record = ItemRecord {
            source_url: "https://catalog.example.com/2024/some-game-ps4".to_string(),
            name: "Some Game".to_string(),
            version: "1.03".to_string(),
            language: "English".to_string(),
            firmware: "9.00".to_string(),
            sizes: vec!["12.34 GB".to_string(), "0.56 GB".to_string()],
            link_groups: BTreeMap::new(),
        };
        record.push_link(
            LinkCategory::BaseGame,
            LinkEntry {
                href: "https://dl.example.com/base.zip".to_string(),
                label: "Part 1".to_string(),
            },
        );
        record
    }

    #[test]
    fn test_category_order_matches_declaration() {
        let mut sorted = LinkCategory::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, LinkCategory::ALL.to_vec());
    }

    #[test]
    fn test_link_entry_display() {
        let entry = LinkEntry {
            href: "https://dl.example.com/a.zip".to_string(),
            label: "Mirror".to_string(),
        };
        assert_eq!(entry.to_string(), "https://dl.example.com/a.zip - Mirror");
    }

    #[test]
    fn test_unknown_record_defaults() {
        let record = ItemRecord::unknown("https://catalog.example.com/x");
        assert_eq!(record.name, UNKNOWN);
        assert_eq!(record.version, UNKNOWN);
        assert_eq!(record.language, UNKNOWN);
        assert_eq!(record.firmware, UNKNOWN);
        assert!(record.sizes.is_empty());
        assert!(record.link_groups.is_empty());
    }

    #[test]
    fn test_render_full_record() {
        let record = sample_record();
        let text = record.render();

        let expected = "URL: https://catalog.example.com/2024/some-game-ps4\n\
                        Game Name: Some Game\n\
                        Game Version: 1.03\n\
                        Language: English\n\
                        Required firmware: 9.00\n\
                        \n\
                        Detected Sizes:\n\
                        - 12.34 GB\n\
                        - 0.56 GB\n\
                        \n\
                        Download Links:\n\
                        \n\
                        [Base Game]\n\
                        - https://dl.example.com/base.zip - Part 1";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_no_sizes_uses_sentinel() {
        let mut record = sample_record();
        record.sizes.clear();
        let text = record.render();
        assert!(text.contains("Detected Sizes:\n- Unknown"));
    }

    #[test]
    fn test_render_omits_empty_categories() {
        let record = sample_record();
        let text = record.render();
        assert!(text.contains("[Base Game]"));
        assert!(!text.contains("[Update]"));
        assert!(!text.contains("[Fix]"));
        assert!(!text.contains("[Torrent]"));
    }

    #[test]
    fn test_render_category_order() {
        let mut record = sample_record();
        record.push_link(
            LinkCategory::Torrent,
            LinkEntry {
                href: "magnet:?xt=abc".to_string(),
                label: "Torrent".to_string(),
            },
        );
        record.push_link(
            LinkCategory::Update,
            LinkEntry {
                href: "https://dl.example.com/update.zip".to_string(),
                label: "v1.03".to_string(),
            },
        );
        let text = record.render();

        let base = text.find("[Base Game]").unwrap();
        let update = text.find("[Update]").unwrap();
        let torrent = text.find("[Torrent]").unwrap();
        assert!(base < update);
        assert!(update < torrent);
    }

    #[test]
    fn test_render_is_deterministic() {
        let record = sample_record();
        assert_eq!(record.render(), record.render());
    }
}
