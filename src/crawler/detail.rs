//! Detail page extraction
//!
//! This module turns one fetched detail page into a structured `ItemRecord`:
//! - Title from the entry heading
//! - Version/language/firmware from the first attribute table
//! - Size tokens matched anywhere in the page text
//! - Download links classified into their category groups
//!
//! Missing fields degrade to the `Unknown` sentinel; only an unfetchable
//! page or a structural parsing failure yields an error, and callers treat
//! both as a skipped item.

use crate::crawler::fetcher::{FetchFailure, Fetcher};
use crate::record::{ItemRecord, LinkCategory, LinkEntry, UNKNOWN};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

/// Human-readable size tokens: 1-3 digits, a decimal point, 1-2 digits,
/// optional space, and a case-sensitive GB unit
static SIZE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,3}\.\d{1,2}\s?GB").expect("size token pattern is valid"));

/// Attribute-table keys looked up by exact match
const VERSION_KEY: &str = "Game Version";
const LANGUAGE_KEY: &str = "Language";
const FIRMWARE_KEY: &str = "Required firmware";

/// Why a detail page produced no record
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The page could not be fetched within the retry bound
    #[error("{0}")]
    Fetch(#[from] FetchFailure),

    /// The page was fetched but could not be processed structurally
    #[error("Error parsing {url}: {message}")]
    Parse { url: String, message: String },
}

/// Fetches a detail page and extracts its record
///
/// # Arguments
///
/// * `fetcher` - The shared retrying fetcher
/// * `url` - The detail page URL
///
/// # Returns
///
/// * `Ok(ItemRecord)` - The extracted record (possibly with sentinel fields)
/// * `Err(ExtractError)` - Fetch bound exhausted or structural failure
pub async fn extract_detail(fetcher: &Fetcher, url: &str) -> Result<ItemRecord, ExtractError> {
    let page = fetcher.fetch(url).await?;
    parse_detail_page(url, &page.body)
}

/// Extracts a record from already-fetched detail page markup
///
/// Extraction is total over the optional fields: a page with no heading, no
/// attribute table, no sizes, and no link tables still yields a record with
/// sentinel defaults. Identical input markup yields an identical record.
pub fn parse_detail_page(url: &str, html: &str) -> Result<ItemRecord, ExtractError> {
    build_record(url, html).map_err(|message| ExtractError::Parse {
        url: url.to_string(),
        message,
    })
}

fn build_record(url: &str, html: &str) -> Result<ItemRecord, String> {
    let document = Html::parse_document(html);
    let mut record = ItemRecord::unknown(url);

    if let Some(name) = extract_title(&document)? {
        record.name = name;
    }
    tracing::info!("Processing item: {}", record.name);

    let attributes = extract_attribute_table(&document)?;
    record.version = lookup(&attributes, VERSION_KEY);
    record.language = lookup(&attributes, LANGUAGE_KEY);
    record.firmware = lookup(&attributes, FIRMWARE_KEY);

    record.sizes = extract_sizes(&document);
    extract_link_groups(&document, &mut record)?;

    Ok(record)
}

/// Extracts the display title from the entry heading
fn extract_title(document: &Html) -> Result<Option<String>, String> {
    let heading = selector("h1.entry-title")?;

    Ok(document
        .select(&heading)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Builds the key -> value mapping from the first table on the page
///
/// Rows need at least two cells; the first cell's trimmed text (one trailing
/// colon stripped) keys the second cell's trimmed text. A duplicated key
/// keeps its last value.
fn extract_attribute_table(document: &Html) -> Result<HashMap<String, String>, String> {
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;

    let mut attributes = HashMap::new();

    if let Some(table) = document.select(&table_sel).next() {
        for row in table.select(&row_sel) {
            let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
            if cells.len() >= 2 {
                let key = cell_text(&cells[0])
                    .trim_end_matches(':')
                    .trim_end()
                    .to_string();
                let value = cell_text(&cells[1]);
                attributes.insert(key, value);
            }
        }
    }

    Ok(attributes)
}

/// Collects size tokens from the full text of the page, in match order
fn extract_sizes(document: &Html) -> Vec<String> {
    let text = document.root_element().text().collect::<String>();

    SIZE_TOKEN_RE
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Walks every table row on the page and files its links under a category
///
/// Rows with four or more cells are classified by their first cell's label
/// and contribute every anchor of the fourth cell; two-cell torrent rows
/// contribute the first anchor of their own label cell.
fn extract_link_groups(document: &Html, record: &mut ItemRecord) -> Result<(), String> {
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;
    let anchor_sel = selector("a[href]")?;

    for table in document.select(&table_sel) {
        for row in table.select(&row_sel) {
            let cells: Vec<ElementRef> = row.select(&cell_sel).collect();

            if cells.len() >= 4 {
                let label = cell_text(&cells[0]).to_lowercase();
                let category = if label.contains("base") {
                    Some(LinkCategory::BaseGame)
                } else if label.contains("update") && !label.contains("fix") {
                    Some(LinkCategory::Update)
                } else if label.contains("fix") {
                    Some(LinkCategory::Fix)
                } else {
                    None
                };

                if let Some(category) = category {
                    for anchor in cells[3].select(&anchor_sel) {
                        if let Some(entry) = link_entry(&anchor) {
                            record.push_link(category, entry);
                        }
                    }
                }
            } else if cells.len() == 2 && cell_text(&cells[0]).to_lowercase().contains("torrent") {
                if let Some(anchor) = cells[0].select(&anchor_sel).next() {
                    if let Some(entry) = link_entry(&anchor) {
                        record.push_link(LinkCategory::Torrent, entry);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Looks up an attribute by exact key, falling back to the sentinel
fn lookup(attributes: &HashMap<String, String>, key: &str) -> String {
    attributes
        .get(key)
        .cloned()
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn link_entry(anchor: &ElementRef) -> Option<LinkEntry> {
    let href = anchor.value().attr("href")?;
    Some(LinkEntry {
        href: href.to_string(),
        label: anchor.text().collect::<String>().trim().to_string(),
    })
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn selector(css: &str) -> Result<Selector, String> {
    Selector::parse(css).map_err(|e| format!("invalid selector '{}': {:?}", css, e))
}
