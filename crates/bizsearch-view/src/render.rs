//! Pure rendering of [`ViewState`] into terminal text or JSON.
//!
//! [`screen`] selects exactly one of four branches. Callers redraw by calling
//! [`render`] again after every state transition.
//!
//! Business names with a website are wrapped in OSC 8 terminal hyperlinks.
//! The alternate form (`{:#}`, [`render_plain`]) omits the escapes for output
//! that is not a terminal.

use std::fmt;

use bizsearch_core::BusinessRecord;
use serde::Serialize;

use crate::state::ViewState;

/// Excerpts longer than this many characters are cut and suffixed with [`ELLIPSIS`].
pub const EXCERPT_MAX_CHARS: usize = 100;
pub const ELLIPSIS: &str = "...";
pub const NOT_AVAILABLE: &str = "N/A";
pub const STAR: char = '★';

pub const LOADING_TEXT: &str = "Searching businesses...";
pub const EMPTY_HINT: &str = "Try a different search term";
pub const DEMO_BANNER: &str = "⚠️ Demo Mode: Backend service is unavailable. Showing mock data for demonstration purposes.";

const HEADERS: [&str; 6] = [
    "Business Name",
    "Address",
    "Rating",
    "Match",
    "Matched Text",
    "Website",
];
const PHONE_HEADER: &str = "Phone";

/// The branch of the UI to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen<'a> {
    /// Nothing submitted yet.
    Initial,
    Loading,
    /// A search completed with zero results.
    Empty { query: &'a str },
    Results {
        query: &'a str,
        rows: Vec<TableRow>,
        demo_mode: bool,
    },
}

/// Display-ready cells for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub key: String,
    pub name: String,
    /// Link target for the name cell, when the record has a website.
    pub link: Option<String>,
    pub address: String,
    pub rating: String,
    pub matched: String,
    pub excerpt: String,
    pub website: String,
    pub phone: String,
}

impl TableRow {
    #[must_use]
    pub fn from_record(record: &BusinessRecord) -> Self {
        let name = if record.name.trim().is_empty() {
            NOT_AVAILABLE.to_owned()
        } else {
            record.name.clone()
        };

        Self {
            key: record.render_key().to_owned(),
            name,
            link: record.website.clone(),
            address: or_na(record.address.as_deref()),
            rating: format_rating(record.rating),
            matched: match_summary(record.matched_on.as_deref(), record.relevance_score),
            excerpt: quoted_excerpt(record.matched_text.as_deref()),
            website: or_na(record.website.as_deref()),
            phone: or_na(record.phone_number.as_deref()),
        }
    }

    /// Visible cell text, in column order. The name is never wrapped here.
    fn cells(&self) -> [&str; 6] {
        [
            self.name.as_str(),
            self.address.as_str(),
            self.rating.as_str(),
            self.matched.as_str(),
            self.excerpt.as_str(),
            self.website.as_str(),
        ]
    }
}

/// Selects the branch to draw, in priority order: loading, empty, results, initial.
#[must_use]
pub fn screen(state: &ViewState) -> Screen<'_> {
    if state.loading {
        Screen::Loading
    } else if state.searched && state.results.is_empty() {
        Screen::Empty {
            query: &state.query,
        }
    } else if !state.results.is_empty() {
        Screen::Results {
            query: &state.query,
            rows: state.results.iter().map(TableRow::from_record).collect(),
            demo_mode: state.using_fallback,
        }
    } else {
        Screen::Initial
    }
}

/// Renders `state` as terminal text, hyperlinking business names.
#[must_use]
pub fn render(state: &ViewState) -> String {
    screen(state).to_string()
}

/// Renders `state` as text without any terminal escape sequences.
#[must_use]
pub fn render_plain(state: &ViewState) -> String {
    format!("{:#}", screen(state))
}

/// Label for the submit control; it reads "Searching..." while disabled.
#[must_use]
pub fn submit_label(state: &ViewState) -> &'static str {
    if state.loading {
        "Searching..."
    } else {
        "Search"
    }
}

/// `★ 4.5` for a rating, `N/A` when absent.
#[must_use]
pub fn format_rating(rating: Option<f64>) -> String {
    match rating {
        Some(r) => format!("{STAR} {r:.1}"),
        None => NOT_AVAILABLE.to_owned(),
    }
}

/// Cuts `text` to [`EXCERPT_MAX_CHARS`] characters plus an ellipsis when longer.
#[must_use]
pub fn truncate_excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_MAX_CHARS {
        return text.to_owned();
    }
    let mut cut: String = text.chars().take(EXCERPT_MAX_CHARS).collect();
    cut.push_str(ELLIPSIS);
    cut
}

fn quoted_excerpt(text: Option<&str>) -> String {
    match text {
        Some(t) => format!("\"{}\"", truncate_excerpt(t)),
        None => NOT_AVAILABLE.to_owned(),
    }
}

fn match_summary(matched_on: Option<&str>, relevance: Option<f64>) -> String {
    match (matched_on.filter(|m| !m.is_empty()), relevance) {
        (Some(on), Some(score)) => format!("{on} · {score}%"),
        (Some(on), None) => on.to_owned(),
        (None, Some(score)) => format!("{score}%"),
        (None, None) => NOT_AVAILABLE.to_owned(),
    }
}

fn or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_owned(),
        _ => NOT_AVAILABLE.to_owned(),
    }
}

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Initial => Ok(()),
            Screen::Loading => writeln!(f, "{LOADING_TEXT}"),
            Screen::Empty { query } => {
                writeln!(f, "No businesses found for \"{query}\"")?;
                writeln!(f, "{EMPTY_HINT}")
            }
            Screen::Results {
                query,
                rows,
                demo_mode,
            } => {
                if *demo_mode {
                    writeln!(f, "{DEMO_BANNER}")?;
                    writeln!(f)?;
                }
                writeln!(
                    f,
                    "Found {} businesses matching \"{query}\"",
                    rows.len()
                )?;
                writeln!(f)?;
                write_table(f, rows, !f.alternate())
            }
        }
    }
}

fn write_table(f: &mut fmt::Formatter<'_>, rows: &[TableRow], links: bool) -> fmt::Result {
    let with_phone = rows.iter().any(|r| r.phone != NOT_AVAILABLE);

    let mut header: Vec<&str> = HEADERS.to_vec();
    if with_phone {
        header.push(PHONE_HEADER);
    }
    let body: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| {
            let mut cells = row.cells().to_vec();
            if with_phone {
                cells.push(&row.phone);
            }
            cells
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_line(f, &header, &widths, None)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(f, "{}", rule.join("-+-"))?;
    for (row, cells) in rows.iter().zip(&body) {
        let link = row.link.as_deref().filter(|_| links);
        write_line(f, cells, &widths, link)?;
    }
    Ok(())
}

/// Pads each cell to its column width by visible characters. When `link` is
/// set the first cell is wrapped in a hyperlink after padding is measured.
fn write_line(
    f: &mut fmt::Formatter<'_>,
    cells: &[&str],
    widths: &[usize],
    link: Option<&str>,
) -> fmt::Result {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &width))| {
            let pad = " ".repeat(width.saturating_sub(cell.chars().count()));
            match link {
                Some(url) if i == 0 => format!("{}{pad}", hyperlink(url, cell)),
                _ => format!("{cell}{pad}"),
            }
        })
        .collect();
    writeln!(f, "{}", padded.join(" | ").trim_end())
}

/// OSC 8 hyperlink: `ESC ] 8 ;; url ESC \ text ESC ] 8 ;; ESC \`.
fn hyperlink(url: &str, text: &str) -> String {
    format!("\x1b]8;;{url}\x1b\\{text}\x1b]8;;\x1b\\")
}

#[derive(Serialize)]
struct JsonView<'a> {
    query: &'a str,
    searched: bool,
    loading: bool,
    using_fallback: bool,
    count: usize,
    results: &'a [BusinessRecord],
}

/// Renders `state` as pretty-printed JSON for scripting.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(state: &ViewState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonView {
        query: &state.query,
        searched: state.searched,
        loading: state.loading,
        using_fallback: state.using_fallback,
        count: state.results.len(),
        results: &state.results,
    })
}
