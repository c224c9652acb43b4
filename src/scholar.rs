use chrono::Datelike;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::data::{Portfolio, Publication, PublicationLinks};
use crate::error::{SiteError, SiteResult};

/// Rows beyond this are ignored
pub const MAX_IMPORTED: usize = 20;

/// Abstracts are cut to this many characters
pub const MAX_ABSTRACT_CHARS: usize = 500;

lazy_static! {
    static ref YEAR: Regex = Regex::new(r"\b(19|20)\d{2}\b").unwrap();
    static ref VENUE_YEAR: Regex = Regex::new(r",?\s*(19|20)\d{2}").unwrap();
    // Tried in order; the first match wins
    static ref ARXIV_PATTERNS: [Regex; 3] = [
        Regex::new(r"arxiv:(\d{4}\.\d{4,5})").unwrap(),
        Regex::new(r"arxiv\.org/abs/(\d{4}\.\d{4,5})").unwrap(),
        Regex::new(r"\b(\d{4}\.\d{4,5})\b").unwrap(),
    ];
}

/// One row as scraped from a citation profile
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawPublication {
    pub title: String,
    #[serde(default)]
    pub authors: String,
    /// e.g. `"arXiv preprint arXiv:2506.01234, 2025"`
    #[serde(default)]
    pub venue_year: String,
    #[serde(default)]
    pub citations: Option<String>,
    /// Detail page for the publication
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default, rename = "abstract")]
    pub summary: Option<String>,
    /// Free text of the detail page, searched for an arXiv id
    #[serde(default)]
    pub detail_text: Option<String>,
}

/// First arXiv identifier found in `text`, matched case-insensitively
pub fn extract_arxiv_id(text: &str) -> Option<String> {
    let lowered = text.to_lowercase();
    ARXIV_PATTERNS
        .iter()
        .find_map(|re| re.captures(&lowered))
        .map(|caps| caps[1].to_string())
}

/// Split `"Venue, 2024"` into `("Venue", 2024)`
///
/// # Arguments
/// * `venue_year` - Gray venue line of the profile row
/// * `fallback_year` - Used when the line carries no year
pub fn parse_venue_year(venue_year: &str, fallback_year: i32) -> (String, i32) {
    let year = YEAR
        .find(venue_year)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(fallback_year);

    let venue = VENUE_YEAR.replace_all(venue_year, "").trim().to_string();
    let venue = if venue.is_empty() {
        "Preprint".to_string()
    } else {
        venue
    };
    (venue, year)
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Turn raw rows into publications with ids starting at 1
pub fn normalize_publications(rows: &[RawPublication], fallback_year: i32) -> Vec<Publication> {
    rows.iter()
        .take(MAX_IMPORTED)
        .enumerate()
        .map(|(idx, row)| {
            let (venue, year) = parse_venue_year(&row.venue_year, fallback_year);

            let summary = row
                .summary
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| truncate_chars(s, MAX_ABSTRACT_CHARS))
                .unwrap_or_else(|| format!("Published in {}.", venue));

            let arxiv = row
                .detail_text
                .as_deref()
                .and_then(extract_arxiv_id)
                .or_else(|| extract_arxiv_id(&row.title))
                .map(|id| format!("https://arxiv.org/abs/{}", id));

            Publication {
                id: idx as u32 + 1,
                title: row.title.trim().to_string(),
                authors: row.authors.trim().to_string(),
                venue,
                year,
                r#abstract: summary,
                citations: Some(row.citations.clone().unwrap_or_else(|| "0".to_string())),
                links: PublicationLinks {
                    paper: row.link.clone(),
                    arxiv,
                    ..Default::default()
                },
            }
        })
        .collect()
}

/// Read raw rows from `rows_path` and replace the portfolio's publications
///
/// # Returns
/// * `SiteResult<usize>` - Number of publications imported
pub fn import_publications(portfolio: &mut Portfolio, rows_path: &Path) -> SiteResult<usize> {
    let raw = fs::read_to_string(rows_path).map_err(|e| SiteError::io(rows_path, e))?;
    let rows: Vec<RawPublication> = serde_json::from_str(&raw).map_err(|e| SiteError::Json {
        path: rows_path.to_path_buf(),
        source: e,
    })?;

    if rows.len() > MAX_IMPORTED {
        log::warn!(
            "{} rows in {}, keeping the first {}",
            rows.len(),
            rows_path.display(),
            MAX_IMPORTED
        );
    }

    let publications = normalize_publications(&rows, chrono::Local::now().year());
    for publication in &publications {
        log::debug!("imported: {}", publication.title);
    }
    portfolio.publications = publications;
    Ok(portfolio.publications.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::sample;

    fn row(title: &str, venue_year: &str) -> RawPublication {
        RawPublication {
            title: title.to_string(),
            authors: "J Suk, A Other".to_string(),
            venue_year: venue_year.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn arxiv_patterns_in_order() {
        assert_eq!(extract_arxiv_id("see arXiv:2301.12345v2").as_deref(), Some("2301.12345"));
        assert_eq!(
            extract_arxiv_id("https://arxiv.org/abs/2410.0123").as_deref(),
            Some("2410.0123")
        );
        assert_eq!(extract_arxiv_id("number 2506.01234 here").as_deref(), Some("2506.01234"));
        assert_eq!(extract_arxiv_id("no identifier"), None);
    }

    #[test]
    fn venue_and_year() {
        assert_eq!(
            parse_venue_year("arXiv preprint arXiv:2506.01234, 2025", 2000),
            ("arXiv preprint arXiv:2506.01234".to_string(), 2025)
        );
        assert_eq!(parse_venue_year("2024", 2000), ("Preprint".to_string(), 2024));
        assert_eq!(parse_venue_year("", 2031), ("Preprint".to_string(), 2031));
    }

    #[test]
    fn rows_are_normalized() {
        let mut first = row("Judge models", "EMNLP, 2024");
        first.detail_text = Some("Available at arxiv.org/abs/2405.01535".to_string());
        first.link = Some("https://scholar.example/1".to_string());
        first.summary = Some("x".repeat(600));
        let second = row("Plain", "");

        let pubs = normalize_publications(&[first, second], 2030);
        assert_eq!(pubs[0].id, 1);
        assert_eq!(pubs[0].venue, "EMNLP");
        assert_eq!(pubs[0].r#abstract.chars().count(), MAX_ABSTRACT_CHARS);
        assert_eq!(
            pubs[0].links.arxiv.as_deref(),
            Some("https://arxiv.org/abs/2405.01535")
        );
        assert_eq!(pubs[0].links.paper.as_deref(), Some("https://scholar.example/1"));

        assert_eq!(pubs[1].id, 2);
        assert_eq!(pubs[1].year, 2030);
        assert_eq!(pubs[1].r#abstract, "Published in Preprint.");
        assert_eq!(pubs[1].citations.as_deref(), Some("0"));
        assert_eq!(pubs[1].links.arxiv, None);
    }

    #[test]
    fn at_most_twenty_rows() {
        let rows: Vec<_> = (0..25).map(|i| row(&format!("P{}", i), "ACL, 2023")).collect();
        let pubs = normalize_publications(&rows, 2030);
        assert_eq!(pubs.len(), MAX_IMPORTED);
        assert_eq!(pubs.last().unwrap().id, 20);
    }

    #[test]
    fn import_replaces_publications() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        fs::write(
            &path,
            r#"[{"title": "Only", "authors": "Ada Example", "venue_year": "NeurIPS, 2025", "citations": "7"}]"#,
        )
        .unwrap();

        let mut portfolio = sample();
        assert_eq!(import_publications(&mut portfolio, &path).unwrap(), 1);
        assert_eq!(portfolio.publications[0].title, "Only");
        assert_eq!(portfolio.publications[0].citations.as_deref(), Some("7"));
        portfolio.validate().unwrap();
    }
}
