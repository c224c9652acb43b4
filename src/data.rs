use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{SiteError, SiteResult};
use crate::nav::{NavItem, default_nav_items};

/// Date format used for blog posts in the data file
pub const BLOG_DATE_FORMAT: &str = "%Y-%m-%d";

/// Biography and contact details shown in the hero and contact sections
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Personal {
    pub name: String,
    pub title: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_scholar: Option<String>,
    pub profile_image: String,
    pub bio: String,
    /// Downloadable CV, relative to the site root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv_path: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: u32,
    pub date: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResearchArea {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub icon: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u32,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    /// `"#"` marks a demo that is not public yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicationLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arxiv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slides: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub id: u32,
    pub title: String,
    /// Comma separated author list, as printed by the venue
    pub authors: String,
    pub venue: String,
    pub year: i32,
    #[serde(default)]
    pub r#abstract: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<String>,
    #[serde(default)]
    pub links: PublicationLinks,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub id: u32,
    pub role: String,
    pub company: String,
    pub period: String,
    pub description: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub frameworks: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub ml: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: u32,
    pub title: String,
    pub excerpt: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub read_time: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub slug: String,
}

impl BlogPost {
    pub fn published_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, BLOG_DATE_FORMAT).ok()
    }
}

/// The whole hand-authored data file
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub personal: Personal,
    #[serde(default)]
    pub news: Vec<NewsItem>,
    #[serde(default)]
    pub research: Vec<ResearchArea>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub publications: Vec<Publication>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub skills: Skills,
    #[serde(default)]
    pub blog: Vec<BlogPost>,
    #[serde(default = "default_nav_items")]
    pub nav: Vec<NavItem>,
}

impl Portfolio {
    /// Check the invariants the views rely on
    ///
    /// # Returns
    /// * `SiteResult<()>` - `Ok` or a `Validation` error naming the first problem
    pub fn validate(&self) -> SiteResult<()> {
        if self.personal.name.trim().is_empty() {
            return Err(SiteError::Validation("personal.name is empty".to_string()));
        }

        unique_ids("news", self.news.iter().map(|n| n.id))?;
        unique_ids("research", self.research.iter().map(|r| r.id))?;
        unique_ids("projects", self.projects.iter().map(|p| p.id))?;
        unique_ids("publications", self.publications.iter().map(|p| p.id))?;
        unique_ids("experience", self.experience.iter().map(|e| e.id))?;
        unique_ids("blog", self.blog.iter().map(|b| b.id))?;

        let mut anchors = HashSet::new();
        for item in &self.nav {
            if item.anchor_id.is_empty() {
                return Err(SiteError::Validation(format!(
                    "nav entry '{}' has an empty anchor",
                    item.label
                )));
            }
            if !anchors.insert(item.anchor_id.as_str()) {
                return Err(SiteError::Validation(format!(
                    "duplicate nav anchor '{}'",
                    item.anchor_id
                )));
            }
        }

        for post in &self.blog {
            if post.published_on().is_none() {
                return Err(SiteError::Validation(format!(
                    "blog post '{}' has invalid date '{}'",
                    post.slug, post.date
                )));
            }
        }

        Ok(())
    }
}

fn unique_ids(collection: &str, ids: impl Iterator<Item = u32>) -> SiteResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(SiteError::Validation(format!(
                "duplicate id {} in {}",
                id, collection
            )));
        }
    }
    Ok(())
}

/// Load and validate the portfolio data file
pub fn load_portfolio(path: impl AsRef<Path>) -> SiteResult<Portfolio> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| SiteError::io(path, e))?;
    let portfolio: Portfolio = serde_json::from_str(&raw).map_err(|e| SiteError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    portfolio.validate()?;

    log::info!(
        "loaded portfolio for {} ({} publications, {} projects, {} posts)",
        portfolio.personal.name,
        portfolio.publications.len(),
        portfolio.projects.len(),
        portfolio.blog.len()
    );
    Ok(portfolio)
}

/// Write the portfolio back as pretty-printed JSON
pub fn save_portfolio(portfolio: &Portfolio, path: impl AsRef<Path>) -> SiteResult<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(portfolio)?;
    fs::write(path, json + "\n").map_err(|e| SiteError::io(path, e))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample() -> Portfolio {
        serde_json::from_str(
            r##"{
            "personal": {
                "name": "Ada Example",
                "title": "M.S. Student",
                "email": "ada@example.org",
                "github": "https://github.com/ada",
                "profile_image": "/profile.jpeg",
                "bio": "Works on evaluation.",
                "cv_path": "/ada-cv.pdf"
            },
            "news": [
                {"id": 1, "date": "2025-06", "content": "Best paper!", "link": "https://arxiv.org/abs/1"},
                {"id": 2, "date": "2024-11", "content": "Started a new job."}
            ],
            "projects": [
                {"id": 1, "title": "Eval", "description": "d", "technologies": ["Rust"], "github": "https://g", "demo": "#", "featured": true},
                {"id": 2, "title": "Side", "description": "s", "demo": "https://demo"}
            ],
            "publications": [
                {"id": 1, "title": "Old", "authors": "A Example, B Other", "venue": "ACL", "year": 2023, "abstract": ""},
                {"id": 2, "title": "New", "authors": "B Other, Ada Example", "venue": "EMNLP", "year": 2025, "abstract": "",
                 "links": {"arxiv": "https://arxiv.org/abs/2", "code": "https://c"}}
            ],
            "experience": [
                {"id": 1, "role": "Engineer", "company": "Lab", "period": "2024 - Present", "description": "d", "highlights": ["x", "y", "z"]}
            ],
            "blog": [
                {"id": 1, "title": "Post & <Notes>", "excerpt": "e", "date": "2024-12-15", "read_time": "5 min read", "tags": ["LLM"], "slug": "post"}
            ]
        }"##,
        )
        .unwrap()
    }

    #[test]
    fn sample_is_valid_and_gets_default_nav() {
        let portfolio = sample();
        portfolio.validate().unwrap();
        assert_eq!(portfolio.nav, default_nav_items());
        assert!(portfolio.research.is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut portfolio = sample();
        portfolio.news[1].id = 1;
        let err = portfolio.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate id 1 in news"));
    }

    #[test]
    fn bad_blog_date_is_rejected() {
        let mut portfolio = sample();
        portfolio.blog[0].date = "December 2024".to_string();
        assert!(matches!(portfolio.validate(), Err(SiteError::Validation(_))));
    }

    #[test]
    fn duplicate_nav_anchor_is_rejected() {
        let mut portfolio = sample();
        portfolio.nav.push(NavItem::new("news", "More news"));
        assert!(portfolio.validate().is_err());
    }

    #[test]
    fn save_then_load_preserves_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        let portfolio = sample();

        save_portfolio(&portfolio, &path).unwrap();
        assert_eq!(load_portfolio(&path).unwrap(), portfolio);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_portfolio("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
