//! View models for each page section.
//!
//! Every function here maps plain data records to the flat structures the
//! templates iterate over. Presentation rules (ordering, truncation, link
//! labels) live here so the templates stay logic-free.

use serde::Serialize;

use crate::data::{BlogPost, Experience, NewsItem, Personal, Project, Publication};
use crate::nav::NavItem;

/// Author lists longer than this are abbreviated.
pub const MAX_LISTED_AUTHORS: usize = 6;

/// Experience cards show at most this many highlights.
pub const MAX_EXPERIENCE_HIGHLIGHTS: usize = 2;

const ELLIPSIS: &str = "...";
const PLACEHOLDER_LINK: &str = "#";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LinkView {
    pub label: String,
    pub href: String,
    /// Rendered with the accent style
    pub primary: bool,
    /// Opens in a new tab
    pub external: bool,
}

impl LinkView {
    fn new(label: &str, href: &str) -> Self {
        LinkView {
            label: label.to_string(),
            href: href.to_string(),
            primary: false,
            external: href.starts_with("http"),
        }
    }

    fn primary(mut self) -> Self {
        self.primary = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuthorView {
    pub name: String,
    pub highlight: bool,
}

/// Whether an author entry refers to the site owner
pub fn is_owner(author: &str, patterns: &[String]) -> bool {
    let author = author.to_lowercase();
    patterns
        .iter()
        .any(|p| !p.is_empty() && author.contains(&p.to_lowercase()))
}

/// Default patterns recognising the owner in author lists
///
/// For "Ada Lovelace" this yields `["ada lovelace", "a lovelace", "ada"]`.
pub fn owner_patterns(name: &str) -> Vec<String> {
    let parts: Vec<&str> = name.split_whitespace().collect();
    let mut patterns = vec![name.trim().to_lowercase()];
    if let (Some(first), Some(last)) = (parts.first(), parts.last()) {
        if parts.len() > 1 {
            if let Some(initial) = first.chars().next() {
                patterns.push(format!("{} {}", initial, last).to_lowercase());
            }
            patterns.push(first.to_lowercase());
        }
    }
    patterns
}

/// Split and abbreviate an author string, marking the owner
///
/// Lists of up to six authors are shown whole. Longer lists keep the first
/// four when the owner is among them (or absent), otherwise the first two
/// plus the owner, followed by an ellipsis.
pub fn author_list(authors: &str, patterns: &[String]) -> Vec<AuthorView> {
    let names: Vec<&str> = authors
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .collect();

    let shown: Vec<&str> = if names.len() > MAX_LISTED_AUTHORS {
        let owner = names.iter().position(|a| is_owner(a, patterns));
        match owner {
            Some(idx) if idx > 3 => {
                let mut shown = names[..2].to_vec();
                shown.push(names[idx]);
                shown.push(ELLIPSIS);
                shown
            }
            _ => {
                let mut shown = names[..4].to_vec();
                shown.push(ELLIPSIS);
                shown
            }
        }
    } else {
        names
    };

    shown
        .into_iter()
        .map(|name| AuthorView {
            name: name.to_string(),
            highlight: name != ELLIPSIS && is_owner(name, patterns),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PublicationView {
    pub title: String,
    pub authors: Vec<AuthorView>,
    pub venue: String,
    pub year: i32,
    pub links: Vec<LinkView>,
}

/// Publications, most recent year first
pub fn publication_views(publications: &[Publication], patterns: &[String]) -> Vec<PublicationView> {
    let mut sorted: Vec<&Publication> = publications.iter().collect();
    sorted.sort_by(|a, b| b.year.cmp(&a.year));

    sorted
        .into_iter()
        .map(|p| {
            let mut links = Vec::new();
            if let Some(href) = &p.links.arxiv {
                links.push(LinkView::new("arXiv", href).primary());
            }
            if let Some(href) = &p.links.paper {
                links.push(LinkView::new("Paper", href));
            }
            if let Some(href) = &p.links.code {
                links.push(LinkView::new("Code", href));
            }
            if let Some(href) = &p.links.slides {
                links.push(LinkView::new("Slides", href));
            }

            PublicationView {
                title: p.title.clone(),
                authors: author_list(&p.authors, patterns),
                venue: p.venue.clone(),
                year: p.year,
                links,
            }
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectView {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub links: Vec<LinkView>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectsView {
    pub featured: Vec<ProjectView>,
    pub others: Vec<ProjectView>,
}

pub fn projects_view(projects: &[Project]) -> ProjectsView {
    let featured = projects
        .iter()
        .filter(|p| p.featured)
        .map(featured_project)
        .collect();
    let others = projects
        .iter()
        .filter(|p| !p.featured)
        .map(other_project)
        .collect();
    ProjectsView { featured, others }
}

fn featured_project(p: &Project) -> ProjectView {
    let mut links = Vec::new();
    if let Some(href) = &p.github {
        links.push(LinkView::new("Code", href));
    }
    match p.demo.as_deref() {
        Some(PLACEHOLDER_LINK) => links.push(LinkView::new("Coming Soon", "#projects")),
        Some(href) => links.push(LinkView::new("Demo", href)),
        None => {}
    }
    match p.paper.as_deref() {
        Some(PLACEHOLDER_LINK) => links.push(LinkView::new("Paper", "#publications")),
        Some(href) => links.push(LinkView::new("Paper", href)),
        None => {}
    }

    ProjectView {
        title: p.title.clone(),
        description: p.description.clone(),
        technologies: p.technologies.clone(),
        links,
    }
}

fn other_project(p: &Project) -> ProjectView {
    let mut links = Vec::new();
    if let Some(href) = &p.github {
        links.push(LinkView::new("GitHub", href));
    }
    if let Some(href) = &p.demo {
        links.push(LinkView::new("Demo", href));
    }

    ProjectView {
        title: p.title.clone(),
        description: p.description.clone(),
        technologies: p.technologies.clone(),
        links,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExperienceView {
    pub role: String,
    pub company: String,
    pub period: String,
    pub description: String,
    pub highlights: Vec<String>,
    /// Even entries sit on the left of the timeline, right aligned
    pub align_right: bool,
}

pub fn experience_views(experience: &[Experience]) -> Vec<ExperienceView> {
    experience
        .iter()
        .enumerate()
        .map(|(index, e)| ExperienceView {
            role: e.role.clone(),
            company: e.company.clone(),
            period: e.period.clone(),
            description: e.description.clone(),
            highlights: e
                .highlights
                .iter()
                .take(MAX_EXPERIENCE_HIGHLIGHTS)
                .cloned()
                .collect(),
            align_right: index % 2 == 0,
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewsView {
    pub date: String,
    pub content: String,
    pub link: Option<String>,
}

pub fn news_views(news: &[NewsItem]) -> Vec<NewsView> {
    news.iter()
        .map(|n| NewsView {
            date: n.date.clone(),
            content: n.content.clone(),
            link: n.link.clone(),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContactRow {
    pub label: String,
    pub text: String,
    pub href: String,
}

/// Rows of the contact section, skipping links the owner did not provide
pub fn contact_rows(personal: &Personal) -> Vec<ContactRow> {
    let mut rows = vec![ContactRow {
        label: "Email".to_string(),
        text: personal.email.clone(),
        href: format!("mailto:{}", personal.email),
    }];
    if let Some(github) = &personal.github {
        rows.push(ContactRow {
            label: "GitHub".to_string(),
            text: github.trim_start_matches("https://").to_string(),
            href: github.clone(),
        });
    }
    if let Some(scholar) = &personal.google_scholar {
        rows.push(ContactRow {
            label: "Google Scholar".to_string(),
            text: "Scholar Profile".to_string(),
            href: scholar.clone(),
        });
    }
    if let Some(linkedin) = &personal.linkedin {
        rows.push(ContactRow {
            label: "LinkedIn".to_string(),
            text: "LinkedIn Profile".to_string(),
            href: linkedin.clone(),
        });
    }
    rows
}

/// Icon links under the name in the hero section
pub fn hero_links(personal: &Personal, base_path: &str) -> Vec<LinkView> {
    let mut links = vec![LinkView::new("Email", &format!("mailto:{}", personal.email))];
    if let Some(href) = &personal.github {
        links.push(LinkView::new("GitHub", href));
    }
    if let Some(href) = &personal.linkedin {
        links.push(LinkView::new("LinkedIn", href));
    }
    if let Some(href) = &personal.google_scholar {
        links.push(LinkView::new("Google Scholar", href));
    }
    if let Some(cv) = &personal.cv_path {
        links.push(LinkView::new("Download CV", &format!("{}{}", base_path, cv)));
    }
    links
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BlogPostView {
    pub title: String,
    pub excerpt: String,
    pub date_iso: String,
    /// e.g. `December 15, 2024`
    pub date_long: String,
    pub read_time: String,
    pub tags: Vec<String>,
    pub slug: String,
}

pub fn blog_views(posts: &[BlogPost]) -> Vec<BlogPostView> {
    posts
        .iter()
        .map(|post| BlogPostView {
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            date_iso: post.date.clone(),
            date_long: post
                .published_on()
                .map(|d| d.format("%B %-d, %Y").to_string())
                .unwrap_or_else(|| post.date.clone()),
            read_time: post.read_time.clone(),
            tags: post.tags.clone(),
            slug: post.slug.clone(),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NavLinkView {
    pub anchor_id: String,
    pub label: String,
    pub href: String,
}

/// Nav entries for server-rendered markup
///
/// On the index page links are plain fragments; elsewhere they point back at
/// the index so the sections can still be reached.
pub fn nav_links(items: &[NavItem], on_index: bool, base_path: &str) -> Vec<NavLinkView> {
    items
        .iter()
        .map(|item| NavLinkView {
            anchor_id: item.anchor_id.clone(),
            label: item.label.clone(),
            href: if on_index {
                item.href()
            } else {
                format!("{}/{}", base_path, item.href())
            },
        })
        .collect()
}
