use chrono::Datelike;
use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

use crate::data::{Personal, Portfolio, ResearchArea};
use crate::error::SiteResult;
use crate::views::{
    BlogPostView, ContactRow, ExperienceView, LinkView, NavLinkView, NewsView, ProjectsView,
    PublicationView, blog_views, contact_rows, experience_views, hero_links, nav_links,
    news_views, owner_patterns, projects_view, publication_views,
};

const LAYOUT: &str = "layout";
const INDEX: &str = "index";
const BLOG: &str = "blog";
const ERROR: &str = "error";

/// Page rendering options shared by every page
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    /// Prefix for every internal link, e.g. `/my-site` (no trailing slash)
    pub base_path: String,

    /// Absolute URL of the deployed site, used in meta tags and the feed
    pub site_url: String,

    /// Lowercase fragments identifying the owner in author lists. Empty means
    /// derive them from the owner's name.
    pub highlight_patterns: Vec<String>,
}

/// Every page of the site, rendered
#[derive(Clone, Debug)]
pub struct RenderedSite {
    pub index: String,
    pub blog: String,
    pub not_found: String,
    pub server_error: String,
    pub rss: String,
}

#[derive(Serialize)]
struct LayoutContext<'a> {
    title: String,
    description: &'a str,
    name: &'a str,
    site_url: &'a str,
    base_path: &'a str,
    nav: Vec<NavLinkView>,
    nav_json: String,
    body: String,
    year: i32,
    github: Option<&'a str>,
    linkedin: Option<&'a str>,
}

#[derive(Serialize)]
struct IndexContext<'a> {
    base_path: &'a str,
    personal: &'a Personal,
    hero_links: Vec<LinkView>,
    news: Vec<NewsView>,
    research: &'a [ResearchArea],
    projects: ProjectsView,
    publications: Vec<PublicationView>,
    experience: Vec<ExperienceView>,
    contact: Vec<ContactRow>,
}

#[derive(Serialize)]
struct BlogContext<'a> {
    base_path: &'a str,
    posts: Vec<BlogPostView>,
}

#[derive(Serialize)]
struct ErrorContext<'a> {
    base_path: &'a str,
    not_found: bool,
    status: u16,
    heading: &'a str,
    message: &'a str,
}

/// Handlebars-backed renderer for the portfolio pages
pub struct SiteRenderer {
    registry: Handlebars<'static>,
    options: RenderOptions,
}

impl SiteRenderer {
    /// Create a renderer using the templates compiled into the binary
    pub fn new(options: RenderOptions) -> SiteResult<Self> {
        let mut registry = Handlebars::new();
        registry.register_template_string(LAYOUT, include_str!("templates/layout.hbs"))?;
        registry.register_template_string(INDEX, include_str!("templates/index.hbs"))?;
        registry.register_template_string(BLOG, include_str!("templates/blog.hbs"))?;
        registry.register_template_string(ERROR, include_str!("templates/error.hbs"))?;

        Ok(SiteRenderer { registry, options })
    }

    /// Create a renderer, replacing built-in templates with any `*.hbs`
    /// file of the same name found in `dir`
    pub fn with_templates_dir(options: RenderOptions, dir: &Path) -> SiteResult<Self> {
        let mut renderer = Self::new(options)?;
        renderer.registry.register_templates_directory(".hbs", dir)?;
        log::info!("using template overrides from {}", dir.display());
        Ok(renderer)
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    fn patterns(&self, portfolio: &Portfolio) -> Vec<String> {
        if self.options.highlight_patterns.is_empty() {
            owner_patterns(&portfolio.personal.name)
        } else {
            self.options.highlight_patterns.clone()
        }
    }

    fn wrap(
        &self,
        portfolio: &Portfolio,
        title: String,
        description: &str,
        on_index: bool,
        body: String,
    ) -> SiteResult<String> {
        let personal = &portfolio.personal;
        let base_path = self.options.base_path.as_str();
        let context = LayoutContext {
            title,
            description,
            name: &personal.name,
            site_url: &self.options.site_url,
            base_path,
            nav: nav_links(&portfolio.nav, on_index, base_path),
            nav_json: serde_json::to_string(&portfolio.nav)?,
            body,
            year: chrono::Local::now().year(),
            github: personal.github.as_deref(),
            linkedin: personal.linkedin.as_deref(),
        };
        Ok(self.registry.render(LAYOUT, &context)?)
    }

    /// The single-page portfolio with every section
    pub fn render_index(&self, portfolio: &Portfolio) -> SiteResult<String> {
        let base_path = self.options.base_path.as_str();
        let personal = &portfolio.personal;
        let context = IndexContext {
            base_path,
            personal,
            hero_links: hero_links(personal, base_path),
            news: news_views(&portfolio.news),
            research: &portfolio.research,
            projects: projects_view(&portfolio.projects),
            publications: publication_views(&portfolio.publications, &self.patterns(portfolio)),
            experience: experience_views(&portfolio.experience),
            contact: contact_rows(personal),
        };
        let body = self.registry.render(INDEX, &context)?;
        let title = format!("{} - {}", personal.name, personal.title);
        self.wrap(portfolio, title, &personal.bio, true, body)
    }

    pub fn render_blog(&self, portfolio: &Portfolio) -> SiteResult<String> {
        let context = BlogContext {
            base_path: &self.options.base_path,
            posts: blog_views(&portfolio.blog),
        };
        let body = self.registry.render(BLOG, &context)?;
        let title = format!("Blog - {}", portfolio.personal.name);
        let description = format!(
            "Thoughts and insights on research and machine learning from {}",
            portfolio.personal.name
        );
        self.wrap(portfolio, title, &description, false, body)
    }

    pub fn render_not_found(&self, portfolio: &Portfolio) -> SiteResult<String> {
        let context = ErrorContext {
            base_path: &self.options.base_path,
            not_found: true,
            status: 404,
            heading: "Page Not Found",
            message: "",
        };
        let body = self.registry.render(ERROR, &context)?;
        let title = format!("404 - {}", portfolio.personal.name);
        self.wrap(portfolio, title, "Page not found", false, body)
    }

    /// Generic error page for any non-404 status
    pub fn render_error(&self, portfolio: &Portfolio, status: u16) -> SiteResult<String> {
        let heading = if status >= 500 {
            "Server Error"
        } else {
            "Something went wrong"
        };
        let message = format!(
            "An error {} occurred on server. We apologize for the inconvenience. Please try again later.",
            status
        );
        let context = ErrorContext {
            base_path: &self.options.base_path,
            not_found: false,
            status,
            heading,
            message: &message,
        };
        let body = self.registry.render(ERROR, &context)?;
        let title = format!("{} - {}", status, portfolio.personal.name);
        self.wrap(portfolio, title, heading, false, body)
    }

    /// Render every page plus the feed
    pub fn render_site(&self, portfolio: &Portfolio) -> SiteResult<RenderedSite> {
        Ok(RenderedSite {
            index: self.render_index(portfolio)?,
            blog: self.render_blog(portfolio)?,
            not_found: self.render_not_found(portfolio)?,
            server_error: self.render_error(portfolio, 500)?,
            rss: crate::rss::render_rss(portfolio, &self.options),
        })
    }
}
