use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, rendering or exporting the site
///
/// The navigation core never fails, so nothing in `nav` or `theme` produces
/// one of these.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid portfolio data: {0}")]
    Validation(String),

    #[error("template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SiteError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SiteError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type SiteResult<T> = Result<T, SiteError>;
