use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{SiteError, SiteResult};
use crate::render::RenderOptions;

/// Config file read from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "site.toml";

/// Prefix of environment variables that override the config file
pub const ENV_PREFIX: &str = "PORTFOLIO__";

/// Resolved site settings
#[derive(Clone, Debug, PartialEq)]
pub struct SiteConfig {
    pub data_path: PathBuf,
    pub out_dir: PathBuf,
    pub static_dir: PathBuf,
    pub templates_dir: Option<PathBuf>,
    pub base_path: String,
    pub site_url: String,
    pub bind_addr: String,
    pub highlight_patterns: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            data_path: "data/portfolio.json".into(),
            out_dir: "out".into(),
            static_dir: "static".into(),
            templates_dir: None,
            base_path: String::new(),
            site_url: "http://127.0.0.1:3000".into(),
            bind_addr: "127.0.0.1:3000".into(),
            highlight_patterns: Vec::new(),
        }
    }
}

/// On-disk shape of `site.toml`; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    data: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    static_dir: Option<PathBuf>,
    templates_dir: Option<PathBuf>,
    base_path: Option<String>,
    site_url: Option<String>,
    bind_addr: Option<String>,
    highlight: Option<Vec<String>>,
}

impl SiteConfig {
    /// Load settings: defaults, then the config file, then the environment
    ///
    /// An explicitly named config file must exist; the default `site.toml`
    /// is optional.
    pub fn load(path: Option<&Path>) -> SiteResult<Self> {
        let mut config = SiteConfig::default();

        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        match fs::read_to_string(&path) {
            Ok(raw) => {
                config.apply_toml(&raw, &path)?;
                log::debug!("read config from {}", path.display());
            }
            Err(e) if required || e.kind() != std::io::ErrorKind::NotFound => {
                return Err(SiteError::io(path, e));
            }
            Err(_) => {}
        }

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn apply_toml(&mut self, raw: &str, path: &Path) -> SiteResult<()> {
        let file: ConfigFile = toml::from_str(raw).map_err(|e| SiteError::Config {
            path: path.to_path_buf(),
            source: e,
        })?;

        if let Some(v) = file.data {
            self.data_path = v;
        }
        if let Some(v) = file.out_dir {
            self.out_dir = v;
        }
        if let Some(v) = file.static_dir {
            self.static_dir = v;
        }
        if let Some(v) = file.templates_dir {
            self.templates_dir = Some(v);
        }
        if let Some(v) = file.base_path {
            self.base_path = normalize_base_path(&v);
        }
        if let Some(v) = file.site_url {
            self.site_url = v;
        }
        if let Some(v) = file.bind_addr {
            self.bind_addr = v;
        }
        if let Some(v) = file.highlight {
            self.highlight_patterns = v.into_iter().map(|p| p.to_lowercase()).collect();
        }
        Ok(())
    }

    /// Apply `PORTFOLIO__*` overrides using `lookup` to read variables
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(v) = var("DATA") {
            self.data_path = v.into();
        }
        if let Some(v) = var("OUT_DIR") {
            self.out_dir = v.into();
        }
        if let Some(v) = var("STATIC_DIR") {
            self.static_dir = v.into();
        }
        if let Some(v) = var("TEMPLATES_DIR") {
            self.templates_dir = Some(v.into());
        }
        if let Some(v) = var("BASE_PATH") {
            self.base_path = normalize_base_path(&v);
        }
        if let Some(v) = var("SITE_URL") {
            self.site_url = v;
        }
        if let Some(v) = var("BIND_ADDR") {
            self.bind_addr = v;
        }
    }

    pub fn set_base_path(&mut self, base_path: &str) {
        self.base_path = normalize_base_path(base_path);
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            base_path: self.base_path.clone(),
            site_url: self.site_url.clone(),
            highlight_patterns: self.highlight_patterns.clone(),
        }
    }
}

/// `my-site/` and `/my-site` both become `/my-site`; `/` becomes empty
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn base_path_normalization() {
        assert_eq!(normalize_base_path(""), "");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path("juyoungml.github.io/"), "/juyoungml.github.io");
        assert_eq!(normalize_base_path(" /site "), "/site");
    }

    #[test]
    fn file_then_env_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.toml");
        fs::write(
            &path,
            "data = \"content/me.json\"\nbase_path = \"blog/\"\nhighlight = [\"J Suk\"]\n",
        )
        .unwrap();

        let mut config = SiteConfig::default();
        config
            .apply_toml(&fs::read_to_string(&path).unwrap(), &path)
            .unwrap();
        assert_eq!(config.data_path, PathBuf::from("content/me.json"));
        assert_eq!(config.base_path, "/blog");
        assert_eq!(config.highlight_patterns, vec!["j suk"]);

        let env: HashMap<&str, &str> = [
            ("PORTFOLIO__BASE_PATH", "/"),
            ("PORTFOLIO__BIND_ADDR", "0.0.0.0:8080"),
        ]
        .into_iter()
        .collect();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.base_path, "");
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.data_path, PathBuf::from("content/me.json"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut config = SiteConfig::default();
        let err = config
            .apply_toml("colour = \"blue\"\n", Path::new("site.toml"))
            .unwrap_err();
        assert!(matches!(err, SiteError::Config { .. }));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = SiteConfig::load(Some(Path::new("/nope/site.toml"))).unwrap_err();
        assert!(matches!(err, SiteError::Io { .. }));
    }
}
