use std::fs;
use std::path::{Path, PathBuf};

use crate::data::Portfolio;
use crate::error::{SiteError, SiteResult};
use crate::render::{RenderedSite, SiteRenderer};

/// Summary of one export run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExportReport {
    pub out_dir: PathBuf,
    /// Pages and the feed, relative to `out_dir`
    pub pages: Vec<PathBuf>,
    /// Number of files copied from the static directory
    pub static_files: usize,
}

/// Render the portfolio and write a self-contained static site to `out_dir`
///
/// Layout follows trailing-slash URLs: `index.html`, `blog/index.html`,
/// `404.html`, `500.html` and `rss.xml`. Every file under `static_dir` is
/// copied to the root of the output; a missing static directory is skipped.
pub fn export_site(
    portfolio: &Portfolio,
    renderer: &SiteRenderer,
    out_dir: &Path,
    static_dir: &Path,
) -> SiteResult<ExportReport> {
    let site = renderer.render_site(portfolio)?;
    write_site(&site, out_dir, static_dir)
}

/// Write already-rendered pages and the static tree to `out_dir`
pub fn write_site(site: &RenderedSite, out_dir: &Path, static_dir: &Path) -> SiteResult<ExportReport> {
    fs::create_dir_all(out_dir).map_err(|e| SiteError::io(out_dir, e))?;

    let mut report = ExportReport {
        out_dir: out_dir.to_path_buf(),
        ..Default::default()
    };

    // Static files first so rendered pages win on a name clash
    if static_dir.is_dir() {
        report.static_files = copy_tree(static_dir, out_dir)?;
    } else {
        log::warn!("static directory {} not found, skipping", static_dir.display());
    }

    let pages: [(&str, &str); 5] = [
        ("index.html", &site.index),
        ("blog/index.html", &site.blog),
        ("404.html", &site.not_found),
        ("500.html", &site.server_error),
        ("rss.xml", &site.rss),
    ];
    for (relative, contents) in pages {
        let target = out_dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| SiteError::io(parent, e))?;
        }
        fs::write(&target, contents).map_err(|e| SiteError::io(&target, e))?;
        log::debug!("wrote {}", target.display());
        report.pages.push(PathBuf::from(relative));
    }

    log::info!(
        "exported {} pages and {} static files to {}",
        report.pages.len(),
        report.static_files,
        out_dir.display()
    );
    Ok(report)
}

fn copy_tree(from: &Path, to: &Path) -> SiteResult<usize> {
    let mut copied = 0;
    let entries = fs::read_dir(from).map_err(|e| SiteError::io(from, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| SiteError::io(from, e))?;
        let source = entry.path();
        let target = to.join(entry.file_name());
        if source.is_dir() {
            fs::create_dir_all(&target).map_err(|e| SiteError::io(&target, e))?;
            copied += copy_tree(&source, &target)?;
        } else {
            fs::copy(&source, &target).map_err(|e| SiteError::io(&source, e))?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::sample;
    use crate::render::RenderOptions;

    #[test]
    fn writes_every_page_and_static_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let static_dir = tmp.path().join("static");
        fs::create_dir_all(static_dir.join("img")).unwrap();
        fs::write(static_dir.join("site.css"), "body{}").unwrap();
        fs::write(static_dir.join("img/profile.jpeg"), [0u8, 1, 2]).unwrap();
        let out = tmp.path().join("out");

        let renderer = SiteRenderer::new(RenderOptions::default()).unwrap();
        let report = export_site(&sample(), &renderer, &out, &static_dir).unwrap();

        assert_eq!(report.pages.len(), 5);
        assert_eq!(report.static_files, 2);
        for page in ["index.html", "blog/index.html", "404.html", "500.html", "rss.xml"] {
            assert!(out.join(page).is_file(), "missing {}", page);
        }
        assert_eq!(fs::read(out.join("img/profile.jpeg")).unwrap(), vec![0, 1, 2]);
        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains("id=\"publications\""));
    }

    #[test]
    fn missing_static_dir_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let renderer = SiteRenderer::new(RenderOptions::default()).unwrap();
        let report =
            export_site(&sample(), &renderer, tmp.path(), &tmp.path().join("nope")).unwrap();
        assert_eq!(report.static_files, 0);
        assert!(tmp.path().join("rss.xml").is_file());
    }
}
