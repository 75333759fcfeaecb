//! Static asset build
//!
//! Produces the deployable site: minified `index.html` and `style.css`, plus
//! exactly one dataset copied from `data/`. Steps run in that order, so the
//! HTML and CSS are already written if the data step fails.

use std::fmt;
use std::path::{Path, PathBuf};

/// Directory (under the project root) holding candidate datasets
const DATA_DIR: &str = "data";

#[derive(Debug)]
pub enum AssetError {
    /// A required source file is missing or unreadable
    Read { path: PathBuf, message: String },
    /// Output could not be written
    Write { path: PathBuf, message: String },
    /// Stylesheet could not be minified
    Css { path: PathBuf, message: String },
    /// `data/` holds no `.json` file
    NoData,
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "Cannot read {}: {}", path.display(), message),
            Self::Write { path, message } => {
                write!(f, "Cannot write {}: {}", path.display(), message)
            }
            Self::Css { path, message } => {
                write!(f, "Cannot minify {}: {}", path.display(), message)
            }
            Self::NoData => write!(f, "No JSON files in /data"),
        }
    }
}

impl std::error::Error for AssetError {}

/// Where to read from and write to
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub root: PathBuf,
    pub out_dir: PathBuf,
}

impl BuildOptions {
    /// Output defaults to `<root>/dist`
    pub fn new(root: impl Into<PathBuf>, out_dir: Option<PathBuf>) -> Self {
        let root = root.into();
        let out_dir = out_dir.unwrap_or_else(|| root.join("dist"));
        Self { root, out_dir }
    }
}

/// Size of one minified file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Minified {
    pub before: usize,
    pub after: usize,
}

#[derive(Debug, Clone)]
pub struct BuildReport {
    pub dist_dir: PathBuf,
    /// File name of the dataset that was copied
    pub data: String,
    pub html: Minified,
    pub css: Minified,
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Build complete: {{ distDir: '{}', data: '{}' }}",
            self.dist_dir.display(),
            self.data
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Build steps
// ─────────────────────────────────────────────────────────────────────────────

fn read(path: &Path) -> Result<Vec<u8>, AssetError> {
    std::fs::read(path).map_err(|e| AssetError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn write(path: &Path, contents: &[u8]) -> Result<(), AssetError> {
    std::fs::write(path, contents).map_err(|e| AssetError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn create_dir(path: &Path) -> Result<(), AssetError> {
    std::fs::create_dir_all(path).map_err(|e| AssetError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Collapse whitespace, drop comments, minify inline `<style>` and `<script>`
pub fn minify_html(source: &[u8]) -> Vec<u8> {
    let mut cfg = minify_html::Cfg::new();
    cfg.minify_css = true;
    cfg.minify_js = true;
    cfg.keep_comments = false;
    minify_html::minify(source, &cfg)
}

pub fn minify_css(source: &str) -> Result<String, String> {
    minifier::css::minify(source)
        .map(|minified| minified.to_string())
        .map_err(|e| e.to_string())
}

/// Lexically first `*.json` file in `dir`
pub fn first_json(dir: &Path) -> Result<PathBuf, AssetError> {
    let entries = std::fs::read_dir(dir).map_err(|e| AssetError::Read {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    candidates.sort();

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| {
            tracing::warn!("No .json file in {}", dir.display());
            AssetError::NoData
        })
}

/// Run the whole build
pub fn build(options: &BuildOptions) -> Result<BuildReport, AssetError> {
    let dist = &options.out_dir;
    create_dir(dist)?;
    create_dir(&dist.join(DATA_DIR))?;

    let html_src = options.root.join("index.html");
    let html = read(&html_src)?;
    let html_min = minify_html(&html);
    write(&dist.join("index.html"), &html_min)?;
    tracing::debug!("index.html: {} -> {} bytes", html.len(), html_min.len());

    let css_src = options.root.join("style.css");
    let css = String::from_utf8_lossy(&read(&css_src)?).into_owned();
    let css_min = minify_css(&css).map_err(|message| AssetError::Css {
        path: css_src.clone(),
        message,
    })?;
    write(&dist.join("style.css"), css_min.as_bytes())?;
    tracing::debug!("style.css: {} -> {} bytes", css.len(), css_min.len());

    let data_src = first_json(&options.root.join(DATA_DIR))?;
    let data_name = data_src
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let data_dest = dist.join(DATA_DIR).join(&data_name);
    std::fs::copy(&data_src, &data_dest).map_err(|e| AssetError::Write {
        path: data_dest.clone(),
        message: e.to_string(),
    })?;

    let report = BuildReport {
        dist_dir: dist.clone(),
        data: data_name,
        html: Minified {
            before: html.len(),
            after: html_min.len(),
        },
        css: Minified {
            before: css.len(),
            after: css_min.len(),
        },
    };
    tracing::info!("Built {} with dataset {}", report.dist_dir.display(), report.data);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HTML: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <!-- page styles -->
    <style>
      body   {  margin : 0 ; }
    </style>
  </head>
  <body>
    <div id="app">   Drugs   </div>
  </body>
</html>
"#;

    const CSS: &str = "/* layout */\nbody {\n  margin: 0;\n  padding: 0;\n}\n";

    fn project(data_files: &[&str]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), HTML).unwrap();
        std::fs::write(dir.path().join("style.css"), CSS).unwrap();
        std::fs::create_dir(dir.path().join("data")).unwrap();
        for name in data_files {
            std::fs::write(dir.path().join("data").join(name), format!("[\"{}\"]", name)).unwrap();
        }
        dir
    }

    #[test]
    fn test_build_writes_minified_assets() {
        let dir = project(&["obat.json"]);
        let report = build(&BuildOptions::new(dir.path(), None)).unwrap();

        let dist = dir.path().join("dist");
        assert_eq!(report.dist_dir, dist);
        assert_eq!(report.data, "obat.json");

        let html = std::fs::read_to_string(dist.join("index.html")).unwrap();
        assert!(!html.contains("page styles"));
        assert!(html.contains("Drugs"));
        assert!(html.len() < HTML.len());

        let css = std::fs::read_to_string(dist.join("style.css")).unwrap();
        assert!(!css.contains("layout"));
        assert!(css.contains("margin:0"));
        assert!(report.css.after < report.css.before);

        let data = std::fs::read_to_string(dist.join("data").join("obat.json")).unwrap();
        assert_eq!(data, "[\"obat.json\"]");
    }

    #[test]
    fn test_build_copies_lexically_first_json_only() {
        let dir = project(&["zeta.json", "alpha.json", "notes.txt"]);
        let report = build(&BuildOptions::new(dir.path(), None)).unwrap();

        assert_eq!(report.data, "alpha.json");
        let copied: Vec<_> = std::fs::read_dir(dir.path().join("dist").join("data"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(copied, vec!["alpha.json"]);
    }

    #[test]
    fn test_build_fails_without_json_after_writing_html_and_css() {
        let dir = project(&["readme.txt"]);
        let err = build(&BuildOptions::new(dir.path(), None)).unwrap_err();

        assert!(matches!(err, AssetError::NoData));
        assert_eq!(err.to_string(), "No JSON files in /data");
        assert!(dir.path().join("dist").join("index.html").exists());
        assert!(dir.path().join("dist").join("style.css").exists());
    }

    #[test]
    fn test_build_honours_out_dir() {
        let dir = project(&["obat.json"]);
        let out = dir.path().join("public");
        let report = build(&BuildOptions::new(dir.path(), Some(out.clone()))).unwrap();

        assert_eq!(report.dist_dir, out);
        assert!(out.join("data").join("obat.json").exists());
        assert!(report.to_string().starts_with("Build complete:"));
    }

    #[test]
    fn test_missing_html_is_read_error() {
        let dir = project(&["obat.json"]);
        std::fs::remove_file(dir.path().join("index.html")).unwrap();

        let err = build(&BuildOptions::new(dir.path(), None)).unwrap_err();
        assert!(matches!(err, AssetError::Read { .. }));
    }
}
