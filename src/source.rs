//! Where an index page is read from.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use exn::{OptionExt, ResultExt};
use pylookup_config::Config;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{ErrorKind, Result};

/// An index page and the base its links are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Index file on disk; `base` is its absolute directory.
    Local { index: PathBuf, base: PathBuf },
    /// Index page on the web; `base` is the page's directory URL, without a trailing slash.
    Remote { index: Url, base: String },
}

impl Source {
    /// Classify an update argument.
    ///
    /// Accepts directories, `.html` files, `~`-prefixed paths, `file://` URLs
    /// and `http(s)` URLs. Directories and URLs not naming an `.html` page get
    /// `index_file` appended.
    pub fn parse(input: &str, index_file: &str) -> Result<Self> {
        match Url::parse(input) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::remote(url, index_file),
            Ok(url) if url.scheme() == "file" => {
                let path = url.to_file_path().ok().ok_or_raise(|| ErrorKind::Fetch(input.to_string()))?;
                Self::local(&path, index_file)
            },
            // Single letter schemes are Windows drive letters.
            Ok(url) if url.scheme().len() > 1 => exn::bail!(ErrorKind::Fetch(input.to_string())),
            _ => Self::local(&expand_home(input), index_file),
        }
    }

    fn remote(url: Url, index_file: &str) -> Result<Self> {
        let index = if is_html(url.path()) {
            url
        } else {
            let mut dir = url;
            if !dir.path().ends_with('/') {
                let path = format!("{}/", dir.path());
                dir.set_path(&path);
            }
            dir.join(index_file).or_raise(|| ErrorKind::Fetch(index_file.to_string()))?
        };
        let base = index.as_str().rsplit_once('/').map(|(dir, _)| dir.to_string()).unwrap_or_default();
        Ok(Self::Remote { index, base })
    }

    fn local(path: &Path, index_file: &str) -> Result<Self> {
        let path = std::path::absolute(path).or_raise(|| ErrorKind::NotFound(path.to_path_buf()))?;
        let (index, base) = match path.to_str() {
            Some(name) if is_html(name) && !path.is_dir() => {
                let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
                (path, base)
            },
            _ => (path.join(index_file), path),
        };
        Ok(Self::Local { index, base })
    }

    /// Base that relative links in the index are resolved against.
    pub fn base(&self) -> String {
        match self {
            Self::Local { base, .. } => base.to_string_lossy().into_owned(),
            Self::Remote { base, .. } => base.clone(),
        }
    }

    /// Read the raw bytes of the index page.
    #[instrument(skip(config), fields(source = %self))]
    pub async fn load(&self, config: &Config) -> Result<Vec<u8>> {
        let bytes = match self {
            Self::Local { index, .. } => match tokio::fs::read(index).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => exn::bail!(ErrorKind::NotFound(index.clone())),
                Err(e) => return Err(e).or_raise(|| ErrorKind::Io),
            },
            Self::Remote { index, .. } => fetch(index, config).await?,
        };
        debug!(bytes = bytes.len(), "index loaded");
        Ok(bytes)
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Local { index, .. } => write!(f, "{}", index.display()),
            Self::Remote { index, .. } => write!(f, "{index}"),
        }
    }
}

async fn fetch(url: &Url, config: &Config) -> Result<Vec<u8>> {
    let fail = || ErrorKind::Fetch(url.to_string());
    let client = reqwest::Client::builder()
        .timeout(config.fetch_timeout())
        .user_agent(concat!("pylookup/", env!("CARGO_PKG_VERSION")))
        .gzip(true)
        .build()
        .or_raise(fail)?;
    let response = client.get(url.clone()).send().await.or_raise(fail)?;
    let response = response.error_for_status().or_raise(fail)?;
    let bytes = response.bytes().await.or_raise(fail)?;
    Ok(bytes.to_vec())
}

fn is_html(path: &str) -> bool {
    let path = path.to_ascii_lowercase();
    path.ends_with(".html") || path.ends_with(".htm")
}

fn expand_home(input: &str) -> PathBuf {
    let rest = match input.strip_prefix('~') {
        Some("") => "",
        Some(rest) if rest.starts_with('/') || rest.starts_with(std::path::MAIN_SEPARATOR) => &rest[1..],
        _ => return PathBuf::from(input),
    };
    match BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(rest),
        None => PathBuf::from(input),
    }
}
