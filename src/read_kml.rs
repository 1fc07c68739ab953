use std::path::{Path, PathBuf};

use url::Url;
use walkdir::WalkDir;

use crate::error::KmlError;
use crate::{ParseOptions, ParsedKml, parse};

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot load {}: {source}", .path.display())]
    Kml { path: PathBuf, source: KmlError },
}

fn is_kml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("kml"))
}

/// `path` itself when it is a file, otherwise every `*.kml` below it,
/// sorted by path.
pub fn kml_files(path: &Path) -> Vec<PathBuf> {
    if !path.is_dir() {
        return vec![path.to_path_buf()];
    }
    let mut ret: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                log::warn!("skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_kml(e.path()))
        .map(|e| e.into_path())
        .collect();
    ret.sort();
    ret
}

/// Read and parse one file. Without an explicit source URL, icon hrefs
/// resolve relative to the file itself.
pub fn read_file(path: &Path, options: &ParseOptions) -> Result<ParsedKml, ReadError> {
    let content = std::fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut options = options.clone();
    if options.source_url.is_none() {
        options.source_url = std::fs::canonicalize(path)
            .ok()
            .and_then(|abs| Url::from_file_path(abs).ok())
            .map(String::from);
    }

    log::debug!("parsing {}", path.display());
    parse(&content, &options).map_err(|source| ReadError::Kml {
        path: path.to_path_buf(),
        source,
    })
}
