// file: src/input/scanner.rs
// description: resolves an input path into the ordered list of files to process
// reference: https://docs.rs/walkdir

use crate::error::{PipelineError, Result};
use crate::extractor;
use crate::models::document::normalized_extension;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Which files a directory walk keeps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputFilter {
    /// Any file with a registered extractor.
    #[default]
    Auto,
    /// Only files whose normalized extension equals this one.
    Extension(String),
}

impl InputFilter {
    pub fn accepts(&self, extension: &str) -> bool {
        if !extractor::is_supported(extension) {
            return false;
        }
        match self {
            Self::Auto => true,
            Self::Extension(wanted) => wanted == extension,
        }
    }
}

impl FromStr for InputFilter {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().trim_start_matches('.').to_ascii_lowercase();
        if normalized == "auto" {
            return Ok(Self::Auto);
        }
        if extractor::is_supported(&normalized) {
            Ok(Self::Extension(normalized))
        } else {
            Err(PipelineError::UnsupportedFormat(format!(
                "input format '{}' (expected auto or one of {})",
                s,
                extractor::SUPPORTED_EXTENSIONS.join(", ")
            )))
        }
    }
}

impl fmt::Display for InputFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Extension(ext) => f.write_str(ext),
        }
    }
}

pub struct InputScanner {
    filter: InputFilter,
}

impl InputScanner {
    pub fn new(filter: InputFilter) -> Self {
        Self { filter }
    }

    /// A file is returned as-is; its extractor is looked up at processing
    /// time. Directories are walked recursively in file-name order.
    pub fn scan(&self, input: &Path) -> Result<Vec<PathBuf>> {
        if input.is_file() {
            return Ok(vec![input.to_path_buf()]);
        }
        if !input.is_dir() {
            return Err(PipelineError::InputPath(input.to_path_buf()));
        }

        info!("Scanning directory: {} (format: {})", input.display(), self.filter);
        let mut files = Vec::new();

        for entry in WalkDir::new(input)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", input.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let extension = normalized_extension(path);
            if self.filter.accepts(&extension) {
                debug!("Queued file: {}", path.display());
                files.push(path.to_path_buf());
            } else if extractor::is_supported(&extension) {
                warn!(
                    "Skipping {}: does not match format filter '{}'",
                    path.display(),
                    self.filter
                );
            } else {
                warn!("Skipping unsupported file: {}", path.display());
            }
        }

        info!("Found {} file(s) to process", files.len());
        Ok(files)
    }
}
