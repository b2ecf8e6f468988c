//! Knowledge document loading.
//!
//! The document is read once at startup and never changes afterwards. A missing or
//! unreadable source degrades to a fixed sentinel string instead of failing startup;
//! the sentinel then shows up verbatim in every composed prompt.

use crate::config::KnowledgeConfig;
use std::path::{Path, PathBuf};

/// Default file next to the working directory when nothing is configured.
pub const DEFAULT_KNOWLEDGE_PATH: &str = "knowledge.md";

/// Substituted for the document when the source cannot be read.
pub const MISSING_SENTINEL: &str = "error: the knowledge document could not be loaded.";

/// Where the knowledge document comes from.
#[derive(Debug, Clone)]
pub enum KnowledgeSource {
    /// Read from a UTF-8 text file at startup.
    FileBacked(PathBuf),
    /// Literal text carried in the config file.
    InlineLiteral(String),
}

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("reading knowledge document {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl KnowledgeSource {
    /// Resolve the source from config: an explicit path wins over inline text,
    /// and the default path is used when neither is set.
    pub fn from_config(config: &KnowledgeConfig) -> Self {
        if let Some(path) = config.path.as_ref().filter(|p| !p.as_os_str().is_empty()) {
            return KnowledgeSource::FileBacked(path.clone());
        }
        if let Some(inline) = config
            .inline
            .as_ref()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
        {
            return KnowledgeSource::InlineLiteral(inline.to_string());
        }
        KnowledgeSource::FileBacked(PathBuf::from(DEFAULT_KNOWLEDGE_PATH))
    }

    /// Read the document.
    pub fn load(&self) -> Result<String, KnowledgeError> {
        match self {
            KnowledgeSource::FileBacked(path) => read_file(path),
            KnowledgeSource::InlineLiteral(text) => Ok(text.clone()),
        }
    }

    /// Read the document, substituting the sentinel on failure.
    pub fn load_or_sentinel(&self) -> String {
        match self.load() {
            Ok(text) => text,
            Err(e) => {
                log::error!("{}", e);
                MISSING_SENTINEL.to_string()
            }
        }
    }
}

fn read_file(path: &Path) -> Result<String, KnowledgeError> {
    std::fs::read_to_string(path).map_err(|source| KnowledgeError::Read {
        path: path.to_path_buf(),
        source,
    })
}
