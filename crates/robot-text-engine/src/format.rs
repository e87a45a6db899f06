use serde::{Deserialize, Serialize};
use std::path::Path;

/// Physical encoding of a suite file.
///
/// `Txt` covers both the space-aligned and the pipe-delimited layouts; the
/// choice between them is made per line. `Tsv` always splits on tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    #[default]
    Txt,
    Tsv,
}

impl FileFormat {
    /// Pick the format from a file extension, `None` for files that are not
    /// Robot Framework suites or resources.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "robot" | "txt" | "resource" => Some(FileFormat::Txt),
            "tsv" => Some(FileFormat::Tsv),
            _ => None,
        }
    }
}
