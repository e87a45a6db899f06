use crate::dumper::{DumpOptions, dump};
use crate::format::FileFormat;
use crate::model::RobotFile;
use crate::parser::{ParseOutput, RobotParser};
use crate::version::RobotVersion;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid suite directory: {0}")]
    InvalidSuiteDir(String),
    #[error("Not a Robot Framework file: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("Parser worker failed on {0}")]
    WorkerFailed(PathBuf),
}

/// Scan for `.robot`, `.resource`, `.txt` and `.tsv` files below the suite
/// root
pub fn scan_robot_files(suite_root: &Path) -> Result<Vec<PathBuf>, IoError> {
    validate_suite_dir(suite_root)?;

    let mut files = Vec::new();
    scan_directory_recursive(suite_root, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if FileFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_suite_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidSuiteDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    Ok(())
}

/// Parse one file, picking the format from its extension.
pub fn parse_path(path: &Path, version: RobotVersion) -> Result<ParseOutput, IoError> {
    let format =
        FileFormat::from_path(path).ok_or_else(|| IoError::UnsupportedFormat(path.to_path_buf()))?;
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path)?;
    let mut output = RobotParser::new(format, version).parse(&text);
    output.file.set_processed_file(path);
    log::info!("parsed {}", path.display());
    Ok(output)
}

/// Parse many files on scoped worker threads. Results keep the order of
/// `paths`; a failing file does not stop the others.
pub fn parse_files_parallel(
    paths: &[PathBuf],
    version: RobotVersion,
) -> Vec<(PathBuf, Result<ParseOutput, IoError>)> {
    parse_chunked(paths, |path| parse_path(path, version))
}

/// Every file of a chunk whose worker panicked is reported as
/// [`IoError::WorkerFailed`].
fn parse_chunked<F>(paths: &[PathBuf], parse: F) -> Vec<(PathBuf, Result<ParseOutput, IoError>)>
where
    F: Fn(&Path) -> Result<ParseOutput, IoError> + Sync,
{
    let workers = std::thread::available_parallelism()
        .map(usize::from)
        .unwrap_or(1)
        .min(paths.len().max(1));
    let chunk_size = paths.len().div_ceil(workers).max(1);
    let parse = &parse;

    std::thread::scope(|scope| {
        let handles: Vec<_> = paths
            .chunks(chunk_size)
            .map(|chunk| {
                let handle = scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|path| (path.clone(), parse(path)))
                        .collect::<Vec<_>>()
                });
                (chunk, handle)
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|(chunk, handle)| match handle.join() {
                Ok(results) => results,
                Err(_) => {
                    log::error!("parser worker panicked on {} files", chunk.len());
                    chunk
                        .iter()
                        .map(|path| (path.clone(), Err(IoError::WorkerFailed(path.clone()))))
                        .collect()
                }
            })
            .collect()
    })
}

/// Dump `file` and write it back to `path`.
pub fn save_file(file: &RobotFile, path: &Path, options: &DumpOptions) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, dump(file, options))?;
    log::info!("saved {}", path.display());
    Ok(())
}
