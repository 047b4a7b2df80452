use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot use {} as an output directory: {reason}", .path.display())]
    OutputDir { path: PathBuf, reason: String },
    #[error("could not write {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl PersistError {
    fn io(path: &Path, source: io::Error) -> Self {
        PersistError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Creates `dir` and its parents if needed. A file in the way is an error.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let refuse = |reason: String| PersistError::OutputDir {
        path: dir.to_path_buf(),
        reason,
    };
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(refuse("not a directory".to_string())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|err| refuse(err.to_string()))
        }
        Err(err) => Err(refuse(err.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    /// The target already existed and was left untouched.
    Kept(PathBuf),
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            WriteOutcome::Written(path) | WriteOutcome::Kept(path) => path,
        }
    }
}

/// Writes whole files into one directory. Content is staged in a temp file
/// in the same directory and renamed into place, so a chapter or book file
/// is either complete or absent.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Writes `{dir}/{filename}`, replacing any existing file.
    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        let target = self.dir.join(filename);
        self.staged(content, &target)?
            .persist(&target)
            .map_err(|err| PersistError::io(&target, err.error))?;
        Ok(target)
    }

    /// Writes `{dir}/{filename}` only if nothing is there yet.
    pub fn write_new(&self, filename: &str, content: &str) -> Result<WriteOutcome, PersistError> {
        let target = self.dir.join(filename);
        if target.exists() {
            return Ok(WriteOutcome::Kept(target));
        }
        match self.staged(content, &target)?.persist_noclobber(&target) {
            Ok(_) => Ok(WriteOutcome::Written(target)),
            Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                Ok(WriteOutcome::Kept(target))
            }
            Err(err) => Err(PersistError::io(&target, err.error)),
        }
    }

    fn staged(&self, content: &str, target: &Path) -> Result<NamedTempFile, PersistError> {
        ensure_output_dir(&self.dir)?;
        let stage = || -> io::Result<NamedTempFile> {
            let mut tmp = NamedTempFile::new_in(&self.dir)?;
            tmp.write_all(content.as_bytes())?;
            tmp.as_file_mut().sync_all()?;
            Ok(tmp)
        };
        stage().map_err(|err| PersistError::io(target, err))
    }
}
