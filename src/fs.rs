use std::{
    env,
    fs::{self, File, Metadata, OpenOptions, TryLockError},
    io,
};

use crate::{FilePath, NormalizeError};

/// What a path names on the device, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindOnDevice {
    None,
    File,
    Directory,
}

/// Advisory lock mode for the stream collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareMode {
    /// Other handles may hold the file concurrently.
    Shared,
    /// The handle holds the file exclusively for its lifetime.
    Exclusive,
}

fn lock(file: &File, share: ShareMode) -> io::Result<()> {
    let locked = match share {
        ShareMode::Shared => file.try_lock_shared(),
        ShareMode::Exclusive => file.try_lock(),
    };
    match locked {
        Ok(()) => Ok(()),
        Err(TryLockError::WouldBlock) => Err(io::Error::new(
            io::ErrorKind::WouldBlock,
            "file is locked by another handle",
        )),
        Err(TryLockError::Error(err)) => Err(err),
    }
}

impl FilePath {
    /// Queries the filesystem for what this path names. A path without a
    /// file-name portion can only name a directory; otherwise a file match
    /// wins over a directory match.
    pub fn on_device(&self) -> KindOnDevice {
        let Ok(metadata) = fs::metadata(self.as_str()) else {
            return KindOnDevice::None;
        };
        if !self.has_file_name() {
            return if metadata.is_dir() {
                KindOnDevice::Directory
            } else {
                KindOnDevice::None
            };
        }
        if metadata.is_file() {
            KindOnDevice::File
        } else if metadata.is_dir() {
            KindOnDevice::Directory
        } else {
            KindOnDevice::None
        }
    }

    #[inline]
    pub fn exists(&self) -> bool {
        self.on_device() != KindOnDevice::None
    }

    pub fn metadata(&self) -> io::Result<Metadata> {
        fs::metadata(self.as_str())
    }

    /// Opens the file for reading. [`ShareMode::Exclusive`] locks out
    /// concurrent readers and writers for the lifetime of the handle.
    pub fn open_read(&self, share: ShareMode) -> io::Result<File> {
        let file = File::open(self.as_str())?;
        lock(&file, share)?;
        Ok(file)
    }

    /// Opens an existing file for reading and writing.
    pub fn open_write(&self, share: ShareMode) -> io::Result<File> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(self.as_str())?;
        lock(&file, share)?;
        Ok(file)
    }

    /// Creates a new file, or truncates an existing one, for reading and
    /// writing.
    pub fn create(&self, share: ShareMode) -> io::Result<File> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.as_str())?;
        lock(&file, share)?;
        Ok(file)
    }

    /// Normalizes the path through the OS path canonicalizer.
    ///
    /// Fails with [`NormalizeError::InvalidPathError`] when the path is
    /// empty or does not pass [`FilePath::is_valid`]; canonicalizer
    /// failures propagate untouched.
    pub fn normalize(&self) -> Result<FilePath, NormalizeError> {
        if self.is_empty() || !self.is_valid() {
            return Err(NormalizeError::InvalidPathError {
                path: self.as_str().to_owned(),
            });
        }
        let absolute = std::path::absolute(self.as_str())?;
        Ok(FilePath::new(absolute.to_string_lossy()))
    }

    /// Searches the `;`-separated entries of the named environment variable
    /// for one containing `file_name`; returns the first combination that
    /// exists, or the empty path.
    pub fn resolve_file_name_from_env(var_name: &str, file_name: &str) -> FilePath {
        let Ok(content) = env::var(var_name) else {
            return FilePath::default();
        };
        for entry in content.split(';') {
            if entry.is_empty() {
                continue;
            }
            let candidate = FilePath::combine(&[entry, file_name]);
            if candidate.exists() {
                return candidate;
            }
        }
        FilePath::default()
    }
}
