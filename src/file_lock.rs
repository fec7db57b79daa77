//! Advisory file locks held for the lifetime of a reader or writer.

use std::fs::File;
use std::io::{self, Read, Write};

use fs2::FileExt;
use log::warn;

/// Exclusive lock on a file, for writers
pub struct ExclusiveLock {
    file: File,
}

impl ExclusiveLock {
    pub fn new(file: File) -> io::Result<Self> {
        file.lock_exclusive()?;
        Ok(ExclusiveLock { file })
    }

    /// Truncate the locked file, e.g. before rewriting it
    pub fn set_len(&self, size: u64) -> io::Result<()> {
        self.file.set_len(size)
    }
}

impl Drop for ExclusiveLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            warn!("Failed to release exclusive lock: {}", e);
        }
    }
}

impl Read for ExclusiveLock {
    #[inline(always)]
    fn read(&mut self, data: &mut [u8]) -> io::Result<usize> {
        self.file.read(data)
    }
}

impl Write for ExclusiveLock {
    #[inline(always)]
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.file.write(data)
    }

    #[inline(always)]
    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Shared lock on a file, for readers
pub struct SharedLock {
    file: File,
}

impl SharedLock {
    pub fn new(file: File) -> io::Result<Self> {
        file.lock_shared()?;
        Ok(SharedLock { file })
    }
}

impl Drop for SharedLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            warn!("Failed to release shared lock: {}", e);
        }
    }
}

impl Read for SharedLock {
    #[inline(always)]
    fn read(&mut self, data: &mut [u8]) -> io::Result<usize> {
        self.file.read(data)
    }
}
