//! Batched file reads that survive descriptor exhaustion.

use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::Result;

/// Largest number of reads in flight at once.
pub const MAX_READS: usize = 200;

/// `EMFILE`: the process is out of file descriptors.
const EMFILE: i32 = 24;
/// `ENFILE`: the system is out of file descriptors.
const ENFILE: i32 = 23;

/// Size and modification time of a file, used to skip unchanged files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileStamp {
    pub size: u64,
    pub modified: Option<SystemTime>,
}

impl FileStamp {
    #[must_use]
    pub fn from_metadata(metadata: &std::fs::Metadata) -> Self {
        Self {
            size: metadata.len(),
            modified: metadata.modified().ok(),
        }
    }
}

/// A file read from disk.
#[derive(Debug, Clone)]
pub struct ReadFile {
    pub path: PathBuf,
    pub content: String,
    pub stamp: FileStamp,
}

/// Current stamp of `path`, or `None` if it cannot be stat'ed.
pub async fn stamp(path: &std::path::Path) -> Option<FileStamp> {
    tokio::fs::metadata(path)
        .await
        .ok()
        .map(|metadata| FileStamp::from_metadata(&metadata))
}

/// Read every path, at most [`MAX_READS`] at a time.
///
/// Each batch is awaited in full before the next starts. Files that fail
/// because descriptors ran out go back on the queue for a later batch; any
/// other failure is logged and the file is skipped.
#[tracing::instrument(skip_all, fields(files = paths.len()))]
pub async fn read_files(paths: Vec<PathBuf>) -> Result<Vec<ReadFile>> {
    let mut queue: VecDeque<PathBuf> = paths.into();
    let mut files = Vec::with_capacity(queue.len());

    while !queue.is_empty() {
        let batch: Vec<PathBuf> = queue.drain(..queue.len().min(MAX_READS)).collect();
        let batch_len = batch.len();
        let handles: Vec<_> = batch
            .into_iter()
            .map(|path| tokio::spawn(read_one(path)))
            .collect();

        let mut requeued = 0;
        for handle in handles {
            match handle.await? {
                Ok(file) => files.push(file),
                Err((path, error)) if is_exhaustion(&error) => {
                    tracing::trace!(path = %path.display(), "out of descriptors, requeueing");
                    requeued += 1;
                    queue.push_back(path);
                }
                Err((path, error)) => {
                    tracing::warn!(path = %path.display(), %error, "skipping unreadable file");
                }
            }
        }

        tracing::debug!(batch = batch_len, requeued, remaining = queue.len(), "read batch");
        if requeued == batch_len {
            // Nothing got through; give other tasks a chance to close files.
            tokio::task::yield_now().await;
        }
    }

    Ok(files)
}

async fn read_one(path: PathBuf) -> std::result::Result<ReadFile, (PathBuf, io::Error)> {
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(error) => return Err((path, error)),
    };
    match tokio::fs::metadata(&path).await {
        Ok(metadata) => Ok(ReadFile {
            stamp: FileStamp::from_metadata(&metadata),
            path,
            content,
        }),
        Err(error) => Err((path, error)),
    }
}

fn is_exhaustion(error: &io::Error) -> bool {
    matches!(error.raw_os_error(), Some(EMFILE | ENFILE))
}
