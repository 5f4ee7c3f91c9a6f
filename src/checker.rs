//! Concurrent message-id existence checking
//!
//! Fans a list of message-ids out over up to `maxCons` connections to one
//! server. Each chunk gets its own connection and STATs its ids in order;
//! results accumulate in a shared report. A 223 means the article exists,
//! any other accepted STAT outcome counts as missing.

use crate::client::NntpClient;
use crate::config::ServerEntry;
use crate::error::{NntpError, Result};
use crate::response::codes;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Log progress every this many completed STATs
const PROGRESS_INTERVAL: usize = 10;

/// Which of the queried message-ids exist on the server
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExistenceReport {
    /// Ids the server answered 223 for
    pub found: Vec<String>,
    /// Ids the server reported missing
    pub not_found: Vec<String>,
}

impl ExistenceReport {
    /// Total number of ids classified so far
    pub fn total(&self) -> usize {
        self.found.len() + self.not_found.len()
    }
}

/// Partition `len` items into `max_cons` contiguous chunks
///
/// Every chunk holds `len / max_cons` items; the final chunk absorbs the
/// remainder. Returned as half-open `(start, end)` index pairs.
fn chunk_bounds(len: usize, max_cons: usize) -> Vec<(usize, usize)> {
    let max_cons = max_cons.max(1);
    let per_chunk = len / max_cons;
    let mut bounds = Vec::with_capacity(max_cons);
    let mut start = 0;
    for i in 0..max_cons {
        let end = if i == max_cons - 1 {
            len
        } else {
            start + per_chunk
        };
        bounds.push((start, end));
        start = end;
    }
    bounds
}

/// Check which of `ids` exist on the server described by `entry`
///
/// The fan-out degree is the entry's `maxCons` (default 1). Each chunk
/// connects, authenticates, STATs its ids sequentially, and quits. A failed
/// chunk does not cancel its siblings; the first chunk error, if any, is
/// returned once every task has finished.
pub async fn check_existence(
    entry: Arc<ServerEntry>,
    ids: Vec<String>,
) -> Result<ExistenceReport> {
    let max_cons = entry.max_cons.unwrap_or(1);
    let total = ids.len();
    info!(total, max_cons, server = %entry.url, "starting existence check");

    let report = Arc::new(Mutex::new(ExistenceReport::default()));
    let ids = Arc::new(ids);

    let mut tasks = Vec::new();
    for (start, end) in chunk_bounds(total, max_cons) {
        if start == end {
            continue;
        }
        let entry = Arc::clone(&entry);
        let ids = Arc::clone(&ids);
        let report = Arc::clone(&report);
        tasks.push(tokio::spawn(async move {
            check_chunk(entry, &ids[start..end], report, total).await
        }));
    }

    let mut first_err = None;
    for task in tasks {
        match task.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                warn!(%err, "existence check chunk failed");
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
            Err(err) => {
                let err = NntpError::Io(std::io::Error::other(format!("task join error: {err}")));
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }
    }
    if let Some(err) = first_err {
        return Err(err);
    }

    let mut guard = report.lock().await;
    let report = std::mem::take(&mut *guard);
    info!(
        found = report.found.len(),
        not_found = report.not_found.len(),
        total,
        "existence check complete"
    );
    Ok(report)
}

/// STAT one chunk of ids over its own connection
async fn check_chunk(
    entry: Arc<ServerEntry>,
    ids: &[String],
    report: Arc<Mutex<ExistenceReport>>,
    total: usize,
) -> Result<()> {
    let mut client = NntpClient::connect(entry).await?;
    client.authenticate().await?;

    for id in ids {
        let resp = client.stat(id).await?;
        let mut guard = report.lock().await;
        if resp.code == codes::ARTICLE_STAT {
            guard.found.push(id.clone());
        } else {
            guard.not_found.push(id.clone());
        }
        let done = guard.total();
        drop(guard);
        if done % PROGRESS_INTERVAL == 0 {
            info!(done, total, "existence check progress");
        }
    }

    client.quit().await
}
