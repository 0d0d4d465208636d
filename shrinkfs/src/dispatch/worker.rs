//! Per-file work done by pool threads.

use super::classify::{classify, MediaType};
use super::config::FailurePolicy;
use crate::cache::TranscodeCache;
use crate::log::Logger;
use crate::scan::SourceEntry;
use crate::tree::{Node, PassthroughNode, TranscodedNode};
use crate::{log_debug, log_warn};
use std::path::PathBuf;
use std::sync::Arc;

/// What became of one scanned entry.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// Non-JPEG, served as-is.
    Passthrough(PathBuf, Arc<dyn Node>),
    /// JPEG backed by a cached artifact.
    Transcoded(PathBuf, Arc<dyn Node>),
    /// JPEG whose transcode failed, served as-is.
    Fallback(PathBuf, Arc<dyn Node>),
    /// Left out of the tree.
    Dropped,
}

/// Turn one entry into a node.
///
/// Per-file failures never escape: they are logged and resolved through
/// `policy`.
pub(crate) fn process_entry(
    entry: SourceEntry,
    source_root: &std::path::Path,
    cache: &TranscodeCache,
    policy: FailurePolicy,
    logger: &Arc<dyn Logger>,
) -> Outcome {
    let Some(relative) = entry.relative_to(source_root).map(|p| p.to_path_buf()) else {
        log_warn!(
            logger,
            "Dropping {}: outside source root {}",
            entry.path.display(),
            source_root.display()
        );
        return Outcome::Dropped;
    };

    let media = classify(&entry.path);
    match media {
        MediaType::Other => {
            log_debug!(
                logger,
                "{} ({}) served unchanged",
                relative.display(),
                media.mime()
            );
            let node = PassthroughNode::new(entry.path, entry.metadata);
            Outcome::Passthrough(relative, Arc::new(node))
        }
        MediaType::Jpeg => match cache.resolve(&entry.path) {
            Ok(artifact) => {
                log_debug!(
                    logger,
                    "{} ({}) -> {} ({} bytes)",
                    relative.display(),
                    media.mime(),
                    artifact.hash,
                    artifact.size
                );
                let node = TranscodedNode::new(artifact, entry.metadata);
                Outcome::Transcoded(relative, Arc::new(node))
            }
            Err(e) => match policy {
                FailurePolicy::Omit => {
                    log_warn!(logger, "Omitting {}: {}", relative.display(), e);
                    Outcome::Dropped
                }
                FailurePolicy::Passthrough => {
                    log_warn!(logger, "Serving {} unchanged: {}", relative.display(), e);
                    let node = PassthroughNode::new(entry.path, entry.metadata);
                    Outcome::Fallback(relative, Arc::new(node))
                }
            },
        },
    }
}
