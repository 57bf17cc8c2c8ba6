//! Checkpoint enforcement
//!
//! Two gates guard the active chain:
//! - hardcoded checkpoints pin a block hash at selected heights
//! - the sync checkpoint trails the best tip by at most `span` blocks;
//!   nothing at or below it may be rewritten
//!
//! The sync checkpoint is never stored. It is recomputed from the current
//! tip on every call, so it advances with the tip on its own.

use thiserror::Error;
use tracing::{debug, warn};

use crate::chain::{ChainIndex, FullIndex, FullIndexNode, IndexEntry, ThinIndex, ThinIndexNode};
use crate::constants::Height;
use crate::crypto::Hash;
use crate::params::{ChainParams, CheckpointMap, NodeMode};

/// The caller drove the authority with an index it cannot work on
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("{mode} chain index has no best tip")]
    NoBestTip { mode: NodeMode },
    #[error("Thin node mode requires a headers-only index")]
    MissingThinIndex,
}

/// Why a block may not extend or replace the active chain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckpointViolation {
    #[error("Hardcoded checkpoint mismatch at height {height}: expected {expected}, found {found}")]
    Hardened {
        height: Height,
        expected: Hash,
        found: Hash,
    },
    #[error("Height {height} is at or below the sync checkpoint at {floor}")]
    SyncWindow { height: Height, floor: Height },
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}

/// Chain indices handed to the sync checks
///
/// Borrowing the indices for the whole call keeps the walk on one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ChainView<'a> {
    pub full: &'a FullIndex,
    pub thin: Option<&'a ThinIndex>,
}

impl<'a> ChainView<'a> {
    /// View for a node running in FULL mode
    pub fn full(full: &'a FullIndex) -> Self {
        Self { full, thin: None }
    }

    /// View for a node running in THIN mode
    pub fn thin(full: &'a FullIndex, thin: &'a ThinIndex) -> Self {
        Self {
            full,
            thin: Some(thin),
        }
    }
}

/// Shallowest ancestor of the tip still inside the window
///
/// Steps back from the best tip while a previous node exists and
/// `previous.height + span > reference_height`. Returns `None` only when the
/// index has no best tip.
pub fn trailing_floor<N: IndexEntry>(
    index: &ChainIndex<N>,
    reference_height: Height,
    span: Height,
) -> Option<&N> {
    let mut node = index.best()?;
    while let Some(prev) = index.prev_of(node) {
        if prev.height().saturating_add(span) <= reference_height {
            break;
        }
        node = prev;
    }
    Some(node)
}

/// Enforces hardcoded and sync checkpoints for one network and node mode
#[derive(Debug, Clone)]
pub struct CheckpointAuthority {
    checkpoints: CheckpointMap,
    span: Height,
    mode: NodeMode,
}

impl CheckpointAuthority {
    pub fn new(checkpoints: CheckpointMap, span: Height, mode: NodeMode) -> Self {
        Self {
            checkpoints,
            span,
            mode,
        }
    }

    pub fn from_params(params: &ChainParams, mode: NodeMode) -> Self {
        Self::new(params.checkpoints.clone(), params.checkpoint_span, mode)
    }

    pub fn mode(&self) -> NodeMode {
        self.mode
    }

    pub fn span(&self) -> Height {
        self.span
    }

    pub fn checkpoints(&self) -> &CheckpointMap {
        &self.checkpoints
    }

    /// Whether `hash` is acceptable at `height` under the hardcoded table
    ///
    /// Heights without a checkpoint are unconstrained.
    pub fn check_hardened(&self, height: Height, hash: &Hash) -> bool {
        match self.checkpoints.get(height) {
            Some(expected) => expected == hash,
            None => true,
        }
    }

    /// Highest checkpointed height, 0 without checkpoints
    pub fn total_blocks_estimate(&self) -> Height {
        self.checkpoints.max_height().unwrap_or(0)
    }

    /// Most recent checkpoint block present in `index`
    pub fn last_checkpoint<'i, N: IndexEntry>(&self, index: &'i ChainIndex<N>) -> Option<&'i N> {
        self.checkpoints
            .iter_desc()
            .find_map(|(_, hash)| index.get_by_hash(hash))
    }

    /// Sync checkpoint of a FULL node
    pub fn auto_select_sync_checkpoint<'i>(
        &self,
        full: &'i FullIndex,
    ) -> Result<&'i FullIndexNode, PreconditionError> {
        let tip_height = full.best_height().ok_or(PreconditionError::NoBestTip {
            mode: NodeMode::Full,
        })?;
        let floor = trailing_floor(full, tip_height, self.span).ok_or(
            PreconditionError::NoBestTip {
                mode: NodeMode::Full,
            },
        )?;
        debug!(tip = tip_height, floor = floor.height, "sync checkpoint selected");
        Ok(floor)
    }

    /// Sync checkpoint of a THIN node
    ///
    /// Walks the header chain but measures the window against
    /// `reference_height`, the best height of the full index.
    pub fn auto_select_sync_thin_checkpoint<'i>(
        &self,
        thin: &'i ThinIndex,
        reference_height: Height,
    ) -> Result<&'i ThinIndexNode, PreconditionError> {
        let floor = trailing_floor(thin, reference_height, self.span).ok_or(
            PreconditionError::NoBestTip {
                mode: NodeMode::Thin,
            },
        )?;
        debug!(
            reference = reference_height,
            floor = floor.height,
            "thin sync checkpoint selected"
        );
        Ok(floor)
    }

    /// Height of the sync checkpoint for the configured node mode
    pub fn sync_checkpoint_height(&self, view: &ChainView<'_>) -> Result<Height, PreconditionError> {
        match self.mode {
            NodeMode::Full => Ok(self.auto_select_sync_checkpoint(view.full)?.height),
            NodeMode::Thin => {
                let thin = view.thin.ok_or(PreconditionError::MissingThinIndex)?;
                let reference = view.full.best_height().ok_or(PreconditionError::NoBestTip {
                    mode: NodeMode::Full,
                })?;
                Ok(self.auto_select_sync_thin_checkpoint(thin, reference)?.height)
            }
        }
    }

    /// Whether a block at `height` lies above the sync checkpoint
    pub fn check_sync(&self, height: Height, view: &ChainView<'_>) -> Result<bool, PreconditionError> {
        Ok(height > self.sync_checkpoint_height(view)?)
    }

    /// Both gates, reporting which one failed
    pub fn validate_block_position(
        &self,
        height: Height,
        hash: &Hash,
        view: &ChainView<'_>,
    ) -> Result<(), CheckpointViolation> {
        if let Some(expected) = self.checkpoints.get(height) {
            if expected != hash {
                warn!(height, expected = %expected, found = %hash, "hardcoded checkpoint mismatch");
                return Err(CheckpointViolation::Hardened {
                    height,
                    expected: *expected,
                    found: *hash,
                });
            }
        }

        let floor = self.sync_checkpoint_height(view)?;
        if height <= floor {
            warn!(height, floor, "block below sync checkpoint rejected");
            return Err(CheckpointViolation::SyncWindow { height, floor });
        }
        Ok(())
    }
}
