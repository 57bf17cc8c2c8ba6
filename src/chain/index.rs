//! Block index arena
//!
//! Index nodes live in a `Vec` and point at their parent by `NodeId`.
//! A reorg only moves the best-tip marker; nothing is ever unlinked, so a
//! stored `NodeId` stays valid for the lifetime of the index.

use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::constants::Height;
use crate::crypto::Hash;

/// Stable key of a node inside one `ChainIndex`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Chain index errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("Genesis already present: {0}")]
    GenesisExists(Hash),
    #[error("Unknown parent block {0}")]
    UnknownParent(Hash),
    #[error("Block {0} already indexed")]
    DuplicateHash(Hash),
    #[error("Unknown best-tip block {0}")]
    UnknownTip(Hash),
}

/// Capabilities every index node variant shares
pub trait IndexEntry {
    /// Height of this block
    fn height(&self) -> Height;
    /// Hash of this block
    fn hash(&self) -> Hash;
    /// Parent key, `None` for genesis
    fn prev(&self) -> Option<NodeId>;
}

/// Index node backing a fully validated, block-bodied chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullIndexNode {
    pub height: Height,
    pub hash: Hash,
    pub prev: Option<NodeId>,
    /// Accumulated trust up to and including this block
    pub chain_trust: u128,
    pub proof_of_stake: bool,
}

/// Index node backing a headers-only chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThinIndexNode {
    pub height: Height,
    pub hash: Hash,
    pub prev: Option<NodeId>,
}

impl IndexEntry for FullIndexNode {
    fn height(&self) -> Height {
        self.height
    }
    fn hash(&self) -> Hash {
        self.hash
    }
    fn prev(&self) -> Option<NodeId> {
        self.prev
    }
}

impl IndexEntry for ThinIndexNode {
    fn height(&self) -> Height {
        self.height
    }
    fn hash(&self) -> Hash {
        self.hash
    }
    fn prev(&self) -> Option<NodeId> {
        self.prev
    }
}

/// Arena of index nodes with hash lookup and a best-tip marker
#[derive(Debug, Clone)]
pub struct ChainIndex<N> {
    nodes: Vec<N>,
    by_hash: HashMap<Hash, NodeId>,
    best: Option<NodeId>,
}

/// Index used in FULL mode
pub type FullIndex = ChainIndex<FullIndexNode>;

/// Index used in THIN mode
pub type ThinIndex = ChainIndex<ThinIndexNode>;

impl<N: IndexEntry> ChainIndex<N> {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            by_hash: HashMap::new(),
            best: None,
        }
    }

    /// Number of indexed blocks
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by key
    pub fn get(&self, id: NodeId) -> Option<&N> {
        self.nodes.get(id.0)
    }

    /// Key of the block with this hash
    pub fn lookup(&self, hash: &Hash) -> Option<NodeId> {
        self.by_hash.get(hash).copied()
    }

    /// Node of the block with this hash
    pub fn get_by_hash(&self, hash: &Hash) -> Option<&N> {
        self.lookup(hash).and_then(|id| self.get(id))
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.by_hash.contains_key(hash)
    }

    /// Parent of `node`
    pub fn prev_of(&self, node: &N) -> Option<&N> {
        node.prev().and_then(|id| self.get(id))
    }

    /// Current best tip
    pub fn best(&self) -> Option<&N> {
        self.best.and_then(|id| self.get(id))
    }

    pub fn best_id(&self) -> Option<NodeId> {
        self.best
    }

    /// Height of the current best tip
    pub fn best_height(&self) -> Option<Height> {
        self.best().map(IndexEntry::height)
    }

    /// Move the best-tip marker to an indexed block
    pub fn set_best(&mut self, hash: &Hash) -> Result<NodeId, IndexError> {
        let id = self.lookup(hash).ok_or(IndexError::UnknownTip(*hash))?;
        self.best = Some(id);
        debug!(tip = %hash.short(), "best tip moved");
        Ok(id)
    }

    /// Walk from `from` back to genesis, `from` included
    pub fn ancestors(&self, from: NodeId) -> Ancestors<'_, N> {
        Ancestors {
            index: self,
            next: Some(from),
        }
    }

    fn push(&mut self, node: N) -> Result<NodeId, IndexError> {
        let hash = node.hash();
        if self.by_hash.contains_key(&hash) {
            return Err(IndexError::DuplicateHash(hash));
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.by_hash.insert(hash, id);
        Ok(id)
    }

    /// Resolve a parent hash to (key, child height)
    fn parent_slot(&self, prev_hash: &Hash) -> Result<(NodeId, Height), IndexError> {
        let id = self
            .lookup(prev_hash)
            .ok_or(IndexError::UnknownParent(*prev_hash))?;
        let height = self.nodes[id.0].height() + 1;
        Ok((id, height))
    }

    fn check_no_genesis(&self) -> Result<(), IndexError> {
        match self.nodes.first() {
            Some(genesis) => Err(IndexError::GenesisExists(genesis.hash())),
            None => Ok(()),
        }
    }
}

impl<N: IndexEntry> Default for ChainIndex<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainIndex<FullIndexNode> {
    /// Index the genesis block and make it the best tip
    pub fn insert_genesis(&mut self, hash: Hash) -> Result<NodeId, IndexError> {
        self.check_no_genesis()?;
        let id = self.push(FullIndexNode {
            height: 0,
            hash,
            prev: None,
            chain_trust: 1,
            proof_of_stake: false,
        })?;
        self.best = Some(id);
        Ok(id)
    }

    /// Index a block on top of `prev_hash`
    ///
    /// Does not move the best tip; the caller decides which branch wins.
    pub fn append(
        &mut self,
        prev_hash: &Hash,
        hash: Hash,
        block_trust: u128,
        proof_of_stake: bool,
    ) -> Result<NodeId, IndexError> {
        let (prev, height) = self.parent_slot(prev_hash)?;
        let chain_trust = self.nodes[prev.0].chain_trust.saturating_add(block_trust);
        self.push(FullIndexNode {
            height,
            hash,
            prev: Some(prev),
            chain_trust,
            proof_of_stake,
        })
    }
}

impl ChainIndex<ThinIndexNode> {
    /// Index the genesis header and make it the best tip
    pub fn insert_genesis(&mut self, hash: Hash) -> Result<NodeId, IndexError> {
        self.check_no_genesis()?;
        let id = self.push(ThinIndexNode {
            height: 0,
            hash,
            prev: None,
        })?;
        self.best = Some(id);
        Ok(id)
    }

    /// Index a header on top of `prev_hash`
    pub fn append(&mut self, prev_hash: &Hash, hash: Hash) -> Result<NodeId, IndexError> {
        let (prev, height) = self.parent_slot(prev_hash)?;
        self.push(ThinIndexNode {
            height,
            hash,
            prev: Some(prev),
        })
    }
}

/// Iterator over a node and its ancestors, tip first
pub struct Ancestors<'a, N> {
    index: &'a ChainIndex<N>,
    next: Option<NodeId>,
}

impl<'a, N: IndexEntry> Iterator for Ancestors<'a, N> {
    type Item = &'a N;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.index.get(self.next?)?;
        self.next = node.prev();
        Some(node)
    }
}
