//! Per-tick collision snapshot
//!
//! A `CollisionContext` borrows the static walls and the paddle for one tick and
//! records which blocks are alive, front-most first. Blocks are addressed by
//! `BlockId` so the motion loop can still flip their state between steps; the
//! step solver only ever reads them.

use serde::{Deserialize, Serialize};

use super::shapes::Aabb;
use super::state::{Block, Paddle, Wall};

/// Anything with a static bounding box for collision purposes
pub trait Collider {
    fn aabb(&self) -> Aabb;
}

/// Index of a block in the level's block list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub usize);

/// Which of the three arena walls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallSide {
    Left,
    Top,
    Right,
}

impl WallSide {
    /// Walls in context slot order. There is no bottom wall: falling out is a lost life.
    pub const ALL: [WallSide; 3] = [WallSide::Left, WallSide::Top, WallSide::Right];
}

/// Read-only view of everything the ball can hit during one tick
#[derive(Debug, Clone)]
pub struct CollisionContext<'a> {
    walls: [&'a Wall; 3],
    paddle: Option<&'a Paddle>,
    /// Live blocks, front-most (last created) first
    blocks: Vec<BlockId>,
}

impl<'a> CollisionContext<'a> {
    /// Build this tick's snapshot.
    ///
    /// Blocks are taken in reverse so rows nearer the paddle are scanned first
    /// and win distance ties.
    pub fn new(walls: [&'a Wall; 3], paddle: Option<&'a Paddle>, blocks: &[Block]) -> Self {
        let blocks = blocks
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, block)| !block.is_destroyed())
            .map(|(index, _)| BlockId(index))
            .collect();

        Self {
            walls,
            paddle,
            blocks,
        }
    }

    pub fn walls(&self) -> &[&'a Wall; 3] {
        &self.walls
    }

    pub fn paddle(&self) -> Option<&'a Paddle> {
        self.paddle
    }

    /// Scan order of the blocks captured at build time
    pub fn block_ids(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Blocks still alive right now, in scan order.
    ///
    /// Blocks destroyed since the snapshot was built are skipped.
    pub fn live_blocks<'b>(
        &'b self,
        blocks: &'b [Block],
    ) -> impl Iterator<Item = (BlockId, &'b Block)> + 'b {
        self.blocks.iter().filter_map(move |&id| {
            blocks
                .get(id.0)
                .filter(|block| !block.is_destroyed())
                .map(|block| (id, block))
        })
    }
}
