use glam::IVec2;
use std::collections::HashSet;

/// Integer rectangle in a y-up coordinate system (`bottom < top`).
///
/// Used both as a body's extents (offsets relative to its position) and as a
/// world-space box once translated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Recti {
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
    pub top: i32,
}

impl Recti {
    pub const fn new(left: i32, bottom: i32, right: i32, top: i32) -> Self {
        Self { left, bottom, right, top }
    }

    /// Box anchored at the origin, extending right and up.
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn width(self) -> i32 {
        self.right - self.left
    }

    pub fn height(self) -> i32 {
        self.top - self.bottom
    }

    pub fn translate(self, by: IVec2) -> Self {
        Self {
            left: self.left + by.x,
            bottom: self.bottom + by.y,
            right: self.right + by.x,
            top: self.top + by.y,
        }
    }
}

/// Movement axis. Bodies resolve X and Y independently.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn unit(self) -> IVec2 {
        match self {
            Axis::X => IVec2::X,
            Axis::Y => IVec2::Y,
        }
    }
}

/// Stable handle for an actor registered in a `Level`. Never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActorId(pub u32);

/// Stable handle for a solid registered in a `Level`. Never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SolidId(pub u32);

/// Actors riding a solid, snapshotted before that solid moves.
#[derive(Clone, Debug, Default)]
pub struct ActorList {
    actors: HashSet<ActorId>,
}

impl ActorList {
    pub fn add(&mut self, actor: ActorId) {
        self.actors.insert(actor);
    }

    pub fn has_actor(&self, actor: ActorId) -> bool {
        self.actors.contains(&actor)
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

/// Two actors found overlapping during a movement check.
///
/// Purely informational: actors never block each other.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ActorOverlap {
    /// The actor that was moving.
    pub a: ActorId,
    pub b: ActorId,
}

/// Counters for the current frame, reset by `Level::update`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelStats {
    pub actors: usize,
    pub solids: usize,
    /// Actors displaced out of a moving solid.
    pub pushes: usize,
    /// Riding actors moved along with a solid.
    pub carries: usize,
    pub squishes: usize,
    /// Actor moves cut short by a collidable solid.
    pub blocked_moves: usize,
    /// Overlap events that did not fit in the frame buffer.
    pub dropped_overlaps: usize,
}
