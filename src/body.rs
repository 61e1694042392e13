use glam::IVec2;
use std::cmp::Ordering;

use crate::error::{LevelError, Result};
use crate::narrowphase::rect_intersect;
use crate::types::*;

/// Position, extents and sub-pixel remainders shared by actors and solids.
///
/// Position and extents are always whole units; fractional motion only ever
/// lives in the remainders.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub position: IVec2,
    size: Recti,
    pub x_remainder: f32,
    pub y_remainder: f32,
}

impl Body {
    /// Body of `width` x `height` with its bottom-left corner at `position`.
    pub fn new(position: IVec2, width: i32, height: i32) -> Result<Self> {
        Self::with_extents(position, Recti::from_size(width, height))
    }

    /// Body with arbitrary extents relative to `position`.
    pub fn with_extents(position: IVec2, size: Recti) -> Result<Self> {
        validate(size)?;
        Ok(Self {
            position,
            size,
            x_remainder: 0.0,
            y_remainder: 0.0,
        })
    }

    pub fn size(&self) -> Recti {
        self.size
    }

    pub fn width(&self) -> i32 {
        self.size.width()
    }

    pub fn height(&self) -> i32 {
        self.size.height()
    }

    pub fn set_size(&mut self, width: i32, height: i32) -> Result<()> {
        self.set_extents(Recti::from_size(width, height))
    }

    pub fn set_extents(&mut self, size: Recti) -> Result<()> {
        validate(size)?;
        self.size = size;
        Ok(())
    }

    pub fn rect_at(&self, position: IVec2) -> Recti {
        self.size.translate(position)
    }

    pub fn rect(&self) -> Recti {
        self.rect_at(self.position)
    }

    pub fn left(&self) -> i32 {
        self.rect().left
    }

    pub fn right(&self) -> i32 {
        self.rect().right
    }

    pub fn top(&self) -> i32 {
        self.rect().top
    }

    pub fn bottom(&self) -> i32 {
        self.rect().bottom
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        rect_intersect(self.rect(), other.rect())
    }

    /// True when this body stands directly on top of `other`: bottom edge on
    /// its top edge with some horizontal overlap.
    pub fn is_resting_on(&self, other: &Body) -> bool {
        let me = self.rect();
        let them = other.rect();
        me.bottom == them.top && me.left < them.right && them.left < me.right
    }

    /// Accumulate `delta` into the remainder of `axis` and take out the whole
    /// units it now holds.
    pub(crate) fn take_whole(&mut self, axis: Axis, delta: f32) -> i32 {
        let remainder = match axis {
            Axis::X => &mut self.x_remainder,
            Axis::Y => &mut self.y_remainder,
        };
        *remainder += delta;
        let change = round_step(*remainder);
        if change != 0 {
            *remainder -= change as f32;
        }
        change
    }
}

fn validate(size: Recti) -> Result<()> {
    if size.width() <= 0 || size.height() <= 0 {
        return Err(LevelError::InvalidSize {
            width: size.width(),
            height: size.height(),
        });
    }
    Ok(())
}

/// Round to the nearest whole unit, halfway cases away from zero
/// (0.5 -> 1, -0.5 -> -1).
pub fn round_step(f: f32) -> i32 {
    f.round() as i32
}

/// Direction of a non-zero step.
///
/// # Panics
/// Panics on zero; callers only ask for the sign of a step they are about to take.
pub fn sign(x: i32) -> i32 {
    match x.cmp(&0) {
        Ordering::Greater => 1,
        Ordering::Less => -1,
        Ordering::Equal => unreachable!("sign of a zero step"),
    }
}
