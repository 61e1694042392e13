use crate::body::Body;
use crate::level::{ActorContext, SolidContext};
use crate::types::*;

/// Behavior plugged into an actor. `C` is the host's render context, passed
/// through untouched.
pub trait ActorBehavior<C> {
    /// Per-frame logic. Movement requests go through `ctx`.
    fn update(&mut self, ctx: &mut ActorContext<'_, C>, dt: f32);

    fn render(&self, body: &Body, target: &mut C);

    /// Whether this actor counts as riding `solid` (and is carried when it moves).
    ///
    /// Typically an actor rides a solid when it stands directly on top of it.
    /// Override for e.g. ledge grabs, or flyers that never ride anything.
    fn is_riding_solid(&self, me: &Body, _solid: SolidId, solid_body: &Body) -> bool {
        me.is_resting_on(solid_body)
    }

    /// Called when a solid pushes this actor into another solid.
    fn get_squished(&mut self, _me: &Body) {}
}

pub trait SolidBehavior<C> {
    fn update(&mut self, ctx: &mut SolidContext<'_, C>, dt: f32);
    fn render(&self, body: &Body, target: &mut C);
}

/// Static level geometry: never moves, draws nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct FixedSolid;

impl<C> SolidBehavior<C> for FixedSolid {
    fn update(&mut self, _ctx: &mut SolidContext<'_, C>, _dt: f32) {}
    fn render(&self, _body: &Body, _target: &mut C) {}
}

/// Collision reaction that does nothing.
pub fn no_collision_reaction() {}

/// Rectangle tests the movement code is built on.
pub trait NarrowphaseApi {
    fn overlap_rect_rect(a: Recti, b: Recti) -> bool;

    /// Signed distance that moves `actor` clear of `solid` along `axis`,
    /// given the direction of the solid's `step`.
    fn push_out(axis: Axis, step: i32, solid: Recti, actor: Recti) -> i32;
}
