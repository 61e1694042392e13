use glam::IVec2;

use std::collections::HashSet;
use std::ops::{Deref, DerefMut};

use crate::api::{ActorBehavior, NarrowphaseApi, SolidBehavior};
use crate::body::{Body, sign};
use crate::config::LevelConfig;
use crate::error::Result;
use crate::flicker::Flicker;
use crate::narrowphase::{Narrowphase, rect_intersect};
use crate::types::*;

struct ActorEntry<C> {
    id: ActorId,
    body: Body,
    flicker: Flicker,
    // Taken out while the actor's own update runs.
    behavior: Option<Box<dyn ActorBehavior<C>>>,
}

struct SolidEntry<C> {
    id: SolidId,
    body: Body,
    is_collidable: bool,
    behavior: Option<Box<dyn SolidBehavior<C>>>,
}

/// What happens when an actor's step is blocked.
enum Reaction<'a> {
    Ignore,
    Squish,
    Call(&'a mut dyn FnMut()),
}

/// Owns every actor and solid and resolves their movement.
///
/// Actors move one unit at a time and stop at the first collidable solid.
/// Solids always complete their move and push or carry actors out of the way.
/// All scans are linear in registration order.
pub struct Level<C> {
    pub cfg: LevelConfig,

    actors: Vec<ActorEntry<C>>,
    solids: Vec<SolidEntry<C>>,
    next_actor: u32,
    next_solid: u32,

    // Frame-local overlap reporting
    overlaps: Vec<ActorOverlap>,
    seen_overlaps: HashSet<(ActorId, ActorId)>,
    overlap_hook: Option<Box<dyn FnMut(ActorId, ActorId)>>,

    // Despawn requests made during an update pass
    despawn_actors: Vec<ActorId>,
    despawn_solids: Vec<SolidId>,

    stats: LevelStats,
}

impl<C> Default for Level<C> {
    fn default() -> Self {
        Self::new(LevelConfig::default())
    }
}

impl<C> Level<C> {
    pub fn new(cfg: LevelConfig) -> Self {
        Self {
            cfg,
            actors: Vec::new(),
            solids: Vec::new(),
            next_actor: 0,
            next_solid: 0,
            overlaps: Vec::new(),
            seen_overlaps: HashSet::new(),
            overlap_hook: None,
            despawn_actors: Vec::new(),
            despawn_solids: Vec::new(),
            stats: LevelStats::default(),
        }
    }

    // --- Registration ------------------------------------------------------

    pub fn add_actor(&mut self, body: Body, behavior: impl ActorBehavior<C> + 'static) -> ActorId {
        let id = ActorId(self.next_actor);
        self.next_actor += 1;
        log::debug!("actor {:?} added at {}", id, body.position);
        self.actors.push(ActorEntry {
            id,
            body,
            flicker: Flicker::default(),
            behavior: Some(Box::new(behavior)),
        });
        id
    }

    pub fn add_solid(&mut self, body: Body, behavior: impl SolidBehavior<C> + 'static) -> SolidId {
        let id = SolidId(self.next_solid);
        self.next_solid += 1;
        log::debug!("solid {:?} added at {}", id, body.position);
        self.solids.push(SolidEntry {
            id,
            body,
            is_collidable: true,
            behavior: Some(Box::new(behavior)),
        });
        id
    }

    /// Remove an actor, keeping the order of the rest. Returns false if unknown.
    pub fn remove_actor(&mut self, id: ActorId) -> bool {
        match self.find_actor(id) {
            Some(i) => {
                self.actors.remove(i);
                true
            }
            None => {
                log::warn!("remove_actor: unknown actor {:?}", id);
                false
            }
        }
    }

    pub fn remove_solid(&mut self, id: SolidId) -> bool {
        match self.find_solid(id) {
            Some(i) => {
                self.solids.remove(i);
                true
            }
            None => {
                log::warn!("remove_solid: unknown solid {:?}", id);
                false
            }
        }
    }

    // --- Queries -----------------------------------------------------------

    pub fn actor(&self, id: ActorId) -> Option<&Body> {
        self.find_actor(id).map(|i| &self.actors[i].body)
    }

    /// Direct access to an actor's body, e.g. to teleport it. Bypasses collision.
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Body> {
        self.find_actor(id).map(|i| &mut self.actors[i].body)
    }

    pub fn solid(&self, id: SolidId) -> Option<&Body> {
        self.find_solid(id).map(|i| &self.solids[i].body)
    }

    /// Direct access to a solid's body. Moving it this way pushes nothing.
    pub fn solid_mut(&mut self, id: SolidId) -> Option<&mut Body> {
        self.find_solid(id).map(|i| &mut self.solids[i].body)
    }

    pub fn actors(&self) -> impl Iterator<Item = (ActorId, &Body)> {
        self.actors.iter().map(|a| (a.id, &a.body))
    }

    pub fn solids(&self) -> impl Iterator<Item = (SolidId, &Body)> {
        self.solids.iter().map(|s| (s.id, &s.body))
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    pub fn is_collidable(&self, id: SolidId) -> bool {
        self.solids[self.solid_index(id)].is_collidable
    }

    pub fn is_actor_visible(&self, id: ActorId) -> bool {
        self.actors[self.actor_index(id)].flicker.is_visible()
    }

    pub fn start_flicker(&mut self, id: ActorId, duration: f32, interval: f32) -> Result<()> {
        let i = self.actor_index(id);
        self.actors[i].flicker.start(duration, interval)
    }

    pub fn stats(&self) -> LevelStats {
        LevelStats {
            actors: self.actors.len(),
            solids: self.solids.len(),
            ..self.stats
        }
    }

    // --- Frame -------------------------------------------------------------

    /// Update every actor, then every solid, in registration order.
    ///
    /// Starts a new frame: overlap events and stats from the previous frame
    /// are discarded. Despawn requests are applied once both passes are done.
    pub fn update(&mut self, dt: f32) {
        self.overlaps.clear();
        self.seen_overlaps.clear();
        self.stats = LevelStats::default();

        for index in 0..self.actors.len() {
            self.actors[index].flicker.update(dt);
            let Some(mut behavior) = self.actors[index].behavior.take() else { continue };
            behavior.update(&mut ActorContext { level: self, index }, dt);
            self.actors[index].behavior = Some(behavior);
        }

        for index in 0..self.solids.len() {
            let Some(mut behavior) = self.solids[index].behavior.take() else { continue };
            behavior.update(&mut SolidContext { level: self, index }, dt);
            self.solids[index].behavior = Some(behavior);
        }

        self.apply_despawns();
    }

    /// Render solids first, then visible actors on top.
    pub fn render(&self, target: &mut C) {
        for solid in &self.solids {
            if let Some(behavior) = &solid.behavior {
                behavior.render(&solid.body, target);
            }
        }
        for actor in &self.actors {
            if !actor.flicker.is_visible() {
                continue;
            }
            if let Some(behavior) = &actor.behavior {
                behavior.render(&actor.body, target);
            }
        }
    }

    // --- Actor overlaps ----------------------------------------------------

    /// Called whenever a moving actor `a` is found overlapping actor `b`.
    ///
    /// The hook sees every report; the event buffer keeps each unordered pair
    /// once per frame. Never blocks movement.
    pub fn register_collision(&mut self, a: ActorId, b: ActorId) {
        log::trace!("actor overlap {:?} / {:?}", a, b);
        if let Some(hook) = self.overlap_hook.as_mut() {
            hook(a, b);
        }
        let key = if a < b { (a, b) } else { (b, a) };
        if !self.seen_overlaps.insert(key) {
            return;
        }
        if self.overlaps.len() < self.cfg.max_overlap_events {
            self.overlaps.push(ActorOverlap { a, b });
        } else {
            self.stats.dropped_overlaps += 1;
            if self.stats.dropped_overlaps == 1 {
                log::warn!("overlap buffer full ({}), dropping events", self.cfg.max_overlap_events);
            }
        }
    }

    pub fn set_overlap_hook(&mut self, hook: impl FnMut(ActorId, ActorId) + 'static) {
        self.overlap_hook = Some(Box::new(hook));
    }

    /// Drain and return the overlaps recorded so far this frame.
    pub fn drain_overlaps(&mut self) -> Vec<ActorOverlap> {
        std::mem::take(&mut self.overlaps)
    }

    // --- Movement ----------------------------------------------------------

    /// Move an actor by a fractional amount. Returns true if it was blocked,
    /// in which case `on_collision` was called once.
    pub fn move_actor_x(&mut self, id: ActorId, dx: f32, mut on_collision: impl FnMut()) -> bool {
        let i = self.actor_index(id);
        self.actor_move(i, Axis::X, dx, Reaction::Call(&mut on_collision))
    }

    pub fn move_actor_y(&mut self, id: ActorId, dy: f32, mut on_collision: impl FnMut()) -> bool {
        let i = self.actor_index(id);
        self.actor_move(i, Axis::Y, dy, Reaction::Call(&mut on_collision))
    }

    /// Move an actor by whole units, bypassing the remainder.
    pub fn please_move_actor_x(&mut self, id: ActorId, dx: i32, mut on_collision: impl FnMut()) -> bool {
        let i = self.actor_index(id);
        self.actor_step(i, Axis::X, dx, Reaction::Call(&mut on_collision))
    }

    pub fn please_move_actor_y(&mut self, id: ActorId, dy: i32, mut on_collision: impl FnMut()) -> bool {
        let i = self.actor_index(id);
        self.actor_step(i, Axis::Y, dy, Reaction::Call(&mut on_collision))
    }

    /// Would the actor hit a collidable solid at `position`?
    pub fn collide_at(&mut self, id: ActorId, position: IVec2) -> bool {
        let i = self.actor_index(id);
        self.actor_collides_at(i, position)
    }

    /// Move a solid, pushing actors out of its way and carrying its riders.
    pub fn move_solid(&mut self, id: SolidId, dx: f32, dy: f32) {
        let s = self.solid_index(id);
        self.solid_move(s, dx, dy);
    }

    /// Actors that currently count as riding the solid.
    pub fn riding_actors(&self, id: SolidId) -> ActorList {
        self.riding_at(self.solid_index(id))
    }

    // --- Internals ---------------------------------------------------------

    fn find_actor(&self, id: ActorId) -> Option<usize> {
        // Ids only grow and removal keeps order, so the list stays sorted.
        self.actors.binary_search_by_key(&id, |a| a.id).ok()
    }

    fn find_solid(&self, id: SolidId) -> Option<usize> {
        self.solids.binary_search_by_key(&id, |s| s.id).ok()
    }

    fn actor_index(&self, id: ActorId) -> usize {
        self.find_actor(id)
            .unwrap_or_else(|| panic!("Unknown actor: {id:?}"))
    }

    fn solid_index(&self, id: SolidId) -> usize {
        self.find_solid(id)
            .unwrap_or_else(|| panic!("Unknown solid: {id:?}"))
    }

    fn actor_move(&mut self, i: usize, axis: Axis, delta: f32, reaction: Reaction<'_>) -> bool {
        let change = self.actors[i].body.take_whole(axis, delta);
        if change == 0 {
            return false;
        }
        self.actor_step(i, axis, change, reaction)
    }

    fn actor_step(&mut self, i: usize, axis: Axis, amount: i32, reaction: Reaction<'_>) -> bool {
        if amount == 0 {
            return false;
        }
        let unit = axis.unit() * sign(amount);
        for _ in 0..amount.unsigned_abs() {
            let next = self.actors[i].body.position + unit;
            if self.actor_collides_at(i, next) {
                // The rest of the request is dropped, not retried.
                self.stats.blocked_moves += 1;
                self.react(i, reaction);
                return true;
            }
            self.actors[i].body.position = next;
        }
        false
    }

    fn actor_collides_at(&mut self, i: usize, position: IVec2) -> bool {
        let rect = self.actors[i].body.rect_at(position);

        if self.cfg.report_actor_overlaps {
            let me = self.actors[i].id;
            for j in 0..self.actors.len() {
                if j != i && rect_intersect(rect, self.actors[j].body.rect()) {
                    let other = self.actors[j].id;
                    self.register_collision(me, other);
                }
            }
        }

        self.solids
            .iter()
            .any(|s| s.is_collidable && rect_intersect(rect, s.body.rect()))
    }

    fn react(&mut self, i: usize, reaction: Reaction<'_>) {
        match reaction {
            Reaction::Ignore => {}
            Reaction::Call(on_collision) => on_collision(),
            Reaction::Squish => {
                self.stats.squishes += 1;
                let actor = &mut self.actors[i];
                log::debug!("actor {:?} squished at {}", actor.id, actor.body.position);
                if let Some(behavior) = actor.behavior.as_mut() {
                    behavior.get_squished(&actor.body);
                }
            }
        }
    }

    fn riding_at(&self, s: usize) -> ActorList {
        let solid = &self.solids[s];
        let mut riding = ActorList::default();
        for actor in &self.actors {
            let Some(behavior) = &actor.behavior else { continue };
            if behavior.is_riding_solid(&actor.body, solid.id, &solid.body) {
                riding.add(actor.id);
            }
        }
        riding
    }

    fn solid_move(&mut self, s: usize, dx: f32, dy: f32) {
        let body = &mut self.solids[s].body;
        let step_x = body.take_whole(Axis::X, dx);
        let step_y = body.take_whole(Axis::Y, dy);
        if step_x == 0 && step_y == 0 {
            return;
        }

        // Must be taken before moving: afterwards riders may no longer touch us.
        let riding = self.riding_at(s);

        let mut level = NonCollidable::new(self, s);
        if step_x != 0 {
            level.solid_step(s, Axis::X, step_x, &riding);
        }
        if step_y != 0 {
            level.solid_step(s, Axis::Y, step_y, &riding);
        }
    }

    fn solid_step(&mut self, s: usize, axis: Axis, amount: i32, riding: &ActorList) {
        self.solids[s].body.position += axis.unit() * amount;
        let solid_rect = self.solids[s].body.rect();

        for i in 0..self.actors.len() {
            let actor_rect = self.actors[i].body.rect();
            if rect_intersect(solid_rect, actor_rect) {
                // push
                self.stats.pushes += 1;
                let push = Narrowphase::push_out(axis, amount, solid_rect, actor_rect);
                self.actor_step(i, axis, push, Reaction::Squish);
            } else if riding.has_actor(self.actors[i].id) {
                // carry
                self.stats.carries += 1;
                self.actor_step(i, axis, amount, Reaction::Ignore);
            }
        }
    }

    fn apply_despawns(&mut self) {
        if !self.despawn_actors.is_empty() {
            let gone = std::mem::take(&mut self.despawn_actors);
            self.actors.retain(|a| !gone.contains(&a.id));
            log::debug!("despawned actors {:?}", gone);
        }
        if !self.despawn_solids.is_empty() {
            let gone = std::mem::take(&mut self.despawn_solids);
            self.solids.retain(|s| !gone.contains(&s.id));
            log::debug!("despawned solids {:?}", gone);
        }
    }
}

/// Keeps a solid out of collision checks while it moves, so the actors it
/// displaces do not get stuck on it. Restored on drop, including on unwind.
struct NonCollidable<'a, C> {
    level: &'a mut Level<C>,
    index: usize,
    was: bool,
}

impl<'a, C> NonCollidable<'a, C> {
    fn new(level: &'a mut Level<C>, index: usize) -> Self {
        let was = std::mem::replace(&mut level.solids[index].is_collidable, false);
        Self { level, index, was }
    }
}

impl<C> Deref for NonCollidable<'_, C> {
    type Target = Level<C>;

    fn deref(&self) -> &Level<C> {
        &*self.level
    }
}

impl<C> DerefMut for NonCollidable<'_, C> {
    fn deref_mut(&mut self) -> &mut Level<C> {
        &mut *self.level
    }
}

impl<C> Drop for NonCollidable<'_, C> {
    fn drop(&mut self) {
        self.level.solids[self.index].is_collidable = self.was;
    }
}

/// Handed to an actor's behavior during its update. Lets it move itself and
/// read the rest of the level.
pub struct ActorContext<'a, C> {
    level: &'a mut Level<C>,
    index: usize,
}

impl<C> ActorContext<'_, C> {
    pub fn id(&self) -> ActorId {
        self.level.actors[self.index].id
    }

    pub fn body(&self) -> &Body {
        &self.level.actors[self.index].body
    }

    pub fn position(&self) -> IVec2 {
        self.body().position
    }

    /// Teleport. Does not resolve collisions.
    pub fn set_position(&mut self, position: IVec2) {
        self.level.actors[self.index].body.position = position;
    }

    pub fn set_size(&mut self, width: i32, height: i32) -> Result<()> {
        self.level.actors[self.index].body.set_size(width, height)
    }

    pub fn set_extents(&mut self, size: Recti) -> Result<()> {
        self.level.actors[self.index].body.set_extents(size)
    }

    pub fn move_x(&mut self, dx: f32, mut on_collision: impl FnMut()) -> bool {
        self.level.actor_move(self.index, Axis::X, dx, Reaction::Call(&mut on_collision))
    }

    pub fn move_y(&mut self, dy: f32, mut on_collision: impl FnMut()) -> bool {
        self.level.actor_move(self.index, Axis::Y, dy, Reaction::Call(&mut on_collision))
    }

    pub fn please_move_x(&mut self, dx: i32, mut on_collision: impl FnMut()) -> bool {
        self.level.actor_step(self.index, Axis::X, dx, Reaction::Call(&mut on_collision))
    }

    pub fn please_move_y(&mut self, dy: i32, mut on_collision: impl FnMut()) -> bool {
        self.level.actor_step(self.index, Axis::Y, dy, Reaction::Call(&mut on_collision))
    }

    pub fn collide_at(&mut self, position: IVec2) -> bool {
        self.level.actor_collides_at(self.index, position)
    }

    pub fn flicker(&mut self, duration: f32, interval: f32) -> Result<()> {
        self.level.actors[self.index].flicker.start(duration, interval)
    }

    /// Remove this actor once the current update pass is over.
    pub fn despawn(&mut self) {
        let id = self.id();
        self.level.despawn_actors.push(id);
    }

    pub fn level(&self) -> &Level<C> {
        self.level
    }
}

/// Handed to a solid's behavior during its update.
pub struct SolidContext<'a, C> {
    level: &'a mut Level<C>,
    index: usize,
}

impl<C> SolidContext<'_, C> {
    pub fn id(&self) -> SolidId {
        self.level.solids[self.index].id
    }

    pub fn body(&self) -> &Body {
        &self.level.solids[self.index].body
    }

    pub fn position(&self) -> IVec2 {
        self.body().position
    }

    /// Teleport. Pushes and carries nothing.
    pub fn set_position(&mut self, position: IVec2) {
        self.level.solids[self.index].body.position = position;
    }

    pub fn set_size(&mut self, width: i32, height: i32) -> Result<()> {
        self.level.solids[self.index].body.set_size(width, height)
    }

    /// Same as `Level::move_solid` on this solid.
    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.level.solid_move(self.index, dx, dy);
    }

    pub fn despawn(&mut self) {
        let id = self.id();
        self.level.despawn_solids.push(id);
    }

    pub fn level(&self) -> &Level<C> {
        self.level
    }
}
