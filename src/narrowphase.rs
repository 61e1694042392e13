use crate::api::NarrowphaseApi;
use crate::types::*;

/// Integer rectangle tests used by actor and solid movement.
pub struct Narrowphase;

impl NarrowphaseApi for Narrowphase {
    fn overlap_rect_rect(a: Recti, b: Recti) -> bool {
        // Half-open: shared edges do not count.
        a.left < b.right && b.left < a.right && a.bottom < b.top && b.bottom < a.top
    }

    fn push_out(axis: Axis, step: i32, solid: Recti, actor: Recti) -> i32 {
        match (axis, step > 0) {
            (Axis::X, true) => solid.right - actor.left,
            (Axis::X, false) => solid.left - actor.right,
            (Axis::Y, true) => solid.top - actor.bottom,
            (Axis::Y, false) => solid.bottom - actor.top,
        }
    }
}

/// Shorthand used throughout the engine.
pub fn rect_intersect(a: Recti, b: Recti) -> bool {
    Narrowphase::overlap_rect_rect(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_basic() {
        let a = Recti::new(0, 0, 10, 10);
        let b = Recti::new(5, 5, 15, 15);
        assert!(rect_intersect(a, b));
        assert!(rect_intersect(b, a));
        let inner = Recti::new(2, 2, 3, 3);
        assert!(rect_intersect(a, inner));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Recti::new(0, 0, 10, 10);
        assert!(!rect_intersect(a, Recti::new(10, 0, 20, 10)));
        assert!(!rect_intersect(a, Recti::new(0, 10, 10, 20)));
        assert!(!rect_intersect(a, Recti::new(-10, -10, 0, 0)));
        // one unit of overlap is enough
        assert!(rect_intersect(a, Recti::new(9, 9, 20, 20)));
    }

    #[test]
    fn test_push_out_restores_separation() {
        let solid = Recti::new(3, 0, 13, 10);
        let actor = Recti::new(10, 0, 20, 10);
        let d = Narrowphase::push_out(Axis::X, 3, solid, actor);
        assert_eq!(d, 3);
        assert!(!rect_intersect(solid, actor.translate(Axis::X.unit() * d)));

        let solid = Recti::new(-5, 0, 5, 10);
        let actor = Recti::new(-12, 0, -2, 10);
        let d = Narrowphase::push_out(Axis::X, -1, solid, actor);
        assert_eq!(d, -3);
        assert!(!rect_intersect(solid, actor.translate(Axis::X.unit() * d)));
    }

    #[test]
    fn test_push_out_vertical() {
        let solid = Recti::new(0, 0, 10, 4);
        let actor = Recti::new(0, 2, 10, 12);
        assert_eq!(Narrowphase::push_out(Axis::Y, 2, solid, actor), 2);
        let actor_below = Recti::new(0, -8, 10, 1);
        assert_eq!(Narrowphase::push_out(Axis::Y, -1, solid, actor_below), -1);
    }
}
