use crate::error::{LevelError, Result};

#[derive(Copy, Clone, Debug, PartialEq)]
struct ActiveFlicker {
    duration: f32,
    interval: f32,
    elapsed: f32,
}

/// Blinking visibility, e.g. for invulnerability frames after a hit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Flicker {
    visible: bool,
    active: Option<ActiveFlicker>,
}

impl Default for Flicker {
    fn default() -> Self {
        Self { visible: true, active: None }
    }
}

impl Flicker {
    /// Toggle visibility every `interval` seconds for `duration` seconds.
    pub fn start(&mut self, duration: f32, interval: f32) -> Result<()> {
        if !(duration > 0.0 && interval > 0.0) {
            return Err(LevelError::InvalidFlicker { duration, interval });
        }
        self.active = Some(ActiveFlicker { duration, interval, elapsed: 0.0 });
        Ok(())
    }

    pub fn update(&mut self, dt: f32) {
        let Some(active) = self.active.as_mut() else { return };

        active.duration -= dt;
        if active.duration <= 0.0 {
            self.active = None;
            self.visible = true;
            return;
        }
        active.elapsed += dt;
        if active.elapsed >= active.interval {
            let toggles = (active.elapsed / active.interval).floor();
            active.elapsed %= active.interval;
            if toggles % 2.0 == 1.0 {
                self.visible = !self.visible;
            }
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_timings() {
        let mut f = Flicker::default();
        assert!(f.start(0.0, 0.1).is_err());
        assert!(f.start(1.0, -0.1).is_err());
        assert!(f.start(f32::NAN, 0.1).is_err());
        assert!(!f.is_active());
    }

    #[test]
    fn test_toggles_then_settles_visible() {
        let mut f = Flicker::default();
        f.start(1.0, 0.25).unwrap();
        f.update(0.25);
        assert!(!f.is_visible());
        f.update(0.25);
        assert!(f.is_visible());
        f.update(0.25);
        assert!(!f.is_visible());
        // duration runs out while hidden
        f.update(0.5);
        assert!(f.is_visible());
        assert!(!f.is_active());
    }

    #[test]
    fn test_tiny_interval_does_not_stall() {
        let mut f = Flicker::default();
        f.start(10.0, 1e-9).unwrap();
        f.update(1.0);
        assert!(f.is_active());
        let elapsed = f.active.map(|a| a.elapsed).unwrap();
        assert!(elapsed < 1e-9);
    }

    #[test]
    fn test_long_frame_applies_toggle_parity() {
        let mut f = Flicker::default();
        f.start(10.0, 0.25).unwrap();
        // three intervals in one frame
        f.update(0.75);
        assert!(!f.is_visible());
        f.update(0.5);
        assert!(!f.is_visible());
    }

    #[test]
    fn test_idle_flicker_is_visible() {
        let mut f = Flicker::default();
        f.update(10.0);
        assert!(f.is_visible());
    }
}
