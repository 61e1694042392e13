use glam::IVec2;
use serde::Deserialize;

use crate::api::FixedSolid;
use crate::body::Body;
use crate::error::{LevelError, Result};
use crate::level::Level;
use crate::types::*;

const SOLID_TILE: char = '#';

/// Collision layer of a tile map.
///
/// `rows[0]` is the top row; `'#'` marks a solid cell, anything else is empty.
/// World space is y-up with cell (0, 0) of the bottom row at `origin`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TileGrid {
    pub cell_size: i32,
    #[serde(default)]
    pub origin: [i32; 2],
    pub rows: Vec<String>,
}

impl TileGrid {
    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// One rect per horizontal run of solid cells.
    pub fn collision_rects(&self) -> Result<Vec<Recti>> {
        if self.cell_size <= 0 {
            return Err(LevelError::InvalidTileGrid(format!("cell size {} is not positive", self.cell_size)));
        }
        let width = match self.rows.first() {
            Some(row) => row.chars().count(),
            None => return Err(LevelError::InvalidTileGrid("no rows".to_string())),
        };

        let cs = self.cell_size;
        let [ox, oy] = self.origin;
        let mut rects = Vec::new();
        for (r, row) in self.rows.iter().enumerate() {
            let cells: Vec<bool> = row.chars().map(|c| c == SOLID_TILE).collect();
            if cells.len() != width {
                return Err(LevelError::InvalidTileGrid(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    cells.len(),
                    width
                )));
            }
            let y = (self.rows.len() - 1 - r) as i32;
            let mut x = 0;
            while x < width {
                if !cells[x] {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < width && cells[x] {
                    x += 1;
                }
                rects.push(Recti::new(
                    ox + start as i32 * cs,
                    oy + y * cs,
                    ox + x as i32 * cs,
                    oy + (y + 1) * cs,
                ));
            }
        }
        Ok(rects)
    }
}

impl<C> Level<C> {
    /// Register the grid's collision rects as fixed solids.
    pub fn add_tile_solids(&mut self, grid: &TileGrid) -> Result<Vec<SolidId>> {
        let rects = grid.collision_rects()?;
        let mut ids = Vec::with_capacity(rects.len());
        for rect in rects {
            let body = Body::new(IVec2::new(rect.left, rect.bottom), rect.width(), rect.height())?;
            ids.push(self.add_solid(body, FixedSolid));
        }
        log::info!("built {} solids from {} tile rows", ids.len(), grid.rows.len());
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ActorBehavior, no_collision_reaction};
    use crate::level::ActorContext;

    fn grid(rows: &[&str]) -> TileGrid {
        TileGrid {
            cell_size: 8,
            origin: [0, 0],
            rows: rows.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_runs_are_merged_and_rows_flipped() {
        let g = grid(&["#..#", "....", "###."]);
        let rects = g.collision_rects().unwrap();
        assert_eq!(
            rects,
            vec![
                Recti::new(0, 16, 8, 24),
                Recti::new(24, 16, 32, 24),
                Recti::new(0, 0, 24, 8),
            ]
        );
    }

    #[test]
    fn test_origin_offsets_rects() {
        let mut g = grid(&["##"]);
        g.origin = [-16, 100];
        assert_eq!(g.collision_rects().unwrap(), vec![Recti::new(-16, 100, 0, 108)]);
    }

    #[test]
    fn test_rejects_bad_grids() {
        assert!(matches!(grid(&["##", "#"]).collision_rects(), Err(LevelError::InvalidTileGrid(_))));
        assert!(grid(&[]).collision_rects().is_err());
        let mut g = grid(&["#"]);
        g.cell_size = 0;
        assert!(g.collision_rects().is_err());
    }

    #[test]
    fn test_from_json() {
        let source = serde_json::json!({ "cell_size": 16, "rows": [".#", "##"] }).to_string();
        let g = TileGrid::from_json_str(&source).unwrap();
        assert_eq!(g.origin, [0, 0]);
        assert_eq!(g.collision_rects().unwrap().len(), 2);
        assert!(matches!(TileGrid::from_json_str(r#"{ "rows": [] }"#), Err(LevelError::Config(_))));
    }

    struct Crate;

    impl ActorBehavior<()> for Crate {
        fn update(&mut self, ctx: &mut ActorContext<'_, ()>, dt: f32) {
            ctx.move_y(-120.0 * dt, no_collision_reaction);
        }
        fn render(&self, _body: &Body, _target: &mut ()) {}
    }

    #[test]
    fn test_actor_lands_on_tile_floor() {
        let mut level: Level<()> = Level::default();
        let ids = level.add_tile_solids(&grid(&["....", "####"])).unwrap();
        assert_eq!(ids.len(), 1);
        let a = level.add_actor(Body::new(IVec2::new(4, 30), 8, 8).unwrap(), Crate);
        for _ in 0..30 {
            level.update(1.0 / 60.0);
        }
        assert_eq!(level.actor(a).unwrap().position, IVec2::new(4, 8));
    }
}
