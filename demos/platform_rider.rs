use glam::IVec2;
use platbox::*;

/// Walks right and falls; lands on whatever solid is below.
struct Runner {
    name: &'static str,
    fall_speed: f32,
    squished: bool,
}

impl ActorBehavior<Vec<String>> for Runner {
    fn update(&mut self, ctx: &mut ActorContext<'_, Vec<String>>, dt: f32) {
        ctx.move_x(20.0 * dt, no_collision_reaction);
        self.fall_speed = (self.fall_speed - 400.0 * dt).max(-200.0);
        let mut landed = false;
        ctx.move_y(self.fall_speed * dt, || landed = true);
        if landed {
            self.fall_speed = 0.0;
        }
    }

    fn render(&self, body: &Body, target: &mut Vec<String>) {
        target.push(format!("{} at {} squished={}", self.name, body.position, self.squished));
    }

    fn get_squished(&mut self, _me: &Body) {
        self.squished = true;
    }
}

/// Rises at a fixed speed until it reaches `stop_at`.
struct Elevator {
    speed: f32,
    stop_at: i32,
}

impl SolidBehavior<Vec<String>> for Elevator {
    fn update(&mut self, ctx: &mut SolidContext<'_, Vec<String>>, dt: f32) {
        if ctx.position().y < self.stop_at {
            ctx.move_by(0.0, self.speed * dt);
        }
    }

    fn render(&self, body: &Body, target: &mut Vec<String>) {
        target.push(format!("elevator top={}", body.top()));
    }
}

fn main() -> Result<()> {
    let mut level: Level<Vec<String>> = Level::new(LevelConfig::default());

    let grid = TileGrid {
        cell_size: 16,
        origin: [-32, -16],
        rows: vec!["######".to_string()],
    };
    let floor = level.add_tile_solids(&grid)?;
    println!("floor solids: {:?}", floor);

    let elevator = level.add_solid(Body::new(IVec2::new(0, 0), 24, 8)?, Elevator { speed: 30.0, stop_at: 48 });
    let rider = level.add_actor(
        Body::new(IVec2::new(2, 8), 8, 12)?,
        Runner { name: "rider", fall_speed: 0.0, squished: false },
    );
    let walker = level.add_actor(
        Body::new(IVec2::new(-30, 0), 8, 12)?,
        Runner { name: "walker", fall_speed: 0.0, squished: false },
    );
    println!("elevator={:?} rider={:?} walker={:?}", elevator, rider, walker);
    level.set_overlap_hook(|a, b| println!("overlap {:?} / {:?}", a, b));

    for frame in 0..120 {
        level.update(1.0 / 60.0);
        if frame % 20 == 0 {
            let mut lines = Vec::new();
            level.render(&mut lines);
            println!("frame {frame}: {}", lines.join(", "));
        }
    }

    for ev in level.drain_overlaps() {
        println!("pending overlap {:?} / {:?}", ev.a, ev.b);
    }
    println!("stats: {:?}", level.stats());
    Ok(())
}
