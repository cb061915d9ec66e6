//! Pool table - sixteen Rapier3D balls on a slab floor with six open pockets.
//! A ball that drops through a pocket reports itself; the table forwards the
//! drop to the UI and says when everything on the felt has come to rest.

use glam::{Vec2, Vec3};
use pocket_engine::api::game::GameConfig;
use pocket_engine::entities::ball::{Ball, RADIUS};
use pocket_engine::input::queue::{InputEvent, InputQueue};
use pocket_engine::{BallEvent, BodyDesc, ColliderDesc, ColliderMaterial};
use pocket_engine::{EngineContext, Game, GameEvent};

use crate::balls::{rack_positions, FOOT_SPOT, HEAD_SPOT};

// Play area of a 9 ft table, centered on the origin.
const HALF_LENGTH: f32 = 1.27;
const HALF_WIDTH: f32 = 0.635;

/// Side of the square gap left in the floor at each pocket.
const POCKET_SIZE: f32 = 0.12;

const SLAB_HALF_THICKNESS: f32 = 0.025;

const FELT: ColliderMaterial = ColliderMaterial {
    restitution: 0.1,
    friction: 0.8,
    density: 1.0,
};

/// R key.
const KEY_R: u32 = 82;

/// Custom event kinds from React UI
mod events {
    pub const RESET: u32 = 1;
    /// Drop ball `a` straight into a pocket.
    pub const POCKET: u32 = 2;
}

/// Game event kinds to React
mod game_events {
    pub const BALLS_REMAINING: f32 = 1.0;
    pub const BALL_DROP: f32 = 2.0;
    pub const TABLE_SETTLED: f32 = 3.0;
}

pub struct PoolTable {
    balls: Vec<Ball>,
    /// Set once every ball on the felt is asleep; cleared when one wakes.
    settled: bool,
}

impl PoolTable {
    pub fn new() -> Self {
        Self {
            balls: Vec::with_capacity(16),
            settled: false,
        }
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    /// Floor slabs with their top face on y = 0, leaving square gaps at the
    /// four corners and the middle of each long rail.
    fn build_floor(ctx: &mut EngineContext) {
        let band_half_width = HALF_WIDTH - POCKET_SIZE;
        let rail_strip_z = HALF_WIDTH - POCKET_SIZE / 2.0;
        let strip_half_length = (HALF_LENGTH - POCKET_SIZE - POCKET_SIZE / 2.0) / 2.0;
        let strip_x = POCKET_SIZE / 2.0 + strip_half_length;

        // (center x, center z, half length, half width)
        let slabs = [
            (0.0, 0.0, HALF_LENGTH, band_half_width),
            (-strip_x, rail_strip_z, strip_half_length, POCKET_SIZE / 2.0),
            (strip_x, rail_strip_z, strip_half_length, POCKET_SIZE / 2.0),
            (-strip_x, -rail_strip_z, strip_half_length, POCKET_SIZE / 2.0),
            (strip_x, -rail_strip_z, strip_half_length, POCKET_SIZE / 2.0),
        ];

        for (x, z, hx, hz) in slabs {
            let desc = BodyDesc::fixed(ColliderDesc::Cuboid {
                half_extents: Vec3::new(hx, SLAB_HALF_THICKNESS, hz),
            })
            .with_position(Vec3::new(x, -SLAB_HALF_THICKNESS, z));
            ctx.physics.spawn_body(&desc, FELT);
        }
    }

    fn spawn_balls(&mut self, ctx: &mut EngineContext) {
        self.balls.push(Ball::new(ctx, HEAD_SPOT.x, HEAD_SPOT.y, 0));

        let spots: [Vec2; 15] = rack_positions(FOOT_SPOT, RADIUS);
        for (i, spot) in spots.iter().enumerate() {
            self.balls.push(Ball::new(ctx, spot.x, spot.y, i as u32 + 1));
        }
        log::info!("Racked {} balls", self.balls.len());
    }

    /// Put every ball back on its spot.
    fn reset(&mut self, ctx: &mut EngineContext) {
        for ball in &mut self.balls {
            ball.reset(ctx);
        }
        self.settled = false;
        log::info!("Table reset");
    }

    /// Drop the ball whose id the UI sent as `a`.
    fn pocket(&mut self, ctx: &mut EngineContext, a: f32) {
        if !a.is_finite() || a < 0.0 {
            log::warn!("Ignoring pocket request for ball {}", a);
            return;
        }
        let id = a as u32;
        match self.balls.iter_mut().find(|b| b.id() == id) {
            Some(ball) => ball.on_enter_hole(ctx),
            None => log::warn!("No ball {} to pocket", id),
        }
    }

    /// Count remaining balls (excluding cue ball)
    fn balls_remaining(&self) -> u32 {
        self.balls
            .iter()
            .filter(|b| !b.is_fallen() && b.id() > 0)
            .count() as u32
    }

    fn all_asleep(&self, ctx: &EngineContext) -> bool {
        self.balls
            .iter()
            .filter(|b| !b.is_fallen())
            .all(|b| b.is_sleeping(&ctx.physics))
    }
}

impl Default for PoolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for PoolTable {
    fn config(&self) -> GameConfig {
        GameConfig {
            max_instances: 32,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        Self::build_floor(ctx);
        self.spawn_balls(ctx);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        let mut reset = false;
        for event in input.iter() {
            match *event {
                InputEvent::Custom { kind, .. } if kind == events::RESET => reset = true,
                InputEvent::KeyDown { key_code } if key_code == KEY_R => reset = true,
                InputEvent::Custom { kind, a, .. } if kind == events::POCKET => {
                    self.pocket(ctx, a);
                }
                _ => {}
            }
        }
        // Reset wins over pockets queued in the same frame.
        if reset {
            self.reset(ctx);
        }

        let dt = ctx.physics.dt();
        for ball in &mut self.balls {
            ball.update(ctx, dt);
        }

        for event in ctx.take_ball_events() {
            match event {
                BallEvent::BallDrop { id } => {
                    log::info!("Ball {} pocketed", id);
                    ctx.emit_event(GameEvent::new(game_events::BALL_DROP, id as f32));
                }
            }
        }

        let asleep = self.all_asleep(ctx);
        if asleep && !self.settled {
            ctx.emit_event(GameEvent::new(game_events::TABLE_SETTLED, 0.0));
        }
        self.settled = asleep;

        ctx.emit_event(GameEvent::new(
            game_events::BALLS_REMAINING,
            self.balls_remaining() as f32,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pocket_engine::RigidBodyWorld;

    fn table() -> (PoolTable, EngineContext) {
        let mut game = PoolTable::new();
        let mut ctx = EngineContext::with_config(&game.config());
        game.init(&mut ctx);
        (game, ctx)
    }

    /// One fixed step the way the runner drives it.
    fn step(game: &mut PoolTable, ctx: &mut EngineContext, input: &InputQueue) -> Vec<GameEvent> {
        ctx.clear_frame_data();
        ctx.step_physics();
        game.update(ctx, input);
        ctx.events.clone()
    }

    fn kinds(events: &[GameEvent], kind: f32) -> Vec<GameEvent> {
        events.iter().copied().filter(|e| e.kind == kind).collect()
    }

    #[test]
    fn init_racks_sixteen_balls() {
        let (game, ctx) = table();
        assert_eq!(game.balls().len(), 16);
        assert_eq!(ctx.scene.len(), 16);
        assert_eq!(ctx.physics.body_count(), 16 + 5);
        assert_eq!(ctx.textures.pending_count(), 15, "cue ball has no texture");
        assert_eq!(game.balls()[0].start_position(), Vec3::new(HEAD_SPOT.x, RADIUS, 0.0));
        assert_eq!(game.balls_remaining(), 15);
    }

    #[test]
    fn pocket_event_reports_drop() {
        let (mut game, mut ctx) = table();
        let mut input = InputQueue::new();
        input.push(InputEvent::Custom { kind: events::POCKET, a: 8.0, b: 0.0, c: 0.0 });

        let events = step(&mut game, &mut ctx, &input);
        assert_eq!(kinds(&events, game_events::BALL_DROP), vec![GameEvent::new(game_events::BALL_DROP, 8.0)]);
        assert_eq!(kinds(&events, game_events::BALLS_REMAINING)[0].a, 14.0);
        assert!(game.balls()[8].is_fallen());
    }

    #[test]
    fn bad_pocket_ids_are_ignored() {
        let (mut game, mut ctx) = table();
        let mut input = InputQueue::new();
        for a in [-1.0, f32::NAN, f32::INFINITY] {
            input.push(InputEvent::Custom { kind: events::POCKET, a, b: 0.0, c: 0.0 });
        }

        let events = step(&mut game, &mut ctx, &input);
        assert!(kinds(&events, game_events::BALL_DROP).is_empty());
        assert!(game.balls().iter().all(|b| !b.is_fallen()), "cue ball must stay on the table");
    }

    #[test]
    fn reset_step_still_reports_remaining_balls() {
        let (mut game, mut ctx) = table();
        let mut input = InputQueue::new();
        input.push(InputEvent::Custom { kind: events::POCKET, a: 5.0, b: 0.0, c: 0.0 });
        step(&mut game, &mut ctx, &input);
        assert_eq!(game.balls_remaining(), 14);

        // The runner hands the same queue to every step of a frame.
        let mut input = InputQueue::new();
        input.push(InputEvent::Custom { kind: events::RESET, a: 0.0, b: 0.0, c: 0.0 });
        for _ in 0..3 {
            let events = step(&mut game, &mut ctx, &input);
            assert_eq!(
                kinds(&events, game_events::BALLS_REMAINING),
                vec![GameEvent::new(game_events::BALLS_REMAINING, 15.0)]
            );
        }
        assert!(game.balls().iter().all(|b| !b.is_fallen()));
    }

    #[test]
    fn ball_over_a_corner_pocket_drops_through() {
        let (mut game, mut ctx) = table();
        let cue = game.balls()[0].body();
        let over_pocket = Vec3::new(
            HALF_LENGTH - POCKET_SIZE / 2.0,
            RADIUS,
            HALF_WIDTH - POCKET_SIZE / 2.0,
        );
        ctx.physics.set_position(cue, over_pocket);
        ctx.physics.set_linear_velocity(cue, Vec3::new(0.0, -3.0, 0.0));

        let input = InputQueue::new();
        let mut drops = Vec::new();
        for _ in 0..30 {
            drops.extend(kinds(&step(&mut game, &mut ctx, &input), game_events::BALL_DROP));
        }
        assert_eq!(drops, vec![GameEvent::new(game_events::BALL_DROP, 0.0)]);
        assert!(game.balls()[0].is_fallen());
    }

    #[test]
    fn racked_table_settles_once() {
        let (mut game, mut ctx) = table();
        let input = InputQueue::new();
        let mut settled = 0;
        for _ in 0..120 {
            settled += kinds(&step(&mut game, &mut ctx, &input), game_events::TABLE_SETTLED).len();
        }
        assert_eq!(settled, 1);
        assert!(game.balls().iter().all(|b| !b.is_fallen()));
    }

    #[test]
    fn reset_key_restores_the_rack() {
        let (mut game, mut ctx) = table();
        let mut input = InputQueue::new();
        input.push(InputEvent::Custom { kind: events::POCKET, a: 3.0, b: 0.0, c: 0.0 });
        input.push(InputEvent::Custom { kind: events::POCKET, a: 0.0, b: 0.0, c: 0.0 });
        step(&mut game, &mut ctx, &input);
        assert_eq!(game.balls_remaining(), 14);

        let mut input = InputQueue::new();
        input.push(InputEvent::KeyDown { key_code: KEY_R });
        step(&mut game, &mut ctx, &input);

        assert_eq!(game.balls_remaining(), 15);
        for ball in game.balls() {
            assert!(!ball.is_fallen());
            assert!(ctx.physics.contains_body(ball.body()));
            assert!(ctx.scene.get(ball.mesh()).unwrap().visible);
        }
        assert_eq!(ctx.physics.body_count(), 16 + 5);
    }
}
