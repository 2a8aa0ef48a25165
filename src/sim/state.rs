//! Game state and core simulation types
//!
//! The `GameState` struct is the exclusive owner of every entity collection
//! and all round bookkeeping. Entities never reference each other; anything
//! relating two entities is resolved transiently inside one collision pass.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Aabb;
use super::tick::TickInput;
use crate::consts::*;
use crate::settings::Difficulty;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title menu, nothing simulated
    Menu,
    /// Active gameplay
    Playing,
    /// Simulation suspended, nothing decays
    Paused,
    /// Run ended, frozen until restart
    GameOver,
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Player,
    Hostile,
}

/// Hostile variety, drawn by weight at spawn time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostileKind {
    Basic,
    Fast,
    Tank,
    Boss,
}

/// Per-tick movement behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePattern {
    /// Constant downward drift
    Straight,
    /// Downward drift plus a tight sine sweep around the spawn column
    Zigzag,
    /// Downward drift plus a wide, slow sine sweep (bosses)
    Weave,
}

/// Result of routing damage through the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Shield was up; nothing happened
    Absorbed,
    /// Health was reduced
    Applied,
}

/// Side effects the host reacts to (sound triggers, HUD cues). Drained once
/// per frame; the simulation never depends on them being observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    RoundStarted,
    PlayerFired,
    HostileDestroyed { kind: HostileKind, points: u32 },
    PlayerHit,
    ShieldRaised,
    LevelUp { level: u32 },
    GameOver,
}

/// Cosmetic engine-exhaust puff trailing the player ship
#[derive(Debug, Clone, Copy)]
pub struct ExhaustParticle {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub life: i32,
}

/// Exhaust puff lifetime in ticks
pub const EXHAUST_LIFE: i32 = 20;

/// The player ship
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    /// Ticks of shield remaining; shield is active while > 0
    pub shield_ticks: u32,
    /// Cosmetic exhaust trail
    pub exhaust: Vec<ExhaustParticle>,
    exhaust_counter: u32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::splat(PLAYER_SIZE),
            speed: PLAYER_SPEED,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            shield_ticks: 0,
            exhaust: Vec::new(),
            exhaust_counter: 0,
        }
    }

    pub fn shield_active(&self) -> bool {
        self.shield_ticks > 0
    }

    /// Raise the shield for a fixed window. Re-raising rewinds the timer.
    pub fn activate_shield(&mut self, duration_ticks: u32) {
        self.shield_ticks = duration_ticks;
    }

    /// Route damage through the shield rule. Shield absorbs everything
    /// regardless of magnitude; otherwise health drops, floored at zero.
    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.shield_active() {
            return DamageOutcome::Absorbed;
        }
        self.health = (self.health - amount).max(0);
        DamageOutcome::Applied
    }

    /// Advance from the input snapshot: discrete key directions and the
    /// analog vector both apply when both are live. Position is clamped to
    /// the viewport on both axes afterwards.
    pub fn advance(&mut self, input: &TickInput, viewport: Vec2, rng: &mut impl Rng) {
        if input.up {
            self.pos.y -= self.speed;
        }
        if input.down {
            self.pos.y += self.speed;
        }
        if input.left {
            self.pos.x -= self.speed;
        }
        if input.right {
            self.pos.x += self.speed;
        }
        if let Some(stick) = input.joystick {
            if stick.x.abs() > ANALOG_DEADZONE {
                self.pos.x += stick.x * self.speed;
            }
            if stick.y.abs() > ANALOG_DEADZONE {
                self.pos.y += stick.y * self.speed;
            }
        }
        self.pos.x = self.pos.x.clamp(0.0, (viewport.x - self.size.x).max(0.0));
        self.pos.y = self.pos.y.clamp(0.0, (viewport.y - self.size.y).max(0.0));

        // Exhaust trail: one puff every third tick, drifting down and fading
        self.exhaust_counter += 1;
        if self.exhaust_counter >= 3 {
            self.exhaust_counter = 0;
            self.exhaust.push(ExhaustParticle {
                pos: Vec2::new(
                    self.pos.x + self.size.x / 2.0 + rng.random_range(-10.0..10.0),
                    self.pos.y + self.size.y,
                ),
                size: rng.random_range(2.0..5.0),
                speed: rng.random_range(1.0..3.0),
                life: EXHAUST_LIFE,
            });
        }
        for puff in &mut self.exhaust {
            puff.pos.y += puff.speed;
            puff.life -= 1;
        }
        self.exhaust.retain(|p| p.life > 0);

        if self.shield_ticks > 0 {
            self.shield_ticks -= 1;
        }
    }

    /// Where player shots leave the ship
    pub fn nose(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0 - 2.0, self.pos.y)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::at(self.pos, self.size)
    }
}

/// An enemy ship
#[derive(Debug, Clone)]
pub struct Hostile {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub kind: HostileKind,
    pub pattern: MovePattern,
    pub health: i32,
    pub max_health: i32,
    pub points: u32,
    pub can_shoot: bool,
    /// Ticks until the next fire attempt is allowed
    pub cooldown: u32,
    /// Kind-specific cooldown restored after each shot
    pub max_cooldown: u32,
    /// Column the sine patterns oscillate around
    spawn_x: f32,
    /// Ticks alive, drives the oscillation phase
    age: u32,
}

impl Hostile {
    /// Construct a hostile of `kind` at column `x`, just above the viewport.
    /// Level scaling is applied here, once; stats are fixed for the
    /// hostile's lifetime.
    pub fn spawn(kind: HostileKind, x: f32, level: u32, tuning: &Tuning) -> Self {
        let base = tuning.hostile_base(kind);
        let level = level as f32;
        let health = (base.health as f32 * (1.0 + level * tuning.level_health_scale)).floor() as i32;
        let points = (base.points as f32 * (1.0 + level * tuning.level_point_scale)).floor() as u32;
        let speed = base.speed * (1.0 + level * tuning.level_speed_scale);
        Self {
            pos: Vec2::new(x, -base.height),
            size: Vec2::new(base.width, base.height),
            speed,
            kind,
            pattern: base.pattern,
            health,
            max_health: health,
            points,
            can_shoot: base.can_shoot,
            cooldown: 0,
            max_cooldown: base.cooldown_ticks,
            spawn_x: x,
            age: 0,
        }
    }

    /// Advance movement by one tick and run down the shoot cooldown.
    pub fn advance(&mut self) {
        self.age += 1;
        self.pos.y += self.speed;
        match self.pattern {
            MovePattern::Straight => {}
            MovePattern::Zigzag => {
                self.pos.x = self.spawn_x + (self.age as f32 * ZIGZAG_FREQ).sin() * ZIGZAG_AMPLITUDE;
            }
            MovePattern::Weave => {
                self.pos.x = self.spawn_x + (self.age as f32 * WEAVE_FREQ).sin() * WEAVE_AMPLITUDE;
            }
        }
        if self.cooldown > 0 {
            self.cooldown -= 1;
        }
    }

    /// Reduce health, returns whether the hostile is now destroyed.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health = (self.health - amount).max(0);
        self.health == 0
    }

    /// Shoot-capable and off cooldown
    pub fn ready_to_fire(&self) -> bool {
        self.can_shoot && self.cooldown == 0
    }

    pub fn reset_cooldown(&mut self) {
        self.cooldown = self.max_cooldown;
    }

    /// Where hostile shots leave the hull
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y + self.size.y)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::at(self.pos, self.size)
    }
}

/// Number of recent positions kept for the projectile trail
pub const TRAIL_LENGTH: usize = 5;

/// A bullet, fired by either side
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub owner: Owner,
    pub damage: i32,
    /// Recent center positions, newest first (cosmetic only)
    pub trail: Vec<Vec2>,
}

impl Projectile {
    pub fn player_shot(origin: Vec2) -> Self {
        Self {
            pos: origin,
            vel: Vec2::new(0.0, -PLAYER_SHOT_SPEED),
            size: Vec2::new(4.0, 8.0),
            owner: Owner::Player,
            damage: PROJECTILE_DAMAGE,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    pub fn hostile_shot(origin: Vec2) -> Self {
        Self {
            pos: origin,
            vel: Vec2::new(0.0, HOSTILE_SHOT_SPEED),
            size: Vec2::new(3.0, 6.0),
            owner: Owner::Hostile,
            damage: PROJECTILE_DAMAGE,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    /// Move one tick and record the new center into the trail ring.
    pub fn advance(&mut self) {
        self.pos += self.vel;
        self.trail.insert(0, self.pos + self.size / 2.0);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop();
        }
    }

    /// Fully outside the viewport on any side (with a small margin)
    pub fn off_screen(&self, viewport: Vec2) -> bool {
        self.pos.x + self.size.x < -PROJECTILE_CULL_MARGIN
            || self.pos.x > viewport.x + PROJECTILE_CULL_MARGIN
            || self.pos.y + self.size.y < -PROJECTILE_CULL_MARGIN
            || self.pos.y > viewport.y + PROJECTILE_CULL_MARGIN
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::at(self.pos, self.size)
    }
}

/// A single explosion fragment
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub life: i32,
    /// Palette index for the renderer
    pub color: usize,
}

/// Particles per explosion
pub const EXPLOSION_PARTICLES: usize = 20;
/// Explosion lifetime in ticks
pub const EXPLOSION_LIFE: i32 = 30;

/// A burst of fragments where a hostile died. Purely cosmetic.
#[derive(Debug, Clone)]
pub struct Explosion {
    pub origin: Vec2,
    pub particles: Vec<Particle>,
    pub life: i32,
}

impl Explosion {
    pub fn new(origin: Vec2, rng: &mut impl Rng) -> Self {
        let particles = (0..EXPLOSION_PARTICLES)
            .map(|i| {
                let angle = std::f32::consts::TAU * i as f32 / EXPLOSION_PARTICLES as f32;
                let speed = rng.random_range(2.0..5.0);
                Particle {
                    pos: origin,
                    vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                    size: rng.random_range(2.0..6.0),
                    life: EXPLOSION_LIFE,
                    color: rng.random_range(0..5),
                }
            })
            .collect();
        Self {
            origin,
            particles,
            life: EXPLOSION_LIFE,
        }
    }

    pub fn advance(&mut self) {
        self.life -= 1;
        for p in &mut self.particles {
            p.pos += p.vel;
            p.vel *= 0.98;
            p.size *= 0.98;
            p.life -= 1;
        }
        self.particles.retain(|p| p.life > 0);
    }

    /// Done when the countdown runs out or every fragment has expired
    pub fn finished(&self) -> bool {
        self.life <= 0 || self.particles.is_empty()
    }
}

/// Complete round state. Exclusive owner of every entity collection.
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    /// Monotonic non-decreasing during play
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    pub kills_this_level: u32,
    /// Viewport size in CSS pixels
    pub viewport: Vec2,
    /// Spawn interval fixed at round start from the difficulty tier
    pub base_spawn_interval: u32,
    /// Current ticks between hostile spawns (shrinks with level)
    pub spawn_interval: u32,
    pub spawn_counter: u32,
    /// Ticks until the player may fire again
    pub fire_cooldown: u32,
    pub time_ticks: u64,
    /// Present only during a round
    pub player: Option<Player>,
    pub hostiles: Vec<Hostile>,
    pub player_shots: Vec<Projectile>,
    pub hostile_shots: Vec<Projectile>,
    pub explosions: Vec<Explosion>,
    pub tuning: Tuning,
    /// Side effects accumulated this tick, drained by the host
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    pub fn new(seed: u64, viewport: Vec2) -> Self {
        Self {
            phase: GamePhase::Menu,
            score: 0,
            lives: 3,
            level: 1,
            kills_this_level: 0,
            viewport,
            base_spawn_interval: Difficulty::default().spawn_interval(),
            spawn_interval: Difficulty::default().spawn_interval(),
            spawn_counter: 0,
            fire_cooldown: 0,
            time_ticks: 0,
            player: None,
            hostiles: Vec::new(),
            player_shots: Vec::new(),
            hostile_shots: Vec::new(),
            explosions: Vec::new(),
            tuning: Tuning::default(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Begin a fresh round: zero the counters, clear every collection, fix
    /// the base spawn interval from the difficulty tier, place the ship at
    /// bottom-center and enter Playing.
    pub fn start(&mut self, difficulty: Difficulty) {
        self.score = 0;
        self.lives = 3;
        self.level = 1;
        self.kills_this_level = 0;
        self.base_spawn_interval = difficulty.spawn_interval();
        self.spawn_interval = self.base_spawn_interval;
        self.spawn_counter = 0;
        self.fire_cooldown = 0;
        self.time_ticks = 0;
        self.hostiles.clear();
        self.player_shots.clear();
        self.hostile_shots.clear();
        self.explosions.clear();
        self.player = Some(Player::new(Vec2::new(
            self.viewport.x / 2.0,
            self.viewport.y - PLAYER_SPAWN_MARGIN,
        )));
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::RoundStarted);
        log::info!(
            "round started: difficulty {}, spawn interval {}",
            difficulty.as_str(),
            self.spawn_interval
        );
    }

    /// Hard reset: force Menu, then immediately start a new round. Never a
    /// resume; in-flight entities are discarded, not finalized.
    pub fn restart(&mut self, difficulty: Difficulty) {
        self.phase = GamePhase::Menu;
        self.player = None;
        self.start(difficulty);
    }

    /// Flip between Playing and Paused. Logged no-op in any other phase.
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => self.phase = GamePhase::Paused,
            GamePhase::Paused => self.phase = GamePhase::Playing,
            phase => log::debug!("pause ignored in {:?}", phase),
        }
    }

    /// Advance a level: reset the kill counter and recompute the spawn
    /// interval from the *base* interval, never the previous level's, so the
    /// interval is monotonic non-increasing within a round.
    pub fn level_up(&mut self) {
        if self.phase != GamePhase::Playing {
            log::debug!("level-up ignored in {:?}", self.phase);
            return;
        }
        self.level += 1;
        self.kills_this_level = 0;
        let base = self.base_spawn_interval as f32;
        let step = ((self.level - 1) as f32 * self.tuning.level_spawn_scale).floor();
        self.spawn_interval = (base - base * step).max(self.tuning.min_spawn_interval as f32) as u32;
        self.events.push(GameEvent::LevelUp { level: self.level });
        log::info!(
            "level {}: spawn interval {} (base {})",
            self.level,
            self.spawn_interval,
            self.base_spawn_interval
        );
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Take this tick's accumulated side effects.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
