//! Data-driven game balance
//!
//! Every tunable number the simulation consults lives here, so balance
//! changes never touch the sim code itself. Keep this separate from the
//! fixed geometry constants in `consts`.

use crate::sim::state::{HostileKind, MovePattern};

/// Relative spawn probabilities per hostile kind. Must sum to 1.0.
#[derive(Debug, Clone, Copy)]
pub struct SpawnWeights {
    pub basic: f32,
    pub fast: f32,
    pub tank: f32,
    pub boss: f32,
}

impl SpawnWeights {
    /// Cumulative-threshold selection over a uniform [0, 1) roll.
    pub fn pick(&self, roll: f32) -> HostileKind {
        let mut cumulative = 0.0;
        for (weight, kind) in [
            (self.basic, HostileKind::Basic),
            (self.fast, HostileKind::Fast),
            (self.tank, HostileKind::Tank),
            (self.boss, HostileKind::Boss),
        ] {
            cumulative += weight;
            if roll < cumulative {
                return kind;
            }
        }
        HostileKind::Basic
    }
}

/// Base stats a hostile kind starts from before level scaling.
#[derive(Debug, Clone, Copy)]
pub struct HostileBase {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub health: i32,
    pub points: u32,
    pub pattern: MovePattern,
    pub can_shoot: bool,
    /// Ticks between shots once the kind starts firing.
    pub cooldown_ticks: u32,
}

/// Gameplay tuning for a whole round.
#[derive(Debug, Clone, Copy)]
pub struct Tuning {
    pub spawn_weights: SpawnWeights,
    /// Hostile health multiplier gained per level (applied once at spawn).
    pub level_health_scale: f32,
    /// Hostile point-value multiplier gained per level.
    pub level_point_scale: f32,
    /// Hostile speed multiplier gained per level.
    pub level_speed_scale: f32,
    /// Fraction the spawn interval shrinks per level, floored per step.
    pub level_spawn_scale: f32,
    /// Spawn interval never drops below this many ticks.
    pub min_spawn_interval: u32,
    /// Kills required to advance a level.
    pub kills_per_level: u32,
    /// Ticks between consecutive player shots, however long fire is held.
    pub player_fire_cooldown_ticks: u32,
    /// Shield duration once raised.
    pub shield_duration_ticks: u32,
    /// Per-tick Bernoulli chance that a fire-ready hostile shoots.
    pub hostile_fire_chance: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_weights: SpawnWeights {
                basic: 0.6,
                fast: 0.25,
                tank: 0.1,
                boss: 0.05,
            },
            level_health_scale: 0.2,
            level_point_scale: 0.1,
            level_speed_scale: 0.1,
            level_spawn_scale: 0.1,
            min_spawn_interval: 20,
            kills_per_level: 10,
            player_fire_cooldown_ticks: 10,
            shield_duration_ticks: 180,
            hostile_fire_chance: 0.005,
        }
    }
}

impl Tuning {
    /// Base stat block for a hostile kind.
    pub fn hostile_base(&self, kind: HostileKind) -> HostileBase {
        match kind {
            HostileKind::Basic => HostileBase {
                width: 30.0,
                height: 30.0,
                speed: 2.0,
                health: 1,
                points: 10,
                pattern: MovePattern::Straight,
                can_shoot: false,
                cooldown_ticks: 0,
            },
            HostileKind::Fast => HostileBase {
                width: 25.0,
                height: 25.0,
                speed: 4.0,
                health: 1,
                points: 20,
                pattern: MovePattern::Zigzag,
                can_shoot: true,
                cooldown_ticks: 90,
            },
            HostileKind::Tank => HostileBase {
                width: 40.0,
                height: 40.0,
                speed: 1.0,
                health: 3,
                points: 30,
                pattern: MovePattern::Straight,
                can_shoot: true,
                cooldown_ticks: 150,
            },
            HostileKind::Boss => HostileBase {
                width: 60.0,
                height: 60.0,
                speed: 1.5,
                health: 10,
                points: 100,
                pattern: MovePattern::Weave,
                can_shoot: true,
                cooldown_ticks: 60,
            },
        }
    }
}
