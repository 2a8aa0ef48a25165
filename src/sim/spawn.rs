//! Spawn policy: when and what to create
//!
//! Three independent emitters, all stepped once per tick while Playing:
//! hostile spawning on a counter, hostile return fire, and the rate-limited
//! player gun.

use rand::Rng;

use super::state::{GameEvent, GameState, Hostile, Projectile};

/// Advance the spawn counter; when it reaches the current spawn interval,
/// create one hostile at a random column (clamped so its full width stays
/// on-screen) just above the viewport, and reset the counter.
pub fn spawn_hostiles(state: &mut GameState) {
    state.spawn_counter += 1;
    if state.spawn_counter < state.spawn_interval {
        return;
    }
    state.spawn_counter = 0;

    let roll = state.rng.random::<f32>();
    let kind = state.tuning.spawn_weights.pick(roll);
    let width = state.tuning.hostile_base(kind).width;
    let max_x = (state.viewport.x - width).max(0.0);
    let x = if max_x > 0.0 {
        state.rng.random_range(0.0..max_x)
    } else {
        0.0
    };
    state
        .hostiles
        .push(Hostile::spawn(kind, x, state.level, &state.tuning));
}

/// Cooldown-gated return fire. A hostile only attempts the Bernoulli draw
/// once its kind allows shooting and its cooldown has run out; a successful
/// draw emits one downward shot and rewinds the kind-specific cooldown.
pub fn hostile_fire(state: &mut GameState) {
    let chance = state.tuning.hostile_fire_chance;
    let rng = &mut state.rng;
    let mut shots = Vec::new();
    for hostile in &mut state.hostiles {
        if !hostile.ready_to_fire() {
            continue;
        }
        if rng.random_bool(chance) {
            shots.push(Projectile::hostile_shot(hostile.muzzle()));
            hostile.reset_cooldown();
        }
    }
    state.hostile_shots.extend(shots);
}

/// Rate-limited player fire: while fire input is held and the global
/// cooldown has run out, emit one upward shot from the ship's nose. Holding
/// fire never bypasses the cooldown.
pub fn player_fire(state: &mut GameState, fire_held: bool) {
    if state.fire_cooldown > 0 {
        state.fire_cooldown -= 1;
    }
    if !fire_held || state.fire_cooldown > 0 {
        return;
    }
    if let Some(player) = &state.player {
        state.player_shots.push(Projectile::player_shot(player.nose()));
        state.fire_cooldown = state.tuning.player_fire_cooldown_ticks;
        state.events.push(GameEvent::PlayerFired);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use crate::sim::state::{HostileKind, Owner};
    use glam::Vec2;

    fn playing_state() -> GameState {
        let mut state = GameState::new(42, Vec2::new(800.0, 600.0));
        state.start(Difficulty::Normal);
        state
    }

    #[test]
    fn hostile_spawns_exactly_on_the_interval() {
        let mut state = playing_state();
        for _ in 0..state.spawn_interval - 1 {
            spawn_hostiles(&mut state);
        }
        assert!(state.hostiles.is_empty());
        spawn_hostiles(&mut state);
        assert_eq!(state.hostiles.len(), 1);
        assert_eq!(state.spawn_counter, 0);

        let h = &state.hostiles[0];
        assert!(h.pos.x >= 0.0);
        assert!(h.pos.x + h.size.x <= state.viewport.x);
        assert!(h.pos.y < 0.0);
    }

    #[test]
    fn spawned_kinds_follow_the_weight_table() {
        let mut state = playing_state();
        state.spawn_interval = 1;
        for _ in 0..2000 {
            spawn_hostiles(&mut state);
        }
        let count = |kind: HostileKind| {
            state.hostiles.iter().filter(|h| h.kind == kind).count() as f32 / 2000.0
        };
        // loose bands; the draw is seeded so this is deterministic anyway
        assert!((count(HostileKind::Basic) - 0.6).abs() < 0.05);
        assert!((count(HostileKind::Fast) - 0.25).abs() < 0.05);
        assert!((count(HostileKind::Tank) - 0.1).abs() < 0.05);
        assert!((count(HostileKind::Boss) - 0.05).abs() < 0.05);
    }

    #[test]
    fn player_fire_is_rate_limited() {
        let mut state = playing_state();
        let cooldown = state.tuning.player_fire_cooldown_ticks;

        // hold fire for 5 cooldown windows
        for _ in 0..cooldown * 5 {
            player_fire(&mut state, true);
        }
        assert_eq!(state.player_shots.len(), 5);
        for shot in &state.player_shots {
            assert_eq!(shot.owner, Owner::Player);
            assert!(shot.vel.y < 0.0);
        }
    }

    #[test]
    fn released_fire_emits_nothing() {
        let mut state = playing_state();
        for _ in 0..100 {
            player_fire(&mut state, false);
        }
        assert!(state.player_shots.is_empty());
    }

    #[test]
    fn hostile_fire_respects_cooldown_and_capability() {
        let mut state = playing_state();
        state.tuning.hostile_fire_chance = 1.0;

        // basic hostiles never shoot, whatever the draw says
        state
            .hostiles
            .push(Hostile::spawn(HostileKind::Basic, 100.0, 1, &state.tuning));
        hostile_fire(&mut state);
        assert!(state.hostile_shots.is_empty());

        // a fast hostile fires immediately, then sits out its cooldown
        state.hostiles.clear();
        state
            .hostiles
            .push(Hostile::spawn(HostileKind::Fast, 100.0, 1, &state.tuning));
        hostile_fire(&mut state);
        assert_eq!(state.hostile_shots.len(), 1);
        assert_eq!(state.hostile_shots[0].owner, Owner::Hostile);
        assert!(state.hostile_shots[0].vel.y > 0.0);
        assert_eq!(state.hostiles[0].cooldown, state.hostiles[0].max_cooldown);

        // no second shot until the cooldown has run down
        for _ in 0..state.hostiles[0].max_cooldown {
            hostile_fire(&mut state);
            state.hostiles[0].advance();
        }
        assert_eq!(state.hostile_shots.len(), 1);
        hostile_fire(&mut state);
        assert_eq!(state.hostile_shots.len(), 2);
    }
}
