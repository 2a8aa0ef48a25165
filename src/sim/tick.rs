//! Fixed timestep simulation tick
//!
//! One call advances the whole world by exactly one tick: player from input,
//! spawn policy, entity movement, collision resolution, culling, level
//! progression. Everything completes synchronously before the host schedules
//! the next tick; pausing simply skips the call.

use glam::Vec2;

use super::collision::{self, remove_marked};
use super::spawn;
use super::state::{DamageOutcome, Explosion, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input snapshot for a single tick. Captured by the host from asynchronous
/// DOM events; the tick reads it without modification. `pause` and `shield`
/// are one-shot edges the host clears after each processed tick, the rest
/// are held state.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Fire input held (keyboard Space or the mobile fire button)
    pub fire: bool,
    /// Normalized analog vector from the mobile joystick, if active
    pub joystick: Option<Vec2>,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Raise the shield (one-shot)
    pub shield: bool,
}

/// Advance the game state by one tick.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.pause {
        state.toggle_pause();
    }
    if state.phase != GamePhase::Playing {
        return;
    }
    state.time_ticks += 1;

    if input.shield {
        if let Some(player) = &mut state.player {
            player.activate_shield(state.tuning.shield_duration_ticks);
            state.events.push(GameEvent::ShieldRaised);
        }
    }

    let viewport = state.viewport;
    if let Some(player) = &mut state.player {
        player.advance(input, viewport, &mut state.rng);
    }

    spawn::spawn_hostiles(state);
    spawn::player_fire(state, input.fire);
    spawn::hostile_fire(state);

    for hostile in &mut state.hostiles {
        hostile.advance();
    }
    for shot in &mut state.player_shots {
        shot.advance();
    }
    for shot in &mut state.hostile_shots {
        shot.advance();
    }
    for explosion in &mut state.explosions {
        explosion.advance();
    }

    resolve_collisions(state);
    if state.phase != GamePhase::Playing {
        // lives ran out mid-tick; freeze the world as it stands
        return;
    }

    cull(state);

    if state.kills_this_level >= state.tuning.kills_per_level {
        state.level_up();
    }
}

/// Run the three pair-kind passes and apply their state deltas. Marks are
/// collected during each scan and compacted afterwards, so every entity is
/// removed at most once per tick.
fn resolve_collisions(state: &mut GameState) {
    // player shots vs hostiles
    let pass = collision::player_shots_vs_hostiles(&state.player_shots, &mut state.hostiles);
    let mut bursts = Vec::with_capacity(pass.destroyed.len());
    for &j in &pass.destroyed {
        let hostile = &state.hostiles[j];
        state.score += hostile.points;
        state.kills_this_level += 1;
        state.events.push(GameEvent::HostileDestroyed {
            kind: hostile.kind,
            points: hostile.points,
        });
        bursts.push(hostile.center());
    }
    for center in bursts {
        let explosion = Explosion::new(center, &mut state.rng);
        state.explosions.push(explosion);
    }
    remove_marked(&mut state.player_shots, &pass.shots_spent);
    remove_marked(&mut state.hostiles, &pass.destroyed);

    // hostile shots and ramming hostiles vs the player
    let Some(player_box) = state.player.as_ref().map(|p| p.bounds()) else {
        return;
    };
    let shot_hits = collision::shots_vs_player(&state.hostile_shots, &player_box);
    let rams = collision::hostiles_vs_player(&state.hostiles, &player_box);
    let hits = shot_hits.len() + rams.len();
    remove_marked(&mut state.hostile_shots, &shot_hits);
    remove_marked(&mut state.hostiles, &rams);

    for _ in 0..hits {
        let Some(player) = &mut state.player else {
            break;
        };
        match player.take_damage(PROJECTILE_DAMAGE) {
            DamageOutcome::Absorbed => {}
            DamageOutcome::Applied => {
                state.lives = state.lives.saturating_sub(1);
                state.events.push(GameEvent::PlayerHit);
                if state.lives == 0 {
                    state.phase = GamePhase::GameOver;
                    state.events.push(GameEvent::GameOver);
                    log::info!("game over: score {}, level {}", state.score, state.level);
                    break;
                }
            }
        }
    }
}

/// Drop everything past its destroy predicate.
fn cull(state: &mut GameState) {
    let viewport = state.viewport;
    state
        .hostiles
        .retain(|h| h.pos.y < viewport.y + HOSTILE_CULL_MARGIN);
    state.player_shots.retain(|s| !s.off_screen(viewport));
    state.hostile_shots.retain(|s| !s.off_screen(viewport));
    state.explosions.retain(|e| !e.finished());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use crate::sim::state::{Hostile, HostileKind, Projectile};

    fn playing_state() -> GameState {
        let mut state = GameState::new(42, Vec2::new(800.0, 600.0));
        state.start(Difficulty::Normal);
        // keep the world quiet unless a test asks for spawns or return fire
        state.spawn_interval = u32::MAX;
        state.tuning.hostile_fire_chance = 0.0;
        state
    }

    /// A hostile parked directly on the player's position.
    fn ram_hostile(state: &GameState) -> Hostile {
        let player = state.player.as_ref().unwrap();
        let mut h = Hostile::spawn(HostileKind::Basic, player.pos.x, 1, &state.tuning);
        h.pos = player.pos;
        h
    }

    #[test]
    fn menu_and_paused_ticks_do_nothing() {
        let mut state = GameState::new(1, Vec2::new(800.0, 600.0));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, 0);

        state.start(Difficulty::Normal);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, ticks);

        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn player_stays_clamped_under_any_input() {
        let mut state = playing_state();
        let input = TickInput {
            left: true,
            up: true,
            joystick: Some(Vec2::new(-1.0, -1.0)),
            ..Default::default()
        };
        for _ in 0..500 {
            tick(&mut state, &input);
        }
        let player = state.player.as_ref().unwrap();
        assert_eq!(player.pos, Vec2::ZERO);

        let input = TickInput {
            right: true,
            down: true,
            joystick: Some(Vec2::new(1.0, 1.0)),
            ..Default::default()
        };
        for _ in 0..500 {
            tick(&mut state, &input);
        }
        let player = state.player.as_ref().unwrap();
        assert_eq!(player.pos, state.viewport - player.size);
    }

    #[test]
    fn shot_kill_awards_points_and_spawns_explosion() {
        let mut state = playing_state();
        let mut hostile = Hostile::spawn(HostileKind::Basic, 300.0, 1, &state.tuning);
        hostile.pos.y = 300.0;
        let points = hostile.points;
        state.hostiles.push(hostile);
        // a shot one tick below the hostile, flying up into it
        state
            .player_shots
            .push(Projectile::player_shot(Vec2::new(310.0, 330.0)));

        tick(&mut state, &TickInput::default());

        assert!(state.hostiles.is_empty());
        assert!(state.player_shots.is_empty());
        assert_eq!(state.score, points);
        assert_eq!(state.kills_this_level, 1);
        assert_eq!(state.explosions.len(), 1);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::HostileDestroyed { .. }))
        );
    }

    #[test]
    fn score_is_monotonic_non_decreasing() {
        let mut state = playing_state();
        state.spawn_interval = 10;
        state.tuning.hostile_fire_chance = 0.01;
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        let mut last = 0;
        for _ in 0..2000 {
            tick(&mut state, &input);
            assert!(state.score >= last);
            last = state.score;
            if state.phase != GamePhase::Playing {
                break;
            }
        }
    }

    #[test]
    fn ram_consumes_hostile_and_costs_a_life() {
        let mut state = playing_state();
        let h = ram_hostile(&state);
        state.hostiles.push(h);

        tick(&mut state, &TickInput::default());

        assert!(state.hostiles.is_empty());
        assert_eq!(state.lives, 2);
        // no explosion or score for a ram
        assert_eq!(state.score, 0);
        assert!(state.explosions.is_empty());
    }

    #[test]
    fn lives_drain_to_game_over_exactly_once() {
        let mut state = playing_state();
        let mut game_overs = 0;
        for _ in 0..3 {
            let h = ram_hostile(&state);
            state.hostiles.push(h);
            tick(&mut state, &TickInput::default());
            game_overs += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver))
                .count();
        }
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(game_overs, 1);

        // frozen: further ticks change nothing
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn shield_input_absorbs_the_hit() {
        let mut state = playing_state();
        let shield = TickInput {
            shield: true,
            ..Default::default()
        };
        tick(&mut state, &shield);
        assert!(state.player.as_ref().unwrap().shield_active());

        let h = ram_hostile(&state);
        state.hostiles.push(h);
        tick(&mut state, &TickInput::default());

        // hostile still consumed, but no life lost
        assert!(state.hostiles.is_empty());
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn kill_quota_advances_the_level() {
        let mut state = playing_state();
        state.kills_this_level = state.tuning.kills_per_level - 1;

        let mut hostile = Hostile::spawn(HostileKind::Basic, 300.0, 1, &state.tuning);
        hostile.pos.y = 300.0;
        state.hostiles.push(hostile);
        state
            .player_shots
            .push(Projectile::player_shot(Vec2::new(310.0, 330.0)));

        tick(&mut state, &TickInput::default());

        assert_eq!(state.level, 2);
        assert_eq!(state.kills_this_level, 0);
    }

    #[test]
    fn entities_past_their_margins_are_culled() {
        let mut state = playing_state();
        let mut escaped = Hostile::spawn(HostileKind::Basic, 100.0, 1, &state.tuning);
        escaped.pos.y = state.viewport.y + HOSTILE_CULL_MARGIN + 1.0;
        state.hostiles.push(escaped);

        let mut gone_up = Projectile::player_shot(Vec2::new(100.0, 0.0));
        gone_up.pos.y = -100.0;
        state.player_shots.push(gone_up);

        let mut gone_down = Projectile::hostile_shot(Vec2::new(100.0, 0.0));
        gone_down.pos.y = state.viewport.y + 100.0;
        state.hostile_shots.push(gone_down);

        tick(&mut state, &TickInput::default());

        assert!(state.hostiles.is_empty());
        assert!(state.player_shots.is_empty());
        assert!(state.hostile_shots.is_empty());
    }

    #[test]
    fn hostile_survives_on_screen() {
        let mut state = playing_state();
        let mut hostile = Hostile::spawn(HostileKind::Tank, 100.0, 1, &state.tuning);
        hostile.pos.y = 100.0;
        state.hostiles.push(hostile);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.hostiles.len(), 1);
    }

    #[test]
    fn restart_mid_round_is_a_hard_reset() {
        let mut state = playing_state();
        state.spawn_interval = 1;
        for _ in 0..50 {
            tick(&mut state, &TickInput::default());
        }
        assert!(!state.hostiles.is_empty());

        state.restart(Difficulty::Normal);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.level, 1);
        assert!(state.hostiles.is_empty());
        assert!(state.player_shots.is_empty());
        assert!(state.hostile_shots.is_empty());
        assert!(state.explosions.is_empty());
        assert_eq!(state.time_ticks, 0);
    }
}
