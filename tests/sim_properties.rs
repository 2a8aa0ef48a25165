//! Property tests for the simulation core.

use glam::Vec2;
use proptest::prelude::*;

use nova_strike::settings::Difficulty;
use nova_strike::sim::{
    Aabb, DamageOutcome, GameEvent, GamePhase, GameState, Hostile, HostileKind, Player, TickInput,
    overlap_pairs, tick,
};
use nova_strike::tuning::Tuning;

const VIEW: Vec2 = Vec2::new(640.0, 480.0);

/// A round in progress with spawning and return fire silenced, so tests
/// control exactly what is on screen.
fn quiet_round(seed: u64) -> GameState {
    let mut state = GameState::new(seed, VIEW);
    state.start(Difficulty::Normal);
    state.spawn_interval = u32::MAX;
    state.tuning.hostile_fire_chance = 0.0;
    state
}

fn kind_from_index(i: usize) -> HostileKind {
    [
        HostileKind::Basic,
        HostileKind::Fast,
        HostileKind::Tank,
        HostileKind::Boss,
    ][i % 4]
}

proptest! {
    /// Position stays clamped to [0, viewport - size] on both axes for any
    /// combination of simultaneous keyboard and analog input.
    #[test]
    fn player_never_leaves_viewport(
        moves in prop::collection::vec(
            (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(),
             -1.0f32..=1.0, -1.0f32..=1.0),
            1..200,
        ),
    ) {
        let mut state = quiet_round(9);
        for (up, down, left, right, jx, jy) in moves {
            let input = TickInput {
                up,
                down,
                left,
                right,
                joystick: Some(Vec2::new(jx, jy)),
                ..Default::default()
            };
            tick(&mut state, &input);
            let player = state.player.as_ref().unwrap();
            prop_assert!(player.pos.x >= 0.0);
            prop_assert!(player.pos.x <= VIEW.x - player.size.x);
            prop_assert!(player.pos.y >= 0.0);
            prop_assert!(player.pos.y <= VIEW.y - player.size.y);
        }
    }

    #[test]
    fn aabb_overlap_is_symmetric(
        ax in -100.0f32..100.0, ay in -100.0f32..100.0,
        aw in 0.1f32..50.0, ah in 0.1f32..50.0,
        bx in -100.0f32..100.0, by in -100.0f32..100.0,
        bw in 0.1f32..50.0, bh in 0.1f32..50.0,
    ) {
        let a = Aabb::new(ax, ay, aw, ah);
        let b = Aabb::new(bx, by, bw, bh);
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    /// Swapping the two collections yields the transposed pair set.
    #[test]
    fn overlap_pair_enumeration_is_symmetric(
        boxes in prop::collection::vec(
            (-100.0f32..100.0, -100.0f32..100.0, 0.1f32..40.0, 0.1f32..40.0),
            0..12,
        ),
        split in 0usize..12,
    ) {
        let boxes: Vec<Aabb> = boxes
            .into_iter()
            .map(|(x, y, w, h)| Aabb::new(x, y, w, h))
            .collect();
        let split = split.min(boxes.len());
        let (a, b) = boxes.split_at(split);

        let mut forward = overlap_pairs(a, b);
        let mut backward: Vec<(usize, usize)> = overlap_pairs(b, a)
            .into_iter()
            .map(|(j, i)| (i, j))
            .collect();
        forward.sort_unstable();
        backward.sort_unstable();
        prop_assert_eq!(forward, backward);
    }

    /// Strict open-interval overlap: sharing an edge is never a collision.
    #[test]
    fn touching_edges_never_collide(
        x in -100.0f32..100.0, y in -100.0f32..100.0,
        w1 in 1.0f32..50.0, h1 in 1.0f32..50.0,
        w2 in 1.0f32..50.0, h2 in 1.0f32..50.0,
    ) {
        let a = Aabb::new(x, y, w1, h1);
        let neighbors = [
            Aabb::new(x + w1, y, w2, h2), // right edge
            Aabb::new(x - w2, y, w2, h2), // left edge
            Aabb::new(x, y + h1, w2, h2), // bottom edge
            Aabb::new(x, y - h2, w2, h2), // top edge
        ];
        for b in neighbors {
            prop_assert!(!a.overlaps(&b));
            prop_assert!(!b.overlaps(&a));
        }
    }

    /// Scaling is applied once at construction and stats stay fixed; health
    /// never exceeds max-health however much damage comes in.
    #[test]
    fn hostile_stats_scale_once_and_stay_fixed(
        kind_idx in 0usize..4,
        level in 1u32..50,
        damage in prop::collection::vec(1i32..5, 0..20),
    ) {
        let tuning = Tuning::default();
        let kind = kind_from_index(kind_idx);
        let base = tuning.hostile_base(kind);
        let mut hostile = Hostile::spawn(kind, 100.0, level, &tuning);

        let expected_health =
            (base.health as f32 * (1.0 + level as f32 * tuning.level_health_scale)).floor() as i32;
        let expected_points =
            (base.points as f32 * (1.0 + level as f32 * tuning.level_point_scale)).floor() as u32;
        prop_assert_eq!(hostile.health, expected_health);
        prop_assert_eq!(hostile.max_health, expected_health);
        prop_assert_eq!(hostile.points, expected_points);

        let max_health = hostile.max_health;
        for n in damage {
            hostile.take_damage(n);
            hostile.advance();
            prop_assert!(hostile.health <= max_health);
            prop_assert!(hostile.health >= 0);
            prop_assert_eq!(hostile.max_health, max_health);
            prop_assert_eq!(hostile.points, expected_points);
        }
    }

    /// N unshielded hits cost exactly N lives (clamped at zero), and the
    /// game-over transition fires exactly once.
    #[test]
    fn unshielded_hits_drain_lives_exactly(hits in 1usize..6) {
        let mut state = quiet_round(21);
        let mut game_overs = 0;
        for _ in 0..hits {
            let player_pos = state.player.as_ref().unwrap().pos;
            let mut hostile = Hostile::spawn(HostileKind::Basic, player_pos.x, 1, &state.tuning);
            hostile.pos = player_pos;
            state.hostiles.push(hostile);
            tick(&mut state, &TickInput::default());
            game_overs += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver))
                .count();
        }
        prop_assert_eq!(state.lives, 3u32.saturating_sub(hits as u32));
        if hits >= 3 {
            prop_assert_eq!(state.phase, GamePhase::GameOver);
            prop_assert_eq!(game_overs, 1);
        } else {
            prop_assert_eq!(state.phase, GamePhase::Playing);
            prop_assert_eq!(game_overs, 0);
        }
    }

    /// The shield absorbs one whole damage window regardless of magnitude.
    #[test]
    fn shield_absorbs_any_magnitude(amount in 1i32..1000) {
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        player.activate_shield(180);
        prop_assert_eq!(player.take_damage(amount), DamageOutcome::Absorbed);
        prop_assert_eq!(player.health, player.max_health);
    }

    /// The spawn interval follows the documented schedule: recomputed from
    /// the base each level, floored, never rising within a round.
    #[test]
    fn spawn_interval_schedule_is_monotone(levels in 1u32..40) {
        let mut state = GameState::new(3, VIEW);
        state.start(Difficulty::Normal);
        let base = state.base_spawn_interval as f32;
        let mut previous = state.spawn_interval;
        for _ in 0..levels {
            state.level_up();
            let step = ((state.level - 1) as f32 * state.tuning.level_spawn_scale).floor();
            let expected = (base - base * step).max(state.tuning.min_spawn_interval as f32) as u32;
            prop_assert_eq!(state.spawn_interval, expected);
            prop_assert!(state.spawn_interval <= previous);
            prop_assert!(state.spawn_interval >= state.tuning.min_spawn_interval);
            previous = state.spawn_interval;
        }
    }
}
