//! Axis-aligned collision detection and the per-tick resolution passes
//!
//! Intersection is a strict open-interval overlap on all four sides:
//! touching edges do not collide. The resolution passes only *mark* what was
//! hit; the caller compacts the collections afterwards, so nothing is ever
//! removed while a scan is still iterating and each entity registers at most
//! one removal per tick.

use glam::Vec2;

use super::state::{Hostile, Projectile};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn at(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Strict overlap: boxes that merely touch do not collide.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// Enumerate every overlapping (i, j) index pair between two collections.
/// Symmetric: swapping the arguments yields the transposed pair set.
pub fn overlap_pairs(a: &[Aabb], b: &[Aabb]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, ra) in a.iter().enumerate() {
        for (j, rb) in b.iter().enumerate() {
            if ra.overlaps(rb) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Outcome of the player-shots-versus-hostiles pass
#[derive(Debug, Default)]
pub struct ShotPass {
    /// Shots consumed this tick (at most one hit each)
    pub shots_spent: Vec<usize>,
    /// Hostiles whose health reached zero this tick
    pub destroyed: Vec<usize>,
}

/// Resolve player shots against hostiles. Every hit consumes the shot and
/// routes its damage through the hostile; the hostile is only marked
/// destroyed when its health runs out, and a destroyed hostile stops
/// matching further shots. Outer-loop order over the shots, inner over the
/// hostiles.
pub fn player_shots_vs_hostiles(shots: &[Projectile], hostiles: &mut [Hostile]) -> ShotPass {
    let mut pass = ShotPass::default();
    for (i, shot) in shots.iter().enumerate() {
        let shot_box = shot.bounds();
        for (j, hostile) in hostiles.iter_mut().enumerate() {
            if pass.destroyed.contains(&j) {
                continue;
            }
            if shot_box.overlaps(&hostile.bounds()) {
                pass.shots_spent.push(i);
                if hostile.take_damage(shot.damage) {
                    pass.destroyed.push(j);
                }
                break;
            }
        }
    }
    pass
}

/// Indices of shots overlapping the player's box, each shot at most once.
pub fn shots_vs_player(shots: &[Projectile], player: &Aabb) -> Vec<usize> {
    shots
        .iter()
        .enumerate()
        .filter(|(_, shot)| shot.bounds().overlaps(player))
        .map(|(i, _)| i)
        .collect()
}

/// Indices of hostiles ramming the player's box.
pub fn hostiles_vs_player(hostiles: &[Hostile], player: &Aabb) -> Vec<usize> {
    hostiles
        .iter()
        .enumerate()
        .filter(|(_, hostile)| hostile.bounds().overlaps(player))
        .map(|(i, _)| i)
        .collect()
}

/// Compact a collection after a scan: drop the marked indices, preserving
/// order of the survivors.
pub fn remove_marked<T>(items: &mut Vec<T>, marked: &[usize]) {
    if marked.is_empty() {
        return;
    }
    let mut index = 0;
    items.retain(|_| {
        let keep = !marked.contains(&index);
        index += 1;
        keep
    });
}
