//! Canvas2D renderer
//!
//! Draws the whole `GameState` read-only, once per animation frame. Sprites
//! come from the asset registry; anything not yet (or never) decoded falls
//! back to a primitive shape, so a failed asset load degrades the visuals
//! and nothing else.

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::assets::AssetRegistry;
use crate::sim::state::{
    EXHAUST_LIFE, EXPLOSION_LIFE, GamePhase, GameState, Hostile, HostileKind, Owner, Player,
    Projectile,
};

/// Explosion fragment palette, indexed by `Particle::color`
const PARTICLE_PALETTE: [&str; 5] = ["#ff0000", "#ff6600", "#ffff00", "#ffffff", "#ffaa00"];

/// Number of background stars
const STAR_COUNT: usize = 100;
/// Background image scroll speed in pixels per frame
const BACKGROUND_SPEED: f64 = 1.0;

struct Star {
    x: f64,
    y: f64,
    size: f64,
    speed: f64,
}

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    assets: AssetRegistry,
    stars: Vec<Star>,
    background_y: f64,
}

impl CanvasRenderer {
    pub fn new(
        canvas: &HtmlCanvasElement,
        assets: AssetRegistry,
        viewport: Vec2,
    ) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                x: js_sys::Math::random() * viewport.x as f64,
                y: js_sys::Math::random() * viewport.y as f64,
                size: js_sys::Math::random() * 2.0 + 1.0,
                speed: js_sys::Math::random() * 2.0 + 1.0,
            })
            .collect();

        Ok(Self {
            ctx,
            assets,
            stars,
            background_y: 0.0,
        })
    }

    /// Draw one frame.
    pub fn render(&mut self, state: &GameState) {
        let w = state.viewport.x as f64;
        let h = state.viewport.y as f64;

        self.ctx.set_fill_style_str("#000");
        self.ctx.fill_rect(0.0, 0.0, w, h);

        self.draw_background(state, w, h);

        for shot in &state.player_shots {
            self.draw_projectile(shot);
        }
        for shot in &state.hostile_shots {
            self.draw_projectile(shot);
        }
        for hostile in &state.hostiles {
            self.draw_hostile(hostile);
        }
        if let Some(player) = &state.player {
            self.draw_player(player, state.time_ticks);
        }
        for explosion in &state.explosions {
            for p in &explosion.particles {
                let alpha = (p.life as f64 / EXPLOSION_LIFE as f64).clamp(0.0, 1.0);
                self.ctx.set_global_alpha(alpha);
                self.ctx
                    .set_fill_style_str(PARTICLE_PALETTE[p.color % PARTICLE_PALETTE.len()]);
                self.fill_circle(p.pos.x as f64, p.pos.y as f64, p.size as f64);
            }
            self.ctx.set_global_alpha(1.0);
        }
    }

    /// Scrolling background image, or the starfield while it is missing.
    /// Both freeze with the simulation.
    fn draw_background(&mut self, state: &GameState, w: f64, h: f64) {
        let scrolling = state.phase == GamePhase::Playing;
        if let Some(img) = self.assets.background().cloned() {
            if scrolling {
                self.background_y = (self.background_y + BACKGROUND_SPEED) % h;
            }
            let y = self.background_y;
            self.draw_image(&img, 0.0, y, w, h);
            self.draw_image(&img, 0.0, y - h, w, h);
        } else {
            self.ctx.set_fill_style_str("#fff");
            for star in &mut self.stars {
                if scrolling {
                    star.y += star.speed;
                    if star.y > h {
                        star.y = -10.0;
                        star.x = js_sys::Math::random() * w;
                    }
                }
            }
            for star in &self.stars {
                self.fill_circle(star.x, star.y, star.size);
            }
        }
    }

    fn draw_player(&self, player: &Player, time_ticks: u64) {
        // exhaust puffs behind the ship
        for puff in &player.exhaust {
            self.ctx.set_global_alpha(puff.life as f64 / EXHAUST_LIFE as f64);
            self.ctx.set_fill_style_str("#ff8800");
            self.fill_circle(puff.pos.x as f64, puff.pos.y as f64, puff.size as f64);
        }
        self.ctx.set_global_alpha(1.0);

        // shield ring, pulsing on the tick counter
        if player.shield_active() {
            let pulse = 0.5 + (time_ticks as f64 * 0.1).sin() * 0.3;
            self.ctx.set_global_alpha(pulse);
            self.ctx.set_stroke_style_str("#00ffff");
            self.ctx.set_line_width(3.0);
            self.ctx.begin_path();
            let cx = (player.pos.x + player.size.x / 2.0) as f64;
            let cy = (player.pos.y + player.size.y / 2.0) as f64;
            let r = (player.size.x / 2.0 + 10.0) as f64;
            let _ = self.ctx.arc(cx, cy, r, 0.0, std::f64::consts::TAU);
            self.ctx.stroke();
            self.ctx.set_global_alpha(1.0);
        }

        match self.assets.player() {
            Some(img) => {
                self.draw_image(
                    img,
                    player.pos.x as f64,
                    player.pos.y as f64,
                    player.size.x as f64,
                    player.size.y as f64,
                );
            }
            None => {
                self.ctx.set_fill_style_str("#00ff00");
                self.ctx.fill_rect(
                    player.pos.x as f64,
                    player.pos.y as f64,
                    player.size.x as f64,
                    player.size.y as f64,
                );
            }
        }
    }

    fn draw_hostile(&self, hostile: &Hostile) {
        match self.assets.hostile(hostile.kind) {
            Some(img) => {
                self.draw_image(
                    img,
                    hostile.pos.x as f64,
                    hostile.pos.y as f64,
                    hostile.size.x as f64,
                    hostile.size.y as f64,
                );
            }
            None => {
                let color = match hostile.kind {
                    HostileKind::Basic => "#ff0000",
                    HostileKind::Fast => "#ff6600",
                    HostileKind::Tank => "#800080",
                    HostileKind::Boss => "#8b0000",
                };
                self.ctx.set_fill_style_str(color);
                self.ctx.fill_rect(
                    hostile.pos.x as f64,
                    hostile.pos.y as f64,
                    hostile.size.x as f64,
                    hostile.size.y as f64,
                );
            }
        }

        if hostile.max_health > 1 {
            self.draw_health_bar(hostile);
        }
    }

    fn draw_health_bar(&self, hostile: &Hostile) {
        let bar_w = hostile.size.x as f64;
        let bar_h = 4.0;
        let x = hostile.pos.x as f64;
        let y = hostile.pos.y as f64 - 8.0;

        self.ctx.set_fill_style_str("#333333");
        self.ctx.fill_rect(x, y, bar_w, bar_h);

        let fraction = hostile.health as f64 / hostile.max_health as f64;
        let color = if fraction > 0.5 { "#00ff00" } else { "#ff0000" };
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, bar_w * fraction, bar_h);

        self.ctx.set_stroke_style_str("#ffffff");
        self.ctx.set_line_width(1.0);
        self.ctx.stroke_rect(x, y, bar_w, bar_h);
    }

    fn draw_projectile(&self, shot: &Projectile) {
        let color = match shot.owner {
            Owner::Player => "#00ffff",
            Owner::Hostile => "#ff0000",
        };

        // fading trail, newest first
        self.ctx.set_fill_style_str(color);
        for (i, point) in shot.trail.iter().enumerate() {
            let fade = 1.0 - i as f64 / shot.trail.len().max(1) as f64;
            self.ctx.set_global_alpha(fade * 0.6);
            self.fill_circle(point.x as f64, point.y as f64, fade * 3.0);
        }
        self.ctx.set_global_alpha(1.0);

        self.ctx.fill_rect(
            shot.pos.x as f64,
            shot.pos.y as f64,
            shot.size.x as f64,
            shot.size.y as f64,
        );
    }

    fn fill_circle(&self, x: f64, y: f64, r: f64) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(x, y, r.max(0.0), 0.0, std::f64::consts::TAU);
        self.ctx.fill();
    }

    fn draw_image(&self, img: &HtmlImageElement, x: f64, y: f64, w: f64, h: f64) {
        if let Err(e) = self
            .ctx
            .draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h)
        {
            log::debug!("draw_image failed: {:?}", e);
        }
    }
}
