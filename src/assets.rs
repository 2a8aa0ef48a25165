//! Image asset registry
//!
//! Every sprite is resolved once at startup and handed to the renderer;
//! entities never hold render resources. A handle is only reported ready
//! once the browser has decoded it, so the renderer can fall back to
//! primitive shapes until then (or forever, if a load failed).

use web_sys::HtmlImageElement;

use crate::sim::state::HostileKind;

/// All sprite handles for the game
pub struct AssetRegistry {
    player: Option<HtmlImageElement>,
    hostile_basic: Option<HtmlImageElement>,
    hostile_fast: Option<HtmlImageElement>,
    hostile_tank: Option<HtmlImageElement>,
    hostile_boss: Option<HtmlImageElement>,
    background: Option<HtmlImageElement>,
}

impl AssetRegistry {
    /// Kick off every image load. Returns immediately; readiness is checked
    /// per frame via the accessors.
    pub fn load() -> Self {
        Self {
            player: load_image("assets/images/player.png"),
            hostile_basic: load_image("assets/images/enemy-basic.png"),
            hostile_fast: load_image("assets/images/enemy-fast.png"),
            hostile_tank: load_image("assets/images/enemy-tank.png"),
            hostile_boss: load_image("assets/images/enemy-boss.png"),
            background: load_image("assets/images/background.png"),
        }
    }

    pub fn player(&self) -> Option<&HtmlImageElement> {
        ready(&self.player)
    }

    pub fn hostile(&self, kind: HostileKind) -> Option<&HtmlImageElement> {
        match kind {
            HostileKind::Basic => ready(&self.hostile_basic),
            HostileKind::Fast => ready(&self.hostile_fast),
            HostileKind::Tank => ready(&self.hostile_tank),
            HostileKind::Boss => ready(&self.hostile_boss),
        }
    }

    pub fn background(&self) -> Option<&HtmlImageElement> {
        ready(&self.background)
    }
}

fn load_image(src: &str) -> Option<HtmlImageElement> {
    match HtmlImageElement::new() {
        Ok(img) => {
            img.set_src(src);
            Some(img)
        }
        Err(e) => {
            log::warn!("failed to create image element for {}: {:?}", src, e);
            None
        }
    }
}

/// A decoded, non-broken image. `complete` alone is also true for failed
/// loads, so check the natural size too.
fn ready(img: &Option<HtmlImageElement>) -> Option<&HtmlImageElement> {
    img.as_ref()
        .filter(|i| i.complete() && i.natural_width() > 0)
}
