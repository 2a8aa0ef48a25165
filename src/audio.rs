//! Audio trigger service
//!
//! Fire-and-forget: the simulation emits events, the host maps them to
//! `play` calls here. Playback rejection (autoplay policy, missing files)
//! is swallowed and logged; it must never reach the simulation tick.

use web_sys::HtmlAudioElement;

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fired
    Shoot,
    /// Hostile destroyed
    Explosion,
    /// Player took a hit
    Hit,
    /// Shield raised
    PowerUp,
}

/// Audio manager for the game
pub struct AudioManager {
    shoot: Option<HtmlAudioElement>,
    explosion: Option<HtmlAudioElement>,
    hit: Option<HtmlAudioElement>,
    power_up: Option<HtmlAudioElement>,
    music: Option<HtmlAudioElement>,
    music_volume: f32,
    sound_volume: f32,
    music_enabled: bool,
    sound_enabled: bool,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        let mut manager = Self {
            shoot: load_clip("assets/sounds/shoot.mp3"),
            explosion: load_clip("assets/sounds/explosion.mp3"),
            // the hit and power-up cues reuse the explosion/shoot samples
            hit: load_clip("assets/sounds/explosion.mp3"),
            power_up: load_clip("assets/sounds/shoot.mp3"),
            music: load_clip("assets/sounds/background-music.mp3"),
            music_volume: settings.music_volume,
            sound_volume: settings.sound_volume,
            music_enabled: settings.music_enabled,
            sound_enabled: settings.sound_enabled,
        };
        if let Some(music) = &manager.music {
            music.set_loop(true);
        }
        manager.set_music_volume(settings.music_volume);
        manager.set_sound_volume(settings.sound_volume);
        manager
    }

    /// Play a sound effect from the start. Failures are logged, not raised.
    pub fn play(&self, effect: SoundEffect) {
        if !self.sound_enabled {
            return;
        }
        let clip = match effect {
            SoundEffect::Shoot => &self.shoot,
            SoundEffect::Explosion => &self.explosion,
            SoundEffect::Hit => &self.hit,
            SoundEffect::PowerUp => &self.power_up,
        };
        let Some(clip) = clip else { return };
        clip.set_current_time(0.0);
        if let Err(e) = clip.play() {
            log::debug!("sound playback rejected: {:?}", e);
        }
    }

    pub fn play_music(&self) {
        if !self.music_enabled {
            return;
        }
        let Some(music) = &self.music else { return };
        if let Err(e) = music.play() {
            log::debug!("music playback rejected: {:?}", e);
        }
    }

    pub fn stop_music(&self) {
        if let Some(music) = &self.music {
            let _ = music.pause();
            music.set_current_time(0.0);
        }
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = volume.clamp(0.0, 1.0);
        if let Some(music) = &self.music {
            music.set_volume(self.music_volume as f64);
        }
    }

    /// Set effect volume (0.0 - 1.0)
    pub fn set_sound_volume(&mut self, volume: f32) {
        self.sound_volume = volume.clamp(0.0, 1.0);
        for clip in [&self.shoot, &self.explosion, &self.hit, &self.power_up]
            .into_iter()
            .flatten()
        {
            clip.set_volume(self.sound_volume as f64);
        }
    }

    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.music_enabled = enabled;
        if !enabled {
            self.stop_music();
        }
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
    }
}

fn load_clip(src: &str) -> Option<HtmlAudioElement> {
    match HtmlAudioElement::new_with_src(src) {
        Ok(clip) => Some(clip),
        Err(e) => {
            log::warn!("failed to load audio clip {}: {:?}", src, e);
            None
        }
    }
}
