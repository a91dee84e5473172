//! Boundaries to the systems around the simulation core
//!
//! Persistence, HUD, audio and asset loading live outside this crate. The
//! world talks to them only through these traits, injected at construction.

use log::info;
use strum_macros::Display;

use super::pedestrian::PedestrianKind;
use super::vehicle::VehicleKind;

/// Values the core reads from persistent settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    pub difficulty_start_tier: usize,
    pub high_score: u32,
}

/// Persistent settings store
pub trait SettingsStore {
    fn load_settings(&mut self) -> Settings;
    fn save_settings(&mut self, high_score: u32);
}

/// Keys of the transient messages the HUD can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKey {
    GetReady,
    DifficultyUp,
    NewRecord,
}

/// Keys of the round end banners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKey {
    GameOver,
    /// Top tier cleared with life left
    WellDone,
}

/// Sound effects the core asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SfxCue {
    Tap,
    Score,
    Hit,
    Scream,
    Engine(VehicleKind),
}

/// Handle to a looping sound owned by the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u64);

/// HUD / presentation layer
pub trait Presentation {
    /// Show a message and return how many seconds until it completes.
    /// `incoming_count` asks the HUD to also show the round's pedestrian count.
    fn show_transient_message(
        &mut self,
        duration_secs: f32,
        message: MessageKey,
        sound: Option<SfxCue>,
        incoming_count: Option<u32>,
    ) -> f32;

    fn show_round_end_banner(&mut self, outcome: OutcomeKey);
}

/// Fire-and-forget audio
pub trait AudioSink {
    fn play_sfx(&mut self, cue: SfxCue);

    /// Start a looping sound; None if the sink cannot loop it
    fn play_looping_sfx(&mut self, cue: SfxCue) -> Option<SoundHandle>;

    fn set_pitch(&mut self, handle: SoundHandle, pitch: f32);

    fn stop(&mut self, handle: SoundHandle);
}

/// Asset availability for spawned kinds
pub trait AssetCatalog {
    fn has_pedestrian(&self, kind: PedestrianKind) -> bool;
    fn has_vehicle(&self, kind: VehicleKind) -> bool;
}

/// Settings kept in memory only
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    pub settings: Settings,
    pub saves: usize,
}

impl MemorySettings {
    pub fn new(settings: Settings) -> Self {
        Self { settings, saves: 0 }
    }
}

impl SettingsStore for MemorySettings {
    fn load_settings(&mut self) -> Settings {
        self.settings
    }

    fn save_settings(&mut self, high_score: u32) {
        self.settings.high_score = high_score;
        self.saves += 1;
    }
}

/// Presentation that only logs; messages complete after their duration
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPresentation;

impl Presentation for LogPresentation {
    fn show_transient_message(
        &mut self,
        duration_secs: f32,
        message: MessageKey,
        _sound: Option<SfxCue>,
        incoming_count: Option<u32>,
    ) -> f32 {
        match incoming_count {
            Some(count) => info!("[HUD] {} ({} incoming)", message, count),
            None => info!("[HUD] {}", message),
        }
        duration_secs
    }

    fn show_round_end_banner(&mut self, outcome: OutcomeKey) {
        info!("[HUD] {}", outcome);
    }
}

/// Audio sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play_sfx(&mut self, _cue: SfxCue) {}

    fn play_looping_sfx(&mut self, _cue: SfxCue) -> Option<SoundHandle> {
        None
    }

    fn set_pitch(&mut self, _handle: SoundHandle, _pitch: f32) {}

    fn stop(&mut self, _handle: SoundHandle) {}
}

/// Catalog that has every asset
#[derive(Debug, Clone, Copy, Default)]
pub struct FullCatalog;

impl AssetCatalog for FullCatalog {
    fn has_pedestrian(&self, _kind: PedestrianKind) -> bool {
        true
    }

    fn has_vehicle(&self, _kind: VehicleKind) -> bool {
        true
    }
}

/// Everything outside the core that the world needs
pub struct Collaborators {
    pub settings: Box<dyn SettingsStore>,
    /// None when the HUD could not be found; the world degrades gracefully
    pub presentation: Option<Box<dyn Presentation>>,
    pub audio: Box<dyn AudioSink>,
    pub assets: Box<dyn AssetCatalog>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            settings: Box::new(MemorySettings::default()),
            presentation: Some(Box::new(LogPresentation)),
            audio: Box::new(NullAudio),
            assets: Box::new(FullCatalog),
        }
    }
}
