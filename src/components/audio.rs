//! Sounds an entity is currently playing.
//!
//! Looping voices (engine hum, underwater bubbles) are tracked here so they
//! can be stopped when the entity goes away.
use arrayvec::ArrayVec;

use crate::resources::audio::VoiceHandle;

pub const MAX_ENTITY_VOICES: usize = 4;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Audio {
    pub voices: ArrayVec<VoiceHandle, MAX_ENTITY_VOICES>,
}

impl Audio {
    /// Track `voice`. When full, the oldest handle is returned so the caller
    /// can stop it.
    pub fn track(&mut self, voice: VoiceHandle) -> Option<VoiceHandle> {
        let evicted = if self.voices.is_full() {
            Some(self.voices.remove(0))
        } else {
            None
        };
        self.voices.push(voice);
        evicted
    }

    pub fn untrack(&mut self, voice: VoiceHandle) {
        self.voices.retain(|v| *v != voice);
    }

    /// Remove and return every tracked handle.
    pub fn take_all(&mut self) -> ArrayVec<VoiceHandle, MAX_ENTITY_VOICES> {
        std::mem::take(&mut self.voices)
    }
}
