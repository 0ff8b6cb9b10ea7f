//! Bridge between the game thread and the audio backend thread.
//!
//! The game never touches the mixer. It allocates a voice slot, sends an
//! [`AudioCmd`] over a `crossbeam-channel`, and later drains
//! [`AudioMessage`]s to learn which voices finished.
//!
//! Voice slot policy when playing a sound:
//! 1. the lowest free slot;
//! 2. else the oldest non-looping voice is stolen;
//! 3. else the oldest voice is stolen.
//!
//! Every allocation bumps the slot generation, so a [`VoiceHandle`] kept past
//! its voice's end simply stops matching and is ignored.

use std::thread::JoinHandle;

use arrayvec::ArrayVec;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, warn};
use rustc_hash::FxHashSet;

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::systems::audio::audio_thread;

/// Upper bound on simultaneous voices regardless of configuration.
pub const MAX_VOICES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceHandle {
    pub slot: u16,
    pub generation: u32,
}

#[derive(Debug, Clone, Copy, Default)]
struct Voice {
    generation: u32,
    busy: bool,
    looping: bool,
    /// Allocation order, for picking the oldest voice.
    started: u64,
}

#[derive(Debug, Clone)]
pub struct VoiceSlots {
    voices: ArrayVec<Voice, MAX_VOICES>,
    sequence: u64,
}

impl VoiceSlots {
    /// `count` is clamped to `1..=MAX_VOICES`.
    pub fn new(count: usize) -> Self {
        let mut voices = ArrayVec::new();
        for _ in 0..count.clamp(1, MAX_VOICES) {
            voices.push(Voice::default());
        }
        Self { voices, sequence: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.voices.len()
    }

    pub fn busy_count(&self) -> usize {
        self.voices.iter().filter(|v| v.busy).count()
    }

    /// Claim a slot. The second value is the handle of a stolen voice, which
    /// the caller must stop.
    pub fn allocate(&mut self) -> (VoiceHandle, Option<VoiceHandle>) {
        let slot = self
            .voices
            .iter()
            .position(|v| !v.busy)
            .or_else(|| self.oldest(|v| !v.looping))
            .or_else(|| self.oldest(|_| true))
            .unwrap_or(0);

        let stolen = self.voices[slot].busy.then(|| self.handle(slot));
        self.sequence += 1;
        let voice = &mut self.voices[slot];
        voice.generation = voice.generation.wrapping_add(1);
        voice.busy = true;
        voice.looping = false;
        voice.started = self.sequence;
        (self.handle(slot), stolen)
    }

    fn oldest(&self, pred: impl Fn(&Voice) -> bool) -> Option<usize> {
        self.voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.busy && pred(*v))
            .min_by_key(|(_, v)| v.started)
            .map(|(i, _)| i)
    }

    fn handle(&self, slot: usize) -> VoiceHandle {
        VoiceHandle {
            slot: slot as u16,
            generation: self.voices[slot].generation,
        }
    }

    fn voice_mut(&mut self, handle: VoiceHandle) -> Option<&mut Voice> {
        self.voices
            .get_mut(handle.slot as usize)
            .filter(|v| v.busy && v.generation == handle.generation)
    }

    pub fn is_playing(&self, handle: VoiceHandle) -> bool {
        self.voices
            .get(handle.slot as usize)
            .is_some_and(|v| v.busy && v.generation == handle.generation)
    }

    /// Free the voice. Stale handles are ignored and return `false`.
    pub fn release(&mut self, handle: VoiceHandle) -> bool {
        match self.voice_mut(handle) {
            Some(v) => {
                v.busy = false;
                v.looping = false;
                true
            }
            None => false,
        }
    }

    pub fn is_looping(&self, handle: VoiceHandle) -> bool {
        self.is_playing(handle) && self.voices[handle.slot as usize].looping
    }

    pub fn set_loop(&mut self, handle: VoiceHandle, looped: bool) -> bool {
        match self.voice_mut(handle) {
            Some(v) => {
                v.looping = looped;
                true
            }
            None => false,
        }
    }
}

/// Game-side end of the audio channels.
pub struct AudioBridge {
    /// Sender for [`AudioCmd`] messages (game -> audio thread).
    pub tx_cmd: Sender<AudioCmd>,
    /// Receiver for [`AudioMessage`] messages (audio thread -> game).
    pub rx_msg: Receiver<AudioMessage>,
    handle: Option<JoinHandle<()>>,
    slots: VoiceSlots,
    sounds: FxHashSet<String>,
    music: FxHashSet<String>,
    current_music: Option<String>,
}

impl AudioBridge {
    /// Spawn the backend thread and connect to it.
    pub fn spawn(voices: usize) -> Self {
        let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
        let (tx_msg, rx_msg) = unbounded::<AudioMessage>();
        let handle = std::thread::spawn(move || audio_thread(rx_cmd, tx_msg));
        let mut bridge = Self::from_channels(voices, tx_cmd, rx_msg);
        bridge.handle = Some(handle);
        bridge
    }

    /// Bridge over caller-owned channels, with no thread.
    pub fn from_channels(voices: usize, tx_cmd: Sender<AudioCmd>, rx_msg: Receiver<AudioMessage>) -> Self {
        Self {
            tx_cmd,
            rx_msg,
            handle: None,
            slots: VoiceSlots::new(voices),
            sounds: FxHashSet::default(),
            music: FxHashSet::default(),
            current_music: None,
        }
    }

    fn send(&self, cmd: AudioCmd) {
        // the backend may already be gone during shutdown
        let _ = self.tx_cmd.send(cmd);
    }

    pub fn slots(&self) -> &VoiceSlots {
        &self.slots
    }

    pub fn register_sound(&mut self, id: impl Into<String>, path: impl Into<String>) {
        let id = id.into();
        self.sounds.insert(id.clone());
        self.send(AudioCmd::RegisterSound { id, path: path.into() });
    }

    pub fn register_music(&mut self, id: impl Into<String>, path: impl Into<String>) {
        let id = id.into();
        self.music.insert(id.clone());
        self.send(AudioCmd::RegisterMusic { id, path: path.into() });
    }

    pub fn play_sound(&mut self, id: &str) -> VoiceHandle {
        if !self.sounds.contains(id) {
            warn!("play_sound: '{}' is not registered", id);
        }
        let (voice, stolen) = self.slots.allocate();
        if let Some(old) = stolen {
            debug!("audio: stealing voice {:?} for '{}'", old, id);
            self.send(AudioCmd::StopVoice { voice: old });
        }
        debug!("audio: play '{}' on {:?}", id, voice);
        self.send(AudioCmd::PlaySound {
            voice,
            id: id.to_string(),
        });
        voice
    }

    pub fn stop(&mut self, voice: VoiceHandle) {
        if self.slots.release(voice) {
            self.send(AudioCmd::StopVoice { voice });
        }
    }

    pub fn set_loop(&mut self, voice: VoiceHandle, looped: bool) {
        if self.slots.set_loop(voice, looped) {
            self.send(AudioCmd::SetLoop { voice, looped });
        }
    }

    pub fn is_playing(&self, voice: VoiceHandle) -> bool {
        self.slots.is_playing(voice)
    }

    /// Start a registered music track, replacing the current one. Returns
    /// `false` for unknown ids.
    pub fn play_music(&mut self, id: &str) -> bool {
        if !self.music.contains(id) {
            warn!("play_music: '{}' is not registered", id);
            return false;
        }
        debug!("audio: music '{}'", id);
        self.current_music = Some(id.to_string());
        self.send(AudioCmd::PlayMusic {
            id: id.to_string(),
            looped: true,
        });
        true
    }

    pub fn stop_music(&mut self) {
        if self.current_music.take().is_some() {
            self.send(AudioCmd::StopMusic);
        }
    }

    pub fn current_music(&self) -> Option<&str> {
        self.current_music.as_deref()
    }

    pub fn has_sound(&self, id: &str) -> bool {
        self.sounds.contains(id)
    }

    pub fn has_music(&self, id: &str) -> bool {
        self.music.contains(id)
    }

    /// Drain backend messages, freeing finished voices.
    ///
    /// A `SoundFinished` for a voice the game has since set looping was sent
    /// before the backend saw the loop flag. It is dropped and the voice
    /// stays busy until stopped or unlooped.
    pub fn poll(&mut self) -> Vec<AudioMessage> {
        let mut msgs = Vec::new();
        for msg in self.rx_msg.try_iter() {
            match &msg {
                AudioMessage::SoundFinished { voice } if self.slots.is_looping(*voice) => {
                    debug!("audio: {:?} is looping, finish ignored", voice);
                    continue;
                }
                AudioMessage::SoundFinished { voice } | AudioMessage::SoundFailed { voice, .. } => {
                    self.slots.release(*voice);
                }
                _ => {}
            }
            msgs.push(msg);
        }
        msgs
    }

    /// Ask the backend to exit and wait for it.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.send(AudioCmd::Shutdown);
            let _ = handle.join();
        }
    }
}

impl Drop for AudioBridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bridge(voices: usize) -> (AudioBridge, Receiver<AudioCmd>, Sender<AudioMessage>) {
        let (tx_cmd, rx_cmd) = unbounded();
        let (tx_msg, rx_msg) = unbounded();
        (AudioBridge::from_channels(voices, tx_cmd, rx_msg), rx_cmd, tx_msg)
    }

    #[test]
    fn test_first_free_slot() {
        let mut slots = VoiceSlots::new(3);
        let (a, _) = slots.allocate();
        let (b, _) = slots.allocate();
        assert_eq!((a.slot, b.slot), (0, 1));
        assert!(slots.release(a));
        let (c, stolen) = slots.allocate();
        assert_eq!(c.slot, 0);
        assert_ne!(c, a);
        assert!(stolen.is_none());
    }

    #[test]
    fn test_steal_oldest_non_looping() {
        let mut slots = VoiceSlots::new(3);
        let (a, _) = slots.allocate();
        let (b, _) = slots.allocate();
        let (_c, _) = slots.allocate();
        slots.set_loop(a, true);
        let (d, stolen) = slots.allocate();
        assert_eq!(stolen, Some(b));
        assert_eq!(d.slot, b.slot);
        assert!(!slots.is_playing(b));
        assert!(slots.is_playing(a));
    }

    #[test]
    fn test_steal_oldest_when_all_loop() {
        let mut slots = VoiceSlots::new(2);
        let (a, _) = slots.allocate();
        let (b, _) = slots.allocate();
        slots.set_loop(a, true);
        slots.set_loop(b, true);
        let (_, stolen) = slots.allocate();
        assert_eq!(stolen, Some(a));
    }

    #[test]
    fn test_stale_handles_are_ignored() {
        let mut slots = VoiceSlots::new(1);
        let (a, _) = slots.allocate();
        slots.release(a);
        let (b, _) = slots.allocate();
        assert_eq!(a.slot, b.slot);
        assert!(!slots.release(a));
        assert!(!slots.set_loop(a, true));
        assert!(slots.is_playing(b));
    }

    #[test]
    fn test_capacity_is_clamped() {
        assert_eq!(VoiceSlots::new(0).capacity(), 1);
        assert_eq!(VoiceSlots::new(1000).capacity(), MAX_VOICES);
    }

    #[test]
    fn test_play_music_requires_registration() {
        let (mut audio, rx, _tx) = bridge(4);
        assert!(!audio.play_music("overworld"));
        audio.register_music("overworld", "music/overworld.xm");
        assert!(audio.play_music("overworld"));
        assert_eq!(audio.current_music(), Some("overworld"));
        audio.stop_music();
        let cmds: Vec<AudioCmd> = rx.try_iter().collect();
        assert_eq!(
            cmds,
            vec![
                AudioCmd::RegisterMusic {
                    id: "overworld".into(),
                    path: "music/overworld.xm".into()
                },
                AudioCmd::PlayMusic {
                    id: "overworld".into(),
                    looped: true
                },
                AudioCmd::StopMusic,
            ]
        );
    }

    #[test]
    fn test_finished_message_frees_voice() {
        let (mut audio, _rx, tx) = bridge(2);
        audio.register_sound("jump", "sfx/jump.wav");
        let v = audio.play_sound("jump");
        assert!(audio.is_playing(v));
        tx.send(AudioMessage::SoundFinished { voice: v }).unwrap();
        let msgs = audio.poll();
        assert_eq!(msgs.len(), 1);
        assert!(!audio.is_playing(v));
        assert_eq!(audio.slots().busy_count(), 0);
    }

    #[test]
    fn test_early_finish_keeps_looping_voice() {
        let (mut audio, rx, tx) = bridge(2);
        audio.register_sound("wind", "sfx/wind.ogg");
        let v = audio.play_sound("wind");
        audio.set_loop(v, true);
        assert!(audio.slots().is_looping(v));
        assert!(rx.try_iter().any(|c| c == AudioCmd::SetLoop { voice: v, looped: true }));

        tx.send(AudioMessage::SoundFinished { voice: v }).unwrap();
        assert!(audio.poll().is_empty());
        assert!(audio.is_playing(v));

        audio.set_loop(v, false);
        tx.send(AudioMessage::SoundFinished { voice: v }).unwrap();
        assert_eq!(audio.poll().len(), 1);
        assert!(!audio.is_playing(v));
    }

    #[test]
    fn test_looping_voice_survives_backend() {
        let mut audio = AudioBridge::spawn(4);
        audio.register_sound("wind", "sfx/wind.ogg");
        audio.register_sound("coin", "sfx/coin.wav");
        let wind = audio.play_sound("wind");
        audio.set_loop(wind, true);
        // the backend handles commands in order, so once the coin finishes
        // every message about the wind voice has arrived
        let coin = audio.play_sound("coin");
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
        while audio.is_playing(coin) && std::time::Instant::now() < deadline {
            audio.poll();
            std::thread::yield_now();
        }
        assert!(!audio.is_playing(coin));
        assert!(audio.is_playing(wind));

        audio.stop(wind);
        assert!(!audio.is_playing(wind));
        audio.shutdown();
    }

    #[test]
    fn test_stealing_sends_stop() {
        let (mut audio, rx, _tx) = bridge(1);
        let a = audio.play_sound("coin");
        let _b = audio.play_sound("coin");
        let stops: Vec<AudioCmd> = rx
            .try_iter()
            .filter(|c| matches!(c, AudioCmd::StopVoice { .. }))
            .collect();
        assert_eq!(stops, vec![AudioCmd::StopVoice { voice: a }]);
    }
}
