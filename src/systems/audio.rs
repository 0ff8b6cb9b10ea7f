//! Audio backend thread and the per-tick audio system.
//!
//! The engine ships a null backend: [`audio_thread`] owns the sound and music
//! registries, logs every command and answers with the [`AudioMessage`]s a
//! mixer would send. One-shot sounds have no length without decoded data, so
//! they finish as soon as they start; looping voices run until stopped. A
//! real mixer plugs in by replacing this thread body and keeping the channel
//! protocol.

use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::components::audio::Audio;
use crate::ecs::{Entity, EntityStore};
use crate::events::audio::{AudioCmd, AudioMessage};
use crate::resources::audio::{AudioBridge, VoiceHandle};

/// Drain messages from the audio thread and free finished voices in both the
/// bridge and every entity [`Audio`] component.
pub fn poll_audio_messages(bridge: &mut AudioBridge, store: &mut EntityStore) -> Vec<AudioMessage> {
    let msgs = bridge.poll();
    release_finished_voices(store, &msgs);
    msgs
}

/// Forget voices the audio thread reported as finished or failed. The bridge
/// side is already freed by [`AudioBridge::poll`].
pub fn release_finished_voices(store: &mut EntityStore, msgs: &[AudioMessage]) {
    for msg in msgs {
        if let AudioMessage::SoundFinished { voice } | AudioMessage::SoundFailed { voice, .. } = msg {
            for e in store.view::<(Audio,)>() {
                store.update::<Audio, _>(e, |a| a.untrack(*voice));
            }
        }
    }
}

/// Stop every voice an entity owns, e.g. before removing it.
pub fn stop_entity_voices(bridge: &mut AudioBridge, store: &mut EntityStore, entity: Entity) {
    if let Some(voices) = store.try_update::<Audio, _>(entity, |a| a.take_all()) {
        for v in voices {
            bridge.stop(v);
        }
    }
}

/// Play a sound owned by `entity`, evicting its oldest voice when it already
/// holds the maximum.
pub fn play_entity_sound(
    bridge: &mut AudioBridge,
    store: &mut EntityStore,
    entity: Entity,
    id: &str,
) -> VoiceHandle {
    let voice = bridge.play_sound(id);
    if let Some(Some(evicted)) = store.try_update::<Audio, _>(entity, |a| a.track(voice)) {
        bridge.stop(evicted);
    }
    voice
}

/// Entry point of the audio thread. Blocks until [`AudioCmd::Shutdown`] or
/// until the game side hangs up.
pub fn audio_thread(rx_cmd: Receiver<AudioCmd>, tx_msg: Sender<AudioMessage>) {
    info!("audio thread starting (id={:?})", std::thread::current().id());

    let mut sounds: FxHashMap<String, String> = FxHashMap::default();
    let mut music: FxHashMap<String, String> = FxHashMap::default();
    let mut looping: FxHashSet<VoiceHandle> = FxHashSet::default();
    let mut current_music: Option<String> = None;

    for cmd in rx_cmd.iter() {
        match cmd {
            AudioCmd::RegisterSound { id, path } => {
                debug!("[audio] sound '{}' -> '{}'", id, path);
                sounds.insert(id, path);
            }
            AudioCmd::RegisterMusic { id, path } => {
                debug!("[audio] music '{}' -> '{}'", id, path);
                music.insert(id, path);
            }
            AudioCmd::PlaySound { voice, id } => {
                if !sounds.contains_key(&id) {
                    let _ = tx_msg.send(AudioMessage::SoundFailed {
                        voice,
                        error: format!("unknown sound '{}'", id),
                    });
                    continue;
                }
                debug!("[audio] play '{}' on {:?}", id, voice);
                let _ = tx_msg.send(AudioMessage::SoundStarted { voice });
                if !looping.contains(&voice) {
                    let _ = tx_msg.send(AudioMessage::SoundFinished { voice });
                }
            }
            AudioCmd::StopVoice { voice } => {
                debug!("[audio] stop {:?}", voice);
                looping.remove(&voice);
            }
            AudioCmd::SetLoop { voice, looped } => {
                if looped {
                    looping.insert(voice);
                } else if looping.remove(&voice) {
                    let _ = tx_msg.send(AudioMessage::SoundFinished { voice });
                }
            }
            AudioCmd::PlayMusic { id, looped } => {
                if !music.contains_key(&id) {
                    warn!("[audio] unknown music '{}'", id);
                    continue;
                }
                if let Some(old) = current_music.replace(id.clone()) {
                    let _ = tx_msg.send(AudioMessage::MusicStopped { id: old });
                }
                debug!("[audio] music start '{}' looped={}", id, looped);
                let _ = tx_msg.send(AudioMessage::MusicStarted { id });
            }
            AudioCmd::StopMusic => {
                if let Some(id) = current_music.take() {
                    debug!("[audio] music stop '{}'", id);
                    let _ = tx_msg.send(AudioMessage::MusicStopped { id });
                }
            }
            AudioCmd::Shutdown => break,
        }
    }

    info!("audio thread exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_null_backend_finishes_one_shots() {
        let (tx_cmd, rx_cmd) = unbounded();
        let (tx_msg, rx_msg) = unbounded();
        let voice = VoiceHandle {
            slot: 0,
            generation: 1,
        };
        tx_cmd
            .send(AudioCmd::RegisterSound {
                id: "coin".into(),
                path: "coin.wav".into(),
            })
            .unwrap();
        tx_cmd
            .send(AudioCmd::PlaySound {
                voice,
                id: "coin".into(),
            })
            .unwrap();
        tx_cmd.send(AudioCmd::Shutdown).unwrap();
        audio_thread(rx_cmd, tx_msg);
        let msgs: Vec<AudioMessage> = rx_msg.try_iter().collect();
        assert_eq!(
            msgs,
            vec![
                AudioMessage::SoundStarted { voice },
                AudioMessage::SoundFinished { voice },
            ]
        );
    }

    #[test]
    fn test_bridge_round_trip_through_thread() {
        let mut bridge = AudioBridge::spawn(4);
        let mut store = EntityStore::new();
        let e = store.create_entity();
        store.emplace(e, Audio::default());
        bridge.register_sound("jump", "jump.wav");
        let v = play_entity_sound(&mut bridge, &mut store, e, "jump");
        assert_eq!(store.get::<Audio>(e).voices.len(), 1);

        // the backend answers asynchronously
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
        while bridge.is_playing(v) && std::time::Instant::now() < deadline {
            poll_audio_messages(&mut bridge, &mut store);
            std::thread::yield_now();
        }
        assert!(!bridge.is_playing(v));
        assert!(store.get::<Audio>(e).voices.is_empty());
        bridge.shutdown();
    }
}
