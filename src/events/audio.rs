use crate::resources::audio::VoiceHandle;

/// Commands sent *to* the audio thread
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCmd {
    RegisterSound { id: String, path: String },
    RegisterMusic { id: String, path: String },
    PlaySound { voice: VoiceHandle, id: String },
    StopVoice { voice: VoiceHandle },
    SetLoop { voice: VoiceHandle, looped: bool },
    PlayMusic { id: String, looped: bool },
    StopMusic,
    Shutdown,
}

/// Events sent *back* from the audio thread
#[derive(Debug, Clone, PartialEq)]
pub enum AudioMessage {
    SoundStarted { voice: VoiceHandle },
    SoundFinished { voice: VoiceHandle },
    SoundFailed { voice: VoiceHandle, error: String },
    MusicStarted { id: String },
    MusicStopped { id: String },
}
