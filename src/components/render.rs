//! Per-entity render state: which animation plays and how far into it.
use super::animation::{RenderFrame, RenderStates};

#[derive(Clone, Debug)]
pub struct Render {
    pub states: RenderStates,
    /// Seconds since the current animation state started.
    pub elapsed: f32,
    /// Draw order; higher layers are drawn later.
    pub layer: i32,
}

impl Render {
    pub fn new(states: RenderStates) -> Self {
        Self {
            states,
            elapsed: 0.0,
            layer: 0,
        }
    }

    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// Advance the animation clock and resolve the frame to show.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        self.states.advance(self.elapsed);
    }

    /// Switch to animation `name` if it exists and is not already playing.
    /// Returns whether a switch happened.
    pub fn play(&mut self, name: &str) -> bool {
        if self.states.state() == name || !self.states.has_state(name) {
            return false;
        }
        self.states.set_state(name, 0);
        self.elapsed = 0.0;
        true
    }

    /// Current frame, or `None` when the active state has no frames.
    pub fn frame(&self) -> Option<&RenderFrame> {
        if self.states.frames().is_empty() {
            None
        } else {
            Some(self.states.current_frame())
        }
    }
}
