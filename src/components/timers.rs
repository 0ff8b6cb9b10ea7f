//! Named countdown timers attached to an entity.
use smallvec::SmallVec;

/// A single countdown.
#[derive(Clone, Debug, PartialEq)]
pub struct Timer {
    pub name: String,
    pub duration: f32,
    pub elapsed: f32,
}

impl Timer {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Timer {
            name: name.into(),
            duration,
            elapsed: 0.0,
        }
    }

    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

/// Most entities carry zero to two timers (invincibility, despawn delay).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timers(pub SmallVec<[Timer; 2]>);

impl Timers {
    /// Start (or restart) the timer `name`.
    pub fn start(&mut self, name: impl Into<String>, duration: f32) {
        let name = name.into();
        match self.0.iter_mut().find(|t| t.name == name) {
            Some(t) => {
                t.duration = duration;
                t.reset();
            }
            None => self.0.push(Timer::new(name, duration)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Timer> {
        self.0.iter().find(|t| t.name == name)
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn cancel(&mut self, name: &str) {
        self.0.retain(|t| t.name != name);
    }

    /// Advance every timer by `dt` and remove the expired ones, returning
    /// their names in start order.
    pub fn tick(&mut self, dt: f32) -> SmallVec<[String; 2]> {
        let mut expired = SmallVec::new();
        self.0.retain(|t| {
            t.elapsed += dt;
            if t.elapsed >= t.duration {
                expired.push(std::mem::take(&mut t.name));
                false
            } else {
                true
            }
        });
        expired
    }
}
