//! Frame-sequence animation data.
//!
//! A [`RenderStates`] maps a state name (`"idle"`, `"walk"`, ...) to an ordered
//! list of [`RenderFrame`]s and remembers which state and frame are current.
//! The frame to show is resolved from an elapsed time by accumulating frame
//! durations modulo the state's cycle length, see
//! [`RenderStates::frame_offset`].
//!
//! The frame table is shared behind an [`Arc`], so cloning a `RenderStates`
//! out of a definition for every spawned entity is cheap. Frames are pushed at
//! load time only.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::geometry::{Rect, Vec2};

/// Edge length of a tile (and of tile-sized sprite frames) in pixels.
pub const TILE_PIXELS: i32 = 16;

/// State a fresh [`RenderStates`] starts in.
pub const DEFAULT_STATE: &str = "default";

/// One still image of an animation.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    /// Texture key resolved by the renderer.
    pub texture: Arc<str>,
    /// Source rectangle inside the texture, in pixels.
    pub clip: Rect<i32>,
    /// Draw offset relative to the owner's position, in pixels.
    pub offset: Vec2<f32>,
    /// Display time in seconds. Zero marks a static frame.
    pub duration: f32,
}

impl RenderFrame {
    pub fn new(texture: impl Into<Arc<str>>, clip: Rect<i32>, offset: Vec2<f32>, duration: f32) -> Self {
        Self {
            texture: texture.into(),
            clip,
            offset,
            duration: duration.max(0.0),
        }
    }
}

pub type AnimationTable = FxHashMap<String, Vec<RenderFrame>>;

#[derive(Debug, Clone)]
pub struct RenderStates {
    table: Arc<AnimationTable>,
    state: String,
    offset: usize,
}

impl Default for RenderStates {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderStates {
    pub fn new() -> Self {
        Self {
            table: Arc::new(AnimationTable::default()),
            state: DEFAULT_STATE.to_string(),
            offset: 0,
        }
    }

    /// Append a frame to the current state. Repeated pushes accumulate.
    pub fn push_frame(
        &mut self,
        texture: impl Into<Arc<str>>,
        clip: Rect<i32>,
        offset: Vec2<f32>,
        duration: f32,
    ) {
        let frame = RenderFrame::new(texture, clip, offset, duration);
        Arc::make_mut(&mut self.table)
            .entry(self.state.clone())
            .or_default()
            .push(frame);
    }

    /// Append a tile-sized frame whose clip starts at `origin` in the texture.
    pub fn push_tile_frame(&mut self, texture: impl Into<Arc<str>>, origin: Vec2<i32>, duration: f32) {
        let clip = Rect::from_parts(origin, Vec2::new(TILE_PIXELS, TILE_PIXELS));
        self.push_frame(texture, clip, Vec2::new(0.0, 0.0), duration);
    }

    /// Switch state and set the frame offset directly. The offset is not
    /// checked against the sequence length here; [`RenderStates::frame`] does.
    pub fn set_state(&mut self, name: impl Into<String>, offset: usize) {
        self.state = name.into();
        self.offset = offset;
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.table.get(name).is_some_and(|frames| !frames.is_empty())
    }

    /// All state names, sorted.
    pub fn state_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.table.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Frames of the current state; empty when the state has none.
    pub fn frames(&self) -> &[RenderFrame] {
        self.table.get(&self.state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cycle length of the current state in seconds.
    pub fn total_duration(&self) -> f32 {
        self.frames().iter().map(|f| f.duration).sum()
    }

    /// Index of the frame showing `elapsed` seconds into the current state.
    ///
    /// A zero-length cycle (static frame) always resolves to 0, as does a
    /// non-finite `elapsed`. Negative times wrap like positive ones.
    pub fn frame_offset(&self, elapsed: f32) -> usize {
        let frames = self.frames();
        let total: f32 = frames.iter().map(|f| f.duration).sum();
        if total <= 0.0 || !total.is_finite() || !elapsed.is_finite() {
            return 0;
        }
        let t = elapsed.rem_euclid(total);

        let mut index = 0;
        let mut acc = 0.0;
        while index < frames.len() && acc <= t {
            acc += frames[index].duration;
            index += 1;
        }
        // index is one past the containing frame; wrapping covers a scan that
        // ran off the end on a rounding boundary
        (index + frames.len() - 1) % frames.len()
    }

    /// Resolve and store the frame offset for `elapsed`.
    pub fn advance(&mut self, elapsed: f32) {
        self.offset = self.frame_offset(elapsed);
    }

    /// Frame `index` of the current state.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range; callers must only ask for frames
    /// the loaded content has.
    pub fn frame(&self, index: usize) -> &RenderFrame {
        let frames = self.frames();
        frames.get(index).unwrap_or_else(|| {
            panic!(
                "frame {} out of range for state '{}' ({} frames)",
                index,
                self.state,
                frames.len()
            )
        })
    }

    /// Frame at the stored offset.
    pub fn current_frame(&self) -> &RenderFrame {
        self.frame(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip() -> Rect<i32> {
        Rect::new(0, 0, 16, 16)
    }

    fn walk_cycle() -> RenderStates {
        let mut rs = RenderStates::new();
        rs.set_state("walk", 0);
        rs.push_frame("hero", clip(), Vec2::new(0.0, 0.0), 0.25);
        rs.push_frame("hero", clip().translate(Vec2::new(16, 0)), Vec2::new(0.0, 0.0), 0.5);
        rs.push_frame("hero", clip().translate(Vec2::new(32, 0)), Vec2::new(0.0, 0.0), 0.25);
        rs
    }

    #[test]
    fn test_static_frame_always_resolves_to_zero() {
        let mut rs = RenderStates::new();
        rs.push_tile_frame("tiles", Vec2::new(0, 0), 0.0);
        for t in [0.0, 1.0, 123.456, -7.0, f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert_eq!(rs.frame_offset(t), 0, "t = {t}");
        }
    }

    #[test]
    fn test_frame_offset_walks_cumulative_durations() {
        let rs = walk_cycle();
        assert_eq!(rs.frame_offset(0.0), 0);
        assert_eq!(rs.frame_offset(0.1), 0);
        assert_eq!(rs.frame_offset(0.25), 1);
        assert_eq!(rs.frame_offset(0.6), 1);
        assert_eq!(rs.frame_offset(0.75), 2);
        assert_eq!(rs.frame_offset(0.9), 2);
    }

    #[test]
    fn test_frame_offset_is_periodic() {
        let rs = walk_cycle();
        let total = rs.total_duration();
        assert_eq!(total, 1.0);
        for t in [0.1f32, 0.3, 0.55, 0.8, 0.95] {
            assert_eq!(rs.frame_offset(t), rs.frame_offset(t + total));
            assert_eq!(rs.frame_offset(t), rs.frame_offset(t + 3.0 * total));
        }
    }

    #[test]
    fn test_negative_time_wraps() {
        let rs = walk_cycle();
        // -0.1 is 0.9 into the cycle
        assert_eq!(rs.frame_offset(-0.1), 2);
    }

    #[test]
    fn test_pushes_accumulate_per_state() {
        let mut rs = walk_cycle();
        rs.set_state("walk", 0);
        rs.push_frame("hero", clip(), Vec2::new(0.0, 0.0), 0.25);
        assert_eq!(rs.frames().len(), 4);
        rs.set_state("jump", 0);
        rs.push_frame("hero", clip(), Vec2::new(0.0, 0.0), 0.0);
        assert_eq!(rs.frames().len(), 1);
        assert_eq!(rs.state_names(), vec!["jump", "walk"]);
    }

    #[test]
    fn test_advance_stores_offset() {
        let mut rs = walk_cycle();
        rs.advance(0.3);
        assert_eq!(rs.offset(), 1);
        assert_eq!(rs.current_frame().clip.x(), 16);
    }

    #[test]
    fn test_clones_share_frames_but_not_cursor() {
        let rs = walk_cycle();
        let mut other = rs.clone();
        other.advance(0.8);
        assert_eq!(rs.offset(), 0);
        assert_eq!(other.offset(), 2);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_frame_out_of_range_panics() {
        let rs = walk_cycle();
        rs.frame(3);
    }

    #[test]
    fn test_unknown_state_has_no_frames() {
        let mut rs = walk_cycle();
        rs.set_state("swim", 0);
        assert!(rs.frames().is_empty());
        assert!(!rs.has_state("swim"));
        assert_eq!(rs.frame_offset(1.0), 0);
    }
}
