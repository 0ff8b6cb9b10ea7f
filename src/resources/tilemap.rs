//! Sparse chunked tile grid.
//!
//! The world plane is split into [`CHUNK_SIZE`]×[`CHUNK_SIZE`] chunks keyed by
//! chunk coordinate. A chunk is allocated on the first non-empty write into
//! it; everything else reads as [`TileId::NONE`] without allocating.
//!
//! Coordinates use a bottom-left origin with y growing upwards. Chunk and
//! in-chunk coordinates come from floor division and floor modulo, so
//! `(-1, -1)` lives in chunk `(-1, -1)` at local `(15, 15)`.

use std::fmt;
use std::sync::Arc;

use base64::Engine as _;
use log::debug;
use rustc_hash::FxHashMap;

use crate::error::{EngineError, Result};
use crate::geometry::Vec2;

pub const CHUNK_SIZE: i32 = 16;
const CHUNK_AREA: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Tile definition key. The empty id is the "no tile" sentinel.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(Option<Arc<str>>);

static NONE_TILE: TileId = TileId::NONE;

impl TileId {
    pub const NONE: TileId = TileId(None);

    pub fn new(id: &str) -> Self {
        if id.is_empty() {
            Self::NONE
        } else {
            TileId(Some(Arc::from(id)))
        }
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }
}

impl From<&str> for TileId {
    fn from(id: &str) -> Self {
        TileId::new(id)
    }
}

impl From<String> for TileId {
    fn from(id: String) -> Self {
        TileId::new(&id)
    }
}

impl fmt::Debug for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileId({:?})", self.as_str())
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed block of tile ids, stored column-major.
#[derive(Clone, Debug)]
pub struct Chunk {
    tiles: Box<[TileId; CHUNK_AREA]>,
}

impl Default for Chunk {
    fn default() -> Self {
        Self {
            tiles: Box::new([TileId::NONE; CHUNK_AREA]),
        }
    }
}

impl Chunk {
    fn index(local: Vec2<i32>) -> usize {
        debug_assert!((0..CHUNK_SIZE).contains(&local.x) && (0..CHUNK_SIZE).contains(&local.y));
        (local.x * CHUNK_SIZE + local.y) as usize
    }

    pub fn get(&self, local: Vec2<i32>) -> &TileId {
        &self.tiles[Self::index(local)]
    }

    pub fn set(&mut self, local: Vec2<i32>, id: TileId) {
        self.tiles[Self::index(local)] = id;
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.iter().all(TileId::is_none)
    }
}

/// Split a world tile coordinate into chunk and in-chunk coordinates.
pub fn split_coords(x: i32, y: i32) -> (Vec2<i32>, Vec2<i32>) {
    (
        Vec2::new(x.div_euclid(CHUNK_SIZE), y.div_euclid(CHUNK_SIZE)),
        Vec2::new(x.rem_euclid(CHUNK_SIZE), y.rem_euclid(CHUNK_SIZE)),
    )
}

#[derive(Clone, Debug, Default)]
pub struct Tilemap {
    chunks: FxHashMap<Vec2<i32>, Chunk>,
}

impl Tilemap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self, x: i32, y: i32) -> &TileId {
        let (chunk, local) = split_coords(x, y);
        match self.chunks.get(&chunk) {
            Some(c) => c.get(local),
            None => &NONE_TILE,
        }
    }

    /// Store `id` at `(x, y)`. Writing the sentinel into an absent chunk does
    /// nothing.
    pub fn write(&mut self, x: i32, y: i32, id: TileId) {
        let (chunk, local) = split_coords(x, y);
        if id.is_none() {
            if let Some(c) = self.chunks.get_mut(&chunk) {
                c.set(local, id);
            }
            return;
        }
        self.chunks.entry(chunk).or_default().set(local, id);
    }

    pub fn tile(&mut self, x: i32, y: i32) -> Tile<'_> {
        Tile { map: self, x, y }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    /// Every non-empty tile as `(position, id)`, ordered by chunk then column.
    pub fn iter(&self) -> impl Iterator<Item = (Vec2<i32>, &TileId)> + '_ {
        let mut keys: Vec<Vec2<i32>> = self.chunks.keys().copied().collect();
        keys.sort_unstable();
        keys.into_iter().flat_map(move |key| {
            let chunk = &self.chunks[&key];
            (0..CHUNK_SIZE).flat_map(move |lx| {
                (0..CHUNK_SIZE).filter_map(move |ly| {
                    let id = chunk.get(Vec2::new(lx, ly));
                    (!id.is_none()).then(|| {
                        (Vec2::new(key.x * CHUNK_SIZE + lx, key.y * CHUNK_SIZE + ly), id)
                    })
                })
            })
        })
    }

    /// Decode a base64 layer of little-endian `u32` palette indices and write
    /// it with its bottom row at `origin.y`.
    ///
    /// Layer rows are stored top row first, so row `r` lands at
    /// `origin.y + height - r - 1`. Index 0 is empty and leaves the existing
    /// tile alone; index `n` maps to `palette[n - 1]`. Returns the number of
    /// tiles written.
    pub fn apply_layer(
        &mut self,
        origin: Vec2<i32>,
        width: u32,
        height: u32,
        data: &str,
        palette: &[TileId],
    ) -> Result<usize> {
        let indices = decode_layer(data, width, height)?;
        let mut written = 0;
        for (i, index) in indices.into_iter().enumerate() {
            if index == 0 {
                continue;
            }
            let id = palette
                .get(index as usize - 1)
                .ok_or(EngineError::UnknownTileIndex { index })?;
            let row = (i / width as usize) as i32;
            let col = (i % width as usize) as i32;
            self.write(origin.x + col, origin.y + height as i32 - row - 1, id.clone());
            written += 1;
        }
        debug!("applied {}x{} tile layer: {} tiles", width, height, written);
        Ok(written)
    }
}

/// Decode base64 layer data into exactly `width * height` indices.
pub fn decode_layer(data: &str, width: u32, height: u32) -> Result<Vec<u32>> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(data.trim())?;
    let expected = width as usize * height as usize;
    if bytes.len() % 4 != 0 || bytes.len() / 4 != expected {
        return Err(EngineError::LayerSize {
            expected,
            actual: bytes.len() / 4,
        });
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

/// Coordinate-addressed view over one tile of a [`Tilemap`].
pub struct Tile<'a> {
    map: &'a mut Tilemap,
    x: i32,
    y: i32,
}

impl Tile<'_> {
    pub fn position(&self) -> Vec2<i32> {
        Vec2::new(self.x, self.y)
    }

    pub fn read(&self) -> &TileId {
        self.map.read(self.x, self.y)
    }

    pub fn write(&mut self, id: TileId) {
        self.map.write(self.x, self.y, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(indices: &[u32]) -> String {
        let bytes: Vec<u8> = indices.iter().flat_map(|i| i.to_le_bytes()).collect();
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    #[test]
    fn test_split_coords_negative() {
        assert_eq!(split_coords(-1, -1), (Vec2::new(-1, -1), Vec2::new(15, 15)));
        assert_eq!(split_coords(-16, 16), (Vec2::new(-1, 1), Vec2::new(0, 0)));
        assert_eq!(split_coords(-17, 31), (Vec2::new(-2, 1), Vec2::new(15, 15)));
    }

    #[test]
    fn test_read_unwritten_is_sentinel() {
        let map = Tilemap::new();
        assert!(map.read(0, 0).is_none());
        assert!(map.read(-1, -1).is_none());
        assert_eq!(map.chunk_count(), 0);
    }

    #[test]
    fn test_write_read_negative() {
        let mut map = Tilemap::new();
        map.write(-1, -1, TileId::new("brick"));
        assert_eq!(map.read(-1, -1).as_str(), "brick");
        assert!(map.read(15, 15).is_none());
        assert!(map.read(-17, -17).is_none());
        assert_eq!(map.chunk_count(), 1);
    }

    #[test]
    fn test_sentinel_write_allocates_nothing() {
        let mut map = Tilemap::new();
        map.write(100, -100, TileId::NONE);
        assert_eq!(map.chunk_count(), 0);

        map.write(3, 3, TileId::new("ground"));
        map.write(3, 3, TileId::NONE);
        assert!(map.read(3, 3).is_none());
        assert_eq!(map.chunk_count(), 1);
    }

    #[test]
    fn test_empty_string_is_sentinel() {
        assert_eq!(TileId::new(""), TileId::NONE);
        assert_eq!(TileId::from(String::new()).as_str(), "");
    }

    #[test]
    fn test_tile_view() {
        let mut map = Tilemap::new();
        let mut tile = map.tile(5, -2);
        assert!(tile.read().is_none());
        tile.write("pipe".into());
        assert_eq!(tile.read().as_str(), "pipe");
        assert_eq!(tile.position(), Vec2::new(5, -2));
        assert_eq!(map.read(5, -2).as_str(), "pipe");
    }

    #[test]
    fn test_iter_skips_empty_tiles() {
        let mut map = Tilemap::new();
        map.write(0, 0, "a".into());
        map.write(-1, 0, "b".into());
        map.write(1, 0, "c".into());
        let tiles: Vec<(Vec2<i32>, String)> =
            map.iter().map(|(p, id)| (p, id.to_string())).collect();
        assert_eq!(
            tiles,
            vec![
                (Vec2::new(-1, 0), "b".to_string()),
                (Vec2::new(0, 0), "a".to_string()),
                (Vec2::new(1, 0), "c".to_string()),
            ]
        );
    }

    #[test]
    fn test_apply_layer_flips_rows() {
        let mut map = Tilemap::new();
        let palette = [TileId::new("sky"), TileId::new("ground")];
        // 2x2: top row [sky, empty], bottom row [ground, ground]
        let data = encode(&[1, 0, 2, 2]);
        let n = map
            .apply_layer(Vec2::new(0, 0), 2, 2, &data, &palette)
            .unwrap();
        assert_eq!(n, 3);
        assert_eq!(map.read(0, 1).as_str(), "sky");
        assert!(map.read(1, 1).is_none());
        assert_eq!(map.read(0, 0).as_str(), "ground");
        assert_eq!(map.read(1, 0).as_str(), "ground");
    }

    #[test]
    fn test_apply_layer_rejects_bad_size() {
        let mut map = Tilemap::new();
        let data = encode(&[1, 1, 1]);
        let err = map
            .apply_layer(Vec2::new(0, 0), 2, 2, &data, &[TileId::new("x")])
            .unwrap_err();
        assert!(matches!(err, EngineError::LayerSize { expected: 4, actual: 3 }));
    }

    #[test]
    fn test_apply_layer_rejects_unknown_index() {
        let mut map = Tilemap::new();
        let data = encode(&[3]);
        let err = map
            .apply_layer(Vec2::new(0, 0), 1, 1, &data, &[TileId::new("x")])
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownTileIndex { index: 3 }));
    }
}
