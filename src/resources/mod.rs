//! Long-lived engine data.
//!
//! Overview
//! - `assets` – where content files come from (directory or in-memory)
//! - `audio` – bridge to the audio thread and voice slot assignment
//! - `camera2d` – world camera, follow and clamp
//! - `defloader` – JSON content and level loading
//! - `definitions` – tile and entity definition registries
//! - `gameconfig` – INI-backed engine settings
//! - `input` – polled per-tick action state
//! - `level` – subworld collection of one level
//! - `parallax` – background layers and their composition
//! - `subworld` – tiles, entities and metadata of one region
//! - `tilemap` – chunked tile storage
//! - `worldtime` – clocks, fixed-rate deadlines and tick counters
pub mod assets;
pub mod audio;
pub mod camera2d;
pub mod defloader;
pub mod definitions;
pub mod gameconfig;
pub mod input;
pub mod level;
pub mod parallax;
pub mod subworld;
pub mod tilemap;
pub mod worldtime;
