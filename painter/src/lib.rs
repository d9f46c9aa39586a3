// This file makes `painter` into a rust library crate, so that other hosts
// can drive the painting core through the `host` traits.

// The file `main.rs` still exists to make `painter` into an executable.

pub mod accumulate;
pub mod color_map;
pub mod export_obj;
pub mod flood;
pub mod host;
pub mod import_obj;
pub mod mesh;
pub mod misc;
pub mod paint;
pub mod progress;
pub mod ramp;
pub mod request;
pub mod scan;
pub mod scene_file;
pub mod snapshot;
pub mod software;
pub mod visibility;

#[cfg(test)]
mod test_util;

pub use base;
