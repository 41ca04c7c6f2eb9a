#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Render Modes
//!
//! Composable per-voxel rendering logic for tile renderers that turn a voxel
//! world into 2D images.
//!
//! A *render mode* is an ordered list of *render primitives*. Each primitive is
//! an independently written piece of logic that can veto drawing a voxel
//! (because it is occluded, or hidden by policy) and can paint over the block
//! sprite. The tile loop asks the mode about every voxel and the mode fans the
//! question out to its primitives.
//!
//! ## Key Modules
//!
//! * `core` - Shared resource containers
//! * `render_state` - The render context shared by all primitives, and the block data seam
//! * `rendermodes` - Primitive kinds and registry, typed options, and the `RenderMode` itself
//! * `config` - Named render modes loaded from JSON
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Point3;
//! use image::{GrayImage, RgbaImage};
//! use voxel_rendermodes::core::StResource;
//! use voxel_rendermodes::render_state::{Block, RenderState};
//! use voxel_rendermodes::rendermodes::{PrimitiveDescriptor, PrimitiveRegistry, RenderMode};
//!
//! let state = StResource::new(RenderState::default());
//! let mut mode = RenderMode::new(
//!     &[
//!         PrimitiveDescriptor::new("buried"),
//!         PrimitiveDescriptor::new("overlay").with_option("color", (255, 0, 0)),
//!     ],
//!     &PrimitiveRegistry::builtin(),
//!     state.clone(),
//! )
//! .unwrap();
//!
//! let mut tile = RgbaImage::new(16, 16);
//! let mask = GrayImage::from_pixel(4, 4, image::Luma([255]));
//!
//! let position = Point3::new(0, 0, 0);
//! state.get_mut().move_to(position, Block::new(1, 0), (2, 2));
//! if !mode.occluded(position) && !mode.hidden(position) {
//!     mode.draw(&mut tile, &mask, &mask);
//! }
//! assert_eq!(tile.get_pixel(2, 2).0, [255, 0, 0, 255]);
//! ```

use std::process::ExitCode;

use log::{error, info};

pub mod config;
pub mod core;
pub mod render_state;
pub mod rendermodes;

use crate::config::RenderModeConfig;
use crate::core::StResource;
use crate::render_state::{BlockMap, RenderState};
use crate::rendermodes::PrimitiveRegistry;

/// Loads the render mode configuration named on the command line and builds
/// every mode in it, reporting the primitives each one is made of.
pub fn run() -> ExitCode {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let Some(path) = std::env::args().nth(1) else {
        error!("Usage: voxel-rendermodes <rendermodes.json>");
        return ExitCode::FAILURE;
    };

    let config = match RenderModeConfig::load(&path) {
        Ok(config) => config,
        Err(err) => {
            error!("Error reading {}: {}", path, err);
            return ExitCode::FAILURE;
        }
    };

    let registry = PrimitiveRegistry::builtin();
    info!("Available primitives: {}", registry.names().join(", "));

    for name in config.mode_names() {
        let state = StResource::new(RenderState::new(BlockMap::new()));
        match config.build_mode(name, &registry, state) {
            Ok(mode) => info!("Mode \"{}\": [{}]", name, mode.primitive_names().join(", ")),
            Err(err) => {
                error!("{}", err);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
