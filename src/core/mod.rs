//! # Core Module
//!
//! Resource containers shared by the rest of the crate.
//!
//! ## Key Components
//! - `StResource`: Single-threaded reference-counted resource with interior mutability.
//!   A render mode and the loop driving it each hold one to reach the same
//!   [`RenderState`](crate::render_state::RenderState).
//!
//! ## Usage
//! ```rust
//! use voxel_rendermodes::core::StResource;
//!
//! let counter = StResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//! ```

pub mod st_resource;

pub use st_resource::StResource;
