//! # Render Mode Checker
//!
//! Builds every render mode of a configuration file with the built-in
//! primitives and reports the result. Set `RUST_LOG=info` to see each mode.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run -- rendermodes.json
//! ```

fn main() -> std::process::ExitCode {
    voxel_rendermodes::run()
}
