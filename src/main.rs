//! # Voxel Sandbox Entry Point
//!
//! Runs the headless demo. An optional first argument names a JSON config file.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- config.json
//! ```

fn main() {
    std::process::exit(voxel_sandbox::run(std::env::args().nth(1)));
}
