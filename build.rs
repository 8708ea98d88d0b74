//! Build script for vkdl.
//!
//! Copies the `.env.example` configuration template into the user's local
//! data directory (`<data_local_dir>/vkdl/`), next to the `.env` file that
//! `config::load_env` reads at runtime.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` from the crate root to `<data_local_dir>/vkdl/`.
///
/// A missing template only produces a cargo warning. Failing to create the
/// target directory or to write the copy fails the build.
///
/// Target locations:
/// - Linux: `~/.local/share/vkdl/.env.example`
/// - macOS: `~/Library/Application Support/vkdl/.env.example`
/// - Windows: `%LOCALAPPDATA%/vkdl/.env.example`
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let template = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("vkdl");
    fs::create_dir_all(&out_dir)?;

    if template.is_file() {
        fs::copy(&template, out_dir.join(".env.example"))?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            template.display()
        );
    }

    Ok(())
}
