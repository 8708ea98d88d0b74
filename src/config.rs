//! Configuration management for vkdl.
//!
//! Configuration values come from environment variables, optionally loaded
//! from a `.env` file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)
//!
//! Credentials have no default; everything else falls back to the VK
//! production endpoints and the values the downloader has always used.

use std::{env, path::PathBuf};

use crate::{Res, error::Error};

pub const DEFAULT_CLIENT_ID: &str = "4732457";
pub const DEFAULT_OAUTH_URL: &str = "https://oauth.vk.com/authorize";
pub const OAUTH_REDIRECT_URI: &str = "https://oauth.vk.com/blank.html";
pub const OAUTH_API_VERSION: &str = "5.28";
pub const DEFAULT_API_URL: &str = "https://api.vk.com/method/";
pub const API_VERSION: &str = "5.29";
pub const DEFAULT_PARALLEL_TASKS: usize = 10;

/// Loads environment variables from `<data_local_dir>/vkdl/.env`.
///
/// Creates the `vkdl` data directory if it doesn't exist. A missing `.env`
/// file is not an error: the variables may already be set in the
/// environment.
///
/// The file is looked up in:
/// - Linux: `~/.local/share/vkdl/.env`
/// - macOS: `~/Library/Application Support/vkdl/.env`
/// - Windows: `%LOCALAPPDATA%/vkdl/.env`
pub async fn load_env() -> Res<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::filesystem(parent, e))?;
    }

    if path.is_file() {
        dotenv::from_path(&path)
            .map_err(|e| Error::Config(format!("cannot load {}: {}", path.display(), e)))?;
    }
    Ok(())
}

/// Returns the VK login (e-mail or phone) from `VK_LOGIN`.
pub fn vk_login() -> Res<String> {
    required("VK_LOGIN")
}

/// Returns the VK password from `VK_PASSWORD`.
pub fn vk_password() -> Res<String> {
    required("VK_PASSWORD")
}

/// Application id sent to the authorization endpoint.
pub fn vk_client_id() -> String {
    env::var("VK_CLIENT_ID").unwrap_or_else(|_| DEFAULT_CLIENT_ID.to_string())
}

/// Authorization page URL, e.g. `https://oauth.vk.com/authorize`.
pub fn vk_oauth_url() -> String {
    env::var("VK_OAUTH_URL").unwrap_or_else(|_| DEFAULT_OAUTH_URL.to_string())
}

/// Base URL method names are joined onto, e.g. `https://api.vk.com/method/`.
pub fn vk_api_url() -> String {
    env::var("VK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Directory tracks are saved to.
///
/// Uses `VK_DOWNLOADS_PATH` when set, otherwise `<download_dir>/vkdl`, and
/// `./downloads` on systems without a download directory.
pub fn downloads_path() -> PathBuf {
    if let Ok(path) = env::var("VK_DOWNLOADS_PATH") {
        return PathBuf::from(path);
    }

    match dirs::download_dir() {
        Some(mut path) => {
            path.push("vkdl");
            path
        }
        None => PathBuf::from("downloads"),
    }
}

/// Number of downloads run concurrently in one batch.
pub fn parallel_tasks() -> Res<usize> {
    match env::var("VK_PARALLEL_TASKS") {
        Ok(value) => match value.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(Error::Config(format!(
                "VK_PARALLEL_TASKS must be a positive integer, got {:?}",
                value
            ))),
        },
        Err(_) => Ok(DEFAULT_PARALLEL_TASKS),
    }
}

fn required(name: &str) -> Res<String> {
    env::var(name).map_err(|_| Error::Config(format!("{} must be set", name)))
}

fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("vkdl");
    path
}
