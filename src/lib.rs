//! VK Audio Downloader Library
//!
//! This library downloads a user's VK audio tracks to local MP3 files. It logs
//! in through VK's mobile login form, lists tracks through the VK method API
//! and streams every track that is not yet on disk into a download directory.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `download` - Download pipeline writing tracks to disk
//! - `error` - Error types shared by all stages
//! - `types` - Data structures and type definitions
//! - `vk` - VK login flow and API client
//!
//! # Example
//!
//! ```
//! use vkdl::{config, download::Downloader, types::*, vk::*};
//!
//! #[tokio::main]
//! async fn main() -> vkdl::Res<()> {
//!     config::load_env().await?;
//!     let credentials = Credentials::new(config::vk_login()?, config::vk_password()?);
//!     let session = Authenticator::new(AuthConfig::from_env())?
//!         .authorize(&credentials)
//!         .await?;
//!     let tracks = ApiClient::new(session)?.audio().get(&AudioQuery::default()).await?;
//!     let report = Downloader::new(config::downloads_path())?
//!         .run(&tracks.items, DownloadMode::Batched(10))
//!         .await?;
//!     println!("{} downloaded", report.downloaded());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod types;
pub mod vk;

/// A convenient Result type alias for operations that may fail.
///
/// All fallible operations of the library return [`error::Error`], so callers
/// can match on the stage that failed.
///
/// # Example
///
/// ```
/// use vkdl::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, error::Error>;

/// Prints a progress line prefixed with a blue "o".
///
/// Used for the steps of a run: logging in, fetching the audio list, tracks
/// already on disk. Takes `println!` arguments.
///
/// # Example
///
/// ```
/// info!("Logging in as {}", login);
/// info!("Found {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a line prefixed with a green "✓" for a finished login or a saved
/// track. Takes `println!` arguments.
///
/// # Example
///
/// ```
/// success!("Logged in as user {}", user_id);
/// success!("Downloaded {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Reserved for errors that end a run: a failed login, an API error while
/// listing, an unusable download directory. Per-track download failures go
/// through [`warning!`] instead so the remaining tracks still get fetched.
/// Exits with code 1.
///
/// # Example
///
/// ```
/// error!("Cannot load environment. Err: {}", e);
/// error!("Failed to fetch audio list: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Reports a track that failed or was skipped as a duplicate; the run goes
/// on. Takes `println!` arguments.
///
/// # Example
///
/// ```
/// warning!("failed: {}: {}", track, e);
/// warning!("{} tracks could not be downloaded", failed);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
