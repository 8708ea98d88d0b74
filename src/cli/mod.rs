//! # CLI Module
//!
//! User-facing commands of vkdl. Each command resolves its configuration,
//! drives the library (login, listing, download) and turns the results into
//! console output:
//!
//! - [`auth`] - log in and show the session the login produced
//! - [`list`] - show the tracks of an account as a table
//! - [`download`] - download every track that is not yet on disk
//!
//! Fatal problems (missing credentials, failed login, failed listing) are
//! printed with `error!`, which exits the process with status 1. Problems
//! with single tracks are printed with `warning!` and summarized at the end.
//!
//! ```bash
//! vkdl auth                         # check that the credentials work
//! vkdl list --count 20              # show the 20 most recent tracks
//! vkdl download --parallel 5        # download in batches of five
//! vkdl download --sequential --dir ~/Music/vk
//! ```

mod auth;
mod download;
mod list;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub use auth::auth;
pub use download::download;
pub use list::list;

/// Login overrides given on the command line; unset values fall back to
/// `VK_LOGIN` / `VK_PASSWORD`.
#[derive(Debug, Clone, Default)]
pub struct LoginArgs {
    pub login: Option<String>,
    pub password: Option<String>,
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
