use std::path::PathBuf;

use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use vkdl::{
    cli::{self, LoginArgs},
    config, error,
    types::AudioQuery,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// VK login (e-mail or phone), overrides VK_LOGIN
    #[clap(long, global = true)]
    login: Option<String>,

    /// VK password, overrides VK_PASSWORD
    #[clap(long, global = true)]
    password: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in to VK and show the access token lifetime
    Auth,

    /// List audio tracks
    List(ListOptions),

    /// Download audio tracks that are not on disk yet
    Download(DownloadOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Args, Debug, Clone)]
pub struct QueryOptions {
    /// Owner of the tracks (defaults to the logged-in user)
    #[clap(long)]
    owner_id: Option<String>,

    /// Number of tracks to fetch
    #[clap(long)]
    count: Option<u32>,

    /// Number of tracks to skip
    #[clap(long)]
    offset: Option<u32>,
}

impl From<QueryOptions> for AudioQuery {
    fn from(opt: QueryOptions) -> Self {
        AudioQuery {
            owner_id: opt.owner_id,
            count: opt.count,
            offset: opt.offset,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct ListOptions {
    #[clap(flatten)]
    query: QueryOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct DownloadOptions {
    #[clap(flatten)]
    query: QueryOptions,

    /// Target directory (defaults to VK_DOWNLOADS_PATH)
    #[clap(long)]
    dir: Option<PathBuf>,

    /// Number of downloads per batch (defaults to VK_PARALLEL_TASKS or 10)
    #[clap(long, conflicts_with = "sequential")]
    parallel: Option<usize>,

    /// Download one track at a time
    #[clap(long)]
    sequential: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();
    let login = LoginArgs {
        login: cli.login,
        password: cli.password,
    };

    match cli.command {
        Command::Auth => cli::auth(login).await,
        Command::List(opt) => cli::list(login, opt.query.into()).await,
        Command::Download(opt) => {
            cli::download(
                login,
                opt.query.into(),
                opt.dir,
                opt.parallel,
                opt.sequential,
            )
            .await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
