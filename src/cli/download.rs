use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    cli::{LoginArgs, auth::authenticate, spinner},
    config,
    download::Downloader,
    error, info, success,
    types::{AudioQuery, DownloadMode},
    vk::ApiClient,
    warning,
};

pub async fn download(
    args: LoginArgs,
    query: AudioQuery,
    dir: Option<PathBuf>,
    parallel: Option<usize>,
    sequential: bool,
) {
    let mode = if sequential {
        DownloadMode::Sequential
    } else {
        match parallel.map(Ok).unwrap_or_else(config::parallel_tasks) {
            Ok(n) => DownloadMode::Batched(n.max(1)),
            Err(e) => error!("{}", e),
        }
    };
    let dir = dir.unwrap_or_else(config::downloads_path);

    let session = authenticate(args).await;
    let client = match ApiClient::new(session) {
        Ok(c) => c,
        Err(e) => error!("{}", e),
    };

    let pb = spinner("Fetching audio list...");
    let result = client.audio().get(&query).await;
    pb.finish_and_clear();

    let audio = match result {
        Ok(audio) => audio,
        Err(e) => error!("Failed to fetch audio list: {}", e),
    };

    if audio.items.is_empty() {
        info!("No tracks to download.");
        return;
    }

    info!(
        "Downloading {} tracks to {}",
        audio.items.len(),
        dir.display()
    );

    let pb = ProgressBar::new(audio.items.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{bar:40.blue} {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let downloader = match Downloader::new(&dir) {
        Ok(d) => d.with_progress(pb.clone()),
        Err(e) => error!("{}", e),
    };

    let report = match downloader.run(&audio.items, mode).await {
        Ok(report) => report,
        Err(e) => {
            pb.finish_and_clear();
            error!("Cannot download tracks: {}", e)
        }
    };
    pb.finish_and_clear();

    success!(
        "{} downloaded, {} already present",
        report.downloaded(),
        report.already_present()
    );

    if report.duplicates() > 0 {
        warning!(
            "{} tracks skipped because another track has the same artist and title",
            report.duplicates()
        );
    }

    if report.failed() > 0 {
        for (item, e) in report.failures() {
            warning!("{}: {}", item.display_name(), e);
        }
        error!(
            "{} of {} tracks could not be downloaded",
            report.failed(),
            report.entries.len()
        );
    }
}
