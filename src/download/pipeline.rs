use std::{
    collections::HashSet,
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use futures::{AsyncWriteExt, StreamExt, future::join_all};
use indicatif::ProgressBar;
use reqwest::{Client, Response, StatusCode};

use crate::{
    Res,
    error::Error,
    info,
    types::{AudioItem, DownloadMode, DownloadOutcome, DownloadReport},
    warning,
};

/// Saves audio items as `<artist> - <title>.mp3` files in one directory.
///
/// A file that already exists counts as downloaded; its content is not
/// checked. Failures of single items are recorded in the report and never
/// stop the run.
pub struct Downloader {
    client: Client,
    dir: PathBuf,
    progress: Option<ProgressBar>,
}

impl Downloader {
    pub fn new(dir: impl Into<PathBuf>) -> Res<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            dir: dir.into(),
            progress: None,
        })
    }

    /// Advances `progress` by one for every finished item.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn destination(&self, item: &AudioItem) -> PathBuf {
        self.dir.join(file_name(item))
    }

    /// Downloads `items` into the target directory, creating it if needed.
    ///
    /// In [`DownloadMode::Batched`] the items are split into batches of the
    /// given size. The downloads of one batch run concurrently on the current
    /// task and the next batch starts once all of them are done, so a single
    /// slow track holds up the following batch. [`DownloadMode::Sequential`]
    /// is a batch size of one.
    ///
    /// Two items mapping to the same file are downloaded once: the earlier
    /// item wins, the later one is reported as [`DownloadOutcome::Duplicate`].
    ///
    /// # Errors
    ///
    /// Only fails if the target directory cannot be created. Per item errors
    /// end up in the returned report.
    pub async fn run(&self, items: &[AudioItem], mode: DownloadMode) -> Res<DownloadReport> {
        async_fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Error::filesystem(&self.dir, e))?;

        let batch_size = match mode {
            DownloadMode::Sequential => 1,
            DownloadMode::Batched(n) => n.max(1),
        };

        let claimed = Mutex::new(HashSet::new());
        let mut report = DownloadReport::default();

        for batch in items.chunks(batch_size) {
            let outcomes = join_all(batch.iter().map(|item| self.download(item, &claimed))).await;
            report.entries.extend(batch.iter().cloned().zip(outcomes));
        }

        Ok(report)
    }

    async fn download(
        &self,
        item: &AudioItem,
        claimed: &Mutex<HashSet<PathBuf>>,
    ) -> DownloadOutcome {
        let path = self.destination(item);
        let outcome = self.download_to(item, path, claimed).await;

        match &outcome {
            DownloadOutcome::Downloaded { bytes, .. } => {
                self.log(|| info!("downloaded: {} ({} bytes)", item.display_name(), bytes))
            }
            DownloadOutcome::AlreadyExists(path) => {
                self.log(|| info!("already exist: {}", display_file(path)))
            }
            DownloadOutcome::Duplicate(path) => self.log(|| {
                warning!(
                    "skipped {}: {} is written by another track with the same name",
                    item.display_name(),
                    display_file(path)
                )
            }),
            DownloadOutcome::Failed(e) => {
                self.log(|| warning!("failed: {}: {}", item.display_name(), e))
            }
        }

        if let Some(pb) = &self.progress {
            pb.inc(1);
        }
        outcome
    }

    async fn download_to(
        &self,
        item: &AudioItem,
        path: PathBuf,
        claimed: &Mutex<HashSet<PathBuf>>,
    ) -> DownloadOutcome {
        // claimed before the first await so that within a batch the earlier
        // item always gets the file
        let first_claim = match claimed.lock() {
            Ok(mut set) => set.insert(path.clone()),
            Err(poisoned) => poisoned.into_inner().insert(path.clone()),
        };
        if !first_claim {
            return DownloadOutcome::Duplicate(path);
        }

        match async_fs::metadata(&path).await {
            Ok(_) => return DownloadOutcome::AlreadyExists(path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return DownloadOutcome::Failed(Error::filesystem(path, e)),
        }

        if let Some(pb) = &self.progress {
            pb.set_message(item.display_name());
        }

        match self.fetch(item, &path).await {
            Ok(bytes) => DownloadOutcome::Downloaded { path, bytes },
            Err(Error::Filesystem { source, .. })
                if source.kind() == io::ErrorKind::AlreadyExists =>
            {
                DownloadOutcome::Duplicate(path)
            }
            Err(e) => DownloadOutcome::Failed(e),
        }
    }

    async fn fetch(&self, item: &AudioItem, path: &Path) -> Res<u64> {
        let response = self.client.get(&item.url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(Error::Status {
                url: item.url.clone(),
                status: response.status(),
            });
        }

        // create_new: never write into a file someone else has created since
        // the existence check
        let mut file = async_fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map_err(|e| Error::filesystem(path, e))?;

        match write_body(response, &mut file, path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                drop(file);
                if let Err(rm) = async_fs::remove_file(path).await {
                    self.log(|| {
                        warning!("cannot remove partial file {}: {}", path.display(), rm)
                    });
                }
                Err(e)
            }
        }
    }

    fn log(&self, f: impl FnOnce()) {
        match &self.progress {
            Some(pb) => pb.suspend(f),
            None => f(),
        }
    }
}

async fn write_body(response: Response, file: &mut async_fs::File, path: &Path) -> Res<u64> {
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(|e| Error::filesystem(path, e))?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(|e| Error::filesystem(path, e))?;
    Ok(written)
}

/// File name a track is saved under: `"{artist} - {title}.mp3"`.
///
/// Path separators and NUL bytes are replaced by `_` so that track metadata
/// cannot point outside the download directory.
pub fn file_name(item: &AudioItem) -> String {
    format!("{} - {}.mp3", item.artist, item.title)
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect()
}

fn display_file(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
