//! Upload orchestration with a terminal progress bar

use std::io;
use std::path::Path;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncRead, ReadBuf};
use tracing::{debug, info};

use crate::error::Result;
use crate::telegram::{Dialog, ProgressFn, TelegramApi};

const BAR_TEMPLATE: &str =
    "{spinner:.green} {msg:.bold.blue} [{bar:40.green/white}] {percent:>3}% {bytes}/{total_bytes} {bytes_per_sec}";

/// Bytes transferred so far out of the total. Never moves backwards.
#[derive(Debug, Default)]
pub struct TransferProgress {
    transferred: AtomicU64,
    total: AtomicU64,
}

impl TransferProgress {
    pub fn new(total: u64) -> Self {
        Self {
            transferred: AtomicU64::new(0),
            total: AtomicU64::new(total),
        }
    }

    /// Record a progress report and return the (monotonic) transferred count.
    pub fn update(&self, done: u64, total: u64) -> u64 {
        self.total.fetch_max(total, Ordering::Relaxed);
        let previous = self.transferred.fetch_max(done, Ordering::Relaxed);
        previous.max(done)
    }

    pub fn transferred(&self) -> u64 {
        self.transferred.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn is_complete(&self) -> bool {
        self.transferred() >= self.total()
    }
}

/// An [`AsyncRead`] adapter that reports cumulative bytes read.
pub struct ProgressReader<'a, R> {
    inner: R,
    read: u64,
    total: u64,
    on_progress: ProgressFn<'a>,
}

impl<'a, R> ProgressReader<'a, R> {
    pub fn new(inner: R, total: u64, on_progress: ProgressFn<'a>) -> Self {
        Self {
            inner,
            read: 0,
            total,
            on_progress,
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.read
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for ProgressReader<'_, R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let before = buf.filled().len();

        match Pin::new(&mut this.inner).poll_read(cx, buf) {
            Poll::Ready(Ok(())) => {
                let n = (buf.filled().len() - before) as u64;
                if n > 0 {
                    this.read += n;
                    (this.on_progress)(this.read, this.total);
                }
                Poll::Ready(Ok(()))
            }
            other => other,
        }
    }
}

fn upload_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar.set_message("Uploading");
    bar
}

/// Send `path` to `target`, passing each monotonic byte position to `show`.
///
/// Returns the bytes transferred according to the last report.
pub async fn upload(
    api: &dyn TelegramApi,
    target: &Dialog,
    path: &Path,
    size: u64,
    show: &(dyn Fn(u64) + Send + Sync),
) -> Result<u64> {
    let progress = TransferProgress::new(size);
    let on_progress = |done: u64, total: u64| show(progress.update(done, total));

    debug!(target_id = target.id, size, "starting upload");
    api.send_file(target, path, &on_progress).await?;
    Ok(progress.transferred())
}

/// Send `path` to `target`, drawing a progress bar while the upload runs.
pub async fn send_with_progress(
    api: &dyn TelegramApi,
    target: &Dialog,
    path: &Path,
) -> Result<()> {
    let size = tokio::fs::metadata(path).await?.len();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    println!(
        "\n{} {} {}\n",
        "Sending".bold(),
        name.as_str().cyan(),
        format!("({:.2} MB)", size as f64 / 1024.0 / 1024.0).dark_grey()
    );

    let bar = upload_bar(size);
    match upload(api, target, path, size, &|position: u64| bar.set_position(position)).await {
        Ok(transferred) => {
            bar.finish();
            info!(target_id = target.id, bytes = transferred, "upload finished");
            println!("\n{} File sent successfully!", "✓".green().bold());
            Ok(())
        }
        Err(err) => {
            bar.abandon();
            Err(err)
        }
    }
}
