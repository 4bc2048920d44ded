//! Download initiation and per-result click bindings.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::api::client::Endpoints;
use crate::api::MediaFormat;
use crate::config::{Config, TransferStrategy};
use crate::download::navigational::{receive_handoff, SyntheticProgress};
use crate::download::task::{DownloadTask, TaskArena, TaskGuard};
use crate::download::tracked::save_transfer;
use crate::error::{Error, Result};
use crate::fs::media_filename;
use crate::net::Transport;
use crate::view::{ProgressSurface, ResultBlock};

/// What the user clicked.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub result_id: String,
    /// Raw title, used for the saved file name.
    pub title: String,
    pub format: MediaFormat,
    /// The indicator of the result the control belongs to.
    pub progress: ProgressSurface,
}

impl DownloadRequest {
    pub fn for_block(block: &ResultBlock, format: MediaFormat) -> Self {
        Self {
            result_id: block.id.clone(),
            title: block.title.clone(),
            format,
            progress: block.progress.clone(),
        }
    }
}

/// How a started download ended, from the initiator's point of view.
#[derive(Debug)]
pub enum DownloadOutcome {
    /// Tracked transfer finished and the file was saved.
    Saved(PathBuf),
    /// Navigational transfer handed off; the handle resolves when the
    /// receiving side has written the file.
    HandedOff(JoinHandle<Result<PathBuf>>),
    /// The result already had a download running; nothing was started.
    AlreadyRunning,
}

struct Inner {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
    strategy: TransferStrategy,
    directory: PathBuf,
    synthetic: SyntheticProgress,
    handoff_timeout: Duration,
    arena: Arc<TaskArena>,
}

/// Starts downloads and reports their progress on the result's own indicator.
#[derive(Clone)]
pub struct DownloadInitiator {
    inner: Arc<Inner>,
}

impl DownloadInitiator {
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoints: Endpoints,
        strategy: TransferStrategy,
        directory: PathBuf,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                endpoints,
                strategy,
                directory,
                synthetic: SyntheticProgress::default(),
                handoff_timeout: Duration::from_secs(60),
                arena: Arc::new(TaskArena::new()),
            }),
        }
    }

    /// Build an initiator from configuration.
    pub fn from_config(
        transport: Arc<dyn Transport>,
        endpoints: Endpoints,
        config: &Config,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                endpoints,
                strategy: config.download.strategy,
                directory: config.download_directory(),
                synthetic: SyntheticProgress::from(&config.download),
                handoff_timeout: Duration::from_secs(config.download.handoff_timeout_seconds),
                arena: Arc::new(TaskArena::new()),
            }),
        }
    }

    pub fn strategy(&self) -> TransferStrategy {
        self.inner.strategy
    }

    pub fn directory(&self) -> &Path {
        &self.inner.directory
    }

    pub fn arena(&self) -> &TaskArena {
        &self.inner.arena
    }

    /// Start a download for one result.
    ///
    /// The indicator is reset and shown for the duration of the transfer and
    /// hidden afterwards. A failed transfer or handoff leaves it stalled.
    pub async fn start_download(&self, request: DownloadRequest) -> Result<DownloadOutcome> {
        let task = DownloadTask {
            task_id: Uuid::new_v4(),
            result_id: request.result_id.clone(),
            title: request.title.clone(),
            format: request.format,
            progress: request.progress.clone(),
            started_at: Utc::now(),
        };

        let Some(guard) = TaskGuard::register(&self.inner.arena, task) else {
            tracing::debug!("Download already running for {}", request.result_id);
            return Ok(DownloadOutcome::AlreadyRunning);
        };

        let url = self.inner.endpoints.download(&request.result_id, request.format)?;
        tracing::info!(
            "Starting {} download of {} ({})",
            self.inner.strategy,
            request.result_id,
            request.format
        );

        guard.task().progress.start();

        match self.inner.strategy {
            TransferStrategy::Tracked => self.tracked(&request, &url).await,
            TransferStrategy::Navigational => self.navigational(&request, url, guard).await,
        }
    }

    async fn tracked(&self, request: &DownloadRequest, url: &url::Url) -> Result<DownloadOutcome> {
        let filename = media_filename(&request.title, &request.result_id, request.format);

        let result = async {
            let transfer = self.inner.transport.open(url).await?;
            save_transfer(transfer, &self.inner.directory, &filename, &request.progress).await
        }
        .await;

        match result {
            Ok(path) => {
                request.progress.hide();
                tracing::info!("Downloaded: {}", path.display());
                Ok(DownloadOutcome::Saved(path))
            }
            Err(e) => {
                request.progress.stall();
                tracing::warn!("Download of {} failed: {}", request.result_id, e);
                Err(match e {
                    Error::Download(_) => e,
                    other => Error::Download(other.to_string()),
                })
            }
        }
    }

    /// The task stays registered until both the ticker and the handoff are
    /// done, so a late handoff failure can only stall its own task.
    async fn navigational(
        &self,
        request: &DownloadRequest,
        url: url::Url,
        guard: TaskGuard,
    ) -> Result<DownloadOutcome> {
        let guard = Arc::new(guard);
        let handoff_guard = Arc::clone(&guard);
        let transport = Arc::clone(&self.inner.transport);
        let directory = self.inner.directory.clone();
        let fallback = format!("{}.{}", request.result_id, request.format.extension());
        let timeout = self.inner.handoff_timeout;
        let progress = request.progress.clone();
        let result_id = request.result_id.clone();

        let handoff = tokio::spawn(async move {
            let _guard = handoff_guard;
            let outcome = async {
                let transfer = tokio::time::timeout(timeout, transport.open(&url))
                    .await
                    .map_err(|_| {
                        Error::Download(format!(
                            "Server did not start the download within {}s",
                            timeout.as_secs()
                        ))
                    })??;
                receive_handoff(transfer, &directory, &fallback).await
            }
            .await
            .map_err(|e| match e {
                Error::Download(_) => e,
                other => Error::Download(other.to_string()),
            });

            match &outcome {
                Ok(path) => tracing::info!("Downloaded: {}", path.display()),
                Err(e) => {
                    progress.stall();
                    tracing::warn!("Handoff for {} failed: {}", result_id, e);
                }
            }
            outcome
        });

        self.inner.synthetic.run(&request.progress).await;
        drop(guard);
        Ok(DownloadOutcome::HandedOff(handoff))
    }

    /// Bind the download controls of one block.
    ///
    /// Each handler captures only that block's id, title and indicator.
    pub fn bind(&self, block: &ResultBlock) -> Vec<BoundControl> {
        block
            .download_formats()
            .into_iter()
            .map(|format| {
                let initiator = self.clone();
                let request = DownloadRequest::for_block(block, format);
                BoundControl {
                    result_id: block.id.clone(),
                    format,
                    on_click: Box::new(move || {
                        let initiator = initiator.clone();
                        let request = request.clone();
                        tokio::spawn(async move {
                            if let Err(e) = initiator.start_download(request).await {
                                tracing::warn!("{}", e);
                            }
                        })
                    }),
                }
            })
            .collect()
    }
}

/// A download control with its click handler attached.
pub struct BoundControl {
    pub result_id: String,
    pub format: MediaFormat,
    on_click: Box<dyn Fn() -> JoinHandle<()> + Send + Sync>,
}

impl BoundControl {
    /// Fire the handler. Must be called from within a tokio runtime.
    pub fn click(&self) -> JoinHandle<()> {
        (self.on_click)()
    }
}

impl std::fmt::Debug for BoundControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundControl")
            .field("result_id", &self.result_id)
            .field("format", &self.format)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::Transfer;
    use crate::view::ProgressStatus;
    use async_trait::async_trait;
    use futures::stream;
    use futures::StreamExt;
    use std::sync::Mutex;
    use url::Url;

    /// Serves fixed bodies, optionally failing mid-stream.
    struct FakeTransport {
        body: Vec<Vec<u8>>,
        fail_after: Option<usize>,
        disposition: Option<String>,
        /// Time before the server answers at all.
        open_delay: Option<Duration>,
        refuse: bool,
        opened: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        fn new(body: Vec<Vec<u8>>) -> Self {
            Self {
                body,
                fail_after: None,
                disposition: None,
                open_delay: None,
                refuse: false,
                opened: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn open(&self, url: &Url) -> Result<Transfer> {
            self.opened.lock().unwrap().push(url.to_string());
            if let Some(delay) = self.open_delay {
                tokio::time::sleep(delay).await;
            }
            if self.refuse {
                return Err(Error::network(url, "connection refused"));
            }
            let total = self.body.iter().map(|c| c.len() as u64).sum();
            let mut chunks: Vec<Result<Vec<u8>>> = self.body.iter().cloned().map(Ok).collect();
            if let Some(n) = self.fail_after {
                chunks.truncate(n);
                chunks.push(Err(Error::Download("connection reset".into())));
            }
            Ok(Transfer {
                total: Some(total),
                content_disposition: self.disposition.clone(),
                body: stream::iter(chunks).boxed(),
            })
        }
    }

    fn block(id: &str, title: &str) -> ResultBlock {
        use crate::render::{RenderOptions, Renderer};
        let renderer = Renderer::new(
            Endpoints::new("http://localhost:5000").unwrap(),
            RenderOptions::default(),
        );
        renderer
            .block(&crate::api::SearchResult {
                id: id.to_string(),
                title: title.to_string(),
                author: "DJ".to_string(),
                thumbnail: None,
                duration: Some(245),
            })
            .unwrap()
    }

    fn initiator(
        transport: Arc<FakeTransport>,
        strategy: TransferStrategy,
        dir: &Path,
    ) -> DownloadInitiator {
        DownloadInitiator::new(
            transport,
            Endpoints::new("http://localhost:5000").unwrap(),
            strategy,
            dir.to_path_buf(),
        )
    }

    #[tokio::test]
    async fn test_tracked_download_saves_titled_file() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(FakeTransport::new(vec![vec![1; 64], vec![2; 64]]));
        let initiator = initiator(transport.clone(), TransferStrategy::Tracked, dir.path());
        let block = block("a1", "Amapiano Mix");

        let outcome = initiator
            .start_download(DownloadRequest::for_block(&block, MediaFormat::Mp3))
            .await
            .unwrap();

        match outcome {
            DownloadOutcome::Saved(path) => {
                assert_eq!(path, dir.path().join("Amapiano Mix.mp3"));
                assert_eq!(std::fs::read(path).unwrap().len(), 128);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(
            *transport.opened.lock().unwrap(),
            vec!["http://localhost:5000/download?id=a1&format=mp3".to_string()]
        );
        assert!(!block.progress.snapshot().visible);
        assert!(initiator.arena().is_empty());
    }

    #[tokio::test]
    async fn test_tracked_failure_stalls_progress() {
        let dir = tempfile::tempdir().unwrap();
        let mut transport = FakeTransport::new(vec![vec![1; 50], vec![2; 50]]);
        transport.fail_after = Some(1);
        let initiator = initiator(Arc::new(transport), TransferStrategy::Tracked, dir.path());
        let block = block("a1", "Mix");

        let err = initiator
            .start_download(DownloadRequest::for_block(&block, MediaFormat::Mp4))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Download(_)));
        let snapshot = block.progress.snapshot();
        assert!(snapshot.visible);
        assert_eq!(snapshot.status, ProgressStatus::Stalled);
        assert_eq!(snapshot.value, 50);
        assert!(!dir.path().join("Mix.mp4").exists());
        assert!(initiator.arena().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_downloads_use_separate_indicators() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(FakeTransport::new(vec![vec![0; 10]]));
        let initiator = initiator(transport, TransferStrategy::Tracked, dir.path());
        let first = block("a", "First");
        let second = block("b", "Second");

        let failing = {
            let mut t = FakeTransport::new(vec![vec![0; 10], vec![0; 10]]);
            t.fail_after = Some(1);
            self::initiator(Arc::new(t), TransferStrategy::Tracked, dir.path())
        };

        let (ok, err) = tokio::join!(
            initiator.start_download(DownloadRequest::for_block(&first, MediaFormat::Mp3)),
            failing.start_download(DownloadRequest::for_block(&second, MediaFormat::Mp3)),
        );

        assert!(ok.is_ok());
        assert!(err.is_err());
        assert!(!first.progress.snapshot().visible);
        assert_eq!(second.progress.snapshot().status, ProgressStatus::Stalled);
    }

    #[tokio::test]
    async fn test_second_click_while_running_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(FakeTransport::new(vec![vec![0; 10]]));
        let initiator = initiator(transport, TransferStrategy::Tracked, dir.path());
        let block = block("a", "Mix");

        let task = DownloadTask {
            task_id: Uuid::new_v4(),
            result_id: "a".to_string(),
            title: "A".to_string(),
            format: MediaFormat::Mp3,
            progress: block.progress.clone(),
            started_at: Utc::now(),
        };
        assert!(initiator.arena().try_register(task));

        let outcome = initiator
            .start_download(DownloadRequest::for_block(&block, MediaFormat::Mp4))
            .await
            .unwrap();
        assert!(matches!(outcome, DownloadOutcome::AlreadyRunning));
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigational_download_hands_off_and_hides() {
        let dir = tempfile::tempdir().unwrap();
        let mut transport = FakeTransport::new(vec![b"mp3 bytes".to_vec()]);
        transport.disposition = Some(r#"attachment; filename="a1.mp3""#.to_string());
        let initiator = initiator(Arc::new(transport), TransferStrategy::Navigational, dir.path());
        let block = block("a1", "Mix");

        let outcome = initiator
            .start_download(DownloadRequest::for_block(&block, MediaFormat::Mp3))
            .await
            .unwrap();

        assert!(!block.progress.snapshot().visible);
        match outcome {
            DownloadOutcome::HandedOff(handle) => {
                let path = handle.await.unwrap().unwrap();
                assert_eq!(path, dir.path().join("a1.mp3"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_handoff_timeout_stalls_indicator() {
        let dir = tempfile::tempdir().unwrap();
        let mut transport = FakeTransport::new(vec![b"late".to_vec()]);
        transport.open_delay = Some(Duration::from_secs(120));
        let initiator = initiator(Arc::new(transport), TransferStrategy::Navigational, dir.path());
        let block = block("a1", "Mix");

        let outcome = initiator
            .start_download(DownloadRequest::for_block(&block, MediaFormat::Mp3))
            .await
            .unwrap();
        let DownloadOutcome::HandedOff(handle) = outcome else {
            panic!("expected a handoff");
        };

        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err, Error::Download(_)));
        let snapshot = block.progress.snapshot();
        assert!(snapshot.visible);
        assert_eq!(snapshot.status, ProgressStatus::Stalled);
        assert!(initiator.arena().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refused_handoff_stops_synthetic_progress() {
        let dir = tempfile::tempdir().unwrap();
        let mut transport = FakeTransport::new(vec![]);
        transport.refuse = true;
        let initiator = initiator(Arc::new(transport), TransferStrategy::Navigational, dir.path());
        let block = block("a1", "Mix");

        let outcome = initiator
            .start_download(DownloadRequest::for_block(&block, MediaFormat::Mp3))
            .await
            .unwrap();

        let snapshot = block.progress.snapshot();
        assert!(snapshot.visible);
        assert_eq!(snapshot.status, ProgressStatus::Stalled);
        assert_eq!(snapshot.value, 0);

        let DownloadOutcome::HandedOff(handle) = outcome else {
            panic!("expected a handoff");
        };
        assert!(matches!(handle.await.unwrap(), Err(Error::Download(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_stays_busy_until_handoff_ends() {
        let dir = tempfile::tempdir().unwrap();
        let mut transport = FakeTransport::new(vec![]);
        transport.open_delay = Some(Duration::from_secs(6));
        transport.refuse = true;
        let initiator = initiator(Arc::new(transport), TransferStrategy::Navigational, dir.path());
        let block = block("a1", "Mix");

        let mp3 = initiator
            .start_download(DownloadRequest::for_block(&block, MediaFormat::Mp3))
            .await
            .unwrap();
        // Ticker has settled and hidden the bar; the handoff is still waiting.
        assert!(!block.progress.snapshot().visible);
        assert!(initiator.arena().is_active("a1"));

        let mp4 = initiator
            .start_download(DownloadRequest::for_block(&block, MediaFormat::Mp4))
            .await
            .unwrap();
        assert!(matches!(mp4, DownloadOutcome::AlreadyRunning));

        let DownloadOutcome::HandedOff(handle) = mp3 else {
            panic!("expected a handoff");
        };
        assert!(handle.await.unwrap().is_err());
        assert_eq!(block.progress.snapshot().status, ProgressStatus::Stalled);
        assert!(initiator.arena().is_empty());
    }

    #[tokio::test]
    async fn test_same_title_downloads_get_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(FakeTransport::new(vec![vec![1; 32], vec![2; 32]]));
        let initiator = initiator(transport, TransferStrategy::Tracked, dir.path());
        let first = block("a", "Amapiano Mix");
        let second = block("b", "Amapiano Mix");

        let (a, b) = tokio::join!(
            initiator.start_download(DownloadRequest::for_block(&first, MediaFormat::Mp3)),
            initiator.start_download(DownloadRequest::for_block(&second, MediaFormat::Mp3)),
        );

        let (DownloadOutcome::Saved(a), DownloadOutcome::Saved(b)) = (a.unwrap(), b.unwrap()) else {
            panic!("expected both downloads to be saved");
        };
        assert_ne!(a, b);
        assert_eq!(std::fs::read(&a).unwrap().len(), 64);
        assert_eq!(std::fs::read(&b).unwrap().len(), 64);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_bind_exposes_mp3_and_mp4() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(FakeTransport::new(vec![vec![0; 8]]));
        let initiator = initiator(transport.clone(), TransferStrategy::Tracked, dir.path());
        let block = block("a1", "Mix");

        let controls = initiator.bind(&block);
        let formats: Vec<_> = controls.iter().map(|c| c.format).collect();
        assert_eq!(formats, vec![MediaFormat::Mp3, MediaFormat::Mp4]);

        controls[1].click().await.unwrap();
        assert!(dir.path().join("Mix.mp4").exists());
        assert_eq!(
            *transport.opened.lock().unwrap(),
            vec!["http://localhost:5000/download?id=a1&format=mp4".to_string()]
        );
    }
}
