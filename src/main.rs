//! flux - CLI entry point.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use flux_client::{
    api::{client::Endpoints, BackendClient},
    cli::{Args, Command},
    config::{validate_config, Config},
    download::{DownloadInitiator, DownloadOutcome, DownloadRequest},
    error::{exit_codes, Error, Result},
    net::{Fetch, NetworkFetch, Transport},
    output::{
        create_download_bar, create_spinner, print_banner, print_config_summary,
        print_error, print_info, print_success, print_view, print_warning,
    },
    query::QueryController,
    render::{RenderOptions, Renderer},
    view::{Container, ProgressSurface, ViewState},
    worker::{CacheManifest, CacheStorage, InMemoryCacheStorage, OfflineCacheWorker, OnDiskCacheStorage},
};

type Worker = OfflineCacheWorker<Arc<NetworkFetch>, Arc<dyn CacheStorage>>;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&e);
            match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::Network { .. } | Error::Parse { .. } | Error::Http(_) => {
                    ExitCode::from(exit_codes::NETWORK_ERROR as u8)
                }
                Error::Download(_) | Error::InvalidFilename(_) => {
                    ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8)
                }
                Error::AssetInstall { .. } | Error::CacheStorage(_) => {
                    ExitCode::from(exit_codes::CACHE_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    if !args.quiet {
        print_banner();
    }

    // Load configuration
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            args.config.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;

    let cache_location = if config.cache.in_memory {
        "in memory".to_string()
    } else {
        config.cache_directory().display().to_string()
    };
    if !args.quiet {
        print_config_summary(
            &config.backend.base_url,
            &config.download.strategy.to_string(),
            &config.download_directory().display().to_string(),
            &format!("{} ({})", config.cache.name, cache_location),
        );
    }

    let endpoints = Endpoints::new(&config.backend.base_url)?;
    let network = Arc::new(NetworkFetch::new(
        &config.backend.user_agent,
        Duration::from_secs(config.backend.timeout_seconds),
    )?);
    let worker = build_worker(&config, &endpoints, Arc::clone(&network));

    match &args.command {
        Command::InstallCache => install_cache(&worker).await,
        Command::Trending | Command::Search { .. } => {
            start_worker(&worker).await;
            let controller = QueryController::new(
                BackendClient::new(endpoints.clone(), worker),
                Renderer::new(endpoints, RenderOptions::from(&config.render)),
                Container::new("results"),
                Container::new("trending"),
            );
            show_results(&controller, &args).await
        }
        Command::Download { id, format, title } => {
            let transport: Arc<dyn Transport> = network;
            let initiator = DownloadInitiator::from_config(transport, endpoints, &config);
            let progress = ProgressSurface::new();
            progress.attach_bar(create_download_bar(id, args.quiet));

            let request = DownloadRequest {
                result_id: id.clone(),
                title: title.clone().unwrap_or_else(|| id.clone()),
                format: (*format).into(),
                progress,
            };
            download(&initiator, request).await
        }
    }
}

/// Build the offline cache worker over the configured storage.
fn build_worker(config: &Config, endpoints: &Endpoints, network: Arc<NetworkFetch>) -> Worker {
    let storage: Arc<dyn CacheStorage> = if config.cache.in_memory {
        Arc::new(InMemoryCacheStorage::new())
    } else {
        Arc::new(OnDiskCacheStorage::new(config.cache_directory()))
    };

    OfflineCacheWorker::new(
        endpoints.base().clone(),
        CacheManifest::from(&config.cache),
        network,
        storage,
    )
}

/// Activate the worker, falling back to plain network access if install fails.
async fn start_worker(worker: &Worker) {
    if let Err(e) = worker.activate_or_install().await {
        print_warning(&format!("Offline cache not installed: {}", e));
    }
}

async fn install_cache(worker: &Worker) -> Result<()> {
    print_info(&format!(
        "Installing offline cache {}",
        worker.manifest().cache_name()
    ));
    worker.install().await?;
    print_success(&format!(
        "Cached {} assets",
        worker.manifest().urls().len()
    ));

    for stale in worker.stale_caches().await? {
        tracing::debug!("Earlier cache left in place: {}", stale);
    }
    Ok(())
}

async fn show_results<F: Fetch>(controller: &QueryController<F>, args: &Args) -> Result<()> {
    let (heading, container) = match args.command.query() {
        Some(query) => {
            let spinner = (!args.quiet).then(|| create_spinner(&format!("Searching for {}", query)));
            controller.run_search(&query).await;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            (format!("Results for \"{}\"", query), controller.results())
        }
        None => {
            let spinner = (!args.quiet).then(|| create_spinner("Loading trending"));
            controller.load_trending().await;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            ("Trending".to_string(), controller.trending())
        }
    };

    let state = container.snapshot();
    print_view(&heading, &state);

    if let Some(path) = &args.html {
        write_html(path, container).await?;
    }

    match state {
        ViewState::Failed(message) => Err(Error::network(container.name(), message)),
        _ => Ok(()),
    }
}

async fn write_html(path: &Path, container: &Container) -> Result<()> {
    tokio::fs::write(path, container.to_html()).await?;
    print_info(&format!("Wrote {} markup to {}", container.name(), path.display()));
    Ok(())
}

async fn download(initiator: &DownloadInitiator, request: DownloadRequest) -> Result<()> {
    match initiator.start_download(request).await? {
        DownloadOutcome::Saved(path) => {
            print_success(&format!("Saved {}", path.display()));
            Ok(())
        }
        DownloadOutcome::HandedOff(handoff) => {
            print_info("Download handed off, waiting for it to finish");
            let path = handoff
                .await
                .map_err(|e| Error::Download(format!("Handoff task failed: {}", e)))??;
            print_success(&format!("Saved {}", path.display()));
            Ok(())
        }
        DownloadOutcome::AlreadyRunning => {
            print_warning("A download for this result is already running");
            Ok(())
        }
    }
}
