use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;

mod config;
mod data;
mod handler;
mod http;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    // The dataset loads before the listener binds, so no request can race
    // the load. A failed load is not fatal: the server starts degraded and
    // the feed endpoints answer 500 until the next restart.
    let dataset = match data::load_dataset(&cfg.data.csv_path) {
        Ok(dataset) => {
            logger::log_dataset_loaded(dataset.len(), &cfg.data.csv_path);
            Some(dataset)
        }
        Err(err) => {
            logger::log_dataset_unavailable(&cfg.data.csv_path, &err);
            None
        }
    };

    let feed = data::DataService::new(dataset, &cfg.data);
    let state = Arc::new(config::AppState::new(cfg, feed));

    let listener = server::create_listener(addr)?;
    logger::log_server_start(&addr, &state.config);

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    run_server(listener, state, signals).await
}

/// Accept loop: serve connections until a shutdown signal arrives.
async fn run_server(
    listener: TcpListener,
    state: Arc<config::AppState>,
    signals: Arc<server::SignalHandler>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        server::accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = signals.shutdown.notified() => {
                logger::log_shutdown();
                return Ok(());
            }
        }
    }
}
