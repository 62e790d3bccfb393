mod app;
mod config;
mod conversation;
mod error;
mod event;
mod query;
mod server;
mod session;
mod state;
mod theme;
mod ui;
mod upload;

use anyhow::{anyhow, Context, Result};
use app::ChatApp;
use clap::Parser;
use config::{Cli, ClientConfig, Commands, ServerConfig};
use eframe::egui;
use query::HttpQueryService;
use session::store::SessionStore;
use state::ChatState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "sqlchat=debug" } else { "sqlchat=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn serve(host: String, port: u16) -> Result<()> {
    let config = ServerConfig::new(host, port)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("sqlchat-server")
        .build()
        .context("failed to start tokio runtime")?;
    runtime.block_on(server::run_server(config))
}

fn chat(api_url: String, request_timeout_secs: Option<u64>) -> Result<()> {
    let config = ClientConfig::new(api_url, request_timeout_secs)?;
    let service = HttpQueryService::new(&config).context("failed to build HTTP client")?;
    tracing::info!(endpoint = service.endpoint(), "starting chat front end");

    let app = ChatApp::new(ChatState::new(SessionStore::new(), service));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([960.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "sqlchat",
        native_options,
        Box::new(move |_creation_context| Ok(Box::new(app))),
    )
    .map_err(|err| anyhow!("chat window failed: {err}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve { host, port } => serve(host, port),
        Commands::Chat {
            api_url,
            request_timeout_secs,
        } => chat(api_url, request_timeout_secs),
    }
}
