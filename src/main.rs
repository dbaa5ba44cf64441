use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use askweb::api::session::SessionStore;
use askweb::api::{AppState, create_router};
use askweb::config::Config;
use askweb::llm::ChatCompletionClient;
use askweb::pipeline::AnswerPipeline;
use askweb::search::TavilyClient;

#[derive(Parser, Debug)]
#[command(name = "askweb", about = "Web-grounded question answering server")]
struct Args {
    /// Address to bind, overrides HOST
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::from_env()?;

    // Initialize tracing subscriber (also picks up `log` records)
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_target(true)
        .init();

    let search = TavilyClient::new(
        &config.tavily_base_url,
        &config.tavily_api_key,
        config.http_timeout,
    )
    .context("Failed to build search client")?;
    let llm = ChatCompletionClient::new(
        &config.openrouter_base_url,
        &config.openrouter_api_key,
        &config.llm_model,
        config.http_timeout,
    )
    .context("Failed to build completion client")?;
    tracing::info!(model = llm.model(), "clients ready");

    let pipeline = AnswerPipeline::new(Arc::new(search), Arc::new(llm));
    let sessions = SessionStore::with_max_sessions(config.max_sessions);
    let state = Arc::new(AppState::with_sessions(pipeline, sessions));
    let app = create_router(state, &config.static_dir);

    let host = args.host.unwrap_or(config.host);
    let port = args.port.unwrap_or(config.port);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
