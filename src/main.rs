use clap::{Parser, Subcommand};
use std::sync::Arc;

use toolrelay::api::{ToolRegistry, create_router};
use toolrelay::api::models::SearchToolInput;
use toolrelay::config::CONFIG;
use toolrelay::db::Database;

#[derive(Parser)]
#[command(version, about = "Routes web search and pdf tool requests to upstream APIs")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP tool endpoint (default)
    Serve {
        /// Address to listen on, overrides BIND_ADDR
        #[arg(long)]
        bind: Option<String>,
    },
    /// Run one web search and print the result
    Search {
        query: String,
        /// Search news instead of the web
        #[arg(long)]
        news: bool,
        /// Number of results to fetch, clamped to 1..=20
        #[arg(long)]
        count: Option<i64>,
        /// quick or deep
        #[arg(long)]
        mode: Option<String>,
        /// Generation model id
        #[arg(long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config = &*CONFIG;

    match cli.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => {
            let db = Database::from_config(config).await?;
            let tools = Arc::new(ToolRegistry::from_config(config, db.as_ref()));
            let app = create_router(tools);

            let addr = bind.unwrap_or_else(|| config.bind_addr.clone());
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("listening on {}", addr);
            axum::serve(listener, app).await?;
        }
        Command::Search {
            query,
            news,
            count,
            mode,
            model,
        } => {
            let tools = ToolRegistry::from_config(config, None);
            let input = SearchToolInput {
                query,
                search_type: news.then(|| "news".to_string()),
                result_count: count.map(serde_json::Number::from),
                mode,
                model_id: model,
            };
            let request = input.into_request(tools.default_result_count(), tools.search_model())?;
            let outcome = tools.search()?.run(&request).await?;
            println!("{}", outcome.into_text());
        }
    }
    Ok(())
}
