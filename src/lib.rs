pub mod agent;
pub mod models;
pub mod config;
pub mod llm;
pub mod cli;
pub mod history;
pub mod db;
pub mod repl;
pub mod error;

use agent::SqlAgent;
use cli::Args;
use log::info;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Chat Base URL: {}", args.chat_base_url.as_deref().unwrap_or("adapter default"));
    info!("Default DB Host: {}", args.db_host);
    info!("Default DB Port: {}", args.db_port);
    info!("Default DB User: {}", args.db_user);
    info!("Default DB Name: {}", args.db_database);
    info!("-------------------------");

    let mut agent = SqlAgent::new(&args)?;
    repl::run_chat(&mut agent, &args).await?;

    Ok(())
}
