//! Terminal presentation layer: renders the transcript and forwards connect
//! actions and questions to the session, one action at a time.

use log::error;
use std::error::Error;
use std::io::{ stdin, stdout, Write };

use crate::agent::SqlAgent;
use crate::cli::Args;
use crate::db::ConnectionParams;
use crate::models::chat::{ Role, Turn };

pub async fn run_chat(
    agent: &mut SqlAgent,
    args: &Args
) -> Result<(), Box<dyn Error + Send + Sync>> {
    println!("SQL Chat");
    println!("Connect your MySQL database and chat with it!");
    print_help();
    render_transcript(agent.history().turns());

    let mut input = String::new();
    loop {
        print!("> ");
        stdout().flush()?;

        input.clear();
        if stdin().read_line(&mut input)? == 0 {
            break; // EOF
        }
        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line == "/quit" || line == "/exit" {
            break;
        }
        if line == "/help" {
            print_help();
            continue;
        }
        if line == "/history" {
            render_transcript(agent.history().turns());
            continue;
        }
        if line == "/schema" {
            match agent.table_info().await {
                Ok(schema) => println!("{}", schema),
                Err(e) => println!("Error: {}", e),
            }
            continue;
        }
        if let Some(rest) = line.strip_prefix("/connect") {
            handle_connect(agent, args, rest.trim()).await;
            continue;
        }
        if line.starts_with('/') {
            println!("Unknown command: {}", line);
            print_help();
            continue;
        }

        // Anything else is a question for the database.
        render_turn(&Turn::human(line));
        match agent.ask(line).await {
            Ok(answer) => render_turn(&Turn::ai(answer)),
            Err(e) => {
                error!("Question failed: {}", e);
                println!("Error: {}", e);
            }
        }
    }

    Ok(())
}

/// `/connect` with no arguments uses the configured defaults; with exactly
/// five arguments it overrides host, port, username, password and database.
async fn handle_connect(agent: &mut SqlAgent, args: &Args, rest: &str) {
    let fields: Vec<&str> = rest.split_whitespace().collect();
    let params = match fields.len() {
        0 =>
            ConnectionParams {
                host: args.db_host.clone(),
                port: args.db_port.clone(),
                username: args.db_user.clone(),
                password: args.db_password.clone(),
                database: args.db_database.clone(),
            },
        5 =>
            ConnectionParams {
                host: fields[0].to_string(),
                port: fields[1].to_string(),
                username: fields[2].to_string(),
                password: fields[3].to_string(),
                database: fields[4].to_string(),
            },
        _ => {
            println!("Usage: /connect <host> <port> <username> <password> <database>");
            return;
        }
    };

    println!("Connecting to database...");
    match agent.connect(&params).await {
        Ok(()) => println!("Connected to Database!"),
        Err(e) => {
            error!("Connect failed: {}", e);
            println!("Error connecting to database: {}", e);
        }
    }
}

fn render_transcript(turns: &[Turn]) {
    for turn in turns {
        render_turn(turn);
    }
}

fn render_turn(turn: &Turn) {
    match turn.role {
        Role::Human => println!("Human: {}", turn.content),
        Role::Ai => println!("AI: {}", turn.content),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  /connect [host port username password database]  - Connect to MySQL");
    println!("  /schema                                          - Show the schema description");
    println!("  /history                                         - Show the conversation so far");
    println!("  /quit                                            - Exit");
    println!("Anything else is asked to the database.");
}
