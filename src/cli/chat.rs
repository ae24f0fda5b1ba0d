//! Ask and chat command implementations

use crate::chat::{ChatSession, RelayClient};
use crate::cli::{AskArgs, ChatArgs};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Handle `sogum ask <PROMPT>`.
///
/// Like the chat window, a failed request prints the fallback reply rather
/// than an error.
pub async fn handle_ask(args: &AskArgs) -> Result<String, Box<dyn std::error::Error>> {
    let mut session = ChatSession::new(RelayClient::new(&args.url));
    match session.send(&args.prompt).await {
        Some(reply) => Ok(reply.text.clone()),
        None => Err("Prompt cannot be empty".into()),
    }
}

/// Handle `sogum chat`: read prompts from stdin until EOF or `/quit`.
pub async fn run_chat(args: &ChatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = ChatSession::new(RelayClient::new(&args.url));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!(
        "{} Connected to {} (type /quit to exit)",
        "SOGUM chat".bold(),
        args.url
    );

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "/quit" || line == "/exit" {
            break;
        }
        if let Some(reply) = session.send(line).await {
            println!("{} {}", "ai>".cyan(), reply.text);
        }
    }

    Ok(())
}
