//! One-shot "say" command: send a single message and print the reply.

use std::error::Error;

use crate::cli::{build_chain, resolve_persona_key, Args};
use crate::core::config::Config;
use crate::core::persona::PersonaCatalog;
use crate::core::session::ChatSession;

pub async fn run_say(
    config: &Config,
    args: &Args,
    message: Vec<String>,
) -> Result<(), Box<dyn Error>> {
    let message = message.join(" ");
    if message.is_empty() {
        eprintln!("Usage: solace say <message>");
        std::process::exit(1);
    }

    let chain = build_chain(config, args.timeout);
    let catalog = PersonaCatalog::load_builtin();
    let mut session = ChatSession::new(catalog, chain, resolve_persona_key(config, args));

    let (_, assistant) = session.send_user_message(&message).await;
    println!("{}", assistant.content);
    Ok(())
}
