//! Interactive chat loop (plain line-based REPL).

use std::error::Error;
use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::{build_chain, resolve_persona_key, Args};
use crate::core::config::Config;
use crate::core::emotion::Emotion;
use crate::core::persona::PersonaCatalog;
use crate::core::session::ChatSession;
use crate::utils::logging::LoggingState;

pub async fn run_chat(config: &Config, args: &Args) -> Result<(), Box<dyn Error>> {
    let chain = build_chain(config, args.timeout);
    let catalog = PersonaCatalog::load_builtin();
    let mut session = ChatSession::new(catalog, chain, resolve_persona_key(config, args));
    let logging = LoggingState::new(args.log.clone())?;

    let greeting = session.push_greeting(config.name.as_deref()).content.clone();
    println!("{greeting}\n");
    logging.log_message(&greeting)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("You: ");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text == "/quit" || text == "/exit" {
            break;
        }

        logging.log_message(&format!("You: {text}"))?;

        let (user, assistant) = session.send_user_message(text).await;

        if let Some(emotion) = user.emotion {
            if emotion != Emotion::Neutral {
                println!("  (sounds {emotion})");
            }
        }
        println!("\n{}\n", assistant.content);
        if let Some(actions) = &assistant.suggested_actions {
            for action in actions {
                println!("  • {action}");
            }
            println!();
        }
        logging.log_message(&assistant.content)?;
    }

    println!("Take care. I'm around whenever you need me.");
    Ok(())
}
