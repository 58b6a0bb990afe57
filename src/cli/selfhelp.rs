//! Grounding and journaling subcommands.

use std::error::Error;
use std::io::{self, Write};

use chrono::{Datelike, Utc};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::core::selfhelp::{GROUNDING_STEPS, JOURNALING_PROMPTS};

/// Step through the 5-4-3-2-1 grounding technique, waiting for Enter between
/// senses so the pace stays unhurried.
pub async fn run_ground() -> Result<(), Box<dyn Error>> {
    println!("Grounding: the 5-4-3-2-1 technique. Press Enter when you're ready to move on.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    for (sense, instruction) in GROUNDING_STEPS {
        print!("{sense}: {instruction} ");
        io::stdout().flush()?;
        if lines.next_line().await?.is_none() {
            println!();
            return Ok(());
        }
    }

    println!("Well done. Notice how your body feels now.");
    Ok(())
}

/// Print a journaling prompt: one per day by default, rotating through the
/// list, or all of them with `--all`.
pub fn run_journal(all: bool) {
    if all {
        for (i, prompt) in JOURNALING_PROMPTS.iter().enumerate() {
            println!("{}. {prompt}", i + 1);
        }
        return;
    }

    let index = Utc::now().ordinal() as usize % JOURNALING_PROMPTS.len();
    println!("{}", JOURNALING_PROMPTS[index]);
}
