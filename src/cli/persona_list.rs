//! Persona listing.

use crate::cli::{resolve_persona_key, Args};
use crate::core::config::Config;
use crate::core::persona::PersonaCatalog;

pub fn list_personas(config: &Config, args: &Args) {
    let catalog = PersonaCatalog::load_builtin();
    let active = resolve_persona_key(config, args);

    println!("Available personas:");
    for persona in catalog.list() {
        let marker = if persona.id.eq_ignore_ascii_case(&active) {
            "*"
        } else {
            " "
        };
        println!("{marker} {:<14} {}", persona.id, persona.display_name);
    }
    println!("\n* = used for new sessions");
}
