//! Built-in persona catalog
//!
//! Personas are behavioral directives that shape the voice of generated
//! replies. The table is embedded at build time from builtin_personas.toml
//! and never changes at runtime.

use serde::{Deserialize, Serialize};

/// Persona key used whenever a requested key is absent from the catalog.
pub const DEFAULT_PERSONA: &str = "friend";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaDirective {
    pub id: String,
    pub display_name: String,
    pub directive: String,
}

#[derive(Debug, Deserialize)]
struct BuiltinPersonasConfig {
    personas: Vec<PersonaDirective>,
}

#[derive(Debug, Clone)]
pub struct PersonaCatalog {
    personas: Vec<PersonaDirective>,
}

impl PersonaCatalog {
    /// Load the catalog from the embedded configuration.
    pub fn load_builtin() -> Self {
        const CONFIG_CONTENT: &str = include_str!("../builtin_personas.toml");

        let config: BuiltinPersonasConfig =
            toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtin_personas.toml");

        let catalog = PersonaCatalog {
            personas: config.personas,
        };
        // The fallback persona has to exist for `resolve` to be total.
        assert!(
            catalog.find(DEFAULT_PERSONA).is_some(),
            "builtin_personas.toml must define the '{DEFAULT_PERSONA}' persona"
        );
        catalog
    }

    pub fn list(&self) -> &[PersonaDirective] {
        &self.personas
    }

    /// Look up a persona by key (case-insensitive).
    pub fn find(&self, key: &str) -> Option<&PersonaDirective> {
        self.personas.iter().find(|p| p.id.eq_ignore_ascii_case(key))
    }

    /// Resolve a persona key to its directive. Absence of a key is not an
    /// error: unknown keys resolve to the `friend` persona.
    pub fn resolve(&self, key: &str) -> &PersonaDirective {
        self.find(key).unwrap_or_else(|| {
            self.find(DEFAULT_PERSONA)
                .expect("default persona is validated at load time")
        })
    }
}
