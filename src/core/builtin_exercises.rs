//! Built-in exercise catalog
//!
//! Guided breathing exercises embedded at build time from
//! builtin_exercises.toml.

use serde::Deserialize;

use crate::core::exercise::ExerciseDefinition;

#[derive(Debug, Deserialize)]
struct BuiltinExercisesConfig {
    exercises: Vec<ExerciseDefinition>,
}

/// Load the built-in exercises from the embedded configuration.
pub fn load_builtin_exercises() -> Vec<ExerciseDefinition> {
    const CONFIG_CONTENT: &str = include_str!("../builtin_exercises.toml");

    let config: BuiltinExercisesConfig =
        toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtin_exercises.toml");

    config.exercises
}

/// Find a built-in exercise by name. Matching is case-insensitive and accepts
/// any unambiguous prefix ("box" finds "Box Breathing").
pub fn find_builtin_exercise(name: &str) -> Option<ExerciseDefinition> {
    let needle = name.to_lowercase();
    load_builtin_exercises()
        .into_iter()
        .find(|e| e.name.to_lowercase().starts_with(&needle))
}
