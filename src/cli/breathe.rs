//! Guided breathing exercise runner.

use std::error::Error;

use crate::core::builtin_exercises::{find_builtin_exercise, load_builtin_exercises};
use crate::core::exercise::{ExerciseTimer, TimerEvent};

pub async fn run_breathe(name: Option<String>, list: bool) -> Result<(), Box<dyn Error>> {
    if list {
        println!("Available exercises:");
        for exercise in load_builtin_exercises() {
            println!(
                "  {:<18} {} ({} cycles, {}s)",
                exercise.name,
                exercise.description,
                exercise.cycles,
                exercise.total_duration().as_secs()
            );
        }
        return Ok(());
    }

    let exercise = match name {
        Some(name) => find_builtin_exercise(&name).ok_or_else(|| {
            format!("No exercise matching '{name}'. Try 'solace breathe --list'.")
        })?,
        None => load_builtin_exercises()
            .into_iter()
            .next()
            .ok_or("no built-in exercises available")?,
    };

    println!("{}: {}", exercise.name, exercise.description);
    println!(
        "{} cycles, about {} seconds. Settle in.\n",
        exercise.cycles,
        exercise.total_duration().as_secs()
    );

    let total_cycles = exercise.cycles;
    let (mut timer, mut rx) = ExerciseTimer::new();
    timer.start(exercise)?;

    while let Some(event) = rx.recv().await {
        match event {
            TimerEvent::Phase(phase) => {
                println!(
                    "[cycle {}/{}] {}: {}",
                    phase.cycle + 1,
                    total_cycles,
                    phase.label,
                    phase.instruction
                );
            }
            TimerEvent::Completed => {
                println!("\nNice work. Take a moment before you move on.");
                break;
            }
            TimerEvent::Cancelled => break,
        }
    }

    Ok(())
}
