pub mod builtin_exercises;
pub mod config;
pub mod emotion;
pub mod exercise;
pub mod persona;
pub mod prompt;
pub mod providers;
pub mod selfhelp;
pub mod session;
