//! Interactive terminal components.

pub mod prompt;

pub use prompt::ConsolePrompt;
