//! Configuration module for the coding helper.

mod i18n;
mod prompts;

pub use i18n::{get_messages, Messages, MESSAGES_EN, MESSAGES_ZH};
pub use prompts::{build_solver_prompt, DEFAULT_SOLUTION_LANGUAGE, SOLVER_PROMPT};
