//! Prompt sent alongside the question screenshot.

/// Language the solution is written in when nothing else is configured.
pub const DEFAULT_SOLUTION_LANGUAGE: &str = "Python";

/// Prompt template. `{language}` is replaced with the solution language.
pub static SOLVER_PROMPT: &str = r#"Can you solve the coding question in the image?
Please always follow these steps:
1. Ask clarifying questions
2. Explain your thoughts, include question type (binary search, BFS, DP, etc.).
3. Implementation in {language} (Always use the best practice e.g. O(1), O(n), and avoid O(n^2), O(2^n), etc.)
4. Test cases
5. Explanation and Time/Space Complexity"#;

/// Build the prompt for the given solution language.
///
/// A blank language falls back to [`DEFAULT_SOLUTION_LANGUAGE`].
pub fn build_solver_prompt(language: &str) -> String {
    let language = match language.trim() {
        "" => DEFAULT_SOLUTION_LANGUAGE,
        lang => lang,
    };
    SOLVER_PROMPT.replace("{language}", language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_language() {
        let prompt = build_solver_prompt("  ");
        assert!(prompt.contains("3. Implementation in Python (Always"));
        assert!(!prompt.contains("{language}"));
    }

    #[test]
    fn test_custom_language() {
        let prompt = build_solver_prompt("Rust");
        assert!(prompt.starts_with("Can you solve the coding question in the image?"));
        assert!(prompt.contains("Implementation in Rust"));
        assert!(prompt.ends_with("5. Explanation and Time/Space Complexity"));
    }
}
