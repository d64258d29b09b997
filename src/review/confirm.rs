//! Confirmation gate before any membership is written

use crate::prompt::Prompter;
use std::io::Write;
use tracing::debug;

pub const CONFIRM_PROMPT: &str = "Apply changes? [y/N]";

/// Accepted answers, compared case-insensitively after trimming
pub const AFFIRMATIVE_ANSWERS: &[&str] = &["y", "yes", "д", "да"];

pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    AFFIRMATIVE_ANSWERS.contains(&answer.as_str())
}

/// Ask the operator to confirm.
///
/// Unreadable input counts as a refusal and is reported on `out`.
pub fn confirm(prompter: &dyn Prompter, out: &mut dyn Write) -> bool {
    match prompter.input(CONFIRM_PROMPT) {
        Ok(answer) => is_affirmative(&answer),
        Err(e) => {
            debug!(error = %e, "Could not read confirmation");
            let _ = writeln!(out, "WARN: could not read confirmation ({}), treating as no", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;
    use rstest::rstest;

    #[rstest]
    #[case("y", true)]
    #[case("YES", true)]
    #[case(" Yes ", true)]
    #[case("д", true)]
    #[case("ДА", true)]
    #[case("", false)]
    #[case("n", false)]
    #[case("no", false)]
    #[case("yep", false)]
    fn test_is_affirmative(#[case] answer: &str, #[case] expected: bool) {
        assert_eq!(is_affirmative(answer), expected);
    }

    #[test]
    fn test_closed_input_declines_visibly() {
        let mut out = Vec::new();
        assert!(!confirm(&ScriptedPrompter::default(), &mut out));

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("WARN: could not read confirmation"));
        assert!(text.contains("treating as no"));
    }

    #[test]
    fn test_confirm_uses_prompt() {
        let prompter = ScriptedPrompter::new(["y"]);
        let mut out = Vec::new();
        assert!(confirm(&prompter, &mut out));
        assert_eq!(prompter.asked(), vec![CONFIRM_PROMPT]);
        assert!(out.is_empty());
    }
}
