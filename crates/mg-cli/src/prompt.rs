//! Terminal confirmation prompt

use mg_engine::Confirm;
use std::io::{self, BufRead, Write};

/// Asks on stderr and reads the answer from stdin. Anything other than an
/// answer starting with `y` declines, including a closed stdin.
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        let mut stderr = io::stderr();
        if write!(stderr, "{prompt} ").and_then(|_| stderr.flush()).is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                log::warn!("Failed to read answer: {e}");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    answer
        .trim()
        .chars()
        .next()
        .is_some_and(|c| c.eq_ignore_ascii_case(&'y'))
}
