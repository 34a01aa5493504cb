use aloha_controller::{Confirm, Preconfirmed};
use std::io::{self, BufRead, Write};

/// Reads one trimmed line from stdin after printing `prompt`.
/// Returns `None` at end of input.
pub fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// `y/N` prompt on the terminal; anything but yes declines
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        match read_line(&format!("{} [y/N] ", prompt)) {
            Ok(Some(answer)) => is_yes(&answer),
            _ => false,
        }
    }
}

/// `--yes` skips the prompt
pub fn confirmer(yes: bool) -> Box<dyn Confirm> {
    if yes {
        Box::new(Preconfirmed)
    } else {
        Box::new(StdinConfirm)
    }
}
