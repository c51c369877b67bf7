//! Interactive confirmation guards for destructive commands.
//!
//! `--yes` / `SLIPWAY_YES` answers every prompt affirmatively for CI use.

use std::io::{BufRead, Write};

/// y/N prompt. Anything other than y/yes declines.
pub fn approve(prompt: &str, yes: bool) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }
    eprint!("{prompt} [y/N] ");
    std::io::stderr().flush()?;
    let line = read_line()?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Safety check for destructive commands: the operator must type the exact
/// `context/project` target string.
pub fn exact(target: &str, yes: bool) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }
    eprint!("Type '{target}' to confirm: ");
    std::io::stderr().flush()?;
    let line = read_line()?;
    Ok(line.trim() == target)
}

fn read_line() -> anyhow::Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}
