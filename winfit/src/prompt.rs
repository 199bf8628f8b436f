use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};

/// Source of interactive answers. Returns an error when input is exhausted.
pub trait Prompter {
    /// Ask for free text. An empty answer returns `default` when there is one.
    fn ask(&mut self, message: &str, default: Option<&str>) -> Result<String>;
    /// Pick one of `choices` by number or name. Returns its index.
    fn choose(&mut self, message: &str, choices: &[&str], default: usize) -> Result<usize>;
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;
    /// Show a message that needs no answer.
    fn notify(&mut self, message: &str) -> Result<()>;
}

/// Line-oriented prompter over any reader/writer pair (stdin/stdout in practice).
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_answer(&mut self) -> Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read answer")?;
        if read == 0 {
            bail!("Input closed before all answers were given");
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, message: &str, default: Option<&str>) -> Result<String> {
        match default {
            Some(d) => write!(self.output, "{} [{}]: ", message, d)?,
            None => write!(self.output, "{}: ", message)?,
        }
        let answer = self.read_answer()?;
        match default {
            Some(d) if answer.is_empty() => Ok(d.to_string()),
            _ => Ok(answer),
        }
    }

    fn choose(&mut self, message: &str, choices: &[&str], default: usize) -> Result<usize> {
        if choices.is_empty() {
            bail!("No choices for {:?}", message);
        }
        loop {
            writeln!(self.output, "{}", message)?;
            for (i, choice) in choices.iter().enumerate() {
                let marker = if i == default { " (default)" } else { "" };
                writeln!(self.output, "  {}) {}{}", i + 1, choice, marker)?;
            }
            write!(self.output, "> ")?;

            let answer = self.read_answer()?;
            if answer.is_empty() && default < choices.len() {
                return Ok(default);
            }
            if let Ok(n) = answer.parse::<usize>() {
                if (1..=choices.len()).contains(&n) {
                    return Ok(n - 1);
                }
            }
            if let Some(i) = choices
                .iter()
                .position(|c| c.eq_ignore_ascii_case(&answer))
            {
                return Ok(i);
            }
            writeln!(self.output, "Please pick 1-{}.", choices.len())?;
        }
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            write!(self.output, "{} [{}]: ", message, hint)?;
            let answer = self.read_answer()?;
            match answer.to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please answer yes or no.")?,
            }
        }
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }
}
