//! Line-based operator input.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Source of operator input. Implementations return raw lines; callers validate.
pub trait Prompt: Send {
    /// Shows `label` and reads one line, without the trailing newline.
    fn read_line(&mut self, label: &str) -> io::Result<String>;
}

/// Reads from the terminal.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn read_line(&mut self, label: &str) -> io::Result<String> {
        print!("{}", label);
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }
}

/// Replays prepared answers, then reports end of input.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    labels: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            labels: Vec::new(),
        }
    }

    /// Labels shown so far, in order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompt for ScriptedPrompt {
    fn read_line(&mut self, label: &str) -> io::Result<String> {
        self.labels.push(label.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more scripted input"))
    }
}
