use std::future::Future;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};

use crate::panel::Confirm;

/// Questions the command loop asks the user in the middle of a command.
pub trait Prompt: Confirm {
    /// `None` when input is closed.
    fn password(&mut self) -> impl Future<Output = Option<String>>;
}

/// Line-oriented stdin/stdout.
pub struct Terminal {
    lines: Lines<BufReader<Stdin>>,
    out: Stdout,
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            out: tokio::io::stdout(),
        }
    }

    pub async fn print(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).await {
            tracing::warn!(error = %e, "failed to write to stdout");
        }
        self.out.flush().await.ok();
    }

    /// Shows `prompt` and waits for one line; `None` on end of input.
    pub async fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.print(prompt).await;
        match self.lines.next_line().await {
            Ok(line) => line,
            Err(e) => {
                tracing::error!(error = %e, "failed to read stdin");
                None
            }
        }
    }
}

impl Confirm for Terminal {
    async fn confirm(&mut self, question: &str) -> bool {
        let answer = self.read_line(&format!("{question} [y/N] ")).await;
        answer.is_some_and(|a| is_yes(&a))
    }
}

impl Prompt for Terminal {
    async fn password(&mut self) -> Option<String> {
        self.read_line("password: ").await
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
