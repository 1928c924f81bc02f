//! Terminal prompt and store launcher used by the command line tool

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

use crate::config::PromptText;
use crate::prompt::effects::{PromptPresenter, StoreLauncher};
use crate::prompt::error::{PromptError, StoreOpenError};
use crate::prompt::state::PromptOutcome;

/// Line-based update prompt.
///
/// `y` accepts, `n` declines (only offered when cancelling is allowed), and
/// any other line dismisses. End of input is an error, not a dismissal.
pub struct TerminalPresenter<R, W> {
    text: PromptText,
    input: Mutex<BufReader<R>>,
    output: Mutex<W>,
}

impl TerminalPresenter<tokio::io::Stdin, tokio::io::Stdout> {
    pub fn stdio(text: PromptText) -> Self {
        Self::new(text, tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> TerminalPresenter<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(text: PromptText, input: R, output: W) -> Self {
        Self {
            text,
            input: Mutex::new(BufReader::new(input)),
            output: Mutex::new(output),
        }
    }

    fn render(&self, allow_cancel: bool) -> String {
        let choices = if allow_cancel {
            format!(
                "[y] {}  [n] {}",
                self.text.update_button, self.text.cancel_button
            )
        } else {
            format!("[y] {}", self.text.update_button)
        };
        format!("{}\n{}\n{} > ", self.text.title, self.text.content, choices)
    }
}

fn parse_answer(line: &str, allow_cancel: bool) -> PromptOutcome {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => PromptOutcome::Accepted,
        "n" | "no" if allow_cancel => PromptOutcome::Declined,
        _ => PromptOutcome::Dismissed,
    }
}

#[async_trait::async_trait]
impl<R, W> PromptPresenter for TerminalPresenter<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn show_prompt(&self, allow_cancel: bool) -> Result<PromptOutcome, PromptError> {
        {
            let mut output = self.output.lock().await;
            output.write_all(self.render(allow_cancel).as_bytes()).await?;
            output.flush().await?;
        }

        let mut line = String::new();
        let read = self.input.lock().await.read_line(&mut line).await?;
        if read == 0 {
            return Err(PromptError::Unavailable("input closed".to_string()));
        }

        Ok(parse_answer(&line, allow_cancel))
    }
}

/// Prints the store listing URL instead of opening it
pub struct ConsoleStoreLauncher<W> {
    output: Mutex<W>,
}

impl ConsoleStoreLauncher<tokio::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W: AsyncWrite + Unpin + Send> ConsoleStoreLauncher<W> {
    pub fn new(output: W) -> Self {
        Self {
            output: Mutex::new(output),
        }
    }
}

#[async_trait::async_trait]
impl<W: AsyncWrite + Unpin + Send> StoreLauncher for ConsoleStoreLauncher<W> {
    async fn open_store_listing(&self, url: &str) -> Result<(), StoreOpenError> {
        let mut output = self.output.lock().await;
        write_line(&mut *output, &format!("Open the store listing: {}", url))
            .await
            .map_err(|e| StoreOpenError {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, line: &str) -> std::io::Result<()> {
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}
