//! Line-based terminal input shared by the command loop and the permission prompt.

use async_trait::async_trait;
use nimbus_weather::{Accuracy, Coordinates, LocationError, LocationProvider, Permission};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::{mpsc, Mutex};

/// A user trigger read from stdin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim().to_lowercase().as_str() {
            "" | "r" | "refresh" | "retry" => Command::Refresh,
            "q" | "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

pub struct Console {
    lines: Mutex<Lines<BufReader<Stdin>>>,
    /// Questions are printed by the renderer, in order with state changes
    prompts: mpsc::UnboundedSender<String>,
}

impl Console {
    pub fn new(prompts: mpsc::UnboundedSender<String>) -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
            prompts,
        }
    }

    /// Next command; end of input quits
    pub async fn read_command(&self) -> std::io::Result<Command> {
        let line = self.lines.lock().await.next_line().await?;
        Ok(line.map_or(Command::Quit, |l| Command::parse(&l)))
    }

    /// Ask a yes/no question; anything but "y"/"yes" is no
    pub async fn confirm(&self, question: &str) -> std::io::Result<bool> {
        self.prompts.send(question.to_string()).map_err(|_| {
            std::io::Error::new(std::io::ErrorKind::BrokenPipe, "renderer has stopped")
        })?;
        let line = self.lines.lock().await.next_line().await?;
        Ok(matches!(
            line.as_deref().map(|l| l.trim().to_lowercase()).as_deref(),
            Some("y" | "yes")
        ))
    }
}

/// Asks the user for location access on every fetch, then delegates the fix.
pub struct PromptedLocation<P> {
    inner: P,
    console: std::sync::Arc<Console>,
}

impl<P> PromptedLocation<P> {
    pub fn new(inner: P, console: std::sync::Arc<Console>) -> Self {
        Self { inner, console }
    }
}

#[async_trait]
impl<P: LocationProvider> LocationProvider for PromptedLocation<P> {
    async fn request_permission(&self) -> Permission {
        match self.console.confirm("Allow Nimbus to use your location?").await {
            Ok(true) => self.inner.request_permission().await,
            Ok(false) => Permission::Denied,
            Err(e) => {
                tracing::warn!("Could not read permission answer: {}", e);
                Permission::Denied
            }
        }
    }

    async fn current_position(&self, accuracy: Accuracy) -> Result<Coordinates, LocationError> {
        self.inner.current_position(accuracy).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(""), Command::Refresh);
        assert_eq!(Command::parse("  R \n"), Command::Refresh);
        assert_eq!(Command::parse("retry"), Command::Refresh);
        assert_eq!(Command::parse("q"), Command::Quit);
        assert_eq!(Command::parse("Exit"), Command::Quit);
        assert_eq!(Command::parse("help"), Command::Unknown("help".to_string()));
    }
}
