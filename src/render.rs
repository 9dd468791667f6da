//! Terminal rendering surface.

use std::io::{self, Write};

use crossterm::style::{Color, Stylize};
use nimbus_weather::theme::Rgb;
use nimbus_weather::{FetchState, WeatherView, WindUnit};
use tokio::sync::{mpsc, watch};

use crate::error_mapping::app_error;

const READY_HINT: &str = "[Enter] refresh · [q] quit";
const FAILED_HINT: &str = "[Enter] retry · [q] quit";

#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub wind_unit: WindUnit,
    /// Colors + condition emoji; plain single-screen layout otherwise
    pub themed: bool,
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

fn themed(view: &WeatherView) -> String {
    let theme = view.theme;
    let header = format!(" {} {} ", theme.emoji, view.place)
        .with(color(theme.accent))
        .on(color(theme.background))
        .bold();

    [
        header.to_string(),
        format!(
            "  {}°C  {}",
            view.temperature,
            view.condition.as_str().with(color(theme.accent))
        ),
        format!("  {} {}", view.description_emoji, view.description),
        format!(
            "  Feels like {}°C · Humidity {}% · Wind {}",
            view.feels_like, view.humidity, view.wind
        ),
        format!("  {}", view.updated_label()),
    ]
    .join("\n")
}

fn plain(view: &WeatherView) -> String {
    [
        format!("{} {}", view.description_emoji, view.place),
        format!("  {}°C, {}", view.temperature, view.description),
        format!("  Humidity {}% · Wind {}", view.humidity, view.wind),
        format!("  {}", view.updated_label()),
    ]
    .join("\n")
}

/// Text for a state, or `None` when there is nothing to show
pub fn render(state: &FetchState, style: &Style) -> Option<String> {
    match state {
        FetchState::Idle => None,
        FetchState::Loading => Some("Fetching weather…".to_string()),
        FetchState::Refreshing { previous } => {
            Some(format!("Refreshing weather for {}…", previous.place_label()))
        }
        FetchState::Ready { snapshot, .. } => {
            let view = WeatherView::new(snapshot, style.wind_unit);
            let body = if style.themed {
                themed(&view)
            } else {
                plain(&view)
            };
            Some(format!("{}\n{}", body, READY_HINT))
        }
        FetchState::Failed { error } => Some(format!(
            "✖ {}\n  {}\n{}",
            error.reason(),
            app_error(error).user_message(),
            FAILED_HINT
        )),
    }
}

/// Write every state change, and any permission prompt, to `out` until the
/// sequence is dropped.
///
/// Prompts are only written after all pending state changes, so a prompt
/// raised during a fetch always follows that fetch's "Fetching" line.
pub async fn run<W: Write>(
    mut rx: watch::Receiver<FetchState>,
    mut prompts: mpsc::UnboundedReceiver<String>,
    style: Style,
    mut out: W,
) -> io::Result<W> {
    let initial = render(&rx.borrow_and_update(), &style);
    if let Some(text) = initial {
        writeln!(out, "{}", text)?;
    }

    loop {
        tokio::select! {
            biased;

            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let text = render(&rx.borrow_and_update(), &style);
                if let Some(text) = text {
                    writeln!(out, "{}", text)?;
                }
            }
            Some(question) = prompts.recv() => {
                write!(out, "{} [y/N] ", question)?;
                out.flush()?;
            }
        }
    }

    Ok(out)
}
