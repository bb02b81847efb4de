//! Line-oriented search console.
//!
//! Each plain input line stands for the current contents of the search box.
//! Lines are debounced into suggestion fetches; `/search <text>` submits a
//! search and `/quit` exits. The rendered [`SearchView`] is written to the
//! output after every visible change.

use anyhow::{Context, Result};
use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use typesense_search::{
    Debouncer, IndexService, InputSignal, NormalizedHit, Orchestrator, QueryEmbedder, SearchView,
    ViewMode,
};

/// Usage text printed on `/help`.
pub const HELP: &str = "\
Type to see suggestions. Each line replaces the search box contents.
  /search <text>   run a full search
  /help            show this help
  /quit            exit
";

/// One parsed line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    /// New contents of the search box.
    Keystroke(String),
    /// Explicit search submission.
    Submit(String),
    Help,
    Quit,
}

impl ConsoleInput {
    /// Parse a raw input line.
    ///
    /// Anything that is not a recognised command is a keystroke, including
    /// blank lines, which clear the suggestions.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed {
            "/quit" | "/exit" => return Self::Quit,
            "/help" => return Self::Help,
            _ => {}
        }
        if let Some(rest) = trimmed.strip_prefix("/search") {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return Self::Submit(rest.trim().to_owned());
            }
        }
        Self::Keystroke(line.to_owned())
    }
}

/// Render `view` as plain text.
///
/// `fields` names the result fields to show: the first is the headline,
/// the rest are indented beneath it. Highlight markup is shown as `*term*`.
pub fn render(view: &SearchView, fields: &[String]) -> String {
    let mut out = String::new();
    match view.mode() {
        ViewMode::Idle => {}
        ViewMode::Suggestions => {
            for entry in view.suggestions() {
                out.push_str(&format!("  > {}\n", entry.text));
            }
        }
        ViewMode::Searching => out.push_str("searching...\n"),
        ViewMode::Results => {
            if view.is_degraded() {
                out.push_str("(semantic ranking unavailable, keyword matches only)\n");
            }
            if view.results().is_empty() {
                out.push_str("no results\n");
            }
            for hit in view.results() {
                render_hit(&mut out, hit, fields);
            }
        }
        ViewMode::SearchFailed => {
            let error = view.error().unwrap_or("unknown error");
            out.push_str(&format!("search failed: {error}\nretry with /search <text>\n"));
        }
    }
    out
}

fn render_hit(out: &mut String, hit: &NormalizedHit, fields: &[String]) {
    let mut fields = fields.iter();
    let headline = fields
        .next()
        .and_then(|field| hit.highlighted_fields.get(field))
        .map(|value| emphasize(value))
        .or_else(|| hit.id.clone())
        .unwrap_or_else(|| "(untitled)".to_owned());
    out.push_str(&format!("{:>3}. {headline}\n", hit.rank + 1));

    for field in fields {
        if let Some(value) = hit.highlighted_fields.get(field) {
            out.push_str(&format!("     {}\n", emphasize(value)));
        }
    }
}

fn emphasize(markup: &str) -> String {
    markup.replace("<mark>", "*").replace("</mark>", "*")
}

async fn write_view<W: AsyncWrite + Unpin>(
    output: &mut W,
    view: &SearchView,
    fields: &[String],
) -> Result<()> {
    let rendered = render(view, fields);
    if rendered.is_empty() {
        return Ok(());
    }
    output.write_all(rendered.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

/// Drive the console until `input` closes or `/quit` is read.
///
/// Suggestion fetches run concurrently with input handling; their updates
/// are applied in completion order and stale ones are dropped by the view.
/// A submitted search is awaited before the next line is read.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails. Search
/// failures are rendered, not returned.
pub async fn run_console<S, E, R, W>(
    orchestrator: &Orchestrator<S, E>,
    input: R,
    mut output: W,
) -> Result<()>
where
    S: IndexService,
    E: QueryEmbedder,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let fields = orchestrator.config().search.highlight_fields.clone();
    let mut debouncer = Debouncer::new(orchestrator.config().debounce());
    let (signal_tx, mut signal_rx) = mpsc::unbounded_channel();
    let mut in_flight = FuturesUnordered::new();
    let mut view = SearchView::new();
    let mut lines = input.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read console input")? else {
                    tracing::info!("input closed (EOF)");
                    break;
                };
                match ConsoleInput::parse(&line) {
                    ConsoleInput::Keystroke(text) => {
                        let tx = signal_tx.clone();
                        debouncer.on_input_change(&text, move |signal| {
                            let _ = tx.send(signal);
                        });
                    }
                    ConsoleInput::Submit(text) => {
                        debouncer.cancel();
                        while signal_rx.try_recv().is_ok() {}
                        view.begin_search();
                        write_view(&mut output, &view, &fields).await?;
                        let outcome = orchestrator.run_search(&text).await;
                        view.apply_search(outcome);
                        write_view(&mut output, &view, &fields).await?;
                    }
                    ConsoleInput::Help => {
                        output.write_all(HELP.as_bytes()).await?;
                        output.flush().await?;
                    }
                    ConsoleInput::Quit => break,
                }
            }
            Some(signal) = signal_rx.recv() => {
                let text = match signal {
                    InputSignal::Empty => String::new(),
                    InputSignal::Settled(text) => text,
                };
                in_flight.push(orchestrator.fetch_suggestions(&text));
            }
            Some(update) = in_flight.next(), if !in_flight.is_empty() => {
                if view.apply_suggestions(update) {
                    write_view(&mut output, &view, &fields).await?;
                }
            }
        }
    }

    Ok(())
}
