//! The always-running dashboard loop.
//!
//! Locations are read line by line from stdin while fetches run in the
//! background, so a new location can be entered before the previous one has
//! finished loading. Each fetch reports back with its run token and only the
//! latest one is shown.

use std::io::{IsTerminal, Stdout, Write};

use anyhow::{Context, Result};
use chrono::Local;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use weather_core::{
    Completion, Dashboard, LocationQuery, Pipeline, PipelineError, RunToken, WeatherReport,
};

use crate::render::render_dashboard;

type RunResult = (RunToken, Result<WeatherReport, PipelineError>);

const PROMPT: &str = "Enter location (:q to quit)> ";
const CLEAR: &str = "\x1b[2J\x1b[H";

pub struct App<W = Stdout> {
    pipeline: Pipeline,
    dashboard: Dashboard,
    out: W,
    clear_screen: bool,
    /// One-shot message shown under the dashboard on the next redraw.
    notice: Option<String>,
    in_flight: usize,
}

impl App {
    pub fn new(pipeline: Pipeline) -> Self {
        let stdout = std::io::stdout();
        let clear_screen = stdout.is_terminal();
        App::with_output(pipeline, stdout, clear_screen)
    }

    pub async fn run(mut self, initial_location: &str) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        self.run_with(initial_location, stdin).await
    }
}

impl<W: Write> App<W> {
    pub fn with_output(pipeline: Pipeline, out: W, clear_screen: bool) -> Self {
        Self {
            pipeline,
            dashboard: Dashboard::new(),
            out,
            clear_screen,
            notice: None,
            in_flight: 0,
        }
    }

    /// Drive the dashboard from `input` until a quit command is read. At end
    /// of input the loop waits for fetches still in flight, then returns.
    pub async fn run_with<R>(&mut self, initial_location: &str, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut input_open = true;
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<RunResult>();

        self.submit(initial_location, &done_tx);
        self.redraw()?;

        while input_open || self.in_flight > 0 {
            tokio::select! {
                line = lines.next_line(), if input_open => {
                    match line.context("Failed to read location input")? {
                        None => input_open = false,
                        Some(line) if is_quit(&line) => break,
                        Some(line) => {
                            self.submit(&line, &done_tx);
                            self.redraw()?;
                        }
                    }
                }
                Some((token, result)) = done_rx.recv() => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    if self.dashboard.complete(token, result) == Completion::Applied {
                        self.redraw()?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Start a pipeline run for `raw`. Returns false, after queueing a warning
    /// for the next redraw, when the input is empty; nothing is sent over the
    /// network in that case.
    fn submit(&mut self, raw: &str, done_tx: &mpsc::UnboundedSender<RunResult>) -> bool {
        let location = match LocationQuery::parse(raw) {
            Ok(location) => location,
            Err(err) => {
                self.notice = Some(format!("{err}!"));
                return false;
            }
        };

        let token = self.dashboard.begin(location.clone());
        tracing::info!(seq = token.seq(), location = %location, "fetching weather");

        let pipeline = self.pipeline.clone();
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let result = pipeline.run(&location).await;
            // Receiver only goes away on shutdown.
            let _ = done_tx.send((token, result));
        });
        self.in_flight += 1;
        true
    }

    fn redraw(&mut self) -> Result<()> {
        if self.clear_screen {
            write!(self.out, "{CLEAR}")?;
        }
        let screen = render_dashboard(&self.dashboard, Local::now().date_naive());
        writeln!(self.out, "{screen}")?;
        if let Some(notice) = self.notice.take() {
            writeln!(self.out, "{notice}")?;
        }
        write!(self.out, "{PROMPT}")?;
        self.out.flush().context("Failed to flush output")
    }
}

fn is_quit(line: &str) -> bool {
    matches!(line.trim(), ":q" | "quit" | "exit")
}
