//! Interactive terminal front end
//!
//! The draw loop owns the panel. Runs execute on the tokio runtime and post
//! their result back over a channel; the loop applies it on its next pass.

use std::io::{self, Stdout};
use std::panic;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::backend::{CallOutcome, OutcomeSource};
use crate::core::config::DashboardConfig;
use crate::core::error::{DashboardError, Result};
use crate::ui::display::{self, PanelView};
use crate::ui::state::{RunResolution, RunTicket, SimulationPanel};

type RunMessage = (RunTicket, Result<CallOutcome>);

/// What the loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Interactive dashboard: panel state plus the machinery to run requests
pub struct App<S> {
    panel: SimulationPanel,
    source: S,
    runtime: Handle,
    results_tx: Sender<RunMessage>,
    results_rx: Receiver<RunMessage>,
    in_flight: Option<JoinHandle<()>>,
}

impl<S> App<S>
where
    S: OutcomeSource + Clone + Send + Sync + 'static,
{
    pub fn new(source: S, runtime: Handle) -> Self {
        let (results_tx, results_rx) = mpsc::channel();
        Self {
            panel: SimulationPanel::new(),
            source,
            runtime,
            results_tx,
            results_rx,
            in_flight: None,
        }
    }

    pub fn panel(&self) -> &SimulationPanel {
        &self.panel
    }

    /// Button activation. A no-op while a run is in flight.
    pub fn start(&mut self) -> bool {
        let Some(ticket) = self.panel.begin_run() else {
            return false;
        };
        tracing::info!(
            generation = ticket.generation(),
            endpoint = %self.source.describe(),
            "Run started"
        );

        let source = self.source.clone();
        let tx = self.results_tx.clone();
        self.in_flight = Some(self.runtime.spawn(async move {
            let result = source.run_bot().await;
            // Receiver is gone only when the app has been dropped
            let _ = tx.send((ticket, result));
        }));
        true
    }

    /// Apply every result that has arrived since the last pass
    pub fn drain_results(&mut self) -> Vec<RunResolution> {
        let mut resolutions = Vec::new();
        while let Ok((ticket, result)) = self.results_rx.try_recv() {
            let resolution = self.panel.finish_run(ticket, result);
            if resolution != RunResolution::Ignored {
                self.in_flight = None;
            }
            resolutions.push(resolution);
        }
        resolutions
    }

    /// Block until the in-flight run reports back or `timeout` passes
    #[cfg(test)]
    fn wait_for_result(&mut self, timeout: Duration) -> Option<RunResolution> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            if let Some(resolution) = self.drain_results().pop() {
                return Some(resolution);
            }
            if std::time::Instant::now() >= deadline {
                return None;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        if key.kind != KeyEventKind::Press {
            return Control::Continue;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Control::Quit,
            KeyCode::Char('q') | KeyCode::Esc => Control::Quit,
            KeyCode::Enter | KeyCode::Char(' ') => {
                if !self.start() {
                    tracing::debug!("Start button is disabled");
                }
                Control::Continue
            }
            _ => Control::Continue,
        }
    }

    /// Draw loop on crossterm input. Returns when the user quits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>, tick_rate: Duration) -> Result<()> {
        self.run_with_events(terminal, || {
            if event::poll(tick_rate)? {
                event::read().map(Some)
            } else {
                Ok(None)
            }
        })
    }

    /// Draw loop fed by `next_event`, which yields `None` when no input
    /// arrived within a tick. The app is shut down however the loop ends.
    pub fn run_with_events<B, F>(&mut self, terminal: &mut Terminal<B>, next_event: F) -> Result<()>
    where
        B: Backend,
        F: FnMut() -> io::Result<Option<Event>>,
    {
        let result = self.event_loop(terminal, next_event);
        if let Err(e) = &result {
            tracing::error!(error = %e, "Draw loop failed");
        }
        self.shutdown();
        result
    }

    fn event_loop<B, F>(&mut self, terminal: &mut Terminal<B>, mut next_event: F) -> Result<()>
    where
        B: Backend,
        F: FnMut() -> io::Result<Option<Event>>,
    {
        loop {
            self.drain_results();

            let view = PanelView::from_panel(&self.panel);
            terminal.draw(|f| display::draw(f, &view))?;

            if let Some(Event::Key(key)) = next_event()? {
                if self.handle_key(key) == Control::Quit {
                    return Ok(());
                }
            }
        }
    }

    /// Tear down: abort any in-flight request and unmount the panel
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            tracing::info!("Quitting with a run in flight, abandoning it");
            handle.abort();
        }
        self.panel.unmount();
        self.drain_results();
    }
}

/// Take over the terminal, run the dashboard, and always give the terminal back
pub fn run_interactive<S>(config: &DashboardConfig, source: S, runtime: Handle) -> Result<()>
where
    S: OutcomeSource + Clone + Send + Sync + 'static,
{
    install_panic_hook();
    let mut terminal = setup_terminal()?;

    let mut app = App::new(source, runtime);
    let result = app.run(&mut terminal, Duration::from_millis(config.tick_rate_ms));

    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    let restore_failed =
        |e: io::Error| DashboardError::Terminal(format!("failed to restore terminal: {}", e));

    disable_raw_mode().map_err(restore_failed)?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).map_err(restore_failed)?;
    terminal.show_cursor().map_err(restore_failed)?;
    Ok(())
}

/// Give the terminal back before the panic message is printed
fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
        previous(info);
    }));
}
