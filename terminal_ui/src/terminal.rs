//! Interactive loop: crossterm events and store responses feed [`App`].

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use tokio::sync::mpsc;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::api::TarefasClient;
use crate::app::App;
use crate::error::Result;
use crate::executor;
use crate::ui;

const TICK: Duration = Duration::from_millis(250);

/// Runs its closure when dropped, so early returns still clean up.
struct OnDrop<F: FnMut()>(F);

impl<F: FnMut()> Drop for OnDrop<F> {
    fn drop(&mut self) {
        (self.0)()
    }
}

fn restore_terminal() {
    if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen) {
        log::warn!("failed to leave alternate screen: {}", err);
    }
    if let Err(err) = disable_raw_mode() {
        log::warn!("failed to disable raw mode: {}", err);
    }
}

pub async fn run(client: TarefasClient, page_size: usize) -> Result<()> {
    enable_raw_mode()?;
    let _restore = OnDrop(restore_terminal);
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(page_size);
    log::info!("opening grid against {}", client.base_url());
    let result = event_loop(&mut terminal, &mut app, &client).await;
    app.shutdown();
    terminal.show_cursor()?;

    result
}

async fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    client: &TarefasClient,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(TICK);

    executor::spawn(client, &tx, app.start());

    while !app.should_quit {
        let view: &App = app;
        terminal.draw(|f| ui::draw(f, view))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => {
                    if let Some(request) = app.on_key(key) {
                        executor::spawn(client, &tx, request);
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
                None => break,
            },
            Some(response) = rx.recv() => {
                if let Some(request) = app.on_response(response) {
                    executor::spawn(client, &tx, request);
                }
            }
            _ = tick.tick() => app.tick(Instant::now()),
        }
    }

    Ok(())
}
