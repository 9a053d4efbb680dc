//! Event loop driving `App` on a current-thread tokio runtime.
//!
//! Requests run on the blocking pool so the loop keeps reading input and
//! redrawing while they are outstanding. Every completion re-enters the loop
//! as an `Event` on the same channel as user input, so `App` state is only
//! ever touched from this task.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::app::{App, Effect, Event};
use crate::transport::Transport;

pub async fn run<T, W>(
    mut app: App,
    transport: Arc<T>,
    tx: UnboundedSender<Event>,
    mut rx: UnboundedReceiver<Event>,
    mut out: W,
) -> io::Result<App>
where
    T: Transport,
    W: Write,
{
    let effects = app.start();
    dispatch(effects, &transport, &tx);
    draw(&app, &mut out)?;

    while let Some(event) = rx.recv().await {
        let effects = app.handle(event);
        if !app.is_running() {
            break;
        }
        dispatch(effects, &transport, &tx);
        draw(&app, &mut out)?;
    }
    Ok(app)
}

fn dispatch<T: Transport>(effects: Vec<Effect>, transport: &Arc<T>, tx: &UnboundedSender<Event>) {
    for effect in effects {
        let transport = Arc::clone(transport);
        let tx = tx.clone();
        tokio::task::spawn_blocking(move || {
            let outcome = transport.execute(effect.request());
            // receiver gone means we are shutting down
            let _ = tx.send(effect.complete(outcome));
        });
    }
}

fn draw<W: Write>(app: &App, out: &mut W) -> io::Result<()> {
    write!(out, "\n{}", app.render())?;
    out.flush()
}

/// Forward stdin lines as input events. End of input sends `InputClosed`.
pub fn spawn_stdin_reader(tx: UnboundedSender<Event>) {
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Event::Input(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Event::InputClosed);
    });
}
