//! Operator console events.
//!
//! Line reads and interrupts arrive on one channel so the session can wait for
//! either with a single `recv`, and an interrupt can cut a pause short.

use std::io::{self, BufRead};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// One line of operator input, without the line terminator.
    Line(String),
    /// Input stream closed.
    Eof,
    /// Operator asked to stop (Ctrl-C).
    Interrupt,
}

/// Read lines from `input` on a background thread until end of input.
pub fn spawn_line_reader<B>(mut input: B, tx: Sender<ConsoleEvent>) -> io::Result<JoinHandle<()>>
where
    B: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("console-reader".to_string())
        .spawn(move || {
            let mut line = String::new();
            loop {
                line.clear();
                let event = match input.read_line(&mut line) {
                    Ok(0) => ConsoleEvent::Eof,
                    Ok(_) => ConsoleEvent::Line(line.trim_end_matches(['\r', '\n']).to_string()),
                    Err(e) => {
                        warn!(error = %e, "console read failed");
                        ConsoleEvent::Eof
                    }
                };
                let last = event == ConsoleEvent::Eof;
                if tx.send(event).is_err() || last {
                    break;
                }
            }
        })
}

/// Read operator lines from stdin.
pub fn spawn_stdin_reader(tx: Sender<ConsoleEvent>) -> io::Result<JoinHandle<()>> {
    spawn_line_reader(io::BufReader::new(io::stdin()), tx)
}

/// Route Ctrl-C into the event channel instead of killing the process.
pub fn install_interrupt_handler(tx: Sender<ConsoleEvent>) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        let _ = tx.send(ConsoleEvent::Interrupt);
    })
}
