use std::io::{self, BufRead as _, Write as _};
use std::thread;
use std::time::Instant;

use flume::{Receiver, RecvTimeoutError, unbounded};
use log::{info, warn};
use qview::config::AppConfig;
use qview::messaging::{PanelMessage, encode_panel_message, parse_host_message};
use qview::panel::Panel;

/// Runs the panel against a host speaking JSON lines over stdio.
pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    let (outbound_tx, outbound_rx) = unbounded();
    let (lines_tx, lines_rx) = unbounded::<String>();

    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if lines_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut panel = Panel::new(config, outbound_tx);
    let mut stdout = io::stdout().lock();
    info!("serving panel over stdio");
    write_messages(&mut stdout, &outbound_rx)?;

    loop {
        let received = match panel.poll(Instant::now()) {
            Some(deadline) => lines_rx.recv_deadline(deadline),
            None => lines_rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(line) => handle_line(&mut panel, &line),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        panel.run_deferred();
        panel.poll(Instant::now());
        panel.flush_render();
        write_messages(&mut stdout, &outbound_rx)?;
    }

    info!("host closed stdin");
    Ok(())
}

fn handle_line(panel: &mut Panel, line: &str) {
    if line.trim().is_empty() {
        return;
    }
    match parse_host_message(line) {
        Ok(message) => panel.handle(message, Instant::now()),
        Err(err) => {
            warn!("{}", err);
            panel.report_warning(err.to_string());
        }
    }
}

fn write_messages(out: &mut impl io::Write, messages: &Receiver<PanelMessage>) -> anyhow::Result<()> {
    for message in messages.try_iter() {
        writeln!(out, "{}", encode_panel_message(&message)?)?;
    }
    out.flush()?;
    Ok(())
}
