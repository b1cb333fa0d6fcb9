use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Instant;

use crate::row_source::RowSource;
use crate::state::{Delta, ProviderCommand};

/// Runs fetches off the UI thread. Exits once either channel closes.
pub fn spawn_provider(
    mut source: Box<dyn RowSource>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for cmd in cmd_rx {
            match cmd {
                ProviderCommand::FetchRows => {
                    if tx
                        .send(Delta::Log(format!("[INFO] Fetching rows from {}", source.describe())))
                        .is_err()
                    {
                        return;
                    }
                    let started = Instant::now();
                    let delta = match source.fetch_rows() {
                        Ok(rows) => Delta::RowsLoaded {
                            rows,
                            elapsed_ms: started.elapsed().as_millis() as u64,
                        },
                        Err(err) => Delta::RowsFailed(err),
                    };
                    if tx.send(delta).is_err() {
                        return;
                    }
                }
            }
        }
    })
}
