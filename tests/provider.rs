use std::sync::mpsc;
use std::time::Duration;

use sel_terminal::provider::spawn_provider;
use sel_terminal::row::{Cell, Row};
use sel_terminal::row_source::{RowSource, SourceError};
use sel_terminal::state::{Delta, ProviderCommand};

/// Serves queued results in order, then fails.
struct ScriptedSource {
    results: Vec<Result<Vec<Row>, SourceError>>,
}

impl RowSource for ScriptedSource {
    fn fetch_rows(&mut self) -> Result<Vec<Row>, SourceError> {
        if self.results.is_empty() {
            return Err(SourceError::Fetch("script exhausted".to_string()));
        }
        self.results.remove(0)
    }

    fn describe(&self) -> String {
        "script".to_string()
    }
}

fn next_data_delta(rx: &mpsc::Receiver<Delta>) -> Delta {
    loop {
        match rx.recv_timeout(Duration::from_secs(5)) {
            Ok(Delta::Log(msg)) => assert!(msg.contains("Fetching rows from script")),
            Ok(delta) => return delta,
            Err(err) => panic!("provider went quiet: {err}"),
        }
    }
}

#[test]
fn provider_answers_each_fetch_in_order() {
    let source = ScriptedSource {
        results: vec![
            Ok(vec![Row::from_pairs([("team", Cell::from("A"))])]),
            Err(SourceError::Format),
        ],
    };
    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let handle = spawn_provider(Box::new(source), tx, cmd_rx);

    cmd_tx.send(ProviderCommand::FetchRows).unwrap();
    match next_data_delta(&rx) {
        Delta::RowsLoaded { rows, .. } => assert_eq!(rows.len(), 1),
        other => panic!("unexpected delta {other:?}"),
    }

    cmd_tx.send(ProviderCommand::FetchRows).unwrap();
    match next_data_delta(&rx) {
        Delta::RowsFailed(err) => assert_eq!(err, SourceError::Format),
        other => panic!("unexpected delta {other:?}"),
    }

    drop(cmd_tx);
    handle.join().unwrap();
}

#[test]
fn provider_exits_when_ui_side_hangs_up() {
    let source = ScriptedSource { results: Vec::new() };
    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let handle = spawn_provider(Box::new(source), tx, cmd_rx);
    drop(rx);
    cmd_tx.send(ProviderCommand::FetchRows).unwrap();
    handle.join().unwrap();
}
