// gsim-core/src/runner/mod.rs
// Supervision of the external processes a session runs.
pub mod logs;
mod simulator;
mod test_bundle;
mod winmower;

pub use simulator::launch_simulator;
pub use test_bundle::TestBundleRunner;
pub use winmower::WinMowerRunner;

use std::sync::Arc;

use gsim_common::model::LogRecord;
use tokio::io::AsyncReadExt;
use tokio::process::{ChildStderr, ChildStdout};

use logs::LineClassifier;

/// Receives classified output records from a supervised process.
pub trait LogSink: Send + Sync {
    fn record(&self, record: LogRecord);
}

impl<F> LogSink for F
where
    F: Fn(LogRecord) + Send + Sync,
{
    fn record(&self, record: LogRecord) {
        self(record)
    }
}

/// Reads both output pipes of a child to exhaustion, merging them into one
/// classifier so records keep their arrival order within the process.
/// Severity is never inferred from which stream a line arrived on.
pub(crate) async fn drain_child_output(
    mut stdout: ChildStdout,
    mut stderr: ChildStderr,
    sink: Arc<dyn LogSink>,
) {
    let mut classifier = LineClassifier::new();
    let mut out_buf = [0u8; 4096];
    let mut err_buf = [0u8; 4096];
    let mut out_open = true;
    let mut err_open = true;

    while out_open || err_open {
        tokio::select! {
            read = stdout.read(&mut out_buf), if out_open => match read {
                Ok(0) | Err(_) => out_open = false,
                Ok(n) => {
                    for record in classifier.push(&out_buf[..n]) {
                        sink.record(record);
                    }
                }
            },
            read = stderr.read(&mut err_buf), if err_open => match read {
                Ok(0) | Err(_) => err_open = false,
                Ok(n) => {
                    for record in classifier.push(&err_buf[..n]) {
                        sink.record(record);
                    }
                }
            },
        }
    }

    if let Some(record) = classifier.finish() {
        sink.record(record);
    }
}
