//! Console and relay collaborators for host processes.
//!
//! `StdinCommandSource` and `StdoutReportSink` adapt the process console to
//! the [`CommandSource`] / [`ReportSink`] capabilities; `LoggedRelayBank`
//! stands in for a GPIO bank on hosts that have none, reporting applied
//! states through `tracing`.

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use crate::hardware::capabilities::{CommandSource, RelayBank, ReportSink};

/// Decode one command character into a relay state.
///
/// The recognized alphabet is `0`-`9` and uppercase `A`-`F`, mapping to
/// 0-15. Everything else — lowercase hex included — is a no-op and returns
/// `None`.
pub fn decode_relay_command(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        'A'..='F' => Some(10 + c as u8 - b'A'),
        _ => None,
    }
}

// =============================================================================
// StdinCommandSource
// =============================================================================

/// Non-blocking command input over process stdin.
///
/// A background reader task pulls bytes from stdin into an unbounded
/// channel; [`poll`](CommandSource::poll) drains it with `try_recv`, so the
/// acquisition cycle never waits on the operator.
pub struct StdinCommandSource {
    rx: Mutex<mpsc::UnboundedReceiver<char>>,
}

impl StdinCommandSource {
    /// Spawn the stdin reader task and return the source.
    ///
    /// The task exits on EOF or on a read error. Dropping the source closes
    /// the channel, but the task only notices once the next stdin byte
    /// arrives and the send fails.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            let mut stdin = tokio::io::stdin();
            let mut byte = [0u8; 1];
            loop {
                match stdin.read(&mut byte).await {
                    Ok(0) => {
                        debug!("stdin closed, command input stopped");
                        break;
                    }
                    Ok(_) => {
                        if tx.send(byte[0] as char).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        debug!(error = %err, "stdin read failed, command input stopped");
                        break;
                    }
                }
            }
        });
        Self {
            rx: Mutex::new(rx),
        }
    }
}

#[async_trait]
impl CommandSource for StdinCommandSource {
    async fn poll(&self) -> Result<Option<char>> {
        Ok(self.rx.lock().await.try_recv().ok())
    }
}

// =============================================================================
// StdoutReportSink
// =============================================================================

/// Report sink writing one line per cycle to process stdout.
pub struct StdoutReportSink;

#[async_trait]
impl ReportSink for StdoutReportSink {
    async fn write_line(&self, line: &str) -> Result<()> {
        let mut out = tokio::io::stdout();
        out.write_all(line.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
        Ok(())
    }
}

// =============================================================================
// LoggedRelayBank
// =============================================================================

/// Relay bank for hosts without GPIO: applied states go to the log.
pub struct LoggedRelayBank {
    lines: u32,
}

impl LoggedRelayBank {
    pub fn new(lines: u32) -> Self {
        Self { lines }
    }
}

#[async_trait]
impl RelayBank for LoggedRelayBank {
    async fn apply(&self, nibble: u8) -> Result<()> {
        info!(
            state = %format!("{:#06b}", nibble & 0x0f),
            lines = self.lines,
            "relay bank driven"
        );
        Ok(())
    }

    fn lines(&self) -> u32 {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_digits() {
        assert_eq!(decode_relay_command('0'), Some(0));
        assert_eq!(decode_relay_command('9'), Some(9));
    }

    #[test]
    fn decodes_uppercase_hex() {
        assert_eq!(decode_relay_command('A'), Some(10));
        assert_eq!(decode_relay_command('B'), Some(11));
        assert_eq!(decode_relay_command('F'), Some(15));
    }

    #[test]
    fn ignores_everything_else() {
        assert_eq!(decode_relay_command('x'), None);
        assert_eq!(decode_relay_command('b'), None); // lowercase is not recognized
        assert_eq!(decode_relay_command('G'), None);
        assert_eq!(decode_relay_command(' '), None);
        assert_eq!(decode_relay_command('\n'), None);
    }

    #[tokio::test]
    async fn logged_relay_bank_accepts_states() {
        let bank = LoggedRelayBank::new(7);
        assert_eq!(bank.lines(), 7);
        bank.apply(0xb).await.unwrap();
        bank.apply(0).await.unwrap();
    }
}
