//! Reads user commands from a line-based input stream.

use std::io::{self, BufRead};
use std::thread::{self, JoinHandle};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::cli::Display;

use super::command::HostCommand;

/// Spawns a thread forwarding parsed stdin lines to the host.
///
/// The thread is detached; a read blocked on the terminal ends with the
/// process.
pub fn spawn_stdin_reader(commands: mpsc::UnboundedSender<HostCommand>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin-commands".to_string())
        .spawn(move || read_commands(io::stdin().lock(), &commands))
}

/// Forwards one command per line until EOF, `quit`, or the host goes away.
///
/// Lines that do not parse are reported to the user and skipped.
pub fn read_commands<R: BufRead>(reader: R, commands: &mpsc::UnboundedSender<HostCommand>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read command: {}", e);
                return;
            }
        };

        let command = match line.parse::<HostCommand>() {
            Ok(command) => command,
            Err(e) => {
                Display::show_error(&e.to_string());
                continue;
            }
        };

        if commands.send(command).is_err() {
            debug!("Host stopped, command reader exiting");
            return;
        }
        if command == HostCommand::Quit {
            return;
        }
    }
    debug!("Input closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &[u8]) -> Vec<HostCommand> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        read_commands(input, &tx);

        let mut commands = Vec::new();
        while let Ok(command) = rx.try_recv() {
            commands.push(command);
        }
        commands
    }

    #[test]
    fn test_reads_until_eof() {
        let commands = collect(b"s\np\nd 5\n");
        assert_eq!(
            commands,
            vec![
                HostCommand::Start,
                HostCommand::Pause,
                HostCommand::Reconfigure(5)
            ]
        );
    }

    #[test]
    fn test_blank_line_is_toggle() {
        assert_eq!(collect(b"\n"), vec![HostCommand::Toggle]);
    }

    #[test]
    fn test_skips_invalid_lines() {
        let commands = collect(b"bogus\ns\n");
        assert_eq!(commands, vec![HostCommand::Start]);
    }

    #[test]
    fn test_stops_after_quit() {
        let commands = collect(b"s\nq\np\n");
        assert_eq!(commands, vec![HostCommand::Start, HostCommand::Quit]);
    }

    #[test]
    fn test_stops_when_host_gone() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        read_commands(&b"s\ns\ns\n"[..], &tx);
        assert!(tx.is_closed());
    }
}
