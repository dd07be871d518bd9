//! Process runner and non-blocking output pump.
//!
//! [`OutputPump::spawn`] starts a tool with stdout and stderr both writing
//! into one pipe, so lines keep the order the tool produced them in. A
//! reader thread forwards complete lines into a channel, and the owning
//! thread drains it with [`OutputPump::poll`] without ever blocking on the
//! pipe. The channel disconnects once the pipe reaches EOF, which is the
//! end-of-stream signal.

use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, Stdio};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use tracing::{debug, warn};

use crate::command::ToolCommand;

/// Result of one bounded poll of the output stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PumpPoll {
    /// The process may still produce output.
    Pending,
    /// The pipe reached EOF and every line has been delivered.
    Exhausted,
}

/// A running process whose merged output is drained line by line.
#[derive(Debug)]
pub struct OutputPump {
    child: Child,
    lines: Receiver<String>,
}

impl OutputPump {
    /// Spawns `command` with merged output and starts the line reader.
    pub fn spawn(command: &ToolCommand) -> io::Result<Self> {
        let (reader, writer) = os_pipe::pipe()?;
        let mut cmd = command.to_command();
        cmd.stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer);
        let child = cmd.spawn();
        // The command holds the parent's copies of the write end.
        drop(cmd);
        let child = child?;
        debug!(pid = child.id(), command = %command, "spawned tool");

        let (tx, rx) = mpsc::channel();
        spawn_line_reader(reader, tx);

        Ok(Self { child, lines: rx })
    }

    /// Returns the OS process id.
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Forwards at most `max_lines` buffered lines without blocking.
    pub fn poll(&mut self, max_lines: usize, mut forward: impl FnMut(String)) -> PumpPoll {
        for _ in 0..max_lines {
            match self.lines.try_recv() {
                Ok(line) => forward(line),
                Err(TryRecvError::Empty) => return PumpPoll::Pending,
                Err(TryRecvError::Disconnected) => return PumpPoll::Exhausted,
            }
        }
        PumpPoll::Pending
    }

    /// Forwards every line until the pipe reaches EOF, blocking as needed.
    pub fn drain(&mut self, mut forward: impl FnMut(String)) {
        while let Ok(line) = self.lines.recv() {
            forward(line);
        }
    }

    /// Waits for the process to exit and returns its exit code.
    ///
    /// A process terminated by a signal reports `-1`.
    pub fn wait(mut self) -> io::Result<i32> {
        let status = self.child.wait()?;
        debug!(pid = self.child.id(), %status, "tool exited");
        Ok(status.code().unwrap_or(-1))
    }

    /// Stops forwarding output without touching the process.
    ///
    /// A background thread keeps emptying the pipe so the tool never blocks
    /// or fails on a write, then reaps it once it exits.
    pub fn abandon(self) {
        let Self { child, lines } = self;
        debug!(pid = child.id(), "abandoned tool output");
        thread::spawn(move || {
            for _ in lines.iter() {}
            reap(child);
        });
    }
}

/// Waits for `child` on a background thread so it is not left a zombie.
pub(crate) fn reap_detached(child: Child) {
    thread::spawn(move || reap(child));
}

fn reap(mut child: Child) {
    let pid = child.id();
    match child.wait() {
        Ok(status) => debug!(pid, %status, "detached tool exited"),
        Err(e) => warn!(pid, error = %e, "failed to wait for detached tool"),
    }
}

/// Reads `reader` line by line on a background thread.
///
/// Stops at EOF, on a read error, or once the receiving side is gone.
fn spawn_line_reader<R: Read + Send + 'static>(reader: R, sender: Sender<String>) {
    thread::spawn(move || {
        let mut buf = BufReader::new(reader);
        let mut raw = Vec::new();
        loop {
            raw.clear();
            match buf.read_until(b'\n', &mut raw) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    while matches!(raw.last(), Some(b'\n' | b'\r')) {
                        raw.pop();
                    }
                    let line = String::from_utf8_lossy(&raw).into_owned();
                    if sender.send(line).is_err() {
                        break;
                    }
                }
            }
        }
    });
}
