//! Line sources for the interactive driver
//!
//! Lines are handed over as raw bytes without the line terminator so the
//! driver decides what to do with input that is not UTF-8.

use std::io::{self, BufRead};
use std::thread;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

/// Yields one input line at a time; `None` at end of input
#[async_trait(?Send)]
pub trait LineSource {
    async fn next_line(&mut self) -> io::Result<Option<Vec<u8>>>;
}

fn strip_line_ending(line: &mut Vec<u8>) {
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
}

/// Lines from any async buffered reader
#[derive(Debug)]
pub struct ReaderLines<R> {
    reader: R,
}

impl<R: AsyncBufRead + Unpin> ReaderLines<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

#[async_trait(?Send)]
impl<R: AsyncBufRead + Unpin> LineSource for ReaderLines<R> {
    async fn next_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();

        if self.reader.read_until(b'\n', &mut line).await? == 0 {
            return Ok(None);
        }

        strip_line_ending(&mut line);
        Ok(Some(line))
    }
}

/// Lines from the process stdin, read on a detached OS thread.
///
/// A blocked read on that thread never holds up runtime shutdown, so an
/// interrupt at the prompt exits right away.
#[derive(Debug)]
pub struct StdinLines {
    lines: mpsc::Receiver<io::Result<Vec<u8>>>,
}

impl StdinLines {
    pub fn spawn() -> Self {
        let (tx, lines) = mpsc::channel(1);

        thread::spawn(move || {
            let mut stdin = io::stdin().lock();

            loop {
                let mut line = Vec::new();
                let item = match stdin.read_until(b'\n', &mut line) {
                    Ok(0) => break,
                    Ok(_) => {
                        strip_line_ending(&mut line);
                        Ok(line)
                    }
                    Err(e) => Err(e),
                };

                let failed = item.is_err();
                if tx.blocking_send(item).is_err() || failed {
                    break;
                }
            }
        });

        Self { lines }
    }
}

#[async_trait(?Send)]
impl LineSource for StdinLines {
    async fn next_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        self.lines.recv().await.transpose()
    }
}
