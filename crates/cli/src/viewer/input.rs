//! Keyboard input for the viewer loop.
//!
//! Stdin is read on a dedicated blocking thread and forwarded over a
//! channel, so the async loop can wait for a key press with a deadline.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

/// Escape key code
pub const KEY_ESC: u8 = 27;

/// Forwards key presses from stdin to the async viewer loop.
pub struct KeyListener {
    rx: mpsc::Receiver<u8>,
}

impl KeyListener {
    /// Spawn the stdin reader thread.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel(16);

        std::thread::Builder::new()
            .name("key-input".to_string())
            .spawn(move || {
                use std::io::Read;

                let stdin = std::io::stdin();
                let mut handle = stdin.lock();
                let mut buf = [0u8; 1];
                loop {
                    match handle.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(_) => {
                            // Line-buffered terminals deliver the newline too
                            if buf[0] == b'\n' || buf[0] == b'\r' {
                                continue;
                            }
                            if tx.blocking_send(buf[0]).is_err() {
                                break;
                            }
                        }
                    }
                }
            })
            .expect("Failed to spawn stdin reader thread");

        Self { rx }
    }

    /// Build a listener over an existing key channel, bypassing stdin.
    /// Lets tests drive the viewer loop with injected keys.
    #[cfg(test)]
    pub fn from_channel(rx: mpsc::Receiver<u8>) -> Self {
        Self { rx }
    }

    /// Wait up to `window` for a key press.
    ///
    /// Returns `None` when the window elapses without input or stdin closed.
    pub async fn wait_key(&mut self, window: Duration) -> Option<u8> {
        timeout(window, self.rx.recv()).await.ok().flatten()
    }

    /// True when the key ends the viewer loop (ESC or 'q').
    pub fn is_exit_key(key: u8) -> bool {
        key == KEY_ESC || key == b'q'
    }
}
