// stdin in non canonical mode, read byte by byte on a separate thread
use std::io::{self, Read, Write};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use log::{debug, error};
use termios::{tcsetattr, Termios, ECHO, ICANON, TCSANOW};

const STDIN_FD: i32 = 0;

/// Keeps stdin unbuffered and silent until dropped, then restores the
/// previous settings and shows the cursor again.
pub struct RawMode {
    old_termios: Termios,
}

impl RawMode {
    pub fn enable() -> io::Result<Self> {
        let old_termios = Termios::from_fd(STDIN_FD)?;
        let mut new_termios = old_termios; // copy of the current settings
        new_termios.c_lflag &= !(ICANON | ECHO); // no echo and no line buffering
        tcsetattr(STDIN_FD, TCSANOW, &new_termios)?;
        // hide the cursor
        print!("{}[?25l", 27 as char);
        io::stdout().flush()?;
        Ok(RawMode { old_termios })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        print!("{}[?25h", 27 as char);
        let _ = io::stdout().flush();
        if let Err(e) = tcsetattr(STDIN_FD, TCSANOW, &self.old_termios) {
            error!("could not restore the terminal: {}", e);
        }
    }
}

/// Spawns the reader thread. The channel disconnects when stdin closes; the
/// thread ends on the first key read after the receiver is dropped.
pub fn spawn_stdin_channel() -> Receiver<u8> {
    let (tx, rx) = mpsc::channel::<u8>();
    thread::spawn(move || {
        let mut reader = io::stdin();
        let mut buffer: [u8; 1] = [0; 1];
        loop {
            if let Err(e) = reader.read_exact(&mut buffer) {
                debug!("stdin closed: {}", e);
                break;
            }
            if tx.send(buffer[0]).is_err() {
                break;
            }
        }
    });
    rx
}

/// Blocking reader over the key channel, one byte per read, so line prompts
/// between sessions share the reader thread with the board without taking
/// bytes that belong to the next one.
pub struct ChannelReader<'a> {
    keys: &'a Receiver<u8>,
}

impl<'a> ChannelReader<'a> {
    pub fn new(keys: &'a Receiver<u8>) -> Self {
        ChannelReader { keys }
    }

    /// Throws away keys pressed while nothing was listening.
    pub fn discard_pending(&self) {
        while self.keys.try_recv().is_ok() {}
    }
}

impl Read for ChannelReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.keys.recv() {
            Ok(key) => {
                buf[0] = key;
                Ok(1)
            }
            // the reader thread is gone, stdin is closed
            Err(_) => Ok(0),
        }
    }
}
