// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! A boot log kept in memory, for SoCs whose console belongs to a later boot stage.

use core::{
    fmt::{self, Write},
    str,
};

/// A circular log buffer. Once full, the oldest bytes are overwritten.
pub struct BootLog<const CAPACITY: usize> {
    /// Index in `buffer` of the next byte to write.
    head: usize,
    /// Total number of bytes ever written, which may exceed `CAPACITY`.
    written: usize,
    buffer: [u8; CAPACITY],
}

impl<const CAPACITY: usize> BootLog<CAPACITY> {
    /// Creates an empty log.
    pub const fn new() -> Self {
        Self {
            head: 0,
            written: 0,
            buffer: [0; CAPACITY],
        }
    }

    fn push(&mut self, mut bytes: &[u8]) {
        self.written += bytes.len();
        if bytes.len() > CAPACITY {
            bytes = &bytes[bytes.len() - CAPACITY..];
        }

        let first = bytes.len().min(CAPACITY - self.head);
        self.buffer[self.head..self.head + first].copy_from_slice(&bytes[..first]);
        let rest = &bytes[first..];
        self.buffer[..rest.len()].copy_from_slice(rest);
        self.head = (self.head + bytes.len()) % CAPACITY;
    }

    /// Returns the retained log text, oldest first.
    ///
    /// If the log has wrapped, the oldest retained character may have been partially overwritten;
    /// any such leading fragment is skipped.
    pub fn contents(&mut self) -> &str {
        if self.written >= CAPACITY {
            self.buffer.rotate_left(self.head);
            self.head = 0;
        }

        let mut retained = &self.buffer[..self.written.min(CAPACITY)];
        loop {
            match str::from_utf8(retained) {
                Ok(text) => return text,
                Err(e) => match e.error_len() {
                    Some(len) if e.valid_up_to() == 0 => retained = &retained[len..],
                    Some(_) | None => {
                        // Only the start of the buffer can be corrupt, so keep what parsed.
                        let valid = e.valid_up_to();
                        // SAFETY: `valid_up_to` bytes were just validated as UTF-8.
                        return unsafe { str::from_utf8_unchecked(&retained[..valid]) };
                    }
                },
            }
        }
    }

    /// Copies as much of the newest retained text as fits into `out`, returning the number of
    /// bytes copied.
    pub fn copy_latest(&mut self, out: &mut [u8]) -> usize {
        let text = self.contents().as_bytes();
        let len = text.len().min(out.len());
        out[..len].copy_from_slice(&text[text.len() - len..]);
        len
    }
}

impl<const CAPACITY: usize> Default for BootLog<CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAPACITY: usize> Write for BootLog<CAPACITY> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push(s.as_bytes());
        Ok(())
    }
}
