//! Bounded, append-only text builder shared by the global context for
//! formatting intermediate strings (qualified names, diagnostic snippets).
//!
//! Callers are required to `clear` between uses; the buffer never clears
//! itself. Exceeding capacity is a fatal configuration error (spec §4.C/§7),
//! surfaced as a [`crate::error::DriverError`] rather than a panic so the
//! driver can print a diagnostic and exit non-zero instead of unwinding.

use crate::error::DriverError;

pub const MAX_STRING_BUFFER: usize = 4096;

pub struct ScratchBuffer {
    buf: String,
}

impl ScratchBuffer {
    pub fn new() -> Self {
        ScratchBuffer {
            buf: String::with_capacity(MAX_STRING_BUFFER),
        }
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn append_char(&mut self, c: char) -> Result<(), DriverError> {
        self.check_capacity(c.len_utf8())?;
        self.buf.push(c);
        Ok(())
    }

    pub fn append_len(&mut self, text: &str) -> Result<(), DriverError> {
        self.check_capacity(text.len())?;
        self.buf.push_str(text);
        Ok(())
    }

    /// Matches the C driver's `append_cstring` naming; appends a Rust `&str`
    /// (this crate has no C-string boundary to cross).
    pub fn append_cstring(&mut self, text: &str) -> Result<(), DriverError> {
        self.append_len(text)
    }

    pub fn to_cstring(&self) -> String {
        self.buf.clone()
    }

    fn check_capacity(&self, additional: usize) -> Result<(), DriverError> {
        if self.buf.len() + additional > MAX_STRING_BUFFER - 1 {
            return Err(DriverError::ScratchBufferOverflow);
        }
        Ok(())
    }
}

impl Default for ScratchBuffer {
    fn default() -> Self {
        Self::new()
    }
}
