//! Text archive reader

use std::io::Read;

use byteorder::ReadBytesExt;
use tracing::{debug, warn};

use super::Mode;
use super::token::{self, collection_keyword};
use crate::archive::{Archive, Reader};
use crate::category::{CollectionKind, Role};
use crate::error::{ArchiveError, Result};
use crate::primitive::Primitive;
use crate::serializable::Serializable;

/// Reader for the text format
///
/// Reads byte by byte with one byte of lookahead; wrap file streams in a
/// `BufReader`.
pub struct TextReader<R: Read> {
    reader: R,
    version: u32,
    strict: bool,
    indent: usize,
    mode: Mode,
    saved_modes: Vec<Mode>,
    line: usize,
    peeked: Option<u8>,
}

impl<R: Read> TextReader<R> {
    /// Open a strict reader
    pub fn new(reader: R, expected_version: u32) -> Result<Self> {
        Self::with_strictness(reader, expected_version, true)
    }

    /// Open a reader that skips delimiters and keywords without checking them
    pub fn permissive(reader: R, expected_version: u32) -> Result<Self> {
        Self::with_strictness(reader, expected_version, false)
    }

    pub fn with_strictness(reader: R, expected_version: u32, strict: bool) -> Result<Self> {
        let mut this = Self {
            reader,
            version: expected_version,
            strict,
            indent: 0,
            mode: Mode::Default,
            saved_modes: Vec::new(),
            line: 1,
            peeked: None,
        };

        this.expect_keyword(token::VERSION)?;
        this.expect(token::SPACE, "space")?;
        let found: u32 = this.read_primitive()?;
        if found != expected_version {
            warn!(
                expected = expected_version,
                found, "text archive version mismatch"
            );
            return Err(ArchiveError::VersionMismatch {
                expected: expected_version,
                found,
            });
        }

        debug!(version = found, strict, "text archive reader opened");
        Ok(this)
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Line the next byte is on, starting at 1
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn next_byte(&mut self) -> Result<u8> {
        let byte = match self.peeked.take() {
            Some(byte) => byte,
            None => self.reader.read_u8()?,
        };
        if byte == token::EOL {
            self.line += 1;
        }
        Ok(byte)
    }

    fn peek_byte(&mut self) -> Result<u8> {
        match self.peeked {
            Some(byte) => Ok(byte),
            None => {
                let byte = self.reader.read_u8()?;
                self.peeked = Some(byte);
                Ok(byte)
            }
        }
    }

    fn desync(&self, expected: &'static str, found: String) -> ArchiveError {
        warn!(line = self.line, expected, found = %found, "text archive desync");
        ArchiveError::FormatDesync {
            line: self.line,
            expected,
            found,
        }
    }

    fn expect(&mut self, byte: u8, name: &'static str) -> Result<()> {
        let found = self.next_byte()?;
        if self.strict && found != byte {
            return Err(self.desync(name, char::from(found).to_string()));
        }
        Ok(())
    }

    fn expect_keyword(&mut self, keyword: &'static str) -> Result<()> {
        let mut found = Vec::with_capacity(keyword.len());
        for _ in 0..keyword.len() {
            found.push(self.next_byte()?);
        }
        if self.strict && found != keyword.as_bytes() {
            return Err(self.desync(keyword, String::from_utf8_lossy(&found).into_owned()));
        }
        Ok(())
    }

    fn expect_indent(&mut self) -> Result<()> {
        for _ in 0..self.indent {
            self.expect(token::INDENT, "indent")?;
        }
        Ok(())
    }

    fn expect_close(&mut self) -> Result<()> {
        self.expect_indent()?;
        self.expect(token::BRACKET_CLOSE, "]")?;
        self.expect(token::EOL, "end of line")
    }

    /// Read up to, not including, the first byte in `stops`
    fn read_token(&mut self, stops: &[u8]) -> Result<String> {
        let mut bytes = Vec::new();
        while !stops.contains(&self.peek_byte()?) {
            bytes.push(self.next_byte()?);
        }
        String::from_utf8(bytes).map_err(|_| ArchiveError::InvalidText)
    }

    fn skip_line(&mut self) -> Result<()> {
        while self.next_byte()? != token::EOL {}
        Ok(())
    }

    fn read_char(&mut self) -> Result<char> {
        let lead = self.next_byte()?;
        let width = match lead {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(ArchiveError::InvalidText),
        };
        let mut buf = [lead, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            *slot = self.next_byte()?;
        }
        std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or(ArchiveError::InvalidText)
    }

    fn enter(&mut self, mode: Mode) {
        self.saved_modes.push(self.mode);
        self.mode = mode;
        self.indent += 1;
    }

    fn leave(&mut self) {
        self.mode = self.saved_modes.pop().unwrap_or(Mode::Default);
        self.indent = self.indent.saturating_sub(1);
    }
}

impl<R: Read> Archive for TextReader<R> {
    fn role(&self) -> Role {
        Role::Reader
    }

    fn version(&self) -> u32 {
        self.version
    }

    fn transfer<T: Serializable>(&mut self, value: &mut T) -> Result<&mut Self> {
        self.read(value)
    }
}

impl<R: Read> Reader for TextReader<R> {
    fn read_primitive<P: Primitive>(&mut self) -> Result<P> {
        self.expect_indent()?;
        let text = self.read_token(&[token::LIST_SEPARATOR, token::EOL])?;
        let value = P::from_token(&text)?;
        if self.mode == Mode::List {
            self.expect(token::LIST_SEPARATOR, ",")?;
        }
        self.expect(token::EOL, "end of line")?;
        Ok(value)
    }

    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<()> {
        for byte in bytes.iter_mut() {
            *byte = self.next_byte()?;
        }
        self.expect(token::EOL, "end of line")
    }

    fn begin_collection(&mut self, kind: CollectionKind) -> Result<u32> {
        self.expect_indent()?;
        self.expect(token::BRACKET_OPEN, "[")?;
        self.expect_keyword(collection_keyword(kind))?;
        self.expect(token::SPACE, "space")?;
        let count = u32::from_token(&self.read_token(&[token::SPACE, token::EOL])?)?;
        self.expect(token::SPACE, "space")?;

        if !kind.is_text() {
            self.expect(token::EOL, "end of line")?;
            self.enter(Mode::List);
        }
        Ok(count)
    }

    fn read_collection<E: Serializable>(
        &mut self,
        kind: CollectionKind,
        elements: &mut [E],
    ) -> Result<()> {
        match kind {
            CollectionKind::Elements => {
                for element in elements.iter_mut() {
                    self.read(element)?;
                }
                Ok(())
            }
            CollectionKind::NarrowText => {
                self.expect(token::QUOTE, "\"")?;
                let bytes = E::run_bytes_mut(elements).ok_or(ArchiveError::InvalidText)?;
                for byte in bytes.iter_mut() {
                    *byte = self.next_byte()?;
                }
                self.expect(token::QUOTE, "\"")
            }
            CollectionKind::WideText => {
                self.expect(token::QUOTE, "\"")?;
                let mut units = Vec::with_capacity(elements.len());
                while units.len() < elements.len() {
                    let mut buf = [0u16; 2];
                    units.extend_from_slice(self.read_char()?.encode_utf16(&mut buf));
                }
                if units.len() != elements.len() {
                    return Err(ArchiveError::InvalidText);
                }
                let bytes = E::run_bytes_mut(elements).ok_or(ArchiveError::InvalidText)?;
                for (pair, unit) in bytes.chunks_exact_mut(2).zip(units) {
                    pair.copy_from_slice(&unit.to_ne_bytes());
                }
                self.expect(token::QUOTE, "\"")
            }
        }
    }

    fn end_collection(&mut self, kind: CollectionKind) -> Result<()> {
        if kind.is_text() {
            self.expect(token::BRACKET_CLOSE, "]")?;
            return self.expect(token::EOL, "end of line");
        }
        self.leave();
        self.expect_close()
    }

    fn read_composite<C: Serializable>(&mut self, value: &mut C) -> Result<()> {
        // The type name is informational only.
        if self.strict {
            self.expect_indent()?;
            self.expect(token::BRACKET_OPEN, "[")?;
        }
        self.skip_line()?;

        self.enter(Mode::Default);
        value.load(self)?;
        self.leave();

        self.expect_close()
    }
}
