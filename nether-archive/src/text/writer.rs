//! Text archive writer

use std::io::Write;

use tracing::debug;

use super::Mode;
use super::token::{self, collection_keyword};
use crate::archive::{Archive, Writer};
use crate::category::{CollectionKind, Role};
use crate::error::{ArchiveError, Result};
use crate::primitive::Primitive;
use crate::serializable::Serializable;

/// Writer for the text format
pub struct TextWriter<W: Write> {
    writer: W,
    version: u32,
    indent: usize,
    mode: Mode,
    saved_modes: Vec<Mode>,
}

impl<W: Write> TextWriter<W> {
    /// Create a writer and emit the `Version` header line
    pub fn new(writer: W, version: u32) -> Result<Self> {
        let mut this = Self {
            writer,
            version,
            indent: 0,
            mode: Mode::Default,
            saved_modes: Vec::new(),
        };
        this.put_str(token::VERSION)?;
        this.put(token::SPACE)?;
        this.write_primitive(version)?;
        debug!(version, "text archive writer opened");
        Ok(this)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Consume the writer and return the underlying stream
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn put(&mut self, byte: u8) -> Result<()> {
        self.writer.write_all(&[byte])?;
        Ok(())
    }

    fn put_str(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes())?;
        Ok(())
    }

    fn put_indent(&mut self) -> Result<()> {
        for _ in 0..self.indent {
            self.put(token::INDENT)?;
        }
        Ok(())
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

    fn put_close(&mut self) -> Result<()> {
        self.put_indent()?;
        self.put(token::BRACKET_CLOSE)?;
        self.put(token::EOL)
    }
}

impl<W: Write> Archive for TextWriter<W> {
    fn role(&self) -> Role {
        Role::Writer
    }

    fn version(&self) -> u32 {
        self.version
    }

    fn transfer<T: Serializable>(&mut self, value: &mut T) -> Result<&mut Self> {
        self.write(&*value)
    }
}

impl<W: Write> Writer for TextWriter<W> {
    fn write_primitive<P: Primitive>(&mut self, value: P) -> Result<()> {
        self.put_indent()?;
        self.put_str(&value.to_token())?;
        if self.mode == Mode::List {
            self.put(token::LIST_SEPARATOR)?;
        }
        self.put(token::EOL)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.put(token::EOL)
    }

    fn begin_collection(&mut self, kind: CollectionKind, count: u32) -> Result<()> {
        self.put_indent()?;
        self.put(token::BRACKET_OPEN)?;
        self.put_str(collection_keyword(kind))?;
        self.put(token::SPACE)?;
        self.put_str(&count.to_string())?;
        self.put(token::SPACE)?;

        if !kind.is_text() {
            self.put(token::EOL)?;
            self.enter(Mode::List);
        }
        Ok(())
    }

    fn write_collection<E: Serializable>(
        &mut self,
        kind: CollectionKind,
        elements: &[E],
    ) -> Result<()> {
        match kind {
            CollectionKind::Elements => {
                for element in elements {
                    self.write(element)?;
                }
                Ok(())
            }
            CollectionKind::NarrowText => {
                let bytes = E::run_bytes(elements).ok_or(ArchiveError::InvalidText)?;
                self.put(token::QUOTE)?;
                self.writer.write_all(bytes)?;
                self.put(token::QUOTE)
            }
            CollectionKind::WideText => {
                let bytes = E::run_bytes(elements).ok_or(ArchiveError::InvalidText)?;
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
                    .collect();
                let text = String::from_utf16(&units).map_err(|_| ArchiveError::InvalidText)?;
                self.put(token::QUOTE)?;
                self.put_str(&text)?;
                self.put(token::QUOTE)
            }
        }
    }

    fn end_collection(&mut self, kind: CollectionKind) -> Result<()> {
        if kind.is_text() {
            self.put(token::BRACKET_CLOSE)?;
            return self.put(token::EOL);
        }
        self.leave();
        self.put_close()
    }

    fn write_composite<C: Serializable>(&mut self, value: &C) -> Result<()> {
        self.put_indent()?;
        self.put(token::BRACKET_OPEN)?;
        self.put_str(C::type_name())?;
        self.put(token::EOL)?;

        self.enter(Mode::Default);
        value.save(self)?;
        self.leave();

        self.put_close()
    }
}
