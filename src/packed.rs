use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// One element following the header.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Element {
    /// A single byte, emitted as is.
    Literal(u8),
    /// `value` repeated `count` times, `count >= 2`.
    Run(u8, usize),
}

impl Element {
    pub fn value(&self) -> u8 {
        match *self {
            Element::Literal(value) | Element::Run(value, _) => value,
        }
    }

    /// Number of unpacked bytes this element expands to.
    pub fn count(&self) -> usize {
        match *self {
            Element::Literal(_) => 1,
            Element::Run(_, count) => count,
        }
    }
}

/// A header (format version, unpacked length) followed by literals and runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packed {
    version: u64,
    len: usize,
    elements: Vec<Element>,
}

impl Packed {
    /// Assembles a representation without validating it; [`crate::unpack`] does that.
    pub fn from_parts(version: u64, len: usize, elements: Vec<Element>) -> Self {
        Packed {
            version,
            len,
            elements,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Declared length of the unpacked sequence.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Sum of all element extents. Equals [`Packed::len`] for well-formed input.
    pub fn expanded_len(&self) -> usize {
        self.elements
            .iter()
            .fold(0usize, |acc, e| acc.saturating_add(e.count()))
    }

    pub fn into_parts(self) -> (u64, usize, Vec<Element>) {
        (self.version, self.len, self.elements)
    }
}

impl<'a> IntoIterator for &'a Packed {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Literal(value) => write!(f, "{value}"),
            Element::Run(value, count) => write!(f, "[{value}, {count}]"),
        }
    }
}

/// Renders the list form, e.g. `[1, 7, [0, 3], 1, 3, 15, 31]`.
impl fmt::Display for Packed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}", self.version, self.len)?;
        for element in self.elements.iter() {
            write!(f, ", {element}")?;
        }
        f.write_str("]")
    }
}

impl FromStr for Packed {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parser = Parser {
            src: s.as_bytes(),
            pos: 0,
        };
        let packed = parser.packed()?;
        parser.skip_ws();
        if parser.peek().is_some() {
            return Err(parser.error("trailing input"));
        }
        trace!(
            "parsed version={} len={} elements={}",
            packed.version,
            packed.len,
            packed.elements.len()
        );
        Ok(packed)
    }
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, reason: &'static str) -> Error {
        Error::Syntax {
            pos: self.pos,
            reason,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, byte: u8, reason: &'static str) -> Result<()> {
        self.skip_ws();
        if self.peek() != Some(byte) {
            return Err(self.error(reason));
        }
        self.pos += 1;
        Ok(())
    }

    fn number(&mut self) -> Result<u64> {
        self.skip_ws();
        let start = self.pos;
        let mut n: u64 = 0;
        while let Some(b) = self.peek().filter(u8::is_ascii_digit) {
            n = n
                .checked_mul(10)
                .and_then(|n| n.checked_add((b - b'0') as u64))
                .ok_or_else(|| self.error("number too large"))?;
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected an integer"));
        }
        Ok(n)
    }

    fn byte(&mut self) -> Result<u8> {
        self.skip_ws();
        let pos = self.pos;
        let n = self.number()?;
        u8::try_from(n).map_err(|_| Error::Syntax {
            pos,
            reason: "byte value above 255",
        })
    }

    fn packed(&mut self) -> Result<Packed> {
        self.expect(b'[', "expected '['")?;
        let version = self.number()?;
        self.expect(b',', "expected ',' after version")?;
        let len = usize::try_from(self.number()?).map_err(|_| self.error("length too large"))?;

        let mut elements = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                Some(b',') => {
                    self.pos += 1;
                    elements.push(self.element()?);
                }
                _ => return Err(self.error("expected ',' or ']'")),
            }
        }
        Ok(Packed::from_parts(version, len, elements))
    }

    fn element(&mut self) -> Result<Element> {
        self.skip_ws();
        if self.peek() != Some(b'[') {
            return Ok(Element::Literal(self.byte()?));
        }
        self.pos += 1;
        let value = self.byte()?;
        self.expect(b',', "expected ',' inside run")?;
        let count = usize::try_from(self.number()?).map_err(|_| self.error("run count too large"))?;
        self.expect(b']', "run must be exactly [value, count]")?;
        Ok(Element::Run(value, count))
    }
}
