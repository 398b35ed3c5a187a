use crate::error::{Error, Result};
use crate::packed::{Element, Packed};
use crate::FORMAT_VERSION;

/// Writes elements into a zero-filled buffer of the declared length.
pub struct Unpacker {
    buf: Vec<u8>,
    cursor: usize,
}

impl Unpacker {
    pub fn new(len: usize) -> Result<Self> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(len)
            .map_err(|_| Error::OutOfMemory { len })?;
        buf.resize(len, 0);
        Ok(Unpacker { buf, cursor: 0 })
    }

    /// Bytes produced so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    #[inline(always)]
    pub fn update(&mut self, element: Element) -> Result<()> {
        trace!("cursor: {}, element: {element}", self.cursor);
        let end = advance(self.cursor, element, self.buf.len())?;
        match element {
            Element::Literal(value) => self.buf[self.cursor] = value,
            // already zero, the buffer starts that way
            Element::Run(0, _) => {}
            Element::Run(value, _) => self.buf[self.cursor..end].fill(value),
        }
        self.cursor = end;
        Ok(())
    }

    pub fn finalize(self) -> Result<Vec<u8>> {
        if self.cursor != self.buf.len() {
            return Err(Error::Underrun {
                written: self.cursor,
                len: self.buf.len(),
            });
        }
        Ok(self.buf)
    }
}

/// Moves `cursor` past `element`, refusing to leave a buffer of `len` bytes.
#[inline(always)]
fn advance(cursor: usize, element: Element, len: usize) -> Result<usize> {
    let count = element.count();
    if let Element::Run(_, count) = element {
        if count < 2 {
            return Err(Error::InvalidRunCount { count });
        }
    }
    cursor
        .checked_add(count)
        .filter(|end| *end <= len)
        .ok_or(Error::Overrun { cursor, count, len })
}

/// Walks the element extents against the header without touching memory.
fn check_extents(packed: &Packed) -> Result<()> {
    let mut cursor = 0;
    for element in packed {
        cursor = advance(cursor, *element, packed.len())?;
    }
    if cursor != packed.len() {
        return Err(Error::Underrun {
            written: cursor,
            len: packed.len(),
        });
    }
    Ok(())
}

/// Reconstructs the bytes described by `packed`.
pub fn unpack(packed: &Packed) -> Result<Vec<u8>> {
    if packed.version() != FORMAT_VERSION {
        warn!(
            "don't know how to unpack this, format version: {}",
            packed.version()
        );
        return Err(Error::UnsupportedVersion {
            version: packed.version(),
        });
    }
    // the header alone never decides how much gets allocated
    check_extents(packed)?;
    let mut unpacker = Unpacker::new(packed.len())?;
    for element in packed {
        unpacker.update(*element)?;
    }
    debug!(
        "unpacked {} element(s) into {} byte(s)",
        packed.elements().len(),
        unpacker.position()
    );
    unpacker.finalize()
}
