use crate::packed::{Element, Packed};
use crate::FORMAT_VERSION;
use std::fmt::Debug;
use std::{fmt, io};

/// Streaming packer. Feed bytes with [`Packer::update`] or through [`io::Write`],
/// then call [`Packer::finalize`].
pub struct Packer {
    status: PackStatus,
    len: usize,
    elements: Vec<Element>,
}

#[derive(Copy, Clone)]
enum PackStatus {
    Open { value: u8, count: usize },
    Wait,
}

impl Packer {
    pub fn new() -> Self {
        Packer {
            status: PackStatus::Wait,
            len: 0,
            elements: Vec::new(),
        }
    }

    /// Reserves room for `elements` packed elements, not input bytes. Each
    /// element takes `size_of::<Element>()` bytes, so sizing this by the input
    /// length costs many times the input.
    pub fn with_capacity(elements: usize) -> Self {
        Packer {
            status: PackStatus::Wait,
            len: 0,
            elements: Vec::with_capacity(elements),
        }
    }

    #[inline(always)]
    pub fn update(&mut self, byte: u8) {
        trace!("update byte {byte}");
        trace!("current status {:?}", self.status);
        self.len += 1;
        match self.status {
            PackStatus::Open { value, count } if value == byte => {
                self.status = PackStatus::Open {
                    value,
                    count: count + 1,
                };
            }
            PackStatus::Open { .. } => {
                self.emit();
                self.status = PackStatus::Open {
                    value: byte,
                    count: 1,
                };
                trace!("transit to {:?}", self.status);
            }
            PackStatus::Wait => {
                self.status = PackStatus::Open {
                    value: byte,
                    count: 1,
                };
                trace!("transit to {:?}", self.status);
            }
        }
    }

    #[inline(always)]
    fn emit(&mut self) {
        if let Some(element) = self.status.close() {
            trace!("emit {element}");
            self.elements.push(element);
        }
        self.status = PackStatus::Wait;
    }

    pub fn finalize(mut self) -> Packed {
        self.emit();
        debug!(
            "packed {} byte(s) into {} element(s)",
            self.len,
            self.elements.len()
        );
        Packed::from_parts(FORMAT_VERSION, self.len, self.elements)
    }
}

impl Default for Packer {
    fn default() -> Self {
        Packer::new()
    }
}

impl PackStatus {
    // a lone byte never becomes a run of one
    #[inline(always)]
    fn close(self) -> Option<Element> {
        match self {
            PackStatus::Wait => None,
            PackStatus::Open { value, count: 1 } => Some(Element::Literal(value)),
            PackStatus::Open { value, count } => Some(Element::Run(value, count)),
        }
    }
}

impl Debug for PackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackStatus::Open { value, count } => f
                .debug_struct("Open")
                .field("value", &format!("0x{value:02X}"))
                .field("count", &count)
                .finish(),
            PackStatus::Wait => f.write_str("Wait"),
        }
    }
}

impl io::Write for Packer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for byte in buf.iter() {
            self.update(*byte);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Packs `input` in a single pass.
pub fn pack(input: &[u8]) -> Packed {
    let mut packer = Packer::new();
    for byte in input.iter() {
        packer.update(*byte);
    }
    packer.finalize()
}
