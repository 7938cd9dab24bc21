use log::debug;

use super::error::{Error, Result};

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: u16 = 0x200;
pub const FONT_START: u16 = 0x050;
pub const GLYPH_SIZE: u16 = 5;

// every address the engine produces is folded into the 4K image
const ADDR_MASK: usize = MEMORY_SIZE - 1;

#[rustfmt::skip]
const FONTSET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Flat 4K memory image with the hex font baked into the interpreter area.
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];

        // CHIP-8 systems had the interpreter in the first 512 bytes of memory
        // since we're emulating that we can just store the fontset there
        let font = FONT_START as usize;
        bytes[font..font + FONTSET.len()].copy_from_slice(&FONTSET);

        Self { bytes }
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[addr as usize & ADDR_MASK]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.bytes[addr as usize & ADDR_MASK] = value;
    }

    /// Big-endian two-byte word at `addr`.
    pub fn read_word(&self, addr: u16) -> u16 {
        (self.read(addr) as u16) << 8 | self.read(addr.wrapping_add(1)) as u16
    }

    /// Copies `program` verbatim to [`PROGRAM_START`]. Memory is left untouched
    /// if it would not fit.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        let start = PROGRAM_START as usize;
        let max = MEMORY_SIZE - start;
        if program.len() > max {
            return Err(Error::RomTooLarge {
                size: program.len(),
                max,
            });
        }

        self.bytes[start..start + program.len()].copy_from_slice(program);
        debug!("loaded {} byte program at {:#05X}", program.len(), start);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
