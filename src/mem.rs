// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The Chip-8 memory bank: a flat 4 KiB address space with the builtin
//! font sprites baked into the reserved interpreter area.

use crate::error::{Error, Result};

/// Size of the address space, in bytes
pub const MEM_SIZE: usize = 0x1000;

/// First address of program space; everything below it is reserved for the
/// interpreter and is read-only once the machine is built
pub const PROGRAM_START: u16 = 0x200;

/// Address of the font table (16 glyphs, one per hex digit)
pub const FONT_START: u16 = 0x000;

/// Length of one font glyph, in bytes
pub const FONT_HEIGHT: u16 = 5;

/// Sprites for hex digits 0-F, five bytes apiece
const FONT: [u8; 80] = [
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

/// The memory bank. Addresses `0x000..0x200` hold the interpreter's font
/// table; programs load at [PROGRAM_START] and own the rest.
///
/// All access is bounds-checked: a read or write outside `0x000..=0xfff` is
/// an [Error::MemoryFault], never a wraparound. Writes into the reserved
/// area fault too; the font load at construction is the one exception.
///
/// # Examples
/// ```rust
/// # use cheep::prelude::*;
/// let mut mem = Mem::default();
/// mem.load_rom(&[0x00, 0xe0]).unwrap();
/// assert_eq!(mem.read_word(0x200).unwrap(), 0x00e0);
/// ```
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mem {
    bytes: Vec<u8>,
}

impl Mem {
    /// Constructs a memory bank with the font loaded and program space zeroed
    pub fn new() -> Self {
        let mut bytes = vec![0; MEM_SIZE];
        bytes[FONT_START as usize..FONT_START as usize + FONT.len()].copy_from_slice(&FONT);
        Mem { bytes }
    }

    /// Copies a ROM image into memory starting at [PROGRAM_START].
    ///
    /// Any previously loaded program is cleared first, so one bank can be
    /// reused across runs. An image larger than program space is refused
    /// with [Error::RomTooLarge]; nothing is ever truncated.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        let cap = MEM_SIZE - PROGRAM_START as usize;
        if rom.len() > cap {
            return Err(Error::RomTooLarge {
                len: rom.len(),
                cap,
            });
        }
        self.bytes[PROGRAM_START as usize..].fill(0);
        self.bytes[PROGRAM_START as usize..PROGRAM_START as usize + rom.len()]
            .copy_from_slice(rom);
        Ok(())
    }

    /// Reads a ROM image from disk and loads it at [PROGRAM_START]
    pub fn load_rom_file(&mut self, path: impl AsRef<std::path::Path>) -> Result<()> {
        self.load_rom(&std::fs::read(path)?)
    }

    /// Reads one byte. Any in-range address is readable, font table included.
    pub fn read(&self, addr: u16) -> Result<u8> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(Error::MemoryFault { addr })
    }

    /// Reads two consecutive bytes as a big-endian word (the fetch path)
    pub fn read_word(&self, addr: u16) -> Result<u16> {
        let hi = self.read(addr)?;
        let lo = self.read(addr.wrapping_add(1))?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    /// Borrows `len` bytes starting at `addr` (sprite reads)
    pub fn read_slice(&self, addr: u16, len: u16) -> Result<&[u8]> {
        self.bytes
            .get(addr as usize..addr as usize + len as usize)
            .ok_or(Error::MemoryFault {
                addr: addr.wrapping_add(len),
            })
    }

    /// Writes one byte into program space.
    ///
    /// The reserved interpreter area is not writable: no write may land
    /// below 0x200, so a misbehaving ROM faults instead of corrupting the
    /// font table.
    pub fn write(&mut self, addr: u16, value: u8) -> Result<()> {
        if addr < PROGRAM_START {
            return Err(Error::MemoryFault { addr });
        }
        match self.bytes.get_mut(addr as usize) {
            Some(byte) => {
                *byte = value;
                Ok(())
            }
            None => Err(Error::MemoryFault { addr }),
        }
    }

    /// Address of the font glyph for `digit` (low nibble only)
    pub fn glyph(digit: u8) -> u16 {
        FONT_START + FONT_HEIGHT * (digit & 0xf) as u16
    }

    /// Re-zeroes program space and reloads the font table
    pub fn reset(&mut self) {
        self.bytes.fill(0);
        self.bytes[FONT_START as usize..FONT_START as usize + FONT.len()].copy_from_slice(&FONT);
    }
}

impl Default for Mem {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Mem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mem")
            .field("bytes", &format_args!("[u8; {MEM_SIZE}]"))
            .finish()
    }
}
