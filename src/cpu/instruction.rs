// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains the definition of a Chip-8 [Insn]

pub mod disassembler;

use imperative_rs::InstructionSet;
use std::fmt::Display;

/// The 35 instructions of the base Chip-8 set.
///
/// Decoding is driven by the `#[opcode]` patterns: constant nibbles are hex
/// digits, `x`/`y` select registers, `n` is an address or sprite height and
/// `k` an immediate byte. Anything that matches no pattern is reported by
/// the engine as [crate::error::Error::UnknownOpcode].
#[derive(Clone, Copy, Debug, InstructionSet, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Insn {
    /// | 00e0 | Clear the framebuffer
    #[opcode = "0x00e0"]
    Cls,
    /// | 00ee | Pop the stack into pc
    #[opcode = "0x00ee"]
    Ret,
    /// | 1nnn | Jump to address n
    #[opcode = "0x1nnn"]
    Jump { n: u16 },
    /// | 2nnn | Push pc, then jump to address n
    #[opcode = "0x2nnn"]
    Call { n: u16 },
    /// | 3xkk | Skip next instruction if vX == k
    #[opcode = "0x3xkk"]
    SkipEqImm { x: usize, k: u8 },
    /// | 4xkk | Skip next instruction if vX != k
    #[opcode = "0x4xkk"]
    SkipNeImm { x: usize, k: u8 },
    /// | 5xy0 | Skip next instruction if vX == vY
    #[opcode = "0x5xy0"]
    SkipEq { x: usize, y: usize },
    /// | 6xkk | vX = k
    #[opcode = "0x6xkk"]
    LoadImm { x: usize, k: u8 },
    /// | 7xkk | vX += k, no flag change
    #[opcode = "0x7xkk"]
    AddImm { x: usize, k: u8 },
    /// | 8xy0 | vX = vY
    #[opcode = "0x8xy0"]
    Move { x: usize, y: usize },
    /// | 8xy1 | vX |= vY
    #[opcode = "0x8xy1"]
    Or { x: usize, y: usize },
    /// | 8xy2 | vX &= vY
    #[opcode = "0x8xy2"]
    And { x: usize, y: usize },
    /// | 8xy3 | vX ^= vY
    #[opcode = "0x8xy3"]
    Xor { x: usize, y: usize },
    /// | 8xy4 | vX += vY; vF = carry
    #[opcode = "0x8xy4"]
    Add { x: usize, y: usize },
    /// | 8xy5 | vX -= vY; vF = no borrow
    #[opcode = "0x8xy5"]
    Sub { x: usize, y: usize },
    /// | 8xy6 | vF = low bit of vX; vX >>= 1
    #[opcode = "0x8xy6"]
    Shr { x: usize, y: usize },
    /// | 8xy7 | vX = vY - vX; vF = no borrow
    #[opcode = "0x8xy7"]
    SubFrom { x: usize, y: usize },
    /// | 8xyE | vF = high bit of vX; vX <<= 1
    #[opcode = "0x8xye"]
    Shl { x: usize, y: usize },
    /// | 9xy0 | Skip next instruction if vX != vY
    #[opcode = "0x9xy0"]
    SkipNe { x: usize, y: usize },
    /// | annn | I = n
    #[opcode = "0xannn"]
    LoadI { n: u16 },
    /// | bnnn | Jump to address n + v0
    #[opcode = "0xbnnn"]
    JumpV0 { n: u16 },
    /// | cxkk | vX = random byte & k
    #[opcode = "0xcxkk"]
    Rand { x: usize, k: u8 },
    /// | dxyn | XOR the n-byte sprite at I onto the screen at (vX, vY)
    #[opcode = "0xdxyn"]
    Draw { x: usize, y: usize, n: u8 },
    /// | ex9e | Skip next instruction if key vX is pressed
    #[opcode = "0xex9e"]
    SkipKey { x: usize },
    /// | exa1 | Skip next instruction if key vX is not pressed
    #[opcode = "0xexa1"]
    SkipNoKey { x: usize },
    /// | fx07 | vX = delay timer
    #[opcode = "0xfx07"]
    GetDelay { x: usize },
    /// | fx0a | Pause until a key is pressed; vX = that key
    #[opcode = "0xfx0a"]
    WaitKey { x: usize },
    /// | fx15 | delay timer = vX
    #[opcode = "0xfx15"]
    SetDelay { x: usize },
    /// | fx18 | sound timer = vX
    #[opcode = "0xfx18"]
    SetSound { x: usize },
    /// | fx1e | I += vX
    #[opcode = "0xfx1e"]
    AddI { x: usize },
    /// | fx29 | I = font glyph for the low nibble of vX
    #[opcode = "0xfx29"]
    Glyph { x: usize },
    /// | fx33 | Store the decimal digits of vX at I, I+1, I+2
    #[opcode = "0xfx33"]
    Bcd { x: usize },
    /// | fx55 | Store v0..=vX into memory at I
    #[opcode = "0xfx55"]
    Store { x: usize },
    /// | fx65 | Load v0..=vX from memory at I
    #[opcode = "0xfx65"]
    Load { x: usize },
}

impl Display for Insn {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Insn::Cls                  => write!(f, "cls    "),
            Insn::Ret                  => write!(f, "ret    "),
            Insn::Jump { n }           => write!(f, "jp     {n:03x}"),
            Insn::Call { n }           => write!(f, "call   {n:03x}"),
            Insn::SkipEqImm { x, k }   => write!(f, "se     v{x:X}, #{k:02x}"),
            Insn::SkipNeImm { x, k }   => write!(f, "sne    v{x:X}, #{k:02x}"),
            Insn::SkipEq { x, y }      => write!(f, "se     v{x:X}, v{y:X}"),
            Insn::LoadImm { x, k }     => write!(f, "ld     v{x:X}, #{k:02x}"),
            Insn::AddImm { x, k }      => write!(f, "add    v{x:X}, #{k:02x}"),
            Insn::Move { x, y }        => write!(f, "ld     v{x:X}, v{y:X}"),
            Insn::Or { x, y }          => write!(f, "or     v{x:X}, v{y:X}"),
            Insn::And { x, y }         => write!(f, "and    v{x:X}, v{y:X}"),
            Insn::Xor { x, y }         => write!(f, "xor    v{x:X}, v{y:X}"),
            Insn::Add { x, y }         => write!(f, "add    v{x:X}, v{y:X}"),
            Insn::Sub { x, y }         => write!(f, "sub    v{x:X}, v{y:X}"),
            Insn::Shr { x, y }         => write!(f, "shr    v{x:X}, v{y:X}"),
            Insn::SubFrom { x, y }     => write!(f, "subn   v{x:X}, v{y:X}"),
            Insn::Shl { x, y }         => write!(f, "shl    v{x:X}, v{y:X}"),
            Insn::SkipNe { x, y }      => write!(f, "sne    v{x:X}, v{y:X}"),
            Insn::LoadI { n }          => write!(f, "ld     I, {n:03x}"),
            Insn::JumpV0 { n }         => write!(f, "jp     v0+{n:03x}"),
            Insn::Rand { x, k }        => write!(f, "rnd    v{x:X}, #{k:02x}"),
            Insn::Draw { x, y, n }     => write!(f, "drw    v{x:X}, v{y:X}, #{n:x}"),
            Insn::SkipKey { x }        => write!(f, "skp    v{x:X}"),
            Insn::SkipNoKey { x }      => write!(f, "sknp   v{x:X}"),
            Insn::GetDelay { x }       => write!(f, "ld     v{x:X}, DT"),
            Insn::WaitKey { x }        => write!(f, "ld     v{x:X}, K"),
            Insn::SetDelay { x }       => write!(f, "ld     DT, v{x:X}"),
            Insn::SetSound { x }       => write!(f, "ld     ST, v{x:X}"),
            Insn::AddI { x }           => write!(f, "add    I, v{x:X}"),
            Insn::Glyph { x }          => write!(f, "ld     F, v{x:X}"),
            Insn::Bcd { x }            => write!(f, "bcd    v{x:X}, &I"),
            Insn::Store { x }          => write!(f, "ld     [I], v{x:X}"),
            Insn::Load { x }           => write!(f, "ld     v{x:X}, [I]"),
        }
    }
}
