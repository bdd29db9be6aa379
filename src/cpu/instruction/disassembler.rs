// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Renders Chip-8 words as styled assembly for the trace log.

use super::Insn;
use crate::mem::Mem;
use imperative_rs::InstructionSet;
use owo_colors::{OwoColorize, Style};

/// Formats opcodes as mnemonics, one [owo_colors::Style] for words that
/// decode and another for words that don't.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dis {
    /// Styles words with no decoding
    pub invalid: Style,
    /// Styles decoded instructions
    pub normal: Style,
}

impl Default for Dis {
    fn default() -> Self {
        Self {
            invalid: Style::new().bold().red(),
            normal: Style::new().green(),
        }
    }
}

impl Dis {
    /// Disassembles a single word
    pub fn once(&self, word: u16) -> String {
        match Insn::decode(&word.to_be_bytes()) {
            Ok((_, insn)) => format!("{}", insn.style(self.normal)),
            Err(_) => format!("{}", format_args!("inval  {word:04x}").style(self.invalid)),
        }
    }

    /// Produces a `addr: mnemonic` listing of a span of memory, two bytes
    /// per line. Words that decode to nothing are listed too; data regions
    /// of a rom are indistinguishable from code.
    pub fn listing(&self, mem: &Mem, addrs: std::ops::Range<u16>) -> String {
        addrs
            .step_by(2)
            .filter_map(|addr| {
                let word = mem.read_word(addr).ok()?;
                Some(format!("{addr:03x}: {}\n", self.once(word)))
            })
            .collect()
    }
}
