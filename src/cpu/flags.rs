// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Represents engine state that aids in operation but isn't part of the
//! Chip-8 machine model.

/// Engine housekeeping: the trace switch and the `fx0a` key-wait latch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flags {
    /// Set when live disassembly of each retired instruction is enabled
    pub trace: bool,
    /// Set while the engine is paused on `fx0a` waiting for a keypress
    pub keypause: bool,
    /// The key delivered by [crate::cpu::CPU::press] during a keypause,
    /// consumed when `fx0a` re-executes
    pub lastkey: Option<usize>,
}

impl Flags {
    /// Toggles instruction tracing
    pub fn trace(&mut self) {
        self.trace = !self.trace
    }
}
