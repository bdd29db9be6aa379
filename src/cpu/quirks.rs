// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Controls the [Quirks] behavior of the CPU on a granular level.
//!
//! Historical Chip-8 interpreters disagree on a handful of instruction
//! semantics. The defaults here are the one self-consistent policy the
//! machine commits to; each field opts into a named variant, never into
//! free-form ambiguity.

/// Controls the quirk behavior of the CPU on a granular level.
///
/// `Default` selects the documented baseline semantics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quirks {
    /// COSMAC VIP variant: `8xy6`/`8xyE` shift vY into vX instead of
    /// shifting vX in place
    pub shift_src_y: bool,
    /// `fx1e` faults with a memory fault when I leaves the 12-bit address
    /// space, instead of wrapping at 0x1000
    pub index_fault: bool,
}
