// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for Cheep

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Cheep.
///
/// Every engine-level fault halts the instruction loop; none of them are
/// recoverable by retrying `step`. The host decides whether to abort the run
/// or present a diagnostic.
#[derive(Debug, Error)]
pub enum Error {
    /// The ROM image does not fit in program space
    #[error("rom is {len} bytes, but program space holds {cap}")]
    RomTooLarge {
        /// Size of the rejected image
        len: usize,
        /// Size of program space
        cap: usize,
    },
    /// A read or write left the addressable range, or a write targeted the
    /// reserved interpreter area below 0x200
    #[error("memory fault at {addr:04x}")]
    MemoryFault {
        /// The offending address
        addr: u16,
    },
    /// A 17th nested call was attempted
    #[error("call stack overflow at {pc:03x}")]
    StackOverflow {
        /// Address of the offending `2nnn`
        pc: u16,
    },
    /// Return was executed with an empty call stack
    #[error("return with empty call stack at {pc:03x}")]
    StackUnderflow {
        /// Address of the offending `00ee`
        pc: u16,
    },
    /// The fetched word decodes to no instruction
    #[error("opcode {word:04x} at {pc:03x} not recognized")]
    UnknownOpcode {
        /// The offending word
        word: u16,
        /// Address the word was fetched from
        pc: u16,
    },
    /// Tried to press or release a key that doesn't exist
    #[error("tried to press key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// Tried to set an out-of-bounds register
    #[error("tried to access register v{reg:X} which does not exist")]
    InvalidRegister {
        /// The offending register
        reg: usize,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
