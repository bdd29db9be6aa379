// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! This crate implements the core of a Chip-8 virtual machine: the
//! fetch/decode/execute engine and the machine state it mutates (memory,
//! registers, call stack, both 60 Hz timers, the 64x32 framebuffer and the
//! 16-key input latch). Rendering, audio synthesis, physical-key mapping and
//! ROM acquisition are the host's problem; this crate only exposes the
//! surfaces they consume.
//!
//! # Host loop contract
//!
//! Call [Chip8::step] at whatever instruction rate suits the ROM (500 to
//! 1000 Hz is typical). On [Step::Ran] with `redraw` set, hand
//! [Chip8::screen] to the renderer and consume the flag with
//! [Screen::take_redraw]. Feed elapsed wall-clock time to
//! [Chip8::run_timers] so the timers decrement at their fixed 60 Hz rate
//! independent of instruction throughput; its return value is the one-shot
//! tone trigger for the audio collaborator, and [Chip8::sound_active] is
//! the level signal. [Step::WaitingForKey] means the machine is paused on
//! the `fx0a` key-wait: keep pumping input and timers, and deliver key
//! events through [Chip8::press]/[Chip8::release] until the engine resumes.
//!
//! Every engine fault ([error::Error]) is fatal to the run and is returned,
//! never swallowed; the host decides whether to reset, reload, or surface a
//! diagnostic.
//!
//! # Sharing with collaborator threads
//!
//! The engine itself is single-threaded and `step` is atomic: no external
//! observer may see a half-executed instruction. When collaborators run on
//! other threads, the only state they may touch is the key latch
//! (`press`/`release`), the framebuffer + redraw flag, and the sound
//! signal. Wrap the [Chip8] in the synchronization of your choice (a mutex
//! around the whole machine, or message passing into the engine thread);
//! everything else is exclusively the engine thread's.
//!
//! ```rust
//! use cheep::prelude::*;
//! use std::time::Duration;
//!
//! // 6xkk, then an endless 1nnn self-loop
//! let mut vm = Chip8::new(&[0x6a, 0x2b, 0x12, 0x02]).unwrap();
//! vm.step().unwrap();
//! assert_eq!(vm.cpu.v()[0xa], 0x2b);
//! // timers run on wall-clock time, not instruction count
//! assert!(!vm.run_timers(Duration::from_millis(100)));
//! ```

pub mod cpu;
pub mod error;
pub mod mem;
pub mod screen;
pub mod timer;

use cpu::{Step, CPU};
use error::Result;
use mem::Mem;
use screen::Screen;
use timer::Ticker;

/// A whole Chip-8 machine: engine, memory, framebuffer and timer cadence.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chip8 {
    /// The decode/execute engine and machine registers
    pub cpu: CPU,
    /// The 4 KiB memory bank
    pub mem: Mem,
    /// The 64x32 framebuffer and redraw flag
    pub screen: Screen,
    /// The 60 Hz timer accumulator
    pub ticker: Ticker,
}

impl Chip8 {
    /// Builds a machine with `rom` loaded and ready to run
    ///
    /// # Examples
    /// ```rust
    /// # use cheep::prelude::*;
    /// let vm = Chip8::new(&[0x00, 0xe0]).unwrap();
    /// assert_eq!(vm.cpu.pc(), 0x200);
    /// ```
    pub fn new(rom: &[u8]) -> Result<Self> {
        let mut vm = Chip8::default();
        vm.mem.load_rom(rom)?;
        Ok(vm)
    }

    /// Builds a machine from a ROM image on disk
    pub fn from_rom_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::new(&std::fs::read(path)?)
    }

    /// Executes one fetch/decode/execute cycle. See [CPU::step].
    pub fn step(&mut self) -> Result<Step> {
        self.cpu.step(&mut self.mem, &mut self.screen)
    }

    /// Runs up to `steps` cycles, stopping early on a key-wait.
    /// See [CPU::multistep].
    pub fn multistep(&mut self, steps: usize) -> Result<Step> {
        self.cpu.multistep(&mut self.mem, &mut self.screen, steps)
    }

    /// Banks elapsed wall-clock time and applies any 60 Hz timer ticks that
    /// came due. Returns the one-shot tone trigger (sound timer reached
    /// zero on one of those ticks).
    pub fn run_timers(&mut self, elapsed: std::time::Duration) -> bool {
        let mut tone = false;
        for _ in 0..self.ticker.advance(elapsed) {
            tone |= self.cpu.tick_timers();
        }
        tone
    }

    /// Presses a key (input collaborator surface). See [CPU::press].
    pub fn press(&mut self, key: usize) -> Result<bool> {
        self.cpu.press(key)
    }

    /// Releases a key (input collaborator surface). See [CPU::release].
    pub fn release(&mut self, key: usize) -> Result<bool> {
        self.cpu.release(key)
    }

    /// Whether the tone should currently be sounding
    pub fn sound_active(&self) -> bool {
        self.cpu.sound_active()
    }

    /// Restarts the machine: registers, stack, timers, keys and screen
    /// return to power-on state and the font table is restored. The loaded
    /// ROM is *not* preserved; load the next one with [Mem::load_rom].
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.mem.reset();
        self.screen.clear();
        self.screen.take_redraw();
        self.ticker.reset();
    }
}

/// Common imports for cheep
pub mod prelude {
    pub use super::Chip8;
    pub use crate::cpu::{Step, CPU};
    pub use crate::error::{Error, Result};
    pub use crate::mem::Mem;
    pub use crate::screen::Screen;
    pub use crate::timer::Ticker;
}
