// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod behavior;
pub mod flags;
pub mod instruction;
pub mod quirks;

use self::{
    flags::Flags,
    instruction::{disassembler::Dis, Insn},
    quirks::Quirks,
};
use crate::{
    error::{Error, Result},
    mem::{Mem, PROGRAM_START},
    screen::Screen,
};
use imperative_rs::InstructionSet;
use owo_colors::OwoColorize;
use std::fmt::Debug;

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// Maximum call depth: the stack holds 16 return addresses
pub const STACK_DEPTH: usize = 16;

/// Outcome of one [CPU::step] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// One instruction retired. `redraw` mirrors the framebuffer's
    /// redraw-pending flag so the host knows to hand the frame to its
    /// renderer.
    Ran {
        /// Whether the framebuffer changed and hasn't been consumed yet
        redraw: bool,
    },
    /// The engine is paused on `fx0a` until [CPU::press] delivers a key.
    /// Nothing was fetched; keep servicing timers and input and call
    /// [CPU::step] again.
    WaitingForKey,
}

/// The machine state the instruction set mutates: registers, counters, the
/// call stack, both timers and the key latch.
///
/// Memory and the framebuffer are owned separately (see [crate::Chip8]) and
/// borrowed per step, so a host can hand the screen to its renderer without
/// cloning the whole machine.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CPU {
    /// Engine housekeeping: trace switch, key-wait latch
    pub flags: Flags,
    /// Documented variant-behavior selections
    pub quirks: Quirks,
    // architectural state
    v: [u8; 16],
    i: Adr,
    pc: Adr,
    stack: Vec<Adr>,
    delay: u8,
    sound: u8,
    keys: [bool; 16],
    // execution data
    cycle: usize,
    #[cfg_attr(feature = "serde", serde(skip))]
    disassembler: Dis,
}

// public interface
impl CPU {
    /// Constructs a CPU in its power-on state: registers zeroed, empty
    /// stack, timers zero, keys released, `pc` at [PROGRAM_START].
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a single fetch/decode/execute cycle.
    ///
    /// The program counter advances past the fetched word *before* the
    /// handler body runs, so control-flow instructions set it freely and
    /// skips add a further 2. Engine faults ([Error::UnknownOpcode],
    /// [Error::MemoryFault], [Error::StackOverflow],
    /// [Error::StackUnderflow]) leave `pc` at the faulting instruction and
    /// halt the run: every subsequent `step` re-reports the same fault
    /// until the host intervenes.
    ///
    /// # Examples
    /// ```rust
    /// # use cheep::prelude::*;
    /// let (mut cpu, mut mem, mut screen) = (CPU::new(), Mem::new(), Screen::new());
    /// mem.load_rom(&[0x00, 0xe0]).unwrap();
    /// let step = cpu.step(&mut mem, &mut screen).unwrap();
    /// assert_eq!(step, Step::Ran { redraw: true });
    /// assert_eq!(cpu.pc(), 0x202);
    /// ```
    pub fn step(&mut self, mem: &mut Mem, screen: &mut Screen) -> Result<Step> {
        if self.flags.keypause {
            return Ok(Step::WaitingForKey);
        }
        let word = mem.read_word(self.pc)?;
        if self.flags.trace {
            std::println!(
                "{:3} {:03x}: {}",
                self.cycle.bright_black(),
                self.pc,
                self.disassembler.once(word)
            );
        }
        let (_, insn) = Insn::decode(&word.to_be_bytes()).map_err(|_| Error::UnknownOpcode {
            word,
            pc: self.pc,
        })?;
        self.pc = self.pc.wrapping_add(2);
        if let Err(fault) = self.execute(mem, screen, insn) {
            // park pc on the faulting instruction so the halt is observable
            // and every further step re-reports the same fault
            self.pc = self.pc.wrapping_sub(2);
            return Err(fault);
        }
        self.cycle += 1;
        Ok(if self.flags.keypause {
            Step::WaitingForKey
        } else {
            Step::Ran {
                redraw: screen.redraw_pending(),
            }
        })
    }

    /// Runs up to `steps` cycles, stopping early when the engine pauses on
    /// a key-wait. Timers are *not* advanced here; drive them separately at
    /// their own cadence (see [crate::timer::Ticker]).
    pub fn multistep(&mut self, mem: &mut Mem, screen: &mut Screen, steps: usize) -> Result<Step> {
        let mut last = Step::Ran { redraw: false };
        for _ in 0..steps {
            last = self.step(mem, screen)?;
            if last == Step::WaitingForKey {
                break;
            }
        }
        Ok(last)
    }

    /// Presses a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::InvalidKey].
    ///
    /// A press that arrives while the engine is paused on `fx0a` is
    /// recorded and ends the pause; the re-executed instruction reads it.
    ///
    /// # Examples
    /// ```rust
    /// # use cheep::prelude::*;
    /// let mut cpu = CPU::new();
    /// assert!(cpu.press(0x7).unwrap());
    /// // pressing a held key changes nothing
    /// assert!(!cpu.press(0x7).unwrap());
    /// ```
    pub fn press(&mut self, key: usize) -> Result<bool> {
        match self.keys.get_mut(key) {
            None => Err(Error::InvalidKey { key }),
            Some(held) if *held => Ok(false),
            Some(held) => {
                *held = true;
                if self.flags.keypause {
                    self.flags.lastkey = Some(key);
                    self.flags.keypause = false;
                }
                Ok(true)
            }
        }
    }

    /// Releases a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::InvalidKey].
    pub fn release(&mut self, key: usize) -> Result<bool> {
        match self.keys.get_mut(key) {
            None => Err(Error::InvalidKey { key }),
            Some(held) => Ok(std::mem::take(held)),
        }
    }

    /// Decrements both timers one 60 Hz tick, saturating at zero.
    ///
    /// Returns the one-shot tone trigger: true exactly when the sound
    /// timer ticks from 1 to 0. Meant to be driven by a
    /// [crate::timer::Ticker] on wall-clock time, never by the instruction
    /// loop.
    pub fn tick_timers(&mut self) -> bool {
        self.delay = self.delay.saturating_sub(1);
        if self.sound > 0 {
            self.sound -= 1;
            self.sound == 0
        } else {
            false
        }
    }

    /// Whether the audio collaborator should be sounding the tone
    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }

    /// Restores the power-on state. Quirk selections and the trace switch
    /// survive a reset; everything the program can observe does not.
    pub fn reset(&mut self) {
        self.flags.keypause = false;
        self.flags.lastkey = None;
        self.v = [0; 16];
        self.i = 0;
        self.pc = PROGRAM_START;
        self.stack.clear();
        self.delay = 0;
        self.sound = 0;
        self.keys = [false; 16];
        self.cycle = 0;
    }

    /// Sets a general purpose register.
    /// If the register doesn't exist, returns [Error::InvalidRegister].
    ///
    /// # Examples
    /// ```rust
    /// # use cheep::prelude::*;
    /// let mut cpu = CPU::new();
    /// cpu.set_v(0x4, 0x41).unwrap();
    /// assert_eq!(cpu.v()[0x4], 0x41);
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        match self.v.get_mut(reg) {
            Some(gpr) => {
                *gpr = value;
                Ok(())
            }
            None => Err(Error::InvalidRegister { reg }),
        }
    }

    /// Gets a slice of the general purpose registers
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the value in the delay timer register
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Gets the value in the sound timer register
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Gets the return addresses currently on the call stack
    pub fn stack(&self) -> &[Adr] {
        self.stack.as_slice()
    }

    /// Gets the number of instructions retired so far
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Dumps the current state of all CPU registers, and the cycle count
    ///
    /// ```text
    /// PC: 0200, SP: 0000, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0
    /// ```
    pub fn dump(&self) {
        std::println!(
            "PC: {:04x}, SP: {:04x}, I: {:04x}\n{}DLY: {}, SND: {}, CYC: {:6}",
            self.pc,
            self.stack.len(),
            self.i,
            self.v
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x} {}",
                        match i % 4 {
                            3 => "\n",
                            _ => "",
                        }
                    )
                })
                .collect::<String>(),
            self.delay,
            self.sound,
            self.cycle,
        );
    }
}

impl Debug for CPU {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPU")
            .field("flags", &self.flags)
            .field("quirks", &self.quirks)
            .field("v", &self.v)
            .field("i", &self.i)
            .field("pc", &self.pc)
            .field("stack", &self.stack)
            .field("delay", &self.delay)
            .field("sound", &self.sound)
            .field("keys", &self.keys)
            .field("cycle", &self.cycle)
            .finish_non_exhaustive()
    }
}

impl Default for CPU {
    fn default() -> Self {
        CPU {
            flags: Flags::default(),
            quirks: Quirks::default(),
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            stack: Vec::with_capacity(STACK_DEPTH),
            delay: 0,
            sound: 0,
            keys: [false; 16],
            cycle: 0,
            disassembler: Dis::default(),
        }
    }
}
