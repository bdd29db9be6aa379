// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Whole-machine tests through the public [Chip8] surface: the host-loop
//! contract, fault reporting, and the timer cadence.

use cheep::prelude::*;
use std::time::Duration;

/// Assembles words into a rom image
fn rom(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

#[test]
fn rom_too_large_is_a_load_error() {
    let oversized = vec![0u8; 4096 - 0x200 + 1];
    assert!(matches!(
        Chip8::new(&oversized),
        Err(Error::RomTooLarge { .. })
    ));
    // the host may retry with a rom that fits
    Chip8::new(&vec![0u8; 4096 - 0x200]).unwrap();
}

#[test]
fn a_small_program_runs_to_completion() {
    // compute 157 = 0x2b + 0x72, spell it out in bcd, read it back
    let mut vm = Chip8::new(&rom(&[
        0x602b, // ld  v0, #2b
        0x6172, // ld  v1, #72
        0x8014, // add v0, v1
        0xa300, // ld  I, 300
        0xf033, // bcd v0
        0xf265, // ld  v0..v2, [I]
    ]))
    .unwrap();
    vm.multistep(6).unwrap();
    assert_eq!(vm.cpu.v()[..3], [1, 5, 7]);
    assert_eq!(vm.cpu.v()[0xf], 0);
}

#[test]
fn redraw_flag_reaches_the_renderer_once() {
    let mut vm = Chip8::new(&rom(&[
        0x6205, // ld  v2, #05
        0xf229, // ld  F, v2
        0xd005, // drw v0, v0, #5
        0x1206, // jp  206 (spin)
    ]))
    .unwrap();
    vm.multistep(3).unwrap();
    assert_eq!(vm.step().unwrap(), Step::Ran { redraw: true });
    // renderer consumes the flag; the spinning program sets no new one
    assert!(vm.screen.take_redraw());
    assert_eq!(vm.step().unwrap(), Step::Ran { redraw: false });
    // the glyph for 5 was drawn at the origin
    assert!(vm.screen.pixel(0, 0));
}

#[test]
fn sixteen_calls_fit_and_the_seventeenth_faults() {
    // a ladder of calls, each to the next word
    let ladder: Vec<u16> = (0..17).map(|n| 0x2202 + n * 2).collect();
    let mut vm = Chip8::new(&rom(&ladder)).unwrap();
    for _ in 0..16 {
        vm.step().unwrap();
    }
    match vm.step() {
        Err(Error::StackOverflow { pc }) => assert_eq!(pc, 0x220),
        other => panic!("expected stack overflow, got {other:?}"),
    }
}

#[test]
fn subroutines_return_and_an_extra_return_faults() {
    let mut vm = Chip8::new(&rom(&[
        0x2206, // call 206
        0x6142, // ld v1, #42 (after the return)
        0x00ee, // ret with nothing left to pop
        0x6001, // ld v0, #01 (the subroutine)
        0x00ee, // ret
    ]))
    .unwrap();
    for _ in 0..4 {
        vm.step().unwrap();
    }
    assert_eq!(vm.cpu.v()[0x0], 0x01);
    assert_eq!(vm.cpu.v()[0x1], 0x42);
    assert_eq!(vm.cpu.stack(), &[]);
    assert!(matches!(
        vm.step(),
        Err(Error::StackUnderflow { pc: 0x204 })
    ));
}

#[test]
fn unknown_opcode_halts_with_diagnostics() {
    let mut vm = Chip8::new(&rom(&[0x6000, 0x9999])).unwrap();
    vm.step().unwrap();
    for _ in 0..3 {
        match vm.step() {
            Err(Error::UnknownOpcode { word, pc }) => {
                assert_eq!(word, 0x9999);
                assert_eq!(pc, 0x202);
            }
            other => panic!("expected unknown opcode, got {other:?}"),
        }
    }
    // the message carries both values for the host's diagnostic
    let text = vm.step().unwrap_err().to_string();
    assert!(text.contains("9999"));
    assert!(text.contains("202"));
}

#[test]
fn timers_follow_wall_clock_not_step_rate() {
    let mut vm = Chip8::new(&rom(&[
        0x600a, // ld v0, #0a
        0xf015, // ld DT, v0
        0x1204, // jp 204 (spin)
    ]))
    .unwrap();
    vm.multistep(2).unwrap();
    assert_eq!(vm.cpu.delay(), 10);

    // a burst of instructions moves no timer
    vm.multistep(1000).unwrap();
    assert_eq!(vm.cpu.delay(), 10);

    // a sixth of a second is ten ticks: 10 -> 0, never negative
    assert!(!vm.run_timers(Duration::from_micros(166_700)));
    assert_eq!(vm.cpu.delay(), 0);
    vm.run_timers(Duration::from_secs(1));
    assert_eq!(vm.cpu.delay(), 0);
}

#[test]
fn tone_fires_once_when_sound_runs_out() {
    let mut vm = Chip8::new(&rom(&[
        0x6003, // ld v0, #03
        0xf018, // ld ST, v0
        0x1204, // jp 204 (spin)
    ]))
    .unwrap();
    vm.multistep(2).unwrap();
    assert!(vm.sound_active());

    // two ticks leave the tone sounding
    assert!(!vm.run_timers(Duration::from_micros(33_400)));
    assert!(vm.sound_active());
    // the third tick is the 1 -> 0 edge
    assert!(vm.run_timers(Duration::from_micros(16_700)));
    assert!(!vm.sound_active());
    // and it never re-fires
    assert!(!vm.run_timers(Duration::from_secs(1)));
}

#[test]
fn key_wait_parks_the_engine_but_not_the_timers() {
    let mut vm = Chip8::new(&rom(&[
        0x6005, // ld v0, #05
        0xf015, // ld DT, v0
        0xf30a, // ld v3, K
        0x6a99, // ld vA, #99
    ]))
    .unwrap();
    vm.multistep(2).unwrap();
    assert_eq!(vm.step().unwrap(), Step::WaitingForKey);

    // the 60 Hz cadence continues while the engine is parked
    vm.run_timers(Duration::from_micros(50_100));
    assert_eq!(vm.cpu.delay(), 2);
    assert_eq!(vm.step().unwrap(), Step::WaitingForKey);

    // a key press resumes execution and is delivered to v3
    vm.press(0xc).unwrap();
    vm.multistep(2).unwrap();
    assert_eq!(vm.cpu.v()[0x3], 0xc);
    assert_eq!(vm.cpu.v()[0xa], 0x99);
}

#[test]
fn reset_allows_a_second_run_in_the_same_process() {
    let mut vm = Chip8::new(&rom(&[0x6aff, 0xa234, 0x2208, 0x00e0])).unwrap();
    vm.multistep(3).unwrap();
    assert_ne!(vm.cpu.pc(), 0x200);

    vm.reset();
    assert_eq!(vm.cpu.pc(), 0x200);
    assert_eq!(vm.cpu.v(), [0; 16]);
    assert_eq!(vm.cpu.i(), 0);
    assert_eq!(vm.cpu.stack(), &[]);
    assert!(!vm.screen.redraw_pending());
    // the font survives the wipe, the old program does not
    assert_eq!(vm.mem.read(0x000).unwrap(), 0xf0);
    assert_eq!(vm.mem.read(0x200).unwrap(), 0x00);

    // load a fresh rom and go again
    vm.mem.load_rom(&rom(&[0x6b42])).unwrap();
    vm.step().unwrap();
    assert_eq!(vm.cpu.v()[0xb], 0x42);
}

#[test]
fn collision_is_observable_from_the_host() {
    let mut vm = Chip8::new(&rom(&[
        0xf029, // ld F, v0 (glyph 0)
        0xd125, // drw v1, v2, #5
        0xd125, // drw again: every pixel erased, collision set
    ]))
    .unwrap();
    vm.multistep(2).unwrap();
    assert_eq!(vm.cpu.v()[0xf], 0);
    vm.step().unwrap();
    assert_eq!(vm.cpu.v()[0xf], 1);
    assert_eq!(vm.screen.rows(), &[0u64; 32]);
}
