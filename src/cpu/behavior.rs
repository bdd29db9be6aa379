// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains implementations for each Chip-8 [Insn]

use super::*;
use rand::random;

impl CPU {
    /// Executes a single [Insn] against memory and the framebuffer
    #[rustfmt::skip]
    #[inline(always)]
    pub(super) fn execute(&mut self, mem: &mut Mem, screen: &mut Screen, insn: Insn) -> Result<()> {
        match insn {
            Insn::Cls                 => Ok(screen.clear()),
            Insn::Ret                 => self.ret(),
            Insn::Jump      {       n } => Ok(self.jump(n)),
            Insn::Call      {       n } => self.call(n),
            Insn::SkipEqImm {    x, k } => Ok(self.skip_eq_imm(x, k)),
            Insn::SkipNeImm {    x, k } => Ok(self.skip_ne_imm(x, k)),
            Insn::SkipEq    { x, y    } => Ok(self.skip_eq(x, y)),
            Insn::LoadImm   {    x, k } => Ok(self.load_imm(x, k)),
            Insn::AddImm    {    x, k } => Ok(self.add_imm(x, k)),
            Insn::Move      { x, y    } => Ok(self.copy(x, y)),
            Insn::Or        { x, y    } => Ok(self.or(x, y)),
            Insn::And       { x, y    } => Ok(self.and(x, y)),
            Insn::Xor       { x, y    } => Ok(self.xor(x, y)),
            Insn::Add       { x, y    } => Ok(self.add(x, y)),
            Insn::Sub       { x, y    } => Ok(self.sub(x, y)),
            Insn::Shr       { x, y    } => Ok(self.shift_right(x, y)),
            Insn::SubFrom   { x, y    } => Ok(self.sub_from(x, y)),
            Insn::Shl       { x, y    } => Ok(self.shift_left(x, y)),
            Insn::SkipNe    { x, y    } => Ok(self.skip_ne(x, y)),
            Insn::LoadI     {       n } => Ok(self.load_i(n)),
            Insn::JumpV0    {       n } => Ok(self.jump_v0(n)),
            Insn::Rand      {    x, k } => Ok(self.rand(x, k)),
            Insn::Draw      { x, y, n } => self.draw(x, y, n, mem, screen),
            Insn::SkipKey   {    x    } => Ok(self.skip_key(x)),
            Insn::SkipNoKey {    x    } => Ok(self.skip_no_key(x)),
            Insn::GetDelay  {    x    } => Ok(self.get_delay(x)),
            Insn::WaitKey   {    x    } => Ok(self.wait_for_key(x)),
            Insn::SetDelay  {    x    } => Ok(self.set_delay(x)),
            Insn::SetSound  {    x    } => Ok(self.set_sound(x)),
            Insn::AddI      {    x    } => self.add_i(x),
            Insn::Glyph     {    x    } => Ok(self.glyph(x)),
            Insn::Bcd       {    x    } => self.bcd_convert(x, mem),
            Insn::Store     {    x    } => self.store_regs(x, mem),
            Insn::Load      {    x    } => self.load_regs(x, mem),
        }
    }
}

/// |`00ee`| Subroutine return
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`00e0`| Clear the framebuffer (see [Screen::clear]) |
/// |`00ee`| Pop the stack into pc              |
impl CPU {
    /// |`00ee`| Pops the stack into pc.
    ///
    /// An empty stack is a fault, not a silent restart.
    #[inline(always)]
    pub(super) fn ret(&mut self) -> Result<()> {
        self.pc = self.stack.pop().ok_or(Error::StackUnderflow {
            pc: self.pc.wrapping_sub(2),
        })?;
        Ok(())
    }
}

/// |`1nnn`| Sets pc to an absolute address
impl CPU {
    /// |`1nnn`| Sets the program counter to an absolute address
    #[inline(always)]
    pub(super) fn jump(&mut self, n: Adr) {
        self.pc = n;
    }
}

/// |`2nnn`| Pushes pc onto the stack, then jumps to n
impl CPU {
    /// |`2nnn`| Pushes pc onto the stack, then jumps to n.
    ///
    /// The stack holds [STACK_DEPTH] return addresses; one more call faults.
    #[inline(always)]
    pub(super) fn call(&mut self, n: Adr) -> Result<()> {
        if self.stack.len() >= STACK_DEPTH {
            return Err(Error::StackOverflow {
                pc: self.pc.wrapping_sub(2),
            });
        }
        self.stack.push(self.pc);
        self.pc = n;
        Ok(())
    }
}

/// |`3xkk`..`5xy0`, `9xy0`| Conditional skips
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`3xkk`| Skip next instruction if vX == k   |
/// |`4xkk`| Skip next instruction if vX != k   |
/// |`5xy0`| Skip next instruction if vX == vY  |
/// |`9xy0`| Skip next instruction if vX != vY  |
impl CPU {
    /// |`3xkk`| Skips the next instruction if vX == k
    #[inline(always)]
    pub(super) fn skip_eq_imm(&mut self, x: Reg, k: u8) {
        if self.v[x] == k {
            self.pc = self.pc.wrapping_add(2);
        }
    }
    /// |`4xkk`| Skips the next instruction if vX != k
    #[inline(always)]
    pub(super) fn skip_ne_imm(&mut self, x: Reg, k: u8) {
        if self.v[x] != k {
            self.pc = self.pc.wrapping_add(2);
        }
    }
    /// |`5xy0`| Skips the next instruction if vX == vY
    #[inline(always)]
    pub(super) fn skip_eq(&mut self, x: Reg, y: Reg) {
        if self.v[x] == self.v[y] {
            self.pc = self.pc.wrapping_add(2);
        }
    }
    /// |`9xy0`| Skips the next instruction if vX != vY
    #[inline(always)]
    pub(super) fn skip_ne(&mut self, x: Reg, y: Reg) {
        if self.v[x] != self.v[y] {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`6xkk`, `7xkk`| Immediate loads
impl CPU {
    /// |`6xkk`| Loads immediate byte k into vX
    #[inline(always)]
    pub(super) fn load_imm(&mut self, x: Reg, k: u8) {
        self.v[x] = k;
    }
    /// |`7xkk`| Adds immediate byte k to vX, wrapping. vF is untouched.
    #[inline(always)]
    pub(super) fn add_imm(&mut self, x: Reg, k: u8) {
        self.v[x] = self.v[x].wrapping_add(k);
    }
}

/// |`8xyn`| ALU operations
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`8xy0`| vX = vY                            |
/// |`8xy1`| vX = vX | vY                       |
/// |`8xy2`| vX = vX & vY                       |
/// |`8xy3`| vX = vX ^ vY                       |
/// |`8xy4`| vX = vX + vY; vF = carry           |
/// |`8xy5`| vX = vX - vY; vF = !borrow         |
/// |`8xy6`| vF = vX & 1; vX = vX >> 1          |
/// |`8xy7`| vX = vY - vX; vF = !borrow         |
/// |`8xyE`| vF = vX >> 7; vX = vX << 1         |
///
/// Flag outputs are computed from the operands as they were before the
/// mutation, then written last, so vF-as-destination still ends up holding
/// the flag.
impl CPU {
    /// |`8xy0`| Loads the value of vY into vX
    #[inline(always)]
    pub(super) fn copy(&mut self, x: Reg, y: Reg) {
        self.v[x] = self.v[y];
    }
    /// |`8xy1`| Bitwise or of vX and vY, stored in vX
    #[inline(always)]
    pub(super) fn or(&mut self, x: Reg, y: Reg) {
        self.v[x] |= self.v[y];
    }
    /// |`8xy2`| Bitwise and of vX and vY, stored in vX
    #[inline(always)]
    pub(super) fn and(&mut self, x: Reg, y: Reg) {
        self.v[x] &= self.v[y];
    }
    /// |`8xy3`| Bitwise xor of vX and vY, stored in vX
    #[inline(always)]
    pub(super) fn xor(&mut self, x: Reg, y: Reg) {
        self.v[x] ^= self.v[y];
    }
    /// |`8xy4`| Wrapping add; vF = 1 iff the unsigned sum exceeds 255
    #[inline(always)]
    pub(super) fn add(&mut self, x: Reg, y: Reg) {
        let (sum, carry) = self.v[x].overflowing_add(self.v[y]);
        self.v[x] = sum;
        self.v[0xf] = carry.into();
    }
    /// |`8xy5`| Wrapping subtract; vF = 1 iff vX >= vY going in
    #[inline(always)]
    pub(super) fn sub(&mut self, x: Reg, y: Reg) {
        let (diff, borrow) = self.v[x].overflowing_sub(self.v[y]);
        self.v[x] = diff;
        self.v[0xf] = (!borrow).into();
    }
    /// |`8xy6`| vF = pre-shift low bit; vX = source >> 1
    ///
    /// # Quirk
    /// The COSMAC VIP shifted vY into vX; [Quirks::shift_src_y] restores that.
    #[inline(always)]
    pub(super) fn shift_right(&mut self, x: Reg, y: Reg) {
        let value = self.v[if self.quirks.shift_src_y { y } else { x }];
        self.v[x] = value >> 1;
        self.v[0xf] = value & 1;
    }
    /// |`8xy7`| vX = vY - vX, wrapping; vF = 1 iff vY >= vX going in
    #[inline(always)]
    pub(super) fn sub_from(&mut self, x: Reg, y: Reg) {
        let (diff, borrow) = self.v[y].overflowing_sub(self.v[x]);
        self.v[x] = diff;
        self.v[0xf] = (!borrow).into();
    }
    /// |`8xyE`| vF = pre-shift high bit; vX = source << 1, wrapping
    ///
    /// # Quirk
    /// The COSMAC VIP shifted vY into vX; [Quirks::shift_src_y] restores that.
    #[inline(always)]
    pub(super) fn shift_left(&mut self, x: Reg, y: Reg) {
        let value = self.v[if self.quirks.shift_src_y { y } else { x }];
        self.v[x] = value << 1;
        self.v[0xf] = value >> 7;
    }
}

/// |`annn`, `bnnn`| Index and indexed jump
impl CPU {
    /// |`annn`| Loads address n into I
    #[inline(always)]
    pub(super) fn load_i(&mut self, n: Adr) {
        self.i = n;
    }
    /// |`bnnn`| Jumps to n + v0
    #[inline(always)]
    pub(super) fn jump_v0(&mut self, n: Adr) {
        self.pc = n.wrapping_add(self.v[0] as Adr);
    }
}

/// |`cxkk`| Random number generation
impl CPU {
    /// |`cxkk`| Stores a random byte masked with k into vX
    #[inline(always)]
    pub(super) fn rand(&mut self, x: Reg, k: u8) {
        self.v[x] = random::<u8>() & k;
    }
}

/// |`dxyn`| Sprite drawing
impl CPU {
    /// |`dxyn`| XORs the n-byte sprite at I onto the screen at (vX, vY).
    ///
    /// Pixels wrap at the screen edges rather than clipping; vF reports
    /// whether any lit pixel was erased. Reading the sprite past the end of
    /// memory is a fault.
    #[inline(always)]
    pub(super) fn draw(
        &mut self,
        x: Reg,
        y: Reg,
        n: Nib,
        mem: &Mem,
        screen: &mut Screen,
    ) -> Result<()> {
        let sprite = mem.read_slice(self.i, n as u16)?;
        self.v[0xf] = screen.draw_sprite(self.v[x], self.v[y], sprite).into();
        Ok(())
    }
}

/// |`ex9e`, `exa1`| Skips on key state
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`ex9e`| Skip next instruction if key vX is pressed |
/// |`exa1`| Skip next instruction if key vX is *not* pressed |
impl CPU {
    /// |`ex9e`| Skips the next instruction if key vX is pressed
    #[inline(always)]
    pub(super) fn skip_key(&mut self, x: Reg) {
        if self.keys[self.v[x] as usize & 0xf] {
            self.pc = self.pc.wrapping_add(2);
        }
    }
    /// |`exa1`| Skips the next instruction if key vX is not pressed
    #[inline(always)]
    pub(super) fn skip_no_key(&mut self, x: Reg) {
        if !self.keys[self.v[x] as usize & 0xf] {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`fxnn`| Timers, key-wait and memory traffic
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`fx07`| vX = delay timer                   |
/// |`fx0a`| Pause until a key arrives; vX = key|
/// |`fx15`| delay timer = vX                   |
/// |`fx18`| sound timer = vX                   |
/// |`fx1e`| I = I + vX                         |
/// |`fx29`| I = glyph address for vX           |
/// |`fx33`| mem[I..I+3] = decimal digits of vX |
/// |`fx55`| mem[I..=I+x] = v0..=vX             |
/// |`fx65`| v0..=vX = mem[I..=I+x]             |
impl CPU {
    /// |`fx07`| Reads the delay timer into vX
    #[inline(always)]
    pub(super) fn get_delay(&mut self, x: Reg) {
        self.v[x] = self.delay;
    }
    /// |`fx0a`| Waits for a key, then stores it in vX.
    ///
    /// The engine never blocks the thread: if no key arrived yet, pc is
    /// rewound and the keypause latch raised, so [CPU::step] reports
    /// [Step::WaitingForKey] while the host keeps servicing timers and
    /// input. [CPU::press] delivers the key and drops the latch.
    #[inline(always)]
    pub(super) fn wait_for_key(&mut self, x: Reg) {
        if let Some(key) = self.flags.lastkey.take() {
            self.v[x] = key as u8;
        } else {
            self.pc = self.pc.wrapping_sub(2);
            self.flags.keypause = true;
        }
    }
    /// |`fx15`| Sets the delay timer from vX
    #[inline(always)]
    pub(super) fn set_delay(&mut self, x: Reg) {
        self.delay = self.v[x];
    }
    /// |`fx18`| Sets the sound timer from vX
    #[inline(always)]
    pub(super) fn set_sound(&mut self, x: Reg) {
        self.sound = self.v[x];
    }
    /// |`fx1e`| Adds vX to I.
    ///
    /// # Quirk
    /// I wraps at the top of the 12-bit address space by default;
    /// [Quirks::index_fault] reports the overflow as a memory fault instead.
    #[inline(always)]
    pub(super) fn add_i(&mut self, x: Reg) -> Result<()> {
        let sum = self.i.wrapping_add(self.v[x] as Adr);
        if sum > 0xfff && self.quirks.index_fault {
            return Err(Error::MemoryFault { addr: sum });
        }
        self.i = sum & 0xfff;
        Ok(())
    }
    /// |`fx29`| Points I at the font glyph for the low nibble of vX
    #[inline(always)]
    pub(super) fn glyph(&mut self, x: Reg) {
        self.i = Mem::glyph(self.v[x]);
    }
    /// |`fx33`| Stores the decimal digits of vX at I, I+1, I+2
    #[inline(always)]
    pub(super) fn bcd_convert(&mut self, x: Reg, mem: &mut Mem) -> Result<()> {
        let value = self.v[x];
        mem.write(self.i, value / 100)?;
        mem.write(self.i.wrapping_add(1), value / 10 % 10)?;
        mem.write(self.i.wrapping_add(2), value % 10)?;
        Ok(())
    }
    /// |`fx55`| Stores v0 through vX, inclusive, into memory at I.
    /// I itself is left unchanged.
    #[inline(always)]
    pub(super) fn store_regs(&mut self, x: Reg, mem: &mut Mem) -> Result<()> {
        for reg in 0..=x {
            mem.write(self.i.wrapping_add(reg as Adr), self.v[reg])?;
        }
        Ok(())
    }
    /// |`fx65`| Loads v0 through vX, inclusive, from memory at I.
    /// I itself is left unchanged.
    #[inline(always)]
    pub(super) fn load_regs(&mut self, x: Reg, mem: &Mem) -> Result<()> {
        for reg in 0..=x {
            self.v[reg] = mem.read(self.i.wrapping_add(reg as Adr))?;
        }
        Ok(())
    }
}
