pub mod display;
pub mod error;
pub mod instruction;
pub mod keypad;
pub mod memory;
pub mod quirks;
pub mod stack;
pub mod timers;

use std::fs;
use std::path::Path;

use log::{debug, trace, warn};
use rand::prelude::*;
use rand::rngs::StdRng;

use self::display::{Framebuffer, HEIGHT, WIDTH};
use self::error::{Error, Result};
use self::instruction::{Instruction, Opcode};
use self::keypad::Keypad;
use self::memory::{Memory, FONT_START, GLYPH_SIZE, PROGRAM_START};
use self::quirks::Quirks;
use self::stack::Stack;
use self::timers::Timers;

const VF: usize = 0xF;

pub struct Chip8 {
    // CHIP-8 VM
    memory: Memory,
    v: [u8; 16], // registers V0-VE (VF is flag for some instructions)
    i: u16,      // address register
    pc: u16,     // program counter
    stack: Stack,
    timers: Timers, // count down at 60Hz
    display: Framebuffer,
    keypad: Keypad,

    // emulator resources
    quirks: Quirks,
    draw_flag: bool,
    rng: StdRng,
}

impl Chip8 {
    pub fn new(quirks: Quirks) -> Self {
        Self::with_rng(quirks, StdRng::from_entropy())
    }

    /// A VM whose CXNN sequence is reproducible from `seed`.
    pub fn with_seed(quirks: Quirks, seed: u64) -> Self {
        Self::with_rng(quirks, StdRng::seed_from_u64(seed))
    }

    fn with_rng(quirks: Quirks, rng: StdRng) -> Self {
        Self {
            memory: Memory::new(),
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START, // programs start at 0x200
            stack: Stack::new(),
            timers: Timers::default(),
            display: Framebuffer::new(),
            keypad: Keypad::new(),

            quirks,
            draw_flag: false,
            rng,
        }
    }

    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        self.memory.load_program(rom)
    }

    pub fn load_rom_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let rom = fs::read(path.as_ref())?;
        debug!("read {} bytes from {}", rom.len(), path.as_ref().display());
        self.load_rom(&rom)
    }

    pub fn set_key(&mut self, key: usize, pressed: bool) {
        self.keypad.set(key, pressed);
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.display
    }

    /// Whether the framebuffer changed since the last call.
    pub fn take_draw_flag(&mut self) -> bool {
        std::mem::replace(&mut self.draw_flag, false)
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound
    }

    pub fn sound_flag(&self) -> bool {
        self.timers.sound > 0
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Counts both timers down by one. Call at 60Hz.
    pub fn tick(&mut self) {
        self.timers.tick();
    }

    /// Fetches, decodes and executes one instruction.
    ///
    /// Unknown opcodes are skipped. The only failures are call stack faults,
    /// after which the VM is still usable: PC has moved past the faulting
    /// instruction and nothing else changed.
    pub fn step(&mut self) -> Result<()> {
        let addr = self.pc;
        // two-byte opcodes
        let opcode = Opcode(self.memory.read_word(addr));
        let instruction = Instruction::decode(opcode);
        trace!("{:03X}: {} {}", addr, opcode, instruction);

        // jumps and calls assign an absolute PC over this
        self.pc = self.pc.wrapping_add(2);
        self.execute(addr, instruction)
    }

    fn execute(&mut self, addr: u16, instruction: Instruction) -> Result<()> {
        use Instruction::*;

        match instruction {
            Clear => {
                self.display.clear();
                self.draw_flag = true;
            }
            Return => {
                self.pc = self
                    .stack
                    .pop()
                    .ok_or(Error::StackUnderflow { addr })?;
            }
            Jump(nnn) => self.pc = nnn,
            Call(nnn) => {
                if !self.stack.push(self.pc) {
                    return Err(Error::StackOverflow { addr });
                }
                self.pc = nnn;
            }
            SkipEqImm { x, nn } => self.skip_if(self.v[x] == nn),
            SkipNeImm { x, nn } => self.skip_if(self.v[x] != nn),
            SkipEqReg { x, y } => self.skip_if(self.v[x] == self.v[y]),
            SkipNeReg { x, y } => self.skip_if(self.v[x] != self.v[y]),
            Load { x, nn } => self.v[x] = nn,
            // no carry
            AddImm { x, nn } => self.v[x] = self.v[x].wrapping_add(nn),
            Move { x, y } => self.v[x] = self.v[y],
            Or { x, y } => self.logic(x, self.v[x] | self.v[y]),
            And { x, y } => self.logic(x, self.v[x] & self.v[y]),
            Xor { x, y } => self.logic(x, self.v[x] ^ self.v[y]),
            Add { x, y } => {
                let (sum, carry) = self.v[x].overflowing_add(self.v[y]);
                self.set_with_flag(x, sum, carry);
            }
            Sub { x, y } => {
                // VF = 1 when there's no borrow
                let (vx, vy) = (self.v[x], self.v[y]);
                self.set_with_flag(x, vx.wrapping_sub(vy), vx >= vy);
            }
            SubReverse { x, y } => {
                let (vx, vy) = (self.v[x], self.v[y]);
                self.set_with_flag(x, vy.wrapping_sub(vx), vy >= vx);
            }
            ShiftRight { x, y } => {
                let value = self.shift_operand(x, y);
                self.set_with_flag(x, value >> 1, value & 0x01 != 0);
            }
            ShiftLeft { x, y } => {
                let value = self.shift_operand(x, y);
                self.set_with_flag(x, value << 1, value & 0x80 != 0);
            }
            SetIndex(nnn) => self.i = nnn,
            JumpOffset { x, nnn } => {
                let offset = if self.quirks.jump_offset_uses_vx() {
                    self.v[x]
                } else {
                    self.v[0]
                };
                self.pc = nnn + offset as u16;
            }
            Random { x, nn } => self.v[x] = nn & self.rng.gen::<u8>(),
            Draw { x, y, n } => self.draw(x, y, n),
            SkipKeyDown { x } => self.skip_if(self.keypad.is_pressed(self.v[x])),
            SkipKeyUp { x } => self.skip_if(!self.keypad.is_pressed(self.v[x])),
            ReadDelay { x } => self.v[x] = self.timers.delay,
            WaitKey { x } => match self.keypad.first_pressed() {
                Some(key) => self.v[x] = key,
                // repeat this instruction if no pressed key
                None => self.pc = self.pc.wrapping_sub(2),
            },
            SetDelay { x } => self.timers.delay = self.v[x],
            SetSound { x } => self.timers.sound = self.v[x],
            AddIndex { x } => {
                self.i = self.i.wrapping_add(self.v[x] as u16);
                if self.quirks.index_overflow_sets_flag() && self.i >= 0x1000 {
                    self.v[VF] = 1;
                }
            }
            Glyph { x } => self.i = FONT_START + self.v[x] as u16 * GLYPH_SIZE,
            Bcd { x } => {
                // so 193 becomes [1, 9, 3] in memory at I
                let vx = self.v[x];
                self.memory.write(self.i, vx / 100);
                self.memory.write(self.i.wrapping_add(1), vx / 10 % 10);
                self.memory.write(self.i.wrapping_add(2), vx % 10);
            }
            Store { x } => {
                for offset in 0..=x {
                    self.memory
                        .write(self.i.wrapping_add(offset as u16), self.v[offset]);
                }
                self.advance_index(x);
            }
            Fill { x } => {
                for offset in 0..=x {
                    self.v[offset] = self.memory.read(self.i.wrapping_add(offset as u16));
                }
                self.advance_index(x);
            }
            Unknown(opcode) => warn!("skipping unknown opcode {} at {:03X}", opcode, addr),
        }
        Ok(())
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc = self.pc.wrapping_add(2);
        }
    }

    // flag goes in last so it wins when x is VF
    fn set_with_flag(&mut self, x: usize, value: u8, flag: bool) {
        self.v[x] = value;
        self.v[VF] = flag as u8;
    }

    fn logic(&mut self, x: usize, value: u8) {
        self.v[x] = value;
        if self.quirks.logic_resets_flag() {
            self.v[VF] = 0;
        }
    }

    fn shift_operand(&mut self, x: usize, y: usize) -> u8 {
        if self.quirks.shift_reads_vy() {
            self.v[x] = self.v[y];
        }
        self.v[x]
    }

    fn advance_index(&mut self, x: usize) {
        if self.quirks.load_store_advances_index() {
            self.i = self.i.wrapping_add(x as u16 + 1);
        }
    }

    // draw a sprite at VX,VY with a width of 8 pixels and a height of N pixels
    // each row of 8 pixels is bit-coded in memory starting at I
    // the origin wraps but the sprite itself is clipped at the right and bottom edges
    fn draw(&mut self, x: usize, y: usize, height: u8) {
        // cleared before the coordinates are read, so DFYN draws at column 0
        self.v[VF] = 0;
        let vx = self.v[x] as usize % WIDTH;
        let vy = self.v[y] as usize % HEIGHT;

        let mut collision = false;
        for row in 0..height as usize {
            if vy + row >= HEIGHT {
                break;
            }
            let sprite = self.memory.read(self.i.wrapping_add(row as u16));
            collision |= self.display.draw_row(vx, vy + row, sprite);
        }

        self.v[VF] = collision as u8;
        self.draw_flag = true;
    }
}
