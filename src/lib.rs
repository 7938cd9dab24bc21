//! A CHIP-8 virtual machine.
//!
//! The [`Chip8`] value owns all machine state. A host drives it by calling
//! [`Chip8::step`] once per emulated instruction and [`Chip8::tick`] once per
//! 60Hz frame, forwarding key state with [`Chip8::set_key`] and reading the
//! [`Framebuffer`] back out to render it.

pub mod chip8;

pub use crate::chip8::display::{Framebuffer, HEIGHT, WIDTH};
pub use crate::chip8::error::{Error, Result};
pub use crate::chip8::instruction::{Instruction, Opcode};
pub use crate::chip8::memory::{Memory, FONT_START, MEMORY_SIZE, PROGRAM_START};
pub use crate::chip8::quirks::Quirks;
pub use crate::chip8::Chip8;
