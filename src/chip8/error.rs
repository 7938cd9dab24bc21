use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("ROM is too large ({size} bytes), at most {max} bytes fit")]
    RomTooLarge { size: usize, max: usize },

    #[error("failed to read ROM: {0}")]
    Io(#[from] io::Error),

    #[error("stack overflow: call at {addr:#05X} with every return slot in use")]
    StackOverflow { addr: u16 },

    #[error("stack underflow: return at {addr:#05X} with an empty call stack")]
    StackUnderflow { addr: u16 },
}
