use std::fmt;

/// A raw two-byte instruction word and its addressing fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    /// Instruction family, bits 12-15.
    pub fn op(self) -> u8 {
        ((self.0 & 0xF000) >> 12) as u8
    }

    pub fn x(self) -> usize {
        ((self.0 & 0x0F00) >> 8) as usize
    }

    pub fn y(self) -> usize {
        ((self.0 & 0x00F0) >> 4) as usize
    }

    pub fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    pub fn nn(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    pub fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Clear,
    /// 00EE
    Return,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XNN
    SkipEqImm { x: usize, nn: u8 },
    /// 4XNN
    SkipNeImm { x: usize, nn: u8 },
    /// 5XY0
    SkipEqReg { x: usize, y: usize },
    /// 6XNN
    Load { x: usize, nn: u8 },
    /// 7XNN
    AddImm { x: usize, nn: u8 },
    /// 8XY0
    Move { x: usize, y: usize },
    /// 8XY1
    Or { x: usize, y: usize },
    /// 8XY2
    And { x: usize, y: usize },
    /// 8XY3
    Xor { x: usize, y: usize },
    /// 8XY4
    Add { x: usize, y: usize },
    /// 8XY5
    Sub { x: usize, y: usize },
    /// 8XY6
    ShiftRight { x: usize, y: usize },
    /// 8XY7
    SubReverse { x: usize, y: usize },
    /// 8XYE
    ShiftLeft { x: usize, y: usize },
    /// 9XY0
    SkipNeReg { x: usize, y: usize },
    /// ANNN
    SetIndex(u16),
    /// BNNN, `x` is only consulted in modern mode
    JumpOffset { x: usize, nnn: u16 },
    /// CXNN
    Random { x: usize, nn: u8 },
    /// DXYN
    Draw { x: usize, y: usize, n: u8 },
    /// EX9E
    SkipKeyDown { x: usize },
    /// EXA1
    SkipKeyUp { x: usize },
    /// FX07
    ReadDelay { x: usize },
    /// FX0A
    WaitKey { x: usize },
    /// FX15
    SetDelay { x: usize },
    /// FX18
    SetSound { x: usize },
    /// FX1E
    AddIndex { x: usize },
    /// FX29
    Glyph { x: usize },
    /// FX33
    Bcd { x: usize },
    /// FX55
    Store { x: usize },
    /// FX65
    Fill { x: usize },
    /// Anything else, including 0NNN machine code calls.
    Unknown(Opcode),
}

impl Instruction {
    pub fn decode(opcode: Opcode) -> Self {
        use Instruction::*;

        let x = opcode.x();
        let y = opcode.y();
        let n = opcode.n();
        let nn = opcode.nn();
        let nnn = opcode.nnn();

        match opcode.op() {
            0x0 => match opcode.0 {
                0x00E0 => Clear,
                0x00EE => Return,
                _ => Unknown(opcode),
            },
            0x1 => Jump(nnn),
            0x2 => Call(nnn),
            0x3 => SkipEqImm { x, nn },
            0x4 => SkipNeImm { x, nn },
            0x5 if n == 0 => SkipEqReg { x, y },
            0x6 => Load { x, nn },
            0x7 => AddImm { x, nn },
            0x8 => match n {
                0x0 => Move { x, y },
                0x1 => Or { x, y },
                0x2 => And { x, y },
                0x3 => Xor { x, y },
                0x4 => Add { x, y },
                0x5 => Sub { x, y },
                0x6 => ShiftRight { x, y },
                0x7 => SubReverse { x, y },
                0xE => ShiftLeft { x, y },
                _ => Unknown(opcode),
            },
            0x9 if n == 0 => SkipNeReg { x, y },
            0xA => SetIndex(nnn),
            0xB => JumpOffset { x, nnn },
            0xC => Random { x, nn },
            0xD => Draw { x, y, n },
            0xE => match nn {
                0x9E => SkipKeyDown { x },
                0xA1 => SkipKeyUp { x },
                _ => Unknown(opcode),
            },
            0xF => match nn {
                0x07 => ReadDelay { x },
                0x0A => WaitKey { x },
                0x15 => SetDelay { x },
                0x18 => SetSound { x },
                0x1E => AddIndex { x },
                0x29 => Glyph { x },
                0x33 => Bcd { x },
                0x55 => Store { x },
                0x65 => Fill { x },
                _ => Unknown(opcode),
            },
            _ => Unknown(opcode),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Instruction::*;

        match *self {
            Clear => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump(nnn) => write!(f, "JP {:03X}", nnn),
            Call(nnn) => write!(f, "CALL {:03X}", nnn),
            SkipEqImm { x, nn } => write!(f, "SE V{:X}, {:02X}", x, nn),
            SkipNeImm { x, nn } => write!(f, "SNE V{:X}, {:02X}", x, nn),
            SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Load { x, nn } => write!(f, "LD V{:X}, {:02X}", x, nn),
            AddImm { x, nn } => write!(f, "ADD V{:X}, {:02X}", x, nn),
            Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            Add { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            SubReverse { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            SetIndex(nnn) => write!(f, "LD I, {:03X}", nnn),
            JumpOffset { x, nnn } => write!(f, "JP V{:X}, {:03X}", x, nnn),
            Random { x, nn } => write!(f, "RND V{:X}, {:02X}", x, nn),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {:X}", x, y, n),
            SkipKeyDown { x } => write!(f, "SKP V{:X}", x),
            SkipKeyUp { x } => write!(f, "SKNP V{:X}", x),
            ReadDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            SetSound { x } => write!(f, "LD ST, V{:X}", x),
            AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            Glyph { x } => write!(f, "LD F, V{:X}", x),
            Bcd { x } => write!(f, "LD B, V{:X}", x),
            Store { x } => write!(f, "LD [I], V{:X}", x),
            Fill { x } => write!(f, "LD V{:X}, [I]", x),
            Unknown(opcode) => write!(f, "??? {}", opcode),
        }
    }
}
