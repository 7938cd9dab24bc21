/// Which interpreter's behavior to follow where CHIP-8 implementations
/// historically disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quirks {
    /// COSMAC VIP interpreter.
    Original,
    /// CHIP-48 and SUPER-CHIP interpreters.
    Modern,
}

impl Quirks {
    /// 8XY1, 8XY2, 8XY3 zero VF.
    pub fn logic_resets_flag(self) -> bool {
        self == Quirks::Original
    }

    /// 8XY6 and 8XYE copy VY into VX before shifting.
    pub fn shift_reads_vy(self) -> bool {
        self == Quirks::Original
    }

    /// BNNN adds VX instead of V0.
    pub fn jump_offset_uses_vx(self) -> bool {
        self == Quirks::Modern
    }

    /// FX1E sets VF when I passes the end of memory.
    pub fn index_overflow_sets_flag(self) -> bool {
        self == Quirks::Modern
    }

    /// FX55 and FX65 leave I pointing past the last register transferred.
    pub fn load_store_advances_index(self) -> bool {
        self == Quirks::Original
    }
}
