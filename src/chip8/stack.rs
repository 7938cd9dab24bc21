pub const STACK_DEPTH: usize = 16;

/// Return address stack. Pushing onto a full stack or popping an empty one
/// fails instead of running the pointer off the end.
pub struct Stack {
    slots: [u16; STACK_DEPTH],
    sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            slots: [0; STACK_DEPTH],
            sp: 0,
        }
    }

    /// Returns false, leaving the stack as it was, when every slot is in use.
    pub fn push(&mut self, addr: u16) -> bool {
        match self.slots.get_mut(self.sp) {
            Some(slot) => {
                *slot = addr;
                self.sp += 1;
                true
            }
            None => false,
        }
    }

    pub fn pop(&mut self) -> Option<u16> {
        self.sp = self.sp.checked_sub(1)?;
        Some(self.slots[self.sp])
    }

    pub fn depth(&self) -> usize {
        self.sp
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
