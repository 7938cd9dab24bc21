use log::warn;

pub const KEY_COUNT: usize = 16;

/// Hex keypad state, written by the host and read by the engine.
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }

    pub fn set(&mut self, key: usize, pressed: bool) {
        match self.keys.get_mut(key) {
            Some(state) => *state = pressed,
            None => warn!("ignoring state for key {:#X}, keypad has 16 keys", key),
        }
    }

    /// Only the low nibble of `key` selects a key, as register values run to 0xFF.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    /// Lowest-numbered key currently held down.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&k| k).map(|k| k as u8)
    }
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}
