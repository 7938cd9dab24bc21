/// Delay and sound counters. Both count down at 60Hz, driven by the host.
#[derive(Default)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_independent_and_floored() {
        let mut t = Timers { delay: 2, sound: 0 };
        t.tick();
        assert_eq!((t.delay, t.sound), (1, 0));
        t.tick();
        t.tick();
        assert_eq!((t.delay, t.sound), (0, 0));
    }
}
