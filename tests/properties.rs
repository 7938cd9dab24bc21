use chip8::{Chip8, Quirks, HEIGHT, WIDTH};
use proptest::prelude::*;

const SPRITE_ADDR: u16 = 0x300;

fn rom(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes().to_vec()).collect()
}

fn boot(quirks: Quirks, words: &[u16]) -> Chip8 {
    let mut vm = Chip8::with_seed(quirks, 0);
    vm.load_rom(&rom(words)).unwrap();
    vm
}

fn run(vm: &mut Chip8, steps: usize) {
    for _ in 0..steps {
        vm.step().unwrap();
    }
}

fn set(x: u16, nn: u8) -> u16 {
    0x6000 | x << 8 | nn as u16
}

fn quirks() -> impl Strategy<Value = Quirks> {
    prop_oneof![Just(Quirks::Original), Just(Quirks::Modern)]
}

proptest! {
    #[test]
    fn add_immediate_wraps_and_keeps_flag(a in any::<u8>(), b in any::<u8>(), f in any::<u8>()) {
        let mut vm = boot(Quirks::Original, &[set(0, a), set(0xF, f), 0x7000 | b as u16]);
        run(&mut vm, 3);
        prop_assert_eq!(vm.registers()[0], a.wrapping_add(b));
        prop_assert_eq!(vm.registers()[0xF], f);
    }

    #[test]
    fn add_register_sets_carry(a in any::<u8>(), b in any::<u8>(), q in quirks()) {
        let mut vm = boot(q, &[set(0, a), set(1, b), 0x8014]);
        run(&mut vm, 3);
        prop_assert_eq!(vm.registers()[0], ((a as u16 + b as u16) % 256) as u8);
        prop_assert_eq!(vm.registers()[0xF], (a as u16 + b as u16 > 255) as u8);
    }

    #[test]
    fn subtract_flags_no_borrow(a in any::<u8>(), b in any::<u8>(), q in quirks()) {
        let mut vm = boot(q, &[set(0, a), set(1, b), 0x8015]);
        run(&mut vm, 3);
        prop_assert_eq!(vm.registers()[0], a.wrapping_sub(b));
        prop_assert_eq!(vm.registers()[0xF], (a >= b) as u8);

        let mut vm = boot(q, &[set(0, a), set(1, b), 0x8017]);
        run(&mut vm, 3);
        prop_assert_eq!(vm.registers()[0], b.wrapping_sub(a));
        prop_assert_eq!(vm.registers()[0xF], (b >= a) as u8);
    }

    #[test]
    fn shifts_follow_quirk(a in any::<u8>(), b in any::<u8>(), left in any::<bool>(), q in quirks()) {
        let op = if left { 0x812E } else { 0x8126 };
        let mut vm = boot(q, &[set(1, a), set(2, b), op]);
        run(&mut vm, 3);

        let source = match q {
            Quirks::Original => b,
            Quirks::Modern => a,
        };
        let (value, out) = if left {
            (source << 1, source >> 7)
        } else {
            (source >> 1, source & 1)
        };
        prop_assert_eq!(vm.registers()[1], value);
        prop_assert_eq!(vm.registers()[0xF], out);
        prop_assert_eq!(vm.registers()[2], b);
    }

    #[test]
    fn logic_flag_follows_quirk(
        a in any::<u8>(),
        b in any::<u8>(),
        f in any::<u8>(),
        op in 1u16..=3,
        q in quirks()
    ) {
        let mut vm = boot(q, &[set(0, a), set(1, b), set(0xF, f), 0x8010 | op]);
        run(&mut vm, 4);

        let expected = match op {
            1 => a | b,
            2 => a & b,
            _ => a ^ b,
        };
        prop_assert_eq!(vm.registers()[0], expected);
        match q {
            Quirks::Original => prop_assert_eq!(vm.registers()[0xF], 0),
            Quirks::Modern => prop_assert_eq!(vm.registers()[0xF], f),
        }
    }

    #[test]
    fn drawing_twice_restores_framebuffer(
        sprite in prop::collection::vec(any::<u8>(), 1..=15),
        x in any::<u8>(),
        y in any::<u8>(),
        glyph in 0u8..16,
        gx in any::<u8>(),
        gy in any::<u8>()
    ) {
        let n = sprite.len() as u16;
        let mut words = vec![
            set(2, glyph), set(3, gx), set(4, gy), 0xF229, 0xD345,
            set(0, x), set(1, y), 0xA000 | SPRITE_ADDR, 0xD010 | n, 0xD010 | n,
        ];
        words.resize(((SPRITE_ADDR - 0x200) / 2) as usize, 0);
        let mut image = rom(&words);
        image.extend_from_slice(&sprite);

        let mut vm = Chip8::with_seed(Quirks::Original, 0);
        vm.load_rom(&image).unwrap();
        run(&mut vm, 8);
        let before = *vm.framebuffer().rows();

        run(&mut vm, 1);
        let between = *vm.framebuffer().rows();

        let (x0, y0) = (x as usize % WIDTH, y as usize % HEIGHT);
        let mut any_lit = false;
        for (row, bits) in sprite.iter().enumerate() {
            for bit in 0..8 {
                let (px, py) = (x0 + bit, y0 + row);
                if px < WIDTH && py < HEIGHT && bits & (0x80 >> bit) != 0 {
                    any_lit |= between[py][px];
                }
            }
        }

        run(&mut vm, 1);
        prop_assert_eq!(vm.registers()[0xF], any_lit as u8);
        prop_assert!(vm.framebuffer().rows() == &before);
    }

    #[test]
    fn store_then_fill_round_trips(
        values in prop::collection::vec(any::<u8>(), 16),
        x in 0u16..16,
        q in quirks()
    ) {
        let mut words: Vec<u16> = (0..=x).map(|k| set(k, values[k as usize])).collect();
        words.push(0xA400);
        words.push(0xF055 | x << 8);
        words.extend((0..=x).map(|k| set(k, 0)));
        words.push(0xA400);
        words.push(0xF065 | x << 8);

        let mut vm = boot(q, &words);
        run(&mut vm, x as usize + 3);
        let advanced = match q {
            Quirks::Original => 0x400 + x + 1,
            Quirks::Modern => 0x400,
        };
        prop_assert_eq!(vm.index(), advanced);

        run(&mut vm, x as usize + 3);
        let len = x as usize + 1;
        prop_assert_eq!(&vm.registers()[..len], &values[..len]);
        prop_assert_eq!(vm.index(), advanced);
    }
}

#[test]
fn wait_key_resolves_after_host_press() {
    let mut vm = boot(Quirks::Modern, &[0xF30A, 0x1202]);
    run(&mut vm, 5);
    assert_eq!(vm.pc(), 0x200);

    vm.set_key(0xE, true);
    vm.step().unwrap();
    assert_eq!(vm.registers()[3], 0xE);
    assert_eq!(vm.pc(), 0x202);
}

#[test]
fn independent_instances() {
    let mut a = boot(Quirks::Original, &[set(0, 1)]);
    let b = boot(Quirks::Original, &[set(0, 1)]);
    a.step().unwrap();
    assert_eq!(a.registers()[0], 1);
    assert_eq!(b.registers()[0], 0);
}
