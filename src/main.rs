use std::error::Error;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use log::{error, info, warn};
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};
use sdl2::event::Event;
use sdl2::gfx::primitives::DrawRenderer;
use sdl2::keyboard::Scancode;
use sdl2::pixels;
use sdl2::render::Canvas;
use sdl2::video::Window;

use chip8::{Chip8, Framebuffer, Quirks, HEIGHT, WIDTH};

const FRAME: Duration = Duration::from_micros(1_000_000 / 60);
const BEEP_HZ: f32 = 440.0;

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Mode {
    /// COSMAC VIP behavior
    Original,
    /// CHIP-48 / SUPER-CHIP behavior
    Modern,
}

impl From<Mode> for Quirks {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Original => Quirks::Original,
            Mode::Modern => Quirks::Modern,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 virtual machine")]
struct Args {
    /// ROM image to run
    rom: PathBuf,

    /// Interpreter behavior for shift, jump-with-offset, index add and load/store
    #[arg(long, value_enum, default_value_t = Mode::Original)]
    quirks: Mode,

    /// Instructions executed per 60Hz frame
    #[arg(long, default_value_t = 11)]
    cycles_per_frame: u32,

    /// Window pixels per CHIP-8 pixel
    #[arg(long, default_value_t = 10)]
    scale: u32,

    /// Seed for the random number opcode
    #[arg(long)]
    seed: Option<u64>,
}

//  1 2 3 C        1 2 3 4
//  4 5 6 D   <=   Q W E R
//  7 8 9 E        A S D F
//  A 0 B F        Z X C V
fn keypad_index(scancode: Scancode) -> Option<usize> {
    let key = match scancode {
        Scancode::X => 0x0,
        Scancode::Num1 => 0x1,
        Scancode::Num2 => 0x2,
        Scancode::Num3 => 0x3,
        Scancode::Q => 0x4,
        Scancode::W => 0x5,
        Scancode::E => 0x6,
        Scancode::A => 0x7,
        Scancode::S => 0x8,
        Scancode::D => 0x9,
        Scancode::Z => 0xA,
        Scancode::C => 0xB,
        Scancode::Num4 => 0xC,
        Scancode::R => 0xD,
        Scancode::F => 0xE,
        Scancode::V => 0xF,
        _ => return None,
    };
    Some(key)
}

struct SquareWave {
    phase_inc: f32,
    phase: f32,
    volume: f32,
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for x in out.iter_mut() {
            *x = if self.phase <= 0.5 {
                self.volume
            } else {
                -self.volume
            };
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

fn open_beeper(sdl_ctx: &sdl2::Sdl) -> Result<AudioDevice<SquareWave>, String> {
    let audio = sdl_ctx.audio()?;
    let desired = AudioSpecDesired {
        freq: Some(44_100),
        channels: Some(1),
        samples: None,
    };
    audio.open_playback(None, &desired, |spec| SquareWave {
        phase_inc: BEEP_HZ / spec.freq as f32,
        phase: 0.0,
        volume: 0.25,
    })
}

fn render(canvas: &mut Canvas<Window>, fb: &Framebuffer, scale: u32) -> Result<(), String> {
    let black = pixels::Color::RGB(0, 0, 0);
    let white = pixels::Color::RGB(255, 255, 255);
    canvas.set_draw_color(black);
    canvas.clear();

    let scale = scale as i16;
    for (y, row) in fb.rows().iter().enumerate() {
        for (x, &lit) in row.iter().enumerate() {
            if !lit {
                continue;
            }
            let x = x as i16 * scale;
            let y = y as i16 * scale;
            canvas.box_(x, y, x + scale - 1, y + scale - 1, white)?;
        }
    }
    canvas.present();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let quirks = Quirks::from(args.quirks);
    let mut emu = match args.seed {
        Some(seed) => Chip8::with_seed(quirks, seed),
        None => Chip8::new(quirks),
    };
    emu.load_rom_file(&args.rom)?;
    info!("running {} with {:?} quirks", args.rom.display(), quirks);

    let sdl_ctx = sdl2::init()?;
    let video = sdl_ctx.video()?;

    let window = video
        .window("CHIP-8", WIDTH as u32 * args.scale, HEIGHT as u32 * args.scale)
        .position_centered()
        .build()?;
    let mut canvas = window.into_canvas().build()?;
    render(&mut canvas, emu.framebuffer(), args.scale)?;

    let beeper = match open_beeper(&sdl_ctx) {
        Ok(device) => Some(device),
        Err(e) => {
            warn!("no audio device, running silent: {}", e);
            None
        }
    };

    let mut event_pump = sdl_ctx.event_pump()?;

    'main: loop {
        let frame_start = Instant::now();

        for e in event_pump.poll_iter() {
            match e {
                Event::Quit { .. }
                | Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => break 'main,
                Event::KeyDown {
                    scancode: Some(sc), ..
                } => {
                    if let Some(key) = keypad_index(sc) {
                        emu.set_key(key, true);
                    }
                }
                Event::KeyUp {
                    scancode: Some(sc), ..
                } => {
                    if let Some(key) = keypad_index(sc) {
                        emu.set_key(key, false);
                    }
                }
                _ => {}
            }
        }

        for _ in 0..args.cycles_per_frame {
            if let Err(e) = emu.step() {
                error!("{}", e);
            }
        }
        emu.tick();

        if let Some(device) = &beeper {
            if emu.sound_flag() {
                device.resume();
            } else {
                device.pause();
            }
        }

        if emu.take_draw_flag() {
            render(&mut canvas, emu.framebuffer(), args.scale)?;
        }

        if let Some(rest) = FRAME.checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap_covers_keypad() {
        let scancodes = [
            Scancode::Num1,
            Scancode::Num2,
            Scancode::Num3,
            Scancode::Num4,
            Scancode::Q,
            Scancode::W,
            Scancode::E,
            Scancode::R,
            Scancode::A,
            Scancode::S,
            Scancode::D,
            Scancode::F,
            Scancode::Z,
            Scancode::X,
            Scancode::C,
            Scancode::V,
        ];
        let mut seen = [false; 16];
        for &sc in &scancodes {
            seen[keypad_index(sc).unwrap()] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(keypad_index(Scancode::P), None);
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["chip8-vm", "pong.ch8"]).unwrap();
        assert_eq!(args.cycles_per_frame, 11);
        assert_eq!(args.scale, 10);
        assert_eq!(Quirks::from(args.quirks), Quirks::Original);
        assert_eq!(args.seed, None);

        let args =
            Args::try_parse_from(["chip8-vm", "--quirks", "modern", "--seed", "3", "x.ch8"])
                .unwrap();
        assert_eq!(Quirks::from(args.quirks), Quirks::Modern);
        assert_eq!(args.seed, Some(3));
    }
}
