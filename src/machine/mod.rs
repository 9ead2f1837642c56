/*!
machine/mod.rs - The arcade machine: a `Cpu` plus the device state behind
its I/O ports, wired together the way `game/invaders.c`'s `main()` wires
the reference emulator's port callbacks and frame loop.
*/

pub mod frame;
pub mod ports;
pub mod shift;
pub mod sound;

use std::path::Path;

use crate::cpu::Cpu;
use crate::error::EmuError;
use crate::rom;
use ports::ArcadePorts;

/// A `Cpu` and its bound `ArcadePorts`, ready to run frames.
pub struct ArcadeMachine {
    pub cpu: Cpu,
    pub ports: ArcadePorts,
}

impl ArcadeMachine {
    /// Load the four ROM files from `rom_dir` into a fresh CPU's memory
    /// and construct the machine around it.
    pub fn load(rom_dir: &Path) -> Result<Self, EmuError> {
        let image = rom::load_invaders_roms(rom_dir)?;
        let mut cpu = Cpu::new();
        cpu.memory[..image.len()].copy_from_slice(&image);
        Ok(ArcadeMachine {
            cpu,
            ports: ArcadePorts::new(),
        })
    }

    /// Run one 60Hz video frame.
    pub fn run_frame(&mut self) -> Result<(), EmuError> {
        frame::run_frame(&mut self.cpu, &mut self.ports)
    }

    /// Render the current video memory into an RGB framebuffer, rotated
    /// and color-banded for display.
    pub fn render(&self, out: &mut [crate::video::Rgb]) {
        crate::video::blit_rotated(&self.cpu.memory[..], out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    fn write_chunk(dir: &Path, name: &str, fill: u8) {
        let mut f = fs::File::create(dir.join(name)).unwrap();
        f.write_all(&vec![fill; 0x0800]).unwrap();
    }

    #[test]
    fn load_places_rom_bytes_at_address_zero() {
        let dir = std::env::temp_dir().join(format!("invaders8080-machine-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        write_chunk(&dir, "invaders.h", 0xAA);
        write_chunk(&dir, "invaders.g", 0xBB);
        write_chunk(&dir, "invaders.f", 0xCC);
        write_chunk(&dir, "invaders.e", 0xDD);

        let machine = ArcadeMachine::load(&dir).expect("roms present");
        assert_eq!(machine.cpu.read8(0x0000), 0xAA);
        assert_eq!(machine.cpu.read8(0x1800), 0xDD);

        fs::remove_dir_all(&dir).ok();
    }
}
