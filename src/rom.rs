/*!
rom.rs - Loads the four fixed 2KiB ROM images into their hardwired
address-space slots. Unlike a cartridge format with its own header, each
file here is raw binary with no framing: the slot is determined entirely
by filename, mirroring the original four `LoadRomIntoMemory` calls at
startup.
*/

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::EmuError;

const ROM_CHUNK_SIZE: usize = 0x0800;
const TOTAL_ROM_SIZE: usize = ROM_CHUNK_SIZE * 4;

/// Filename, load offset. Order matches the cabinet's four EPROM sockets.
const ROM_FILES: [(&str, usize); 4] = [
    ("invaders.h", 0x0000),
    ("invaders.g", 0x0800),
    ("invaders.f", 0x1000),
    ("invaders.e", 0x1800),
];

/// Reads the four ROM files out of `dir` and returns an 8KiB image ready
/// to be copied into CPU memory starting at address 0x0000.
pub fn load_invaders_roms(dir: &Path) -> Result<[u8; TOTAL_ROM_SIZE], EmuError> {
    let mut image = [0u8; TOTAL_ROM_SIZE];

    for (name, offset) in ROM_FILES {
        let path: PathBuf = dir.join(name);
        let bytes = fs::read(&path).map_err(|source| EmuError::RomOpen {
            path: path.clone(),
            source,
        })?;
        if bytes.len() != ROM_CHUNK_SIZE {
            return Err(EmuError::RomTruncated {
                path,
                expected: ROM_CHUNK_SIZE,
                actual: bytes.len(),
            });
        }
        image[offset..offset + ROM_CHUNK_SIZE].copy_from_slice(&bytes);
    }

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_chunk(dir: &Path, name: &str, fill: u8) {
        let mut f = fs::File::create(dir.join(name)).unwrap();
        f.write_all(&vec![fill; ROM_CHUNK_SIZE]).unwrap();
    }

    #[test]
    fn loads_four_chunks_at_fixed_offsets() {
        let dir = std::env::temp_dir().join(format!("invaders8080-rom-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        write_chunk(&dir, "invaders.h", 0x11);
        write_chunk(&dir, "invaders.g", 0x22);
        write_chunk(&dir, "invaders.f", 0x33);
        write_chunk(&dir, "invaders.e", 0x44);

        let image = load_invaders_roms(&dir).expect("all four chunks present");
        assert_eq!(image[0x0000], 0x11);
        assert_eq!(image[0x0800], 0x22);
        assert_eq!(image[0x1000], 0x33);
        assert_eq!(image[0x1800], 0x44);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_file_is_rom_open_error() {
        let dir = std::env::temp_dir().join(format!("invaders8080-rom-test-missing-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let err = load_invaders_roms(&dir).unwrap_err();
        assert!(matches!(err, EmuError::RomOpen { .. }));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn truncated_file_is_rom_truncated_error() {
        let dir = std::env::temp_dir().join(format!("invaders8080-rom-test-trunc-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("invaders.h"), vec![0u8; 100]).unwrap();
        write_chunk(&dir, "invaders.g", 0x22);
        write_chunk(&dir, "invaders.f", 0x33);
        write_chunk(&dir, "invaders.e", 0x44);
        let err = load_invaders_roms(&dir).unwrap_err();
        assert!(matches!(err, EmuError::RomTruncated { .. }));
        fs::remove_dir_all(&dir).ok();
    }
}
