/*!
Error taxonomy for ROM loading and fatal emulation faults.

Unbound ports are not represented here: per the port I/O contract, an
unbound input returns 0 and an unbound output is a no-op (see `ports.rs`).
That is defined behavior, not an error.
*/

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmuError {
    #[error("failed to open ROM file {}: {source}", .path.display())]
    RomOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ROM file {} is truncated: expected {expected} bytes, found {actual}", .path.display())]
    RomTruncated {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    #[error("undefined opcode {opcode:#04x} at pc={pc:#06x}: {disassembly}")]
    UndefinedOpcode {
        pc: u16,
        opcode: u8,
        disassembly: String,
    },

    #[error("failed to open trace log {}: {source}", .path.display())]
    TraceLogOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
