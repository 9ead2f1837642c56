/*!
frame.rs - Drives one 60Hz video frame: run to the half-frame mark, raise
the mid-screen interrupt (RST 1, 0xCF), run to the full-frame mark, raise
the vblank interrupt (RST 2, 0xD7).

`Cpu::total_cycles` is monotonic for the life of the `Cpu` (spec.md §3),
so unlike the reference driver this measures elapsed cycles as a delta
against the counter's value at the start of each half, rather than
resetting it to zero every frame.
*/

use crate::cpu::Cpu;
use crate::error::EmuError;
use crate::ports::PortBus;

const CLOCK_HZ: u64 = 2_000_000;
const FRAME_HZ: u64 = 60;
pub const CYCLES_PER_FRAME: u64 = CLOCK_HZ / FRAME_HZ;
pub const CYCLES_PER_HALF_FRAME: u64 = CYCLES_PER_FRAME / 2;

/// RST 1: mid-screen interrupt, fired when the beam reaches the middle
/// of the display.
pub const INT_MID_SCREEN: u8 = 0xCF;
/// RST 2: vblank interrupt, fired at the end of the frame.
pub const INT_VBLANK: u8 = 0xD7;

/// Run one full video frame's worth of instructions, raising both
/// interrupts at the appropriate points. Returns once the vblank
/// interrupt has been requested (it is serviced on the caller's next
/// `step`, not inside this call).
pub fn run_frame(cpu: &mut Cpu, ports: &mut dyn PortBus) -> Result<(), EmuError> {
    let frame_start = cpu.total_cycles;

    while cpu.total_cycles - frame_start < CYCLES_PER_HALF_FRAME && !cpu.exit {
        cpu.step(ports)?;
    }
    if cpu.exit {
        return Ok(());
    }
    cpu.request_interrupt(INT_MID_SCREEN);

    while cpu.total_cycles - frame_start < CYCLES_PER_FRAME && !cpu.exit {
        cpu.step(ports)?;
    }
    if cpu.exit {
        return Ok(());
    }
    cpu.request_interrupt(INT_VBLANK);

    Ok(())
}
