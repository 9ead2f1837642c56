/*!
trace.rs - Optional per-instruction execution trace, written one line per
dispatched opcode to a plain text file. Enabled by `--trace-log` on the
CLI; has no effect on emulation semantics, only observability.
*/

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::cpu::Cpu;
use crate::disasm::disassemble_one;

pub struct TraceLog {
    writer: BufWriter<File>,
}

impl TraceLog {
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(TraceLog {
            writer: BufWriter::new(file),
        })
    }

    /// Disassemble the instruction about to execute at `cpu.pc` and write
    /// one trace line: address, opcode bytes, mnemonic, and register
    /// state before execution.
    pub fn record(&mut self, cpu: &Cpu) -> io::Result<()> {
        let pc = cpu.pc as usize;
        let end = (pc + 3).min(cpu.memory.len());
        let (text, len) = disassemble_one(&cpu.memory[pc..end], 0);
        writeln!(
            self.writer,
            "{:04X}  {:<20} a={:02X} bc={:04X} de={:04X} hl={:04X} sp={:04X} cyc={}",
            pc,
            text,
            cpu.regs.a(),
            cpu.regs.bc(),
            cpu.regs.de(),
            cpu.regs.hl(),
            cpu.sp,
            cpu.total_cycles,
        )?;
        let _ = len;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_writes_one_line_per_call() {
        let dir = std::env::temp_dir().join(format!("invaders8080-trace-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("trace.log");

        let mut log = TraceLog::create(&path).unwrap();
        let mut cpu = Cpu::new();
        cpu.write8(0, 0x00);
        log.record(&cpu).unwrap();
        cpu.pc = 1;
        log.record(&cpu).unwrap();
        log.flush().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);

        std::fs::remove_dir_all(&dir).ok();
    }
}
