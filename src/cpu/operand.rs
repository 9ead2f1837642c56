/*!
operand.rs - Decodes the 3-bit register field used throughout the MOV and
ALU opcode encodings (`00DDDSSS`, `00DDD110`, `10ooossss`, ...). Field
value 6 always means "memory at HL" (the M pseudo-register) rather than a
seventh register slot.
*/

use super::regs::Register;
use super::state::Cpu;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    Reg(Register),
    Memory,
}

impl Operand {
    /// Decode a 3-bit field (0-7) per the 8080's B,C,D,E,H,L,M,A ordering.
    pub fn decode(field: u8) -> Operand {
        match field & 0x7 {
            0 => Operand::Reg(Register::B),
            1 => Operand::Reg(Register::C),
            2 => Operand::Reg(Register::D),
            3 => Operand::Reg(Register::E),
            4 => Operand::Reg(Register::H),
            5 => Operand::Reg(Register::L),
            6 => Operand::Memory,
            7 => Operand::Reg(Register::A),
            _ => unreachable!("field & 0x7 is always in 0..=7"),
        }
    }
}

pub fn read_operand(cpu: &Cpu, op: Operand) -> u8 {
    match op {
        Operand::Reg(r) => cpu.regs.get(r),
        Operand::Memory => cpu.read_m(),
    }
}

pub fn write_operand(cpu: &mut Cpu, op: Operand, value: u8) {
    match op {
        Operand::Reg(r) => cpu.regs.set(r, value),
        Operand::Memory => cpu.write_m(value),
    }
}
