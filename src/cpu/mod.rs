/*!
cpu/mod.rs - The exhaustive opcode decoder/dispatcher.

Every one of the 256 opcode values has its own match arm so the compiler
enforces that all of them, including the twelve undefined slots
(0x08, 0x10, 0x18, 0x20, 0x28, 0x30, 0x38, 0xCB, 0xD9, 0xDD, 0xED, 0xFD),
are accounted for; spec.md §4.4 requires a `match`, not a function-pointer
table, for exactly this reason.
*/

pub mod cycles;
pub mod dispatch;
pub mod flags;
pub mod operand;
pub mod regs;
pub mod state;

use crate::error::EmuError;
use crate::ports::PortBus;
use cycles::OPCODE_CYCLES;
use dispatch::{arithmetic, branch, control, data_transfer, io, logical, rotate, stack};
use operand::Operand;
use regs::Register;
pub use state::Cpu;

/// Undefined opcode value 0x08, 0xCB, ... had no `Emulate8080Op` case in
/// the reference switch and would fall through to its `default` trap.
/// Here that is a hard `EmuError`, not an executed NOP.
fn undefined(pc: u16, opcode: u8) -> EmuError {
    let (text, _) = crate::disasm::disassemble_one(&[opcode], 0);
    EmuError::UndefinedOpcode {
        pc,
        opcode,
        disassembly: text,
    }
}

impl Cpu {
    /// Record a pending maskable interrupt, identified by the RST opcode
    /// the interrupt controller wants injected (0xCF or 0xD7 for the
    /// arcade half-frame/full-frame vectors). Overwrites any interrupt
    /// already pending and not yet accepted.
    pub fn request_interrupt(&mut self, rst_opcode: u8) {
        self.pending_interrupt = Some(rst_opcode);
    }

    /// Ask the CPU to stop after its current (or next) `step` call. The
    /// host checks `cpu.exit` between steps; `step` itself never refuses
    /// to run because of it.
    pub fn request_exit(&mut self) {
        self.exit = true;
    }

    /// Fetch-decode-execute one instruction, or service a pending
    /// interrupt in its place if interrupts are enabled. Returns the
    /// number of cycles charged.
    pub fn step(&mut self, ports: &mut dyn PortBus) -> Result<u8, EmuError> {
        if let Some(opcode) = self.pending_interrupt {
            if self.int_enable {
                self.pending_interrupt = None;
                self.int_enable = false;
                self.halt = false;
                return self.execute(opcode, ports);
            }
        }

        if self.halt {
            self.total_cycles += 4;
            return Ok(4);
        }

        let pc_at_fetch = self.pc;
        let opcode = self.fetch_u8();
        self.execute_at(opcode, pc_at_fetch, ports)
    }

    fn execute(&mut self, opcode: u8, ports: &mut dyn PortBus) -> Result<u8, EmuError> {
        let pc = self.pc;
        self.execute_at(opcode, pc, ports)
    }

    fn execute_at(
        &mut self,
        opcode: u8,
        pc_at_fetch: u16,
        ports: &mut dyn PortBus,
    ) -> Result<u8, EmuError> {
        match opcode {
            0x00 => control::nop(self),
            0x08 | 0x10 | 0x18 | 0x20 | 0x28 | 0x30 | 0x38 | 0xCB | 0xD9 | 0xDD | 0xED | 0xFD => {
                return Err(undefined(pc_at_fetch, opcode));
            }

            0x01 => {
                let imm = self.fetch_u16();
                data_transfer::lxi(self, Register::B, imm);
            }
            0x11 => {
                let imm = self.fetch_u16();
                data_transfer::lxi(self, Register::D, imm);
            }
            0x21 => {
                let imm = self.fetch_u16();
                data_transfer::lxi(self, Register::H, imm);
            }
            0x31 => {
                let imm = self.fetch_u16();
                data_transfer::lxi_sp(self, imm);
            }

            0x02 => {
                let addr = self.regs.bc();
                data_transfer::stax(self, addr);
            }
            0x12 => {
                let addr = self.regs.de();
                data_transfer::stax(self, addr);
            }
            0x0A => {
                let addr = self.regs.bc();
                data_transfer::ldax(self, addr);
            }
            0x1A => {
                let addr = self.regs.de();
                data_transfer::ldax(self, addr);
            }

            0x03 => arithmetic::inx_pair(self, Register::B),
            0x13 => arithmetic::inx_pair(self, Register::D),
            0x23 => arithmetic::inx_pair(self, Register::H),
            0x33 => arithmetic::inx_sp(self),
            0x0B => arithmetic::dcx_pair(self, Register::B),
            0x1B => arithmetic::dcx_pair(self, Register::D),
            0x2B => arithmetic::dcx_pair(self, Register::H),
            0x3B => arithmetic::dcx_sp(self),

            0x09 => {
                let pair = self.regs.bc();
                arithmetic::dad(self, pair);
            }
            0x19 => {
                let pair = self.regs.de();
                arithmetic::dad(self, pair);
            }
            0x29 => {
                let pair = self.regs.hl();
                arithmetic::dad(self, pair);
            }
            0x39 => {
                let pair = self.sp;
                arithmetic::dad(self, pair);
            }

            0x04 => arithmetic::inr(self, Operand::Reg(Register::B)),
            0x0C => arithmetic::inr(self, Operand::Reg(Register::C)),
            0x14 => arithmetic::inr(self, Operand::Reg(Register::D)),
            0x1C => arithmetic::inr(self, Operand::Reg(Register::E)),
            0x24 => arithmetic::inr(self, Operand::Reg(Register::H)),
            0x2C => arithmetic::inr(self, Operand::Reg(Register::L)),
            0x34 => arithmetic::inr(self, Operand::Memory),
            0x3C => arithmetic::inr(self, Operand::Reg(Register::A)),

            0x05 => arithmetic::dcr(self, Operand::Reg(Register::B)),
            0x0D => arithmetic::dcr(self, Operand::Reg(Register::C)),
            0x15 => arithmetic::dcr(self, Operand::Reg(Register::D)),
            0x1D => arithmetic::dcr(self, Operand::Reg(Register::E)),
            0x25 => arithmetic::dcr(self, Operand::Reg(Register::H)),
            0x2D => arithmetic::dcr(self, Operand::Reg(Register::L)),
            0x35 => arithmetic::dcr(self, Operand::Memory),
            0x3D => arithmetic::dcr(self, Operand::Reg(Register::A)),

            0x06 => {
                let imm = self.fetch_u8();
                data_transfer::mvi(self, Operand::Reg(Register::B), imm);
            }
            0x0E => {
                let imm = self.fetch_u8();
                data_transfer::mvi(self, Operand::Reg(Register::C), imm);
            }
            0x16 => {
                let imm = self.fetch_u8();
                data_transfer::mvi(self, Operand::Reg(Register::D), imm);
            }
            0x1E => {
                let imm = self.fetch_u8();
                data_transfer::mvi(self, Operand::Reg(Register::E), imm);
            }
            0x26 => {
                let imm = self.fetch_u8();
                data_transfer::mvi(self, Operand::Reg(Register::H), imm);
            }
            0x2E => {
                let imm = self.fetch_u8();
                data_transfer::mvi(self, Operand::Reg(Register::L), imm);
            }
            0x36 => {
                let imm = self.fetch_u8();
                data_transfer::mvi(self, Operand::Memory, imm);
            }
            0x3E => {
                let imm = self.fetch_u8();
                data_transfer::mvi(self, Operand::Reg(Register::A), imm);
            }

            0x07 => rotate::rlc(self),
            0x0F => rotate::rrc(self),
            0x17 => rotate::ral(self),
            0x1F => rotate::rar(self),

            0x22 => {
                let addr = self.fetch_u16();
                data_transfer::shld(self, addr);
            }
            0x2A => {
                let addr = self.fetch_u16();
                data_transfer::lhld(self, addr);
            }
            0x32 => {
                let addr = self.fetch_u16();
                data_transfer::sta(self, addr);
            }
            0x3A => {
                let addr = self.fetch_u16();
                data_transfer::lda(self, addr);
            }

            0x27 => arithmetic::daa(self),
            0x2F => logical::cma(self),
            0x37 => logical::stc(self),
            0x3F => logical::cmc(self),

            0x76 => control::hlt(self),
            0x40..=0x7F => {
                let dst = Operand::decode(opcode >> 3);
                let src = Operand::decode(opcode);
                data_transfer::mov(self, dst, src);
            }

            0x80..=0x87 => {
                let value = operand::read_operand(self, Operand::decode(opcode));
                arithmetic::add(self, value, false);
            }
            0x88..=0x8F => {
                let value = operand::read_operand(self, Operand::decode(opcode));
                let carry = self.flags.cy;
                arithmetic::add(self, value, carry);
            }
            0x90..=0x97 => {
                let value = operand::read_operand(self, Operand::decode(opcode));
                arithmetic::sub(self, value, false);
            }
            0x98..=0x9F => {
                let value = operand::read_operand(self, Operand::decode(opcode));
                let borrow = self.flags.cy;
                arithmetic::sub(self, value, borrow);
            }
            0xA0..=0xA7 => {
                let value = operand::read_operand(self, Operand::decode(opcode));
                logical::ana(self, value);
            }
            0xA8..=0xAF => {
                let value = operand::read_operand(self, Operand::decode(opcode));
                logical::xra(self, value);
            }
            0xB0..=0xB7 => {
                let value = operand::read_operand(self, Operand::decode(opcode));
                logical::ora(self, value);
            }
            0xB8..=0xBF => {
                let value = operand::read_operand(self, Operand::decode(opcode));
                logical::cmp(self, value);
            }

            0xC6 => {
                let imm = self.fetch_u8();
                arithmetic::add(self, imm, false);
            }
            0xCE => {
                let imm = self.fetch_u8();
                let carry = self.flags.cy;
                arithmetic::add(self, imm, carry);
            }
            0xD6 => {
                let imm = self.fetch_u8();
                arithmetic::sub(self, imm, false);
            }
            0xDE => {
                let imm = self.fetch_u8();
                let borrow = self.flags.cy;
                arithmetic::sub(self, imm, borrow);
            }
            0xE6 => {
                let imm = self.fetch_u8();
                logical::ana(self, imm);
            }
            0xEE => {
                let imm = self.fetch_u8();
                logical::xra(self, imm);
            }
            0xF6 => {
                let imm = self.fetch_u8();
                logical::ora(self, imm);
            }
            0xFE => {
                let imm = self.fetch_u8();
                logical::cmp(self, imm);
            }

            0xC3 => {
                let addr = self.fetch_u16();
                branch::jmp(self, addr);
            }
            0xC2 | 0xCA | 0xD2 | 0xDA | 0xE2 | 0xEA | 0xF2 | 0xFA => {
                let addr = self.fetch_u16();
                let cond = branch::Condition::decode(opcode >> 3);
                if cond.is_met(&self.flags) {
                    branch::jmp(self, addr);
                }
            }

            0xCD => {
                let addr = self.fetch_u16();
                branch::call(self, addr);
            }
            0xC4 | 0xCC | 0xD4 | 0xDC | 0xE4 | 0xEC | 0xF4 | 0xFC => {
                let addr = self.fetch_u16();
                let cond = branch::Condition::decode(opcode >> 3);
                if cond.is_met(&self.flags) {
                    branch::call(self, addr);
                }
            }

            0xC9 => branch::ret(self),
            0xC0 | 0xC8 | 0xD0 | 0xD8 | 0xE0 | 0xE8 | 0xF0 | 0xF8 => {
                let cond = branch::Condition::decode(opcode >> 3);
                if cond.is_met(&self.flags) {
                    branch::ret(self);
                }
            }

            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
                branch::rst(self, (opcode >> 3) & 0x7);
            }
            0xE9 => branch::pchl(self),

            0xC1 => stack::pop_pair(self, Register::B),
            0xD1 => stack::pop_pair(self, Register::D),
            0xE1 => stack::pop_pair(self, Register::H),
            0xF1 => stack::pop_psw(self),
            0xC5 => stack::push_pair(self, Register::B),
            0xD5 => stack::push_pair(self, Register::D),
            0xE5 => stack::push_pair(self, Register::H),
            0xF5 => stack::push_psw(self),
            0xE3 => stack::xthl(self),
            0xF9 => stack::sphl(self),
            0xEB => data_transfer::xchg(self),

            0xD3 => {
                let port = self.fetch_u8();
                io::output(self, ports, port);
            }
            0xDB => {
                let port = self.fetch_u8();
                io::input(self, ports, port);
            }

            0xF3 => control::di(self),
            0xFB => control::ei(self),
        }

        let cost = OPCODE_CYCLES[opcode as usize];
        self.total_cycles += cost as u64;
        Ok(cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::NullPorts;

    fn step_once(cpu: &mut Cpu) -> u8 {
        cpu.step(&mut NullPorts).expect("defined opcode")
    }

    #[test]
    fn undefined_opcode_is_a_fatal_error() {
        let mut cpu = Cpu::new();
        cpu.write8(0, 0xD9);
        let err = cpu.step(&mut NullPorts).unwrap_err();
        match err {
            EmuError::UndefinedOpcode { opcode, pc, .. } => {
                assert_eq!(opcode, 0xD9);
                assert_eq!(pc, 0);
            }
            other => panic!("expected UndefinedOpcode, got {other:?}"),
        }
    }

    #[test]
    fn lxi_b_then_lxi_sp() {
        let mut cpu = Cpu::new();
        cpu.write8(0, 0x01);
        cpu.write16(1, 0x1126);
        cpu.write8(3, 0x31);
        cpu.write16(4, 0xFE15);
        step_once(&mut cpu);
        assert_eq!(cpu.regs.bc(), 0x1126);
        step_once(&mut cpu);
        assert_eq!(cpu.sp, 0xFE15);
    }

    #[test]
    fn sta_scenario_writes_through_memory() {
        let mut cpu = Cpu::new();
        cpu.regs.set_a(0x69);
        cpu.write8(0, 0x32);
        cpu.write16(1, 0x7725);
        step_once(&mut cpu);
        assert_eq!(cpu.read8(0x7725), 0x69);
    }

    #[test]
    fn jmp_chain_scenario() {
        let mut cpu = Cpu::new();
        cpu.pc = 0x0515;
        cpu.write8(0x0515, 0xC3);
        cpu.write16(0x0516, 0x4512);
        cpu.write8(0x4512, 0xC3);
        cpu.write16(0x4513, 0x0000);
        step_once(&mut cpu);
        assert_eq!(cpu.pc, 0x4512);
        step_once(&mut cpu);
        assert_eq!(cpu.pc, 0x0000);
    }

    #[test]
    fn pending_interrupt_is_serviced_when_enabled() {
        let mut cpu = Cpu::new();
        cpu.pc = 0x1234;
        cpu.sp = 0x2400;
        cpu.int_enable = true;
        cpu.request_interrupt(0xCF);
        step_once(&mut cpu);
        assert_eq!(cpu.pc, 0x0008);
        assert_eq!(cpu.pop_u16(), 0x1234);
        assert!(!cpu.int_enable);
    }

    #[test]
    fn pending_interrupt_is_ignored_when_disabled() {
        let mut cpu = Cpu::new();
        cpu.pc = 0x0100;
        cpu.int_enable = false;
        cpu.write8(0x0100, 0x00);
        cpu.request_interrupt(0xCF);
        step_once(&mut cpu);
        assert_eq!(cpu.pc, 0x0101);
        // Held, not dropped: still pending for the next enabled step.
        assert_eq!(cpu.pending_interrupt, Some(0xCF));
    }

    #[test]
    fn interrupt_posted_while_disabled_is_serviced_once_enabled() {
        let mut cpu = Cpu::new();
        cpu.sp = 0x2400;
        cpu.pc = 0x1234;
        cpu.int_enable = false;
        cpu.request_interrupt(0xCF);
        step_once(&mut cpu);
        assert_eq!(cpu.pc, 0x1235);

        cpu.int_enable = true;
        step_once(&mut cpu);
        assert_eq!(cpu.pc, 0x0008);
        assert_eq!(cpu.pending_interrupt, None);
    }

    #[test]
    fn conditional_call_charges_unconditional_cost_even_when_not_taken() {
        let mut cpu = Cpu::new();
        cpu.sp = 0x2400;
        cpu.flags.z = false;
        cpu.write8(0, 0xCC); // CZ, not taken since z is false
        cpu.write16(1, 0x9999);
        let cycles = step_once(&mut cpu);
        assert_eq!(cycles, OPCODE_CYCLES[0xCC]);
        assert_eq!(cpu.pc, 3);
    }

    #[test]
    fn halt_keeps_charging_four_cycles_per_step() {
        let mut cpu = Cpu::new();
        cpu.write8(0, 0x76);
        step_once(&mut cpu);
        assert!(cpu.halt);
        let cost = step_once(&mut cpu);
        assert_eq!(cost, 4);
        assert_eq!(cpu.pc, 1);
    }
}
