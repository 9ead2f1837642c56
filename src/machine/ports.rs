/*!
ports.rs - `ArcadePorts`: the concrete `PortBus` the arcade machine
passes to `Cpu::step`. Binds the shift register, the two sound banks,
the credit/start/shot/direction switches, and the watchdog counter to
their fixed port numbers.

Port map (spec.md §6):
  IN  1   player 1 controls + credit/start switches
  IN  2   player 2 controls + dip switches
  IN  3   shift register read
  OUT 2   shift amount
  OUT 3   sound bank 1
  OUT 4   shift data
  OUT 5   sound bank 2
  OUT 6   watchdog (discarded)
*/

use super::shift::ShiftRegister;
use super::sound::{Sound1, Sound2, SoundBank1, SoundBank2};
use crate::ports::PortBus;

const CREDIT: u8 = 1 << 0;
const START_2P: u8 = 1 << 1;
const START_1P: u8 = 1 << 2;
const SHOT: u8 = 1 << 4;
const LEFT: u8 = 1 << 5;
const RIGHT: u8 = 1 << 6;
const TILT: u8 = 1 << 2;

pub struct ArcadePorts {
    input1: u8,
    input2: u8,
    shift: ShiftRegister,
    sound1: SoundBank1,
    sound2: SoundBank2,
    watchdog_writes: u64,
    sound1_events: Vec<Sound1>,
    sound2_events: Vec<Sound2>,
}

impl Default for ArcadePorts {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcadePorts {
    pub fn new() -> Self {
        ArcadePorts {
            // Bit 1 of port 2 reads high on real cabinets (unused DIP),
            // kept set here so a bare machine boots straight to demo mode.
            input1: 0,
            input2: 1 << 1,
            shift: ShiftRegister::new(),
            sound1: SoundBank1::new(),
            sound2: SoundBank2::new(),
            watchdog_writes: 0,
            sound1_events: Vec::new(),
            sound2_events: Vec::new(),
        }
    }

    fn set_bit(byte: &mut u8, bit: u8, pressed: bool) {
        if pressed {
            *byte |= bit;
        } else {
            *byte &= !bit;
        }
    }

    pub fn set_credit(&mut self, pressed: bool) {
        Self::set_bit(&mut self.input1, CREDIT, pressed);
    }

    pub fn set_start_1p(&mut self, pressed: bool) {
        Self::set_bit(&mut self.input1, START_1P, pressed);
    }

    pub fn set_start_2p(&mut self, pressed: bool) {
        Self::set_bit(&mut self.input1, START_2P, pressed);
    }

    pub fn set_shot_1p(&mut self, pressed: bool) {
        Self::set_bit(&mut self.input1, SHOT, pressed);
    }

    pub fn set_left_1p(&mut self, pressed: bool) {
        Self::set_bit(&mut self.input1, LEFT, pressed);
    }

    pub fn set_right_1p(&mut self, pressed: bool) {
        Self::set_bit(&mut self.input1, RIGHT, pressed);
    }

    pub fn set_tilt(&mut self, pressed: bool) {
        Self::set_bit(&mut self.input2, TILT, pressed);
    }

    pub fn set_shot_2p(&mut self, pressed: bool) {
        Self::set_bit(&mut self.input2, SHOT, pressed);
    }

    pub fn set_left_2p(&mut self, pressed: bool) {
        Self::set_bit(&mut self.input2, LEFT, pressed);
    }

    pub fn set_right_2p(&mut self, pressed: bool) {
        Self::set_bit(&mut self.input2, RIGHT, pressed);
    }

    /// Drains and returns every sound-bank-1 sample triggered since the
    /// last call.
    pub fn take_sound1_events(&mut self) -> Vec<Sound1> {
        std::mem::take(&mut self.sound1_events)
    }

    pub fn take_sound2_events(&mut self) -> Vec<Sound2> {
        std::mem::take(&mut self.sound2_events)
    }

    pub fn watchdog_writes(&self) -> u64 {
        self.watchdog_writes
    }
}

impl PortBus for ArcadePorts {
    fn input(&mut self, port: u8) -> u8 {
        match port {
            1 => self.input1,
            2 => self.input2,
            3 => self.shift.read(),
            other => {
                log::trace!("IN from unmapped port {other}, returning 0");
                0
            }
        }
    }

    fn output(&mut self, port: u8, value: u8) {
        match port {
            2 => self.shift.write_amount(value),
            3 => {
                let fired = self.sound1.update(value);
                self.sound1_events.extend(fired);
            }
            4 => self.shift.write_data(value),
            5 => {
                let fired = self.sound2.update(value);
                self.sound2_events.extend(fired);
            }
            6 => self.watchdog_writes += 1,
            other => log::trace!("OUT {value:#04x} to unmapped port {other}, discarded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_bit_round_trips_through_input_port_one() {
        let mut ports = ArcadePorts::new();
        ports.set_credit(true);
        assert_eq!(ports.input(1) & CREDIT, CREDIT);
        ports.set_credit(false);
        assert_eq!(ports.input(1) & CREDIT, 0);
    }

    #[test]
    fn shift_register_round_trips_through_ports() {
        let mut ports = ArcadePorts::new();
        ports.output(2, 4);
        ports.output(4, 0x00);
        ports.output(4, 0xFF);
        assert_eq!(ports.input(3), 0xF0);
    }

    #[test]
    fn sound_bank_events_accumulate_until_drained() {
        let mut ports = ArcadePorts::new();
        ports.output(3, 0b0000_0010);
        assert_eq!(ports.take_sound1_events(), vec![Sound1::Shot]);
        assert_eq!(ports.take_sound1_events(), vec![]);
    }

    #[test]
    fn watchdog_writes_are_counted_not_executed() {
        let mut ports = ArcadePorts::new();
        ports.output(6, 0);
        ports.output(6, 0);
        assert_eq!(ports.watchdog_writes(), 2);
    }
}
