/*!
sound.rs - Edge-triggered sample playback for the two discrete sound
output ports. A sample fires only on a 0-to-1 transition of its bit, so
holding a bit high across frames never replays the sound.

Bank 2's bit 1 (FLEET_MOVE_2) is wired to its own sample here; the
original hardware driver this was adapted from re-triggered
`FLEET_MOVE_1`'s sample for that bit instead, which is the one behavior
this module deliberately does not reproduce.
*/

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sound1 {
    Ufo,
    Shot,
    PlayerDie,
    InvaderDie,
    ExtraLife,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sound2 {
    FleetMove1,
    FleetMove2,
    FleetMove3,
    FleetMove4,
    UfoHit,
}

const SOUND1_BITS: [(u8, Sound1); 5] = [
    (1 << 0, Sound1::Ufo),
    (1 << 1, Sound1::Shot),
    (1 << 2, Sound1::PlayerDie),
    (1 << 3, Sound1::InvaderDie),
    (1 << 4, Sound1::ExtraLife),
];

const SOUND2_BITS: [(u8, Sound2); 5] = [
    (1 << 0, Sound2::FleetMove1),
    (1 << 1, Sound2::FleetMove2),
    (1 << 2, Sound2::FleetMove3),
    (1 << 3, Sound2::FleetMove4),
    (1 << 4, Sound2::UfoHit),
];

#[derive(Default)]
pub struct SoundBank1 {
    prev: u8,
}

impl SoundBank1 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the latest port-3 output byte; returns every sample whose bit
    /// just rose from 0 to 1.
    pub fn update(&mut self, port_value: u8) -> Vec<Sound1> {
        let risen = !self.prev & port_value;
        self.prev = port_value;
        SOUND1_BITS
            .iter()
            .filter(|(bit, _)| risen & bit != 0)
            .map(|(_, sample)| *sample)
            .collect()
    }
}

#[derive(Default)]
pub struct SoundBank2 {
    prev: u8,
}

impl SoundBank2 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, port_value: u8) -> Vec<Sound2> {
        let risen = !self.prev & port_value;
        self.prev = port_value;
        SOUND2_BITS
            .iter()
            .filter(|(bit, _)| risen & bit != 0)
            .map(|(_, sample)| *sample)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_bit_fires_only_once() {
        let mut bank = SoundBank1::new();
        assert_eq!(bank.update(0b0000_0010), vec![Sound1::Shot]);
        assert_eq!(bank.update(0b0000_0010), vec![]);
        assert_eq!(bank.update(0b0000_0000), vec![]);
        assert_eq!(bank.update(0b0000_0010), vec![Sound1::Shot]);
    }

    #[test]
    fn fleet_move_two_fires_its_own_sample_not_fleet_move_one() {
        let mut bank = SoundBank2::new();
        let fired = bank.update(0b0000_0010);
        assert_eq!(fired, vec![Sound2::FleetMove2]);
    }

    #[test]
    fn multiple_bits_can_rise_in_the_same_update() {
        let mut bank = SoundBank2::new();
        let fired = bank.update(0b0001_1001);
        assert_eq!(
            fired,
            vec![Sound2::FleetMove1, Sound2::FleetMove4, Sound2::UfoHit]
        );
    }
}
