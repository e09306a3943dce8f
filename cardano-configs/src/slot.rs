//! Slot/wall-clock time conversion (§6.1).
//!
//! A `SlotConfig` pins down the three numbers a chain's clock needs: the
//! wall-clock instant of some reference slot, that slot's number, and the
//! duration of a slot. Everything else is arithmetic.

/// Maps slots to POSIX milliseconds and back for one network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotConfig {
    /// POSIX time, in milliseconds, of `zero_slot`.
    pub zero_time: i64,
    pub zero_slot: u64,
    pub slot_length: u64,
}

impl SlotConfig {
    pub fn slot_to_time(&self, slot: u64) -> i64 {
        let elapsed = slot.saturating_sub(self.zero_slot) as i64;
        self.zero_time + elapsed * self.slot_length as i64
    }

    pub fn time_to_slot(&self, time: i64) -> u64 {
        let elapsed_ms = (time - self.zero_time).max(0);
        self.zero_slot + (elapsed_ms as u64) / self.slot_length
    }

    pub const MAINNET: SlotConfig = SlotConfig { zero_time: 1_596_059_091_000, zero_slot: 4_492_800, slot_length: 1_000 };
    pub const PREVIEW: SlotConfig = SlotConfig { zero_time: 1_666_656_000_000, zero_slot: 0, slot_length: 1_000 };
    pub const PREPROD: SlotConfig = SlotConfig { zero_time: 1_654_041_600_000, zero_slot: 86_400, slot_length: 1_000 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_a_slot() {
        let time = SlotConfig::MAINNET.slot_to_time(SlotConfig::MAINNET.zero_slot + 10);
        assert_eq!(SlotConfig::MAINNET.time_to_slot(time), SlotConfig::MAINNET.zero_slot + 10);
    }

    #[test]
    fn zero_slot_maps_to_zero_time() {
        assert_eq!(SlotConfig::PREVIEW.slot_to_time(0), SlotConfig::PREVIEW.zero_time);
    }
}
