// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Packets and the random packet generator.
//!
//! A packet is one header phit followed by zero or more payload phits, each
//! carrying 16 bits of data. Packets are popped one phit per cycle by the
//! lane that owns them.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use arbsim_engine::sim_error;
use arbsim_engine::types::{SimError, SimResult};
use arbsim_track::debug;
use arbsim_track::entity::Entity;
use rand::Rng;

use crate::phit::{DATA_BITS, MAX_DESTINATION, Phit, PhitError};

/// Payload sizes are drawn in multiples of this many bits.
pub const PAYLOAD_GRANULARITY_BITS: u32 = DATA_BITS;

/// Largest payload a packet may be configured to carry.
pub const MAX_PAYLOAD_BITS: u32 = 16 * 1024;

/// The data placed in every payload phit by [`PayloadPattern::default`].
pub const FIXED_PAYLOAD_DATA: u16 = 0x1234;

/// How the data of payload phits is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadPattern {
    /// Every payload phit carries the same value.
    Fixed(u16),
    /// Every payload phit carries a uniformly random value.
    Random,
}

impl Default for PayloadPattern {
    fn default() -> Self {
        PayloadPattern::Fixed(FIXED_PAYLOAD_DATA)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PacketConfig {
    /// Smallest payload in bits (inclusive).
    pub min_payload_bits: u32,
    /// Largest payload in bits (inclusive).
    pub max_payload_bits: u32,
    pub payload: PayloadPattern,
    /// Send every packet to this destination rather than a random one.
    pub destination: Option<u8>,
}

impl Default for PacketConfig {
    fn default() -> Self {
        Self {
            min_payload_bits: 32,
            max_payload_bits: 512,
            payload: PayloadPattern::default(),
            destination: None,
        }
    }
}

impl PacketConfig {
    pub fn validate(&self) -> SimResult {
        if self.min_payload_bits > self.max_payload_bits {
            return sim_error!(format!(
                "Minimum payload ({} bits) is larger than the maximum ({} bits)",
                self.min_payload_bits, self.max_payload_bits
            ));
        }
        if self.max_payload_bits > MAX_PAYLOAD_BITS {
            return sim_error!(format!(
                "Maximum payload ({} bits) exceeds the limit of {MAX_PAYLOAD_BITS} bits",
                self.max_payload_bits
            ));
        }
        for bits in [self.min_payload_bits, self.max_payload_bits] {
            if bits % PAYLOAD_GRANULARITY_BITS != 0 {
                return sim_error!(format!(
                    "Payload bound of {bits} bits is not a multiple of {PAYLOAD_GRANULARITY_BITS}"
                ));
            }
        }
        if let Some(destination) = self.destination {
            if destination > MAX_DESTINATION {
                return sim_error!(PhitError::DestinationOutOfRange(destination));
            }
        }
        Ok(())
    }
}

/// A header phit followed by its payload phits.
#[derive(Clone, Debug)]
pub struct Packet {
    /// Sequence number within the generator that created it.
    label: usize,
    destination: u8,
    num_payload_phits: usize,
    phits: VecDeque<Phit>,
}

impl Packet {
    /// Build a packet for `destination` carrying `payload`.
    pub fn new(label: usize, destination: u8, payload: &[u16]) -> Result<Self, PhitError> {
        let mut phits = VecDeque::with_capacity(payload.len() + 1);
        phits.push_back(Phit::header(destination)?);
        phits.extend(payload.iter().map(|data| Phit::payload(*data)));
        Ok(Self {
            label,
            destination,
            num_payload_phits: payload.len(),
            phits,
        })
    }

    /// Take the next phit of the packet. Returns `None` once exhausted.
    pub fn pop_next_phit(&mut self) -> Option<Phit> {
        self.phits.pop_front()
    }

    #[must_use]
    pub fn destination(&self) -> u8 {
        self.destination
    }

    #[must_use]
    pub fn num_payload_phits(&self) -> usize {
        self.num_payload_phits
    }

    #[must_use]
    pub fn payload_bits(&self) -> u32 {
        self.num_payload_phits as u32 * DATA_BITS
    }

    /// Number of phits still to be popped.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.phits.len()
    }

    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.phits.is_empty()
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "pkt{} dest {:#08b}, {} payload phits",
            self.label, self.destination, self.num_payload_phits
        )
    }
}

/// A Packet Generator used by a lane to create packets on demand.
///
/// The generator does not own a random number source; the caller passes the
/// trial's stream in so that all draws of a trial come from one seed.
pub struct PacketGen {
    pub entity: Arc<Entity>,
    config: PacketConfig,
    num_generated: usize,
}

impl PacketGen {
    pub fn new(parent: &Arc<Entity>, name: &str, config: PacketConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            entity: Arc::new(Entity::new(parent, name)),
            config,
            num_generated: 0,
        })
    }

    #[must_use]
    pub fn num_generated(&self) -> usize {
        self.num_generated
    }

    /// Create a packet with a random payload size and destination.
    ///
    /// The size is drawn uniformly from the configured bounds and then rounded
    /// down to a whole number of payload phits.
    pub fn new_packet<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Packet, PhitError> {
        let drawn_bits = rng.gen_range(self.config.min_payload_bits..=self.config.max_payload_bits);
        let payload_bits = drawn_bits / PAYLOAD_GRANULARITY_BITS * PAYLOAD_GRANULARITY_BITS;
        let destination = match self.config.destination {
            Some(destination) => destination,
            None => rng.gen_range(0..=MAX_DESTINATION),
        };

        let num_payload_phits = (payload_bits / DATA_BITS) as usize;
        let mut phits = VecDeque::with_capacity(num_payload_phits + 1);
        phits.push_back(Phit::header(destination)?);
        for _ in 0..num_payload_phits {
            let data = match self.config.payload {
                PayloadPattern::Fixed(data) => data,
                PayloadPattern::Random => rng.gen_range(0..=u16::MAX),
            };
            phits.push_back(Phit::payload(data));
        }

        let packet = Packet {
            label: self.num_generated,
            destination,
            num_payload_phits,
            phits,
        };
        self.num_generated += 1;
        debug!(self.entity ; "created {packet}");
        Ok(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_packet() {
        let mut packet = Packet::new(0, 5, &[1, 2]).unwrap();
        assert_eq!(packet.remaining(), 3);
        assert_eq!(packet.payload_bits(), 32);
        assert_eq!(packet.pop_next_phit(), Some(Phit::header(5).unwrap()));
        assert_eq!(packet.pop_next_phit(), Some(Phit::payload(1)));
        assert_eq!(packet.pop_next_phit(), Some(Phit::payload(2)));
        assert!(packet.is_drained());
        assert_eq!(packet.pop_next_phit(), None);
    }

    #[test]
    fn header_only_packet() {
        let mut packet = Packet::new(0, 63, &[]).unwrap();
        assert_eq!(packet.num_payload_phits(), 0);
        assert!(packet.pop_next_phit().is_some());
        assert!(packet.is_drained());
    }

    #[test]
    fn bad_destination() {
        assert_eq!(
            Packet::new(0, 64, &[]).unwrap_err(),
            PhitError::DestinationOutOfRange(64)
        );
    }

    #[test]
    fn config_validation() {
        assert!(PacketConfig::default().validate().is_ok());

        let inverted = PacketConfig {
            min_payload_bits: 64,
            max_payload_bits: 32,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let unaligned = PacketConfig {
            min_payload_bits: 40,
            ..Default::default()
        };
        assert!(unaligned.validate().is_err());

        let too_far = PacketConfig {
            destination: Some(64),
            ..Default::default()
        };
        assert!(too_far.validate().is_err());

        let empty = PacketConfig {
            min_payload_bits: 0,
            max_payload_bits: 0,
            ..Default::default()
        };
        assert!(empty.validate().is_ok());
    }
}
