// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! An ingress lane.
//!
//! A lane owns at most one packet at a time and offers one phit of it per
//! cycle. A new packet can only be admitted once the previous one has been
//! completely popped.

use std::sync::Arc;

use arbsim_engine::types::SimError;
use arbsim_protocols::packet::{Packet, PacketConfig, PacketGen};
use arbsim_protocols::phit::Phit;
use arbsim_track::entity::Entity;
use arbsim_track::trace;
use rand::Rng;

pub struct Lane {
    pub entity: Arc<Entity>,
    index: usize,
    enabled: bool,
    pkt_gen: PacketGen,
    packet: Option<Packet>,
}

impl Lane {
    pub fn new(
        parent: &Arc<Entity>,
        index: usize,
        enabled: bool,
        packet_config: PacketConfig,
    ) -> Result<Self, SimError> {
        let entity = Arc::new(Entity::new(parent, format!("lane{index}").as_str()));
        let pkt_gen = PacketGen::new(&entity, "gen", packet_config)?;
        Ok(Self {
            entity,
            index,
            enabled,
            pkt_gen,
            packet: None,
        })
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.packet.is_none()
    }

    /// Admit a new packet with probability `frequency` if the lane is idle.
    ///
    /// Nothing is drawn from `rng` for a busy or disabled lane. Returns
    /// whether a packet was created.
    pub fn maybe_generate<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        frequency: f64,
    ) -> Result<bool, SimError> {
        if !self.enabled || !self.is_idle() || !rng.gen_bool(frequency) {
            return Ok(false);
        }
        self.packet = Some(self.pkt_gen.new_packet(rng)?);
        Ok(true)
    }

    /// Pop the phit offered this cycle, `Null` when idle.
    pub fn next_phit(&mut self) -> Phit {
        let phit = self
            .packet
            .as_mut()
            .and_then(Packet::pop_next_phit)
            .unwrap_or_default();
        trace!(self.entity ; "offer {phit}");
        phit
    }

    /// Drop the packet once all of its phits have been popped.
    ///
    /// Returns true if the lane became idle.
    pub fn free_if_drained(&mut self) -> bool {
        if self.packet.as_ref().is_some_and(Packet::is_drained) {
            self.packet = None;
            return true;
        }
        false
    }
}
