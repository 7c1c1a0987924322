// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Phit framing.
//!
//! A phit is an 18-bit word:
//!
//! ```text
//!  17 16 | 15 ........ 10 | 9 ........... 0
//!  type  | destination    | unused            (header)
//!  type  | data                             (payload)
//!  type  | zero                             (null)
//! ```
//!
//! The type tag is `0b11` for a header, `0b10` for a payload and `0b00` for a
//! null phit. The allocator only ever looks at a 4-bit
//! [arbitration code](Phit::arbitration_code) taken from the top of the word.

use std::fmt;

use arbsim_engine::types::SimError;
use thiserror::Error;

/// Width of a phit in bits.
pub const PHIT_BITS: u32 = 18;

/// Width of the destination field of a header.
pub const DESTINATION_BITS: u32 = 6;

/// Largest destination address a header can carry.
pub const MAX_DESTINATION: u8 = (1 << DESTINATION_BITS) - 1;

/// Width of the data field of a payload phit.
pub const DATA_BITS: u32 = 16;

/// The arbitration code presented by anything that is not a header.
pub const IDLE_CODE: u8 = 0;

const TYPE_SHIFT: u32 = 16;
const DESTINATION_SHIFT: u32 = 10;
const ARBITRATION_CODE_SHIFT: u32 = 14;
const PORT_BITS: u32 = 2;
const PHIT_MASK: u32 = (1 << PHIT_BITS) - 1;

/// The type tag carried in the top two bits of a phit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PhitType {
    Null = 0b00,
    Payload = 0b10,
    Header = 0b11,
}

impl TryFrom<u8> for PhitType {
    type Error = u8;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0b00 => Ok(PhitType::Null),
            0b10 => Ok(PhitType::Payload),
            0b11 => Ok(PhitType::Header),
            _ => Err(tag),
        }
    }
}

impl fmt::Display for PhitType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PhitType::Null => write!(f, "Null"),
            PhitType::Payload => write!(f, "Payload"),
            PhitType::Header => write!(f, "Header"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PhitError {
    #[error("malformed phit {bits:#020b}")]
    MalformedPhit { bits: u32 },

    #[error("{phit_type} phit does not have {field}")]
    WrongVariant {
        field: &'static str,
        phit_type: PhitType,
    },

    #[error("destination {0} does not fit in 6 bits")]
    DestinationOutOfRange(u8),
}

impl From<PhitError> for SimError {
    fn from(e: PhitError) -> Self {
        SimError(e.to_string())
    }
}

/// A physical transfer unit.
///
/// Headers can only be built through [`Phit::header`] or [`Phit::decode`],
/// so their destination always fits in 6 bits.
///
/// ```compile_fail
/// use arbsim_protocols::phit::Phit;
///
/// let phit = Phit::Header { destination: 200 };
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phit {
    #[non_exhaustive]
    Header {
        destination: u8,
    },
    Payload {
        data: u16,
    },
    #[default]
    Null,
}

impl Phit {
    /// Create a header phit, rejecting destinations wider than 6 bits.
    pub fn header(destination: u8) -> Result<Self, PhitError> {
        if destination > MAX_DESTINATION {
            return Err(PhitError::DestinationOutOfRange(destination));
        }
        Ok(Phit::Header { destination })
    }

    #[must_use]
    pub fn payload(data: u16) -> Self {
        Phit::Payload { data }
    }

    #[must_use]
    pub fn phit_type(&self) -> PhitType {
        match self {
            Phit::Header { .. } => PhitType::Header,
            Phit::Payload { .. } => PhitType::Payload,
            Phit::Null => PhitType::Null,
        }
    }

    pub fn destination(&self) -> Result<u8, PhitError> {
        match self {
            Phit::Header { destination } => Ok(*destination),
            _ => Err(PhitError::WrongVariant {
                field: "a destination",
                phit_type: self.phit_type(),
            }),
        }
    }

    pub fn data(&self) -> Result<u16, PhitError> {
        match self {
            Phit::Payload { data } => Ok(*data),
            _ => Err(PhitError::WrongVariant {
                field: "data",
                phit_type: self.phit_type(),
            }),
        }
    }

    /// Pack the phit into its 18-bit wire format.
    #[must_use]
    pub fn encode(&self) -> u32 {
        let tag = (self.phit_type() as u32) << TYPE_SHIFT;
        match self {
            Phit::Header { destination } => {
                debug_assert!(*destination <= MAX_DESTINATION, "destination {destination}");
                tag | ((*destination & MAX_DESTINATION) as u32) << DESTINATION_SHIFT
            }
            Phit::Payload { data } => tag | *data as u32,
            Phit::Null => tag,
        }
    }

    /// Unpack a phit from its 18-bit wire format.
    pub fn decode(bits: u32) -> Result<Self, PhitError> {
        if bits & !PHIT_MASK != 0 {
            return Err(PhitError::MalformedPhit { bits });
        }
        let tag = (bits >> TYPE_SHIFT) as u8;
        match PhitType::try_from(tag) {
            Ok(PhitType::Header) => Ok(Phit::Header {
                destination: ((bits >> DESTINATION_SHIFT) as u8) & MAX_DESTINATION,
            }),
            Ok(PhitType::Payload) => Ok(Phit::Payload {
                data: (bits & 0xffff) as u16,
            }),
            Ok(PhitType::Null) => Ok(Phit::Null),
            Err(_) => Err(PhitError::MalformedPhit { bits }),
        }
    }

    /// The 4-bit code the allocator arbitrates on.
    ///
    /// For a header this is the top four bits of the wire format: the type
    /// tag followed by the output port (the top two bits of the destination).
    /// Everything else presents [`IDLE_CODE`].
    #[must_use]
    pub fn arbitration_code(&self) -> u8 {
        match self {
            Phit::Header { .. } => ((self.encode() >> ARBITRATION_CODE_SHIFT) & 0b1111) as u8,
            _ => IDLE_CODE,
        }
    }
}

impl fmt::Display for Phit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#020b}", self.encode())
    }
}

/// Returns the output port requested by an arbitration code, if the code
/// carries a header.
#[must_use]
pub fn requested_port(code: u8) -> Option<u8> {
    if (code >> PORT_BITS) == PhitType::Header as u8 {
        Some(code & ((1 << PORT_BITS) - 1))
    } else {
        None
    }
}

/// Returns the output port a destination address is routed to.
#[must_use]
pub fn port_of(destination: u8) -> u8 {
    (destination & MAX_DESTINATION) >> (DESTINATION_BITS - PORT_BITS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format() {
        assert_eq!(Phit::header(0b101101).unwrap().encode(), 0b11_101101_0000000000);
        assert_eq!(Phit::payload(0x1234).encode(), 0b10_0001_0010_0011_0100);
        assert_eq!(Phit::Null.encode(), 0);
    }

    #[test]
    fn arbitration_codes() {
        assert_eq!(Phit::header(0b000000).unwrap().arbitration_code(), 0b1100);
        assert_eq!(Phit::header(0b011111).unwrap().arbitration_code(), 0b1101);
        assert_eq!(Phit::header(0b100000).unwrap().arbitration_code(), 0b1110);
        assert_eq!(Phit::header(0b111111).unwrap().arbitration_code(), 0b1111);
        assert_eq!(Phit::payload(0xffff).arbitration_code(), IDLE_CODE);
        assert_eq!(Phit::Null.arbitration_code(), IDLE_CODE);
    }

    #[test]
    fn requested_ports() {
        for destination in 0..=MAX_DESTINATION {
            let code = Phit::header(destination).unwrap().arbitration_code();
            assert_eq!(requested_port(code), Some(port_of(destination)));
        }
        assert_eq!(requested_port(IDLE_CODE), None);
        assert_eq!(requested_port(0b1011), None);
    }

    #[test]
    fn display_is_binary_word() {
        assert_eq!(format!("{}", Phit::payload(1)), "0b100000000000000001");
    }
}
