// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use arbsim_protocols::phit::{IDLE_CODE, Phit, PhitError, PhitType};

#[test]
fn decode_recovers_every_variant() {
    for phit in [
        Phit::header(0).unwrap(),
        Phit::header(42).unwrap(),
        Phit::payload(0x1234),
        Phit::payload(u16::MAX),
        Phit::Null,
    ] {
        assert_eq!(Phit::decode(phit.encode()).unwrap(), phit);
    }
}

#[test]
fn malformed_words_are_rejected() {
    // Tag 0b01 is not a phit type
    let bits = 0b01_0000_0000_0000_0000;
    assert_eq!(Phit::decode(bits), Err(PhitError::MalformedPhit { bits }));

    // Nothing may be set above bit 17
    let bits = 1 << 18;
    assert_eq!(Phit::decode(bits), Err(PhitError::MalformedPhit { bits }));
}

#[test]
fn accessors_reject_wrong_variant() {
    assert_eq!(
        Phit::payload(7).destination(),
        Err(PhitError::WrongVariant {
            field: "a destination",
            phit_type: PhitType::Payload
        })
    );
    assert!(Phit::Null.data().is_err());
    assert!(Phit::header(3).unwrap().data().is_err());
    assert_eq!(Phit::header(64), Err(PhitError::DestinationOutOfRange(64)));
}

#[test]
fn only_headers_request() {
    assert_eq!(Phit::Null.arbitration_code(), IDLE_CODE);
    assert_eq!(Phit::default(), Phit::Null);
    assert_eq!(Phit::header(0b110000).unwrap().arbitration_code(), 0b1111);
}

#[test]
fn header_destinations_are_never_masked() {
    for destination in 0..=u8::MAX {
        match Phit::header(destination) {
            Ok(phit) => {
                assert!(destination < 64);
                assert_eq!(Phit::decode(phit.encode()).unwrap().destination(), Ok(destination));
            }
            Err(e) => {
                assert!(destination >= 64);
                assert_eq!(e, PhitError::DestinationOutOfRange(destination));
            }
        }
    }
}
