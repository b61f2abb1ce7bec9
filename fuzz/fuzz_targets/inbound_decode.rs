//! Fuzz target for inbound message decoding
//!
//! # Strategy
//!
//! - Raw text: arbitrary bytes, lossily decoded as UTF-8
//! - Shaped text: a known message type with arbitrary payload text
//!
//! # Invariants
//!
//! - Decoding NEVER panics
//! - A decoded message re-encodes, and the re-encoded text decodes to the
//!   same message type

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rcapp_proto::Inbound;

#[derive(Debug, Arbitrary)]
enum Input {
    Raw(Vec<u8>),
    Shaped { kind: u8, payload: String },
}

const TYPES: [&str; 6] =
    ["FullState", "AllPlaylists", "ClosingConnection", "Defines", "TestMessage", "Error"];

fuzz_target!(|input: Input| {
    let text = match input {
        Input::Raw(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Input::Shaped { kind, payload } => {
            let kind = TYPES[usize::from(kind) % TYPES.len()];
            format!(r#"{{"message":"{kind}","dataObj":{payload}}}"#)
        },
    };

    let Ok(message) = Inbound::from_text(&text) else {
        return;
    };

    let encoded = message.to_json().expect("decoded message must re-encode");
    let again = Inbound::from_text(&encoded).expect("re-encoded message must decode");
    assert_eq!(message.message_type(), again.message_type());
});
