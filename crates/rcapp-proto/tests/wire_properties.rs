//! Property-based tests for the wire format.
//!
//! - The vocabulary check accepts exactly the catalog names
//! - Envelope building never produces a subcommand outside the vocabulary
//! - Arbitrary inbound text decodes or errors, never panics

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rcapp_proto::{ActionError, ActionName, CommandEnvelope, Inbound, ProtocolError, validate};

fn any_known_name() -> impl Strategy<Value = ActionName> {
    prop::sample::select(ActionName::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_validate_matches_catalog(name in "[A-Za-z]{0,20}") {
        let in_catalog = ActionName::ALL.iter().any(|a| a.as_str() == name);
        prop_assert_eq!(validate(&name), in_catalog);
    }

    #[test]
    fn prop_envelope_subcommand_always_in_catalog(
        name in prop_oneof![any_known_name().prop_map(|a| a.as_str().to_string()), "[A-Za-z]{1,12}"],
        params in prop::collection::vec("[a-z0-9.]{0,6}", 0..3),
    ) {
        let sent_at = Utc.timestamp_opt(0, 0).single().unwrap_or_default();
        match CommandEnvelope::build(&name, params, sent_at) {
            Ok(envelope) => {
                prop_assert!(validate(&envelope.subcommand));
                prop_assert_eq!(envelope.command, CommandEnvelope::COMMAND);
            },
            Err(ActionError::UnknownAction(rejected)) => {
                prop_assert!(!validate(&rejected));
            },
            Err(ActionError::WrongArity { .. } | ActionError::InvalidParameter { .. }) => {
                prop_assert!(validate(&name));
            },
        }
    }

    #[test]
    fn prop_inbound_text_never_panics(text in ".{0,200}") {
        let _ = Inbound::from_text(&text);
    }

    #[test]
    fn prop_full_state_mode_is_preserved(mode in "[A-Za-z ]{1,16}", score in 0u32..100_000) {
        let text = format!(
            r#"{{"message":"FullState","dataObj":{{"GCMode":"{mode}","currentScore":{score}}}}}"#
        );
        match Inbound::from_text(&text) {
            Ok(Inbound::FullState(snapshot)) => {
                prop_assert_eq!(snapshot.mode, mode);
                prop_assert_eq!(snapshot.current_score, Some(f64::from(score)));
            },
            other => prop_assert!(false, "unexpected decode: {:?}", other),
        }
    }
}

#[test]
fn closing_connection_ignores_payload() {
    let decoded = Inbound::from_text(r#"{"message":"ClosingConnection","dataObj":{"why":"bye"}}"#);
    assert_eq!(decoded, Ok(Inbound::ClosingConnection));
}

#[test]
fn all_playlists_with_wrong_shape_is_protocol_error() {
    let decoded = Inbound::from_text(r#"{"message":"AllPlaylists","dataObj":42}"#);
    assert!(matches!(decoded, Err(ProtocolError::InvalidPayload { .. })));
}
