//! Property-based tests for the favorites line codec

use favserv_core::store::{decode_record, encode_record};
use favserv_core::{RecordId, ServerRecord};
use proptest::prelude::*;

// ========== Strategies ==========

/// Field text: printable, may contain `|`, never a backslash or line break
fn arb_field() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ._:|#@!-]{0,24}"
}

fn arb_hostname() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9-]{0,20}\\.[a-z]{2,4}",
        "(25[0-5]|2[0-4][0-9]|1?[0-9]?[0-9])(\\.(25[0-5]|2[0-4][0-9]|1?[0-9]?[0-9])){3}",
        "[a-z|]{1,12}",
    ]
}

fn arb_record() -> impl Strategy<Value = ServerRecord> {
    (
        "[a-f0-9-]{1,36}",
        arb_field(),
        arb_hostname(),
        1u16..=u16::MAX,
        arb_field(),
        arb_field(),
        any::<bool>(),
        prop::option::of("[a-z#0-9]{1,10}"),
    )
        .prop_map(
            |(id, name, hostname, port, password, identity, show, color)| ServerRecord {
                id: RecordId::from_string(id),
                name,
                hostname,
                port,
                password,
                preferred_identity: identity,
                show_in_launcher: show,
                launcher_color: color,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_roundtrip(record in arb_record()) {
        let line = encode_record(&record);
        prop_assert!(!line.contains('\n'));
        let decoded = decode_record(&line).unwrap();
        prop_assert_eq!(decoded, Some(record));
    }

    #[test]
    fn prop_six_fields_without_hints(record in arb_record()) {
        let mut record = record;
        record.show_in_launcher = false;
        record.launcher_color = None;
        let line = encode_record(&record);
        let unescaped_separators = line.replace("\\|", "").matches('|').count();
        prop_assert_eq!(unescaped_separators, 5);
    }

    #[test]
    fn prop_decode_never_panics(line in "\\PC{0,80}") {
        let _ = decode_record(&line);
    }

    #[test]
    fn prop_bad_port_falls_back(port in "[a-z]{1,6}") {
        let record = decode_record(&format!("id|name|host|{port}")).unwrap().unwrap();
        prop_assert_eq!(record.port, favserv_core::DEFAULT_PORT);
    }
}
