//! Property-based tests for address literal detection and family preference

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use favserv_core::resolver::{parse_literal_address, pick_preferred_address};
use proptest::prelude::*;

fn arb_ip() -> impl Strategy<Value = IpAddr> {
    prop_oneof![
        any::<[u8; 4]>().prop_map(|o| IpAddr::V4(Ipv4Addr::from(o))),
        any::<[u16; 8]>().prop_map(|s| IpAddr::V6(Ipv6Addr::from(s))),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_prefers_first_ipv4(addrs in prop::collection::vec(arb_ip(), 0..8)) {
        let picked = pick_preferred_address(&addrs);
        match addrs.iter().find(|ip| ip.is_ipv4()) {
            Some(v4) => prop_assert_eq!(picked, Some(*v4)),
            None => prop_assert_eq!(picked, addrs.first().copied()),
        }
    }

    #[test]
    fn prop_literals_are_detected(ip in arb_ip()) {
        prop_assert_eq!(parse_literal_address(&ip.to_string()), Some(ip));
        if let IpAddr::V6(v6) = ip {
            prop_assert_eq!(parse_literal_address(&format!("[{v6}]")), Some(ip));
        }
    }

    #[test]
    fn prop_hostnames_are_not_literals(host in "[a-z][a-z0-9-]{0,20}\\.[a-z]{2,6}") {
        prop_assert_eq!(parse_literal_address(&host), None);
    }
}
