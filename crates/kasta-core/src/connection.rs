//! Gateway connectivity bitmask
//!
//! A gateway reports its uplinks as a 4-bit value: bit 0 Wi-Fi, bit 1
//! Ethernet, bit 2 Internet, bit 3 Kasta Cloud.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
    pub struct ConnectionState: u8 {
        const WIFI = 0b0001;
        const ETHERNET = 0b0010;
        const INTERNET = 0b0100;
        const KASTA_CLOUD = 0b1000;
    }
}

/// Flags in display order, paired with their label
const FLAG_LABELS: [(ConnectionState, &str); 4] = [
    (ConnectionState::WIFI, "WiFi"),
    (ConnectionState::ETHERNET, "Ethernet"),
    (ConnectionState::INTERNET, "Internet"),
    (ConnectionState::KASTA_CLOUD, "Kasta Cloud"),
];

impl ConnectionState {
    /// Flags from bits 0-3 of a raw state; higher bits are ignored
    pub fn from_raw(raw: i64) -> Self {
        FLAG_LABELS
            .iter()
            .enumerate()
            .filter(|(bit, _)| is_bit_set(Some(raw), *bit as u32))
            .fold(Self::empty(), |flags, (_, (flag, _))| flags | *flag)
    }

    /// Labels of the set flags in fixed order
    pub fn labels(&self) -> Vec<&'static str> {
        FLAG_LABELS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, label)| *label)
            .collect()
    }
}

/// Per-link view of a connection state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDetails {
    pub wifi: bool,
    pub ethernet: bool,
    pub internet: bool,
    pub kasta_cloud: bool,
}

/// Test a single bit. Missing or negative states and positions past the
/// width of the value are never set.
pub fn is_bit_set(state: Option<i64>, bit_position: u32) -> bool {
    match state {
        Some(state) if state >= 0 && bit_position < 63 => (state >> bit_position) & 1 == 1,
        _ => false,
    }
}

/// `Unknown`, `Disconnected` or `Connected (WiFi, Internet, ...)`
pub fn decode_connection_state(state: Option<i64>) -> String {
    let Some(raw) = state else {
        return "Unknown".to_string();
    };
    let flags = ConnectionState::from_raw(raw);
    if flags.is_empty() {
        "Disconnected".to_string()
    } else {
        format!("Connected ({})", flags.labels().join(", "))
    }
}

pub fn decode_connection_details(state: Option<i64>) -> ConnectionDetails {
    let flags = state.map(ConnectionState::from_raw).unwrap_or_default();
    ConnectionDetails {
        wifi: flags.contains(ConnectionState::WIFI),
        ethernet: flags.contains(ConnectionState::ETHERNET),
        internet: flags.contains(ConnectionState::INTERNET),
        kasta_cloud: flags.contains(ConnectionState::KASTA_CLOUD),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_disconnected() {
        assert_eq!(decode_connection_state(Some(0)), "Disconnected");
    }

    #[test]
    fn test_decode_all_links() {
        assert_eq!(
            decode_connection_state(Some(0xF)),
            "Connected (WiFi, Ethernet, Internet, Kasta Cloud)"
        );
    }

    #[test]
    fn test_decode_order_is_fixed() {
        assert_eq!(decode_connection_state(Some(0b1100)), "Connected (Internet, Kasta Cloud)");
        assert_eq!(decode_connection_state(Some(0b0101)), "Connected (WiFi, Internet)");
    }

    #[test]
    fn test_decode_missing_is_unknown() {
        assert_eq!(decode_connection_state(None), "Unknown");
    }

    #[test]
    fn test_high_bits_are_ignored() {
        assert_eq!(decode_connection_state(Some(16)), "Disconnected");
        assert_eq!(decode_connection_state(Some(17)), "Connected (WiFi)");
        assert_eq!(decode_connection_state(Some(-1)), "Disconnected");
    }

    #[test]
    fn test_state_and_details_agree() {
        for raw in [0, 5, 15, 16, 17, 0x1F, -1, i64::MIN] {
            let details = decode_connection_details(Some(raw));
            let mut links = Vec::new();
            if details.wifi {
                links.push("WiFi");
            }
            if details.ethernet {
                links.push("Ethernet");
            }
            if details.internet {
                links.push("Internet");
            }
            if details.kasta_cloud {
                links.push("Kasta Cloud");
            }
            let expected = if links.is_empty() {
                "Disconnected".to_string()
            } else {
                format!("Connected ({})", links.join(", "))
            };
            assert_eq!(decode_connection_state(Some(raw)), expected, "state {raw}");
        }
        assert!(decode_connection_details(Some(17)).wifi);
        assert_eq!(decode_connection_details(Some(16)), ConnectionDetails::default());
        assert_eq!(decode_connection_details(Some(-1)), ConnectionDetails::default());
    }

    #[test]
    fn test_is_bit_set() {
        assert!(is_bit_set(Some(0b0100), 2));
        assert!(!is_bit_set(Some(0b0100), 1));
        assert!(!is_bit_set(None, 0));
        assert!(!is_bit_set(Some(-1), 0));
        assert!(!is_bit_set(Some(1), 64));
    }

    #[test]
    fn test_details() {
        let details = decode_connection_details(Some(0b1010));
        assert!(!details.wifi);
        assert!(details.ethernet);
        assert!(!details.internet);
        assert!(details.kasta_cloud);
        assert_eq!(decode_connection_details(None), ConnectionDetails::default());
    }
}
