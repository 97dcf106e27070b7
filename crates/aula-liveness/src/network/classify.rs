//! Connection quality classification.
//!
//! The effective connection type is the primary signal; RTT and
//! downlink are the fallback when the environment does not report one.

use aula_core::types::network::{ConnectionInfo, ConnectionQuality, EffectiveType};

/// Classify connection quality from raw connection details.
pub fn classify_quality(
    connection: Option<&ConnectionInfo>,
    is_online: bool,
) -> ConnectionQuality {
    if !is_online {
        return ConnectionQuality::Offline;
    }

    if let Some(connection) = connection {
        if let Some(effective_type) = connection.effective_type {
            return match effective_type {
                EffectiveType::FourG => match connection.downlink_mbps {
                    Some(downlink) if downlink <= 1.5 => ConnectionQuality::Good,
                    _ => ConnectionQuality::Excellent,
                },
                EffectiveType::ThreeG => ConnectionQuality::Good,
                EffectiveType::TwoG | EffectiveType::Slow2g => ConnectionQuality::Poor,
            };
        }

        if let (Some(rtt), Some(downlink)) = (connection.rtt_ms, connection.downlink_mbps) {
            if rtt < 150 && downlink > 2.0 {
                return ConnectionQuality::Excellent;
            }
            if rtt < 300 && downlink > 1.0 {
                return ConnectionQuality::Good;
            }
            return ConnectionQuality::Poor;
        }
    }

    // Online with no detailed info.
    ConnectionQuality::Good
}

/// Human-readable connection type label.
pub fn connection_type_label(connection: Option<&ConnectionInfo>) -> String {
    let Some(connection) = connection else {
        return "unknown".to_string();
    };

    match connection.link_type.as_deref() {
        Some("wifi") => "WiFi".to_string(),
        Some("ethernet") => "Ethernet".to_string(),
        Some("cellular") => {
            let effective = connection
                .effective_type
                .map(|t| t.label())
                .unwrap_or("Unknown");
            format!("Cellular ({effective})")
        }
        Some("bluetooth") => "Bluetooth".to_string(),
        Some(other) => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => "Unknown".to_string(),
            }
        }
        None => "Unknown".to_string(),
    }
}

/// Whether the connection is slow enough to degrade heavy features.
pub fn is_slow(connection: Option<&ConnectionInfo>, quality: ConnectionQuality) -> bool {
    if quality == ConnectionQuality::Poor {
        return true;
    }
    matches!(
        connection.and_then(|c| c.effective_type),
        Some(EffectiveType::TwoG) | Some(EffectiveType::Slow2g)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(
        effective_type: Option<EffectiveType>,
        downlink_mbps: Option<f64>,
        rtt_ms: Option<u32>,
    ) -> ConnectionInfo {
        ConnectionInfo {
            effective_type,
            link_type: None,
            downlink_mbps,
            rtt_ms,
            save_data: None,
        }
    }

    #[test]
    fn test_offline_wins() {
        let c = info(Some(EffectiveType::FourG), Some(10.0), Some(20));
        assert_eq!(classify_quality(Some(&c), false), ConnectionQuality::Offline);
    }

    #[test]
    fn test_effective_type_is_primary() {
        let fast = info(Some(EffectiveType::FourG), Some(8.0), None);
        assert_eq!(classify_quality(Some(&fast), true), ConnectionQuality::Excellent);

        let capped = info(Some(EffectiveType::FourG), Some(1.2), None);
        assert_eq!(classify_quality(Some(&capped), true), ConnectionQuality::Good);

        let slow = info(Some(EffectiveType::TwoG), Some(8.0), Some(10));
        assert_eq!(classify_quality(Some(&slow), true), ConnectionQuality::Poor);
    }

    #[test]
    fn test_rtt_downlink_fallback() {
        let excellent = info(None, Some(4.0), Some(80));
        assert_eq!(
            classify_quality(Some(&excellent), true),
            ConnectionQuality::Excellent
        );

        let good = info(None, Some(1.5), Some(250));
        assert_eq!(classify_quality(Some(&good), true), ConnectionQuality::Good);

        let poor = info(None, Some(0.5), Some(600));
        assert_eq!(classify_quality(Some(&poor), true), ConnectionQuality::Poor);
    }

    #[test]
    fn test_online_without_detail_defaults_to_good() {
        assert_eq!(classify_quality(None, true), ConnectionQuality::Good);
        let bare = info(None, None, Some(100));
        assert_eq!(classify_quality(Some(&bare), true), ConnectionQuality::Good);
    }

    #[test]
    fn test_connection_type_labels() {
        assert_eq!(connection_type_label(None), "unknown");

        let mut c = info(Some(EffectiveType::FourG), None, None);
        c.link_type = Some("cellular".to_string());
        assert_eq!(connection_type_label(Some(&c)), "Cellular (4G)");

        c.link_type = Some("wifi".to_string());
        assert_eq!(connection_type_label(Some(&c)), "WiFi");

        c.link_type = Some("wimax".to_string());
        assert_eq!(connection_type_label(Some(&c)), "Wimax");
    }

    #[test]
    fn test_is_slow() {
        let two_g = info(Some(EffectiveType::TwoG), None, None);
        assert!(is_slow(Some(&two_g), ConnectionQuality::Poor));
        assert!(is_slow(None, ConnectionQuality::Poor));
        assert!(!is_slow(None, ConnectionQuality::Good));
    }
}
