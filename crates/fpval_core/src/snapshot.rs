//! # Fingerprint Snapshot
//!
//! Input contract produced by the browser-resident collector. The engine only
//! reads it. Every field defaults when absent so a partial snapshot still
//! deserializes and simply scores as "less exposed".

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known capability keys.
pub mod capability {
    pub const WEBGL2: &str = "webgl2";
    pub const WEBASSEMBLY: &str = "webassembly";
    pub const SERVICE_WORKER: &str = "service_worker";
    pub const WEBRTC: &str = "webrtc";
    pub const BLUETOOTH: &str = "bluetooth";
    pub const USB: &str = "usb";
    pub const BATTERY: &str = "battery";
    pub const GEOLOCATION: &str = "geolocation";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const MEDIA_DEVICES: &str = "media_devices";

    /// APIs whose exposure widens the fingerprinting surface.
    pub const SENSITIVE: [&str; 8] = [
        WEBRTC,
        BLUETOOTH,
        USB,
        BATTERY,
        GEOLOCATION,
        NOTIFICATIONS,
        MEDIA_DEVICES,
        WEBGL2,
    ];
}

/// One immutable capture of device and browser characteristics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FingerprintSnapshot {
    pub hardware: HardwareSignals,
    pub software: SoftwareSignals,
    /// Capability name -> supported
    pub capabilities: BTreeMap<String, bool>,
    pub network: Option<NetworkHints>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct HardwareSignals {
    pub canvas: RenderProbe,
    pub webgl: WebGlProbe,
    pub audio: RenderProbe,
    pub screen: ScreenInfo,
    pub cpu_cores: Option<u32>,
    pub device_memory_gb: Option<f64>,
    pub touch_points: u32,
}

/// Result of a rendering probe (canvas or audio).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RenderProbe {
    pub hash: Option<String>,
    pub blocked: bool,
    pub spoofed: bool,
}

impl RenderProbe {
    /// Blocked or spoofed output carries no stable identity.
    pub fn is_protected(&self) -> bool {
        self.blocked || self.spoofed
    }

    /// A usable hash leaked to the page.
    pub fn exposes_hash(&self) -> bool {
        !self.is_protected() && self.hash.as_deref().is_some_and(|h| !h.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct WebGlProbe {
    pub hash: Option<String>,
    pub renderer: Option<String>,
    pub vendor: Option<String>,
    pub blocked: bool,
    pub spoofed: bool,
}

impl WebGlProbe {
    pub fn is_protected(&self) -> bool {
        self.blocked || self.spoofed
    }

    pub fn exposes_hash(&self) -> bool {
        !self.is_protected() && self.hash.as_deref().is_some_and(|h| !h.is_empty())
    }

    pub fn exposes_renderer(&self) -> bool {
        self.exposes_hash() && self.renderer.as_deref().is_some_and(|r| !r.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScreenInfo {
    pub width: u32,
    pub height: u32,
    pub color_depth: u32,
    pub pixel_ratio: f64,
}

impl ScreenInfo {
    /// "WIDTHxHEIGHT", or `None` when either side is unknown.
    pub fn resolution_key(&self) -> Option<String> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(format!("{}x{}", self.width, self.height))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SoftwareSignals {
    pub user_agent: String,
    pub platform: String,
    pub language: String,
    pub languages: Vec<String>,
    pub timezone: String,
    pub fonts: Vec<String>,
    /// Collectors that only count fonts send this instead of the list
    pub font_count: Option<u32>,
    pub plugins: Vec<String>,
    pub do_not_track: bool,
    pub global_privacy_control: bool,
}

/// Optional connection hints from the Network Information API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NetworkHints {
    pub effective_type: Option<String>,
    pub rtt_ms: Option<u32>,
    pub downlink_mbps: Option<f64>,
}

/// Booleans supplied by the external defense-probing layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ExternalHints {
    pub ad_blocker: bool,
    pub vpn: bool,
    pub tor: bool,
}

impl FingerprintSnapshot {
    /// Absent capabilities count as unsupported.
    pub fn capability(&self, name: &str) -> bool {
        self.capabilities.get(name).copied().unwrap_or(false)
    }

    pub fn font_count(&self) -> u32 {
        self.software
            .font_count
            .unwrap_or(self.software.fonts.len() as u32)
    }

    pub fn primary_language(&self) -> Option<&str> {
        let lang = self.software.language.trim();
        if !lang.is_empty() {
            return Some(lang);
        }
        self.software
            .languages
            .iter()
            .map(|l| l.trim())
            .find(|l| !l.is_empty())
    }

    pub fn any_fingerprint_blocking(&self) -> bool {
        self.hardware.canvas.is_protected()
            || self.hardware.webgl.is_protected()
            || self.hardware.audio.is_protected()
    }

    pub fn device_class(&self) -> DeviceClass {
        classify_device(self)
    }
}

/// Coarse device class used for bidder pricing and population comparison.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Desktop,
    Mobile,
    Tablet,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Desktop => "desktop",
            DeviceClass::Mobile => "mobile",
            DeviceClass::Tablet => "tablet",
        }
    }
}

const TABLET_MARKERS: [&str; 4] = ["iPad", "Tablet", "Kindle", "Silk/"];
const MOBILE_MARKERS: [&str; 5] = ["Mobi", "iPhone", "iPod", "Android", "Windows Phone"];

/// User-agent markers win; touch/width heuristics only run when the UA is
/// silent.
pub fn classify_device(snapshot: &FingerprintSnapshot) -> DeviceClass {
    let ua = snapshot.software.user_agent.as_str();

    let android_tablet = ua.contains("Android") && !ua.contains("Mobile");
    if android_tablet || TABLET_MARKERS.iter().any(|m| ua.contains(m)) {
        return DeviceClass::Tablet;
    }
    if MOBILE_MARKERS.iter().any(|m| ua.contains(m)) {
        return DeviceClass::Mobile;
    }

    let touch = snapshot.hardware.touch_points;
    let width = snapshot.hardware.screen.width;
    if touch > 0 && width > 0 {
        if width <= 768 {
            return DeviceClass::Mobile;
        }
        if width <= 1366 {
            return DeviceClass::Tablet;
        }
    }
    DeviceClass::Desktop
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_ua(ua: &str) -> FingerprintSnapshot {
        let mut snap = FingerprintSnapshot::default();
        snap.software.user_agent = ua.to_string();
        snap
    }

    #[test]
    fn test_ua_markers_take_priority() {
        let iphone = with_ua("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148");
        assert_eq!(classify_device(&iphone), DeviceClass::Mobile);

        let ipad = with_ua("Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X)");
        assert_eq!(classify_device(&ipad), DeviceClass::Tablet);

        let android_tab = with_ua("Mozilla/5.0 (Linux; Android 14; SM-X710) Safari/537.36");
        assert_eq!(classify_device(&android_tab), DeviceClass::Tablet);

        let android_phone = with_ua("Mozilla/5.0 (Linux; Android 14; Pixel 8) Mobile Safari/537.36");
        assert_eq!(classify_device(&android_phone), DeviceClass::Mobile);
    }

    #[test]
    fn test_touch_width_heuristics() {
        let mut snap = with_ua("Mozilla/5.0 (X11; Linux x86_64)");
        snap.hardware.touch_points = 5;
        snap.hardware.screen.width = 412;
        assert_eq!(classify_device(&snap), DeviceClass::Mobile);

        snap.hardware.screen.width = 1024;
        assert_eq!(classify_device(&snap), DeviceClass::Tablet);

        snap.hardware.touch_points = 0;
        assert_eq!(classify_device(&snap), DeviceClass::Desktop);
    }

    #[test]
    fn test_partial_snapshot_deserializes() {
        let snap: FingerprintSnapshot =
            serde_json::from_str(r#"{"software":{"user_agent":"x"}}"#).unwrap();
        assert_eq!(snap.software.user_agent, "x");
        assert!(snap.network.is_none());
        assert!(!snap.capability(capability::WEBGL2));
        assert_eq!(snap.font_count(), 0);
        assert!(snap.primary_language().is_none());
    }

    #[test]
    fn test_protected_probe_never_exposes() {
        let probe = RenderProbe {
            hash: Some("abc".into()),
            blocked: false,
            spoofed: true,
        };
        assert!(probe.is_protected());
        assert!(!probe.exposes_hash());
    }
}
