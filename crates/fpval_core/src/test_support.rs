//! Shared snapshot fixtures for unit tests.

use crate::snapshot::{capability, FingerprintSnapshot, RenderProbe, ScreenInfo, WebGlProbe};

pub const CHROME_WINDOWS_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const FIREFOX_LINUX_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";
pub const SAFARI_MAC_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15";
pub const EDGE_WINDOWS_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.2210.91";
pub const OPERA_WINDOWS_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 OPR/106.0.0.0";
pub const IPHONE_SAFARI_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Mobile/15E148 Safari/604.1";
pub const ANDROID_CHROME_UA: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";

/// 8 cores / 16 GB, 1920x1080@2, every render probe open, en-US in New York.
pub fn canonical_desktop() -> FingerprintSnapshot {
    let mut snap = FingerprintSnapshot::default();

    snap.hardware.canvas = RenderProbe {
        hash: Some("c4nv45h45h".into()),
        blocked: false,
        spoofed: false,
    };
    snap.hardware.webgl = WebGlProbe {
        hash: Some("w3bglh45h".into()),
        renderer: Some("ANGLE (NVIDIA GeForce RTX 3070 Direct3D11 vs_5_0 ps_5_0)".into()),
        vendor: Some("Google Inc. (NVIDIA)".into()),
        blocked: false,
        spoofed: false,
    };
    snap.hardware.audio = RenderProbe {
        hash: Some("124.04347527516074".into()),
        blocked: false,
        spoofed: false,
    };
    snap.hardware.screen = ScreenInfo {
        width: 1920,
        height: 1080,
        color_depth: 24,
        pixel_ratio: 2.0,
    };
    snap.hardware.cpu_cores = Some(8);
    snap.hardware.device_memory_gb = Some(16.0);
    snap.hardware.touch_points = 0;

    snap.software.user_agent = CHROME_WINDOWS_UA.into();
    snap.software.platform = "Win32".into();
    snap.software.language = "en-US".into();
    snap.software.languages = vec!["en-US".into(), "en".into()];
    snap.software.timezone = "America/New_York".into();
    snap.software.fonts = (0..20).map(|i| format!("Font Family {i}")).collect();
    snap.software.plugins = vec![
        "PDF Viewer".into(),
        "Chrome PDF Viewer".into(),
        "Chromium PDF Viewer".into(),
        "Microsoft Edge PDF Viewer".into(),
        "WebKit built-in PDF".into(),
    ];
    snap.software.do_not_track = false;
    snap.software.global_privacy_control = false;

    for name in [
        capability::WEBGL2,
        capability::WEBASSEMBLY,
        capability::SERVICE_WORKER,
        capability::WEBRTC,
        capability::BLUETOOTH,
        capability::USB,
        capability::BATTERY,
        capability::GEOLOCATION,
        capability::NOTIFICATIONS,
        capability::MEDIA_DEVICES,
    ] {
        snap.capabilities.insert(name.to_string(), true);
    }

    snap
}

/// The canonical desktop with every render probe blocked and no fonts.
pub fn hardened_desktop() -> FingerprintSnapshot {
    let mut snap = canonical_desktop();
    snap.hardware.canvas.blocked = true;
    snap.hardware.webgl.blocked = true;
    snap.hardware.audio.blocked = true;
    snap.software.fonts.clear();
    snap
}

/// Mid-range Android phone.
pub fn android_phone() -> FingerprintSnapshot {
    let mut snap = FingerprintSnapshot::default();
    snap.hardware.canvas.hash = Some("andr01dc4nv45".into());
    snap.hardware.screen = ScreenInfo {
        width: 412,
        height: 915,
        color_depth: 24,
        pixel_ratio: 2.625,
    };
    snap.hardware.cpu_cores = Some(4);
    snap.hardware.device_memory_gb = Some(4.0);
    snap.hardware.touch_points = 5;
    snap.software.user_agent = ANDROID_CHROME_UA.into();
    snap.software.platform = "Linux armv8l".into();
    snap.software.language = "es-ES".into();
    snap.software.timezone = "Europe/Madrid".into();
    snap.software.fonts = (0..8).map(|i| format!("Android Font {i}")).collect();
    snap
}
