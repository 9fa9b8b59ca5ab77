//! Coarse user-agent classification used to label sessions in the
//! "choose a session to close" list.

/// Device classification derived from a `User-Agent` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSummary {
    pub device_type: &'static str,
    pub os: &'static str,
    pub browser: &'static str,
}

impl DeviceSummary {
    /// Human-readable label, e.g. `"desktop · Windows · Chrome"`.
    pub fn label(&self) -> String {
        format!("{} · {} · {}", self.device_type, self.os, self.browser)
    }
}

/// Classify a user agent by substring matching.
pub fn summarize(user_agent: &str) -> DeviceSummary {
    let ua = user_agent.to_lowercase();

    let device_type = if ua.contains("ipad") || ua.contains("tablet") {
        "tablet"
    } else if ua.contains("mobile") || ua.contains("iphone") || ua.contains("android") {
        "mobile"
    } else {
        "desktop"
    };

    // Mobile platforms first: their UAs also mention "mac os" / "linux".
    let os = if ua.contains("android") {
        "Android"
    } else if ua.contains("iphone") || ua.contains("ipad") {
        "iOS"
    } else if ua.contains("windows") {
        "Windows"
    } else if ua.contains("mac os") || ua.contains("macintosh") {
        "macOS"
    } else if ua.contains("linux") {
        "Linux"
    } else {
        "Unknown"
    };

    let browser = if ua.contains("edg") {
        "Edge"
    } else if ua.contains("firefox") {
        "Firefox"
    } else if ua.contains("chrome") || ua.contains("crios") {
        "Chrome"
    } else if ua.contains("safari") {
        "Safari"
    } else {
        "Unknown"
    };

    DeviceSummary {
        device_type,
        os,
        browser,
    }
}
