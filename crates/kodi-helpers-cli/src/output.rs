use serde::Serialize;

use kodi_helpers_runtime::entities::{DeviceInfo, SensorEntity, SwitchEntity};
use kodi_helpers_runtime::SensorSnapshot;

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub device: DeviceInfo,
    pub sensors: Vec<SensorEntity>,
    pub switch: SwitchEntity,
    pub available: bool,
    pub updated_at: String,
}

impl StatusReport {
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let version = self
            .device
            .sw_version
            .as_deref()
            .map(|v| format!(" {v}"))
            .unwrap_or_default();
        out.push_str(&format!(
            "{}{version} @ {}\n",
            self.device.name, self.device.configuration_url
        ));
        for sensor in &self.sensors {
            out.push_str(&format!("  {:<20} {}\n", sensor.kind.name(), sensor.value));
        }
        let switch = if self.switch.is_on { "on" } else { "off" };
        out.push_str(&format!("  {:<20} {switch}\n", "Use HTTPS"));
        out
    }
}

/// One line per poll for `watch`.
pub fn snapshot_line(snapshot: &SensorSnapshot) -> String {
    if !snapshot.available {
        return format!("[{}] {}", snapshot.device_name, snapshot.state.main_info);
    }
    let extra = if snapshot.state.extra_info.is_empty() {
        String::new()
    } else {
        format!(" | {}", snapshot.state.extra_info)
    };
    format!(
        "[{}] {}: {}{extra} | {}",
        snapshot.device_name, snapshot.media_type, snapshot.state.main_info, snapshot.state.audio_info
    )
}
