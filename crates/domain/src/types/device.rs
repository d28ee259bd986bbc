//! Device info sent with every authentication request

use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;

/// Client-identifying metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub app_id: String,
    pub app_version: String,
    pub platform: String,
    pub platform_version: String,
    pub sdk_version: String,
    /// Omitted until the server assigns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

impl DeviceInfo {
    /// Device info for this process, without a device id.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            app_id: config.app_id.clone().unwrap_or_default(),
            app_version: config.app_version.clone(),
            platform: std::env::consts::OS.to_string(),
            platform_version: config.platform_version.clone(),
            sdk_version: env!("CARGO_PKG_VERSION").to_string(),
            device_id: None,
        }
    }

    pub fn with_device_id(mut self, device_id: Option<String>) -> Self {
        self.device_id = device_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_is_omitted_until_assigned() {
        let info = DeviceInfo::from_config(&ClientConfig::for_app("testapp"));
        let json = serde_json::to_value(&info).unwrap();

        for field in ["appId", "appVersion", "platform", "platformVersion", "sdkVersion"] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        assert!(json.get("deviceId").is_none());
        assert_eq!(json["appId"], "testapp");

        let json =
            serde_json::to_value(info.with_device_id(Some("8773934448abcdef12345678".into())))
                .unwrap();
        assert_eq!(json["deviceId"], "8773934448abcdef12345678");
    }
}
