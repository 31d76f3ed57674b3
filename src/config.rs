//! Configuration management for the bridge
//!
//! This module provides runtime configuration loading from JSON files,
//! enabling tuning of the debounce timeouts and the notification counting
//! assumption without recompilation. Missing or malformed files fall back
//! to defaults with a warning.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Complete bridge configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub bridge: BridgeOptions,
}

/// Press classifier timing and counting parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Window within which a second press still counts toward the same
    /// burst, in milliseconds
    pub double_press_timeout_ms: u64,
    /// Silence required before a burst is considered released, in milliseconds
    pub release_timeout_ms: u64,
    /// Raw notifications delivered per physical press. The platform is
    /// observed to double-fire; this is an empirical quirk, not a documented
    /// guarantee, so it is tunable rather than hard-coded.
    pub notifications_per_press: u32,
    /// Audio stream to monitor; None matches any stream
    pub monitored_stream: Option<u32>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            double_press_timeout_ms: 350,
            release_timeout_ms: 100,
            notifications_per_press: 2,
            monitored_stream: None,
        }
    }
}

impl ClassifierConfig {
    /// Full double-press window.
    pub fn double_press_timeout(&self) -> Duration {
        Duration::from_millis(self.double_press_timeout_ms)
    }

    /// Silence window that ends a burst.
    pub fn release_timeout(&self) -> Duration {
        Duration::from_millis(self.release_timeout_ms)
    }

    /// Delay before the settle timer first polls the burst counter.
    ///
    /// The poll loop then re-checks every `release_timeout`, so the first
    /// check lands exactly at the double-press window boundary.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(
            self.double_press_timeout_ms
                .saturating_sub(self.release_timeout_ms),
        )
    }

    /// Counter increment contributed by one raw notification.
    pub fn sub_event_increment(&self) -> f64 {
        1.0 / f64::from(self.notifications_per_press.max(1))
    }
}

/// Orchestration options outside the classifier core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeOptions {
    /// Keep a silent background audio signal active so level-change
    /// notifications still arrive while the display is off. Implemented by
    /// the platform glue layer; the core only surfaces the flag.
    pub suppress_background_silence: bool,
    /// Forward the 0x03 release command to the peripheral in addition to
    /// the directional commands
    pub forward_release: bool,
    /// Gesture broadcast channel capacity
    pub event_buffer: usize,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            suppress_background_silence: true,
            forward_release: false,
            event_buffer: 64,
        }
    }
}

impl BridgeConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or the defaults if the file is missing or
    /// the JSON is invalid (logged as a warning either way).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert_eq!(config.classifier.double_press_timeout_ms, 350);
        assert_eq!(config.classifier.release_timeout_ms, 100);
        assert_eq!(config.classifier.notifications_per_press, 2);
        assert_eq!(config.classifier.monitored_stream, None);
        assert!(config.bridge.suppress_background_silence);
        assert!(!config.bridge.forward_release);
    }

    #[test]
    fn test_settle_delay_is_window_minus_release() {
        let config = ClassifierConfig::default();
        assert_eq!(config.settle_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_sub_event_increment_guards_zero_divisor() {
        let mut config = ClassifierConfig::default();
        assert_eq!(config.sub_event_increment(), 0.5);
        config.notifications_per_press = 0;
        assert_eq!(config.sub_event_increment(), 1.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = BridgeConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: BridgeConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(
            parsed.classifier.double_press_timeout_ms,
            config.classifier.double_press_timeout_ms
        );
        assert_eq!(parsed.bridge.event_buffer, config.bridge.event_buffer);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let parsed: BridgeConfig =
            serde_json::from_str(r#"{"classifier":{"double_press_timeout_ms":500,"release_timeout_ms":100,"notifications_per_press":2,"monitored_stream":3}}"#)
                .unwrap();
        assert_eq!(parsed.classifier.double_press_timeout_ms, 500);
        assert_eq!(parsed.classifier.monitored_stream, Some(3));
        assert_eq!(parsed.bridge.event_buffer, 64);
    }
}
