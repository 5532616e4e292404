//! Resource models for the Fitbit Web API.
//!
//! # Design
//! Models are deserialize-only: the client reads them from responses and never
//! writes them back. Field names follow the API's camelCase JSON, unknown keys
//! are ignored, and missing required keys fail deserialization.

use chrono::NaiveDateTime;
use serde::Deserialize;

/// Hardware category of a paired device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum DeviceType {
    #[serde(rename = "TRACKER", alias = "Tracker")]
    Tracker,
    #[serde(rename = "SCALE", alias = "Scale")]
    Scale,
}

/// A device registered to the user, as returned by `GET /1/user/-/devices.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    /// Coarse battery state such as `High`, `Medium`, `Low` or `Empty`.
    pub battery: String,
    /// Battery percentage. Only newer trackers report it.
    #[serde(default)]
    pub battery_level: Option<u8>,
    pub device_version: String,
    /// Local wall-clock time of the last sync; the API sends no offset.
    pub last_sync_time: NaiveDateTime,
    pub mac: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
}
