/// Display metadata for one measurement column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorInfo<'a> {
    pub key: &'a str,
    pub name: &'a str,
    /// Empty when the raw value is shown without a suffix.
    pub unit: &'a str,
}

/// Known measurement columns, in display order.
pub const SENSORS: [SensorInfo<'static>; 5] = [
    SensorInfo { key: "mq2", name: "MQ-2", unit: "" },
    SensorInfo { key: "mq135", name: "MQ-135", unit: "" },
    SensorInfo { key: "lm35dz", name: "LM35DZ", unit: "°C" },
    SensorInfo { key: "dm436", name: "DM436", unit: "" },
    SensorInfo { key: "relay", name: "Relay", unit: "" },
];

/// Looks up display metadata; unknown keys are labelled with the key itself and no unit.
pub fn sensor_info(key: &str) -> SensorInfo<'_> {
    match SENSORS.iter().find(|info| info.key == key) {
        Some(info) => *info,
        None => SensorInfo {
            key,
            name: key,
            unit: "",
        },
    }
}

pub fn is_known(key: &str) -> bool {
    SENSORS.iter().any(|info| info.key == key)
}
