// ABOUTME: Custom serde deserializers for config values.
// ABOUTME: Rejects zero intervals and zero-sized event buffers at parse time.

use serde::Deserialize;

pub fn deserialize_months<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let months = u32::deserialize(deserializer)?;
    if months == 0 {
        return Err(serde::de::Error::custom(
            "periodic.interval_months must be at least 1",
        ));
    }
    Ok(months)
}

pub fn deserialize_capacity<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let capacity = usize::deserialize(deserializer)?;
    if capacity == 0 {
        return Err(serde::de::Error::custom(
            "events.capacity must be at least 1",
        ));
    }
    Ok(capacity)
}
