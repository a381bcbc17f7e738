use super::types::Event;
use std::fs;
use std::path::Path;

/// Load a StatsBomb events file (JSON array of events)
pub fn load_events_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Event>> {
    let data = fs::read_to_string(path)?;
    let events: Vec<Event> = serde_json::from_str(&data)?;
    Ok(events)
}

/// Save events as a JSON array
pub fn save_events_json<P: AsRef<Path>>(events: &[Event], path: P) -> anyhow::Result<()> {
    let data = serde_json::to_string_pretty(events)?;
    fs::write(path, data)?;
    Ok(())
}
