//! The concrete stages a lint run can execute.

pub mod availability;
pub mod capability;
pub mod capabilities;
pub mod tables;

use crate::pipeline::Stage;

/// Stage names accepted in configuration, in default execution order.
pub const KNOWN_STAGE_NAMES: &[&str] = &[
    "capabilities",
    "capability-content",
    "availability",
    "tables",
];

/// Builds the stage registered under `name`, or `None` for an unknown name.
pub fn create(name: &str) -> Option<Box<dyn Stage>> {
    match name {
        "capabilities" => Some(Box::new(capabilities::stage())),
        "capability-content" => Some(Box::new(capability::CapabilityContentStage::new())),
        "availability" => Some(Box::new(availability::stage())),
        "tables" => Some(Box::new(tables::stage())),
        _ => None,
    }
}

/// The full default pipeline.
pub fn default_stages() -> Vec<Box<dyn Stage>> {
    KNOWN_STAGE_NAMES
        .iter()
        .filter_map(|name| create(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_name_creates_a_stage() {
        for name in KNOWN_STAGE_NAMES {
            let stage = create(name).unwrap_or_else(|| panic!("no stage for {name}"));
            assert!(!stage.code().is_empty());
            assert!(!stage.description().is_empty());
        }
        assert!(create("telescope").is_none());
    }

    #[test]
    fn default_pipeline_covers_all_known_names() {
        assert_eq!(default_stages().len(), KNOWN_STAGE_NAMES.len());
    }
}
