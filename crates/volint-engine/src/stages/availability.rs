//! Schema validation of the VOSI availability endpoint.

use crate::xsd::{ExpectedRoot, XsdStage};
use volint_codes::FixedCode;

pub fn stage() -> XsdStage {
    XsdStage::new(
        "AVV",
        "Validate availability document against the schema",
        "availability",
        ExpectedRoot {
            local: "availability",
            namespace: "http://www.ivoa.net/xml/VOSIAvailability/v1.0",
        },
        false,
    )
    .with_missing_note(
        FixedCode::AvailabilityNote,
        "Absence of the availability endpoint is not a standards violation",
    )
}
