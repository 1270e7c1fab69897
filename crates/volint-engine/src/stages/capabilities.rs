//! Schema validation of the VOSI capabilities endpoint.

use crate::xsd::{ExpectedRoot, XsdStage};

/// The capabilities document is the one VOSI resource a service must serve.
pub fn stage() -> XsdStage {
    XsdStage::new(
        "CPV",
        "Validate capabilities document against the schema",
        "capabilities",
        ExpectedRoot {
            local: "capabilities",
            namespace: "http://www.ivoa.net/xml/VOSICapabilities/v1.0",
        },
        true,
    )
}
