//! Schema validation of the VOSI tables endpoint.

use crate::xsd::{ExpectedRoot, XsdStage};

pub fn stage() -> XsdStage {
    XsdStage::new(
        "TMV",
        "Validate tables document against the schema",
        "tables",
        ExpectedRoot {
            local: "tableset",
            namespace: "http://www.ivoa.net/xml/VOSITables/v1.0",
        },
        false,
    )
}
