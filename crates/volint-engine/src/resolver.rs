//! Trusted local schema resolution.
//!
//! During validation, schema text for known standard namespaces always comes
//! from the copies bundled with the engine, never from a location the
//! document under test declares. A remote document therefore cannot smuggle
//! its own schema in under a known namespace URI to escape validation.

use std::cell::Cell;
use std::collections::BTreeMap;
use volint_codes::FixedCode;
use volint_reporter::{Reporter, ReporterExt};

/// One bundled schema: its namespace, a human-readable location name, and
/// the schema text itself.
#[derive(Debug)]
pub struct SchemaResource {
    pub namespace: &'static str,
    pub location: &'static str,
    pub text: &'static str,
}

/// The fixed bundle shipped with the engine.
pub static BUNDLED_SCHEMAS: &[SchemaResource] = &[
    SchemaResource {
        namespace: "http://www.ivoa.net/xml/VOSIAvailability/v1.0",
        location: "VOSIAvailability-v1.0.xsd",
        text: include_str!("../schemas/VOSIAvailability-v1.0.xsd"),
    },
    SchemaResource {
        namespace: "http://www.ivoa.net/xml/VOSICapabilities/v1.0",
        location: "VOSICapabilities-v1.0.xsd",
        text: include_str!("../schemas/VOSICapabilities-v1.0.xsd"),
    },
    SchemaResource {
        namespace: "http://www.ivoa.net/xml/VOSITables/v1.0",
        location: "VOSITables-v1.0.xsd",
        text: include_str!("../schemas/VOSITables-v1.0.xsd"),
    },
    SchemaResource {
        namespace: "http://www.ivoa.net/xml/VOResource/v1.0",
        location: "VOResource-v1.0.xsd",
        text: include_str!("../schemas/VOResource-v1.0.xsd"),
    },
    SchemaResource {
        namespace: "http://www.ivoa.net/xml/VODataService/v1.1",
        location: "VODataService-v1.1.xsd",
        text: include_str!("../schemas/VODataService-v1.1.xsd"),
    },
    SchemaResource {
        namespace: "http://www.ivoa.net/xml/TAPRegExt/v1.0",
        location: "TAPRegExt-v1.0.xsd",
        text: include_str!("../schemas/TAPRegExt-v1.0.xsd"),
    },
    SchemaResource {
        namespace: "http://www.ivoa.net/xml/UWS/v1.0",
        location: "UWS-v1.0.xsd",
        text: include_str!("../schemas/UWS-v1.0.xsd"),
    },
    SchemaResource {
        namespace: "http://www.ivoa.net/xml/VOTable/v1.3",
        location: "VOTable-v1.3.xsd",
        text: include_str!("../schemas/VOTable-v1.3.xsd"),
    },
    SchemaResource {
        namespace: "http://www.w3.org/XML/1998/namespace",
        location: "xml-1998.xsd",
        text: include_str!("../schemas/xml-1998.xsd"),
    },
    SchemaResource {
        namespace: "http://www.w3.org/2001/XMLSchema-instance",
        location: "XMLSchema-instance.xsd",
        text: include_str!("../schemas/XMLSchema-instance.xsd"),
    },
];

/// What kind of resource a resolution request is for. Only schema requests
/// are intercepted; everything else passes through untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Schema,
    Other,
}

/// Result of a resolution request.
#[derive(Debug)]
pub enum Resolution<'a> {
    /// Use this bundled schema.
    Local(&'a SchemaResource),
    /// Not intercepted: the caller falls back to its default (remote)
    /// resolution behaviour.
    Fallback,
}

/// Namespace-to-local-schema lookup with a fixed map.
///
/// The map is built at construction and never mutated afterwards; the only
/// mutable state is an increment-only count of successful lookups.
pub struct SchemaResolver {
    map: BTreeMap<&'static str, &'static SchemaResource>,
    resolved: Cell<u32>,
}

impl SchemaResolver {
    /// A resolver over the full bundled schema set.
    pub fn bundled() -> SchemaResolver {
        SchemaResolver::new(BUNDLED_SCHEMAS)
    }

    pub fn new(resources: &'static [SchemaResource]) -> SchemaResolver {
        SchemaResolver {
            map: resources.iter().map(|r| (r.namespace, r)).collect(),
            resolved: Cell::new(0),
        }
    }

    /// Resolves one request.
    ///
    /// A schema request for a known namespace yields the bundled copy and
    /// bumps the resolved count. A schema request for an unknown namespace
    /// emits exactly one WARNING naming the namespace and yields
    /// [`Resolution::Fallback`]; the count is untouched. Non-schema requests
    /// fall through silently.
    pub fn resolve(
        &self,
        reporter: &mut dyn Reporter,
        kind: ResourceKind,
        namespace: &str,
    ) -> Resolution<'_> {
        if kind != ResourceKind::Schema {
            return Resolution::Fallback;
        }
        match self.map.get(namespace) {
            Some(resource) => {
                self.resolved.set(self.resolved.get() + 1);
                Resolution::Local(resource)
            }
            None => {
                reporter.report(
                    FixedCode::UnknownSchemaNamespace,
                    &format!("Unknown schema namespace {namespace}; applying default resolution"),
                );
                Resolution::Fallback
            }
        }
    }

    /// Number of successful local resolutions so far.
    pub fn resolved_count(&self) -> u32 {
        self.resolved.get()
    }

    pub fn known_namespaces(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.map.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volint_reporter::OutputReporter;

    const VOSI_AVAIL: &str = "http://www.ivoa.net/xml/VOSIAvailability/v1.0";

    #[test]
    fn known_namespace_resolves_locally_and_counts() {
        let resolver = SchemaResolver::bundled();
        let mut reporter = OutputReporter::new(Vec::new());
        let resolution = resolver.resolve(&mut reporter, ResourceKind::Schema, VOSI_AVAIL);
        match resolution {
            Resolution::Local(resource) => {
                assert_eq!(resource.namespace, VOSI_AVAIL);
                assert!(resource.text.contains("targetNamespace"));
            }
            Resolution::Fallback => panic!("expected local resolution"),
        }
        assert_eq!(resolver.resolved_count(), 1);
        assert!(String::from_utf8(reporter.into_inner()).unwrap().is_empty());
    }

    #[test]
    fn unknown_namespace_warns_once_and_leaves_count_alone() {
        let resolver = SchemaResolver::bundled();
        let mut reporter = OutputReporter::new(Vec::new());
        let resolution = resolver.resolve(
            &mut reporter,
            ResourceKind::Schema,
            "http://example.org/private/ns",
        );
        assert!(matches!(resolution, Resolution::Fallback));
        assert_eq!(resolver.resolved_count(), 0);

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let warnings: Vec<&str> = text.lines().collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("W-UNSC-0"));
        assert!(warnings[0].contains("http://example.org/private/ns"));
    }

    #[test]
    fn non_schema_requests_pass_through_silently() {
        let resolver = SchemaResolver::bundled();
        let mut reporter = OutputReporter::new(Vec::new());
        let resolution = resolver.resolve(&mut reporter, ResourceKind::Other, VOSI_AVAIL);
        assert!(matches!(resolution, Resolution::Fallback));
        assert_eq!(resolver.resolved_count(), 0);
        assert!(String::from_utf8(reporter.into_inner()).unwrap().is_empty());
    }
}
