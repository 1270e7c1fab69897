//! Canned fetchers and sample documents for engine tests.

use crate::context::ServiceContext;
use crate::fetch::{DocumentFetcher, Fetch, FetchError, FetchedDocument};
use std::collections::BTreeMap;
use url::Url;

/// What a [`StubFetcher`] does when asked for a URL it knows.
#[derive(Clone, Debug)]
pub enum StubResponse {
    Doc {
        content_type: Option<String>,
        body: Vec<u8>,
    },
    Missing,
    Fail(u16),
}

/// Fetcher serving canned responses; unknown URLs read as absent.
#[derive(Default)]
pub struct StubFetcher {
    responses: BTreeMap<String, StubResponse>,
}

impl StubFetcher {
    pub fn new() -> StubFetcher {
        StubFetcher::default()
    }

    pub fn with_document(mut self, url: &str, content_type: Option<&str>, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            StubResponse::Doc {
                content_type: content_type.map(str::to_string),
                body: body.as_bytes().to_vec(),
            },
        );
        self
    }

    pub fn with_missing(mut self, url: &str) -> Self {
        self.responses.insert(url.to_string(), StubResponse::Missing);
        self
    }

    pub fn with_failure(mut self, url: &str, status: u16) -> Self {
        self.responses
            .insert(url.to_string(), StubResponse::Fail(status));
        self
    }
}

impl DocumentFetcher for StubFetcher {
    fn fetch(&self, url: &Url) -> Result<Fetch, FetchError> {
        match self.responses.get(url.as_str()) {
            Some(StubResponse::Doc { content_type, body }) => {
                Ok(Fetch::Document(FetchedDocument {
                    url: url.clone(),
                    content_type: content_type.clone(),
                    body: body.clone(),
                }))
            }
            Some(StubResponse::Missing) | None => Ok(Fetch::Missing),
            Some(StubResponse::Fail(status)) => Err(FetchError::Status {
                url: url.clone(),
                status: *status,
            }),
        }
    }
}

/// Context for `http://example.org/tap` over the given fetcher.
pub fn context_with(fetcher: StubFetcher) -> ServiceContext {
    ServiceContext::new(
        Url::parse("http://example.org/tap").unwrap(),
        Box::new(fetcher),
    )
}

/// A minimal well-formed VOSI availability document.
pub const AVAILABILITY_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<avl:availability xmlns:avl=\"http://www.ivoa.net/xml/VOSIAvailability/v1.0\">\n\
  <avl:available>true</avl:available>\n\
  <avl:upSince>2024-01-01T00:00:00Z</avl:upSince>\n\
</avl:availability>\n";

/// A minimal well-formed VOSI capabilities document declaring TAP with
/// ADQL 2.0 and one output format.
pub const CAPABILITIES_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<cap:capabilities xmlns:cap=\"http://www.ivoa.net/xml/VOSICapabilities/v1.0\"\n\
                  xmlns:tr=\"http://www.ivoa.net/xml/TAPRegExt/v1.0\"\n\
                  xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\n\
  <capability standardID=\"ivo://ivoa.net/std/TAP\" xsi:type=\"tr:TableAccess\">\n\
    <interface xsi:type=\"vs:ParamHTTP\" role=\"std\">\n\
      <accessURL use=\"base\">http://example.org/tap</accessURL>\n\
    </interface>\n\
    <language>\n\
      <name>ADQL</name>\n\
      <version ivo-id=\"ivo://ivoa.net/std/ADQL#v2.0\">2.0</version>\n\
    </language>\n\
    <outputFormat>\n\
      <mime>application/x-votable+xml</mime>\n\
    </outputFormat>\n\
    <uploadLimit>\n\
      <hard unit=\"byte\">100000</hard>\n\
    </uploadLimit>\n\
  </capability>\n\
</cap:capabilities>\n";

/// A minimal well-formed VOSI tableset document.
pub const TABLES_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<vosi:tableset xmlns:vosi=\"http://www.ivoa.net/xml/VOSITables/v1.0\">\n\
  <schema>\n\
    <name>public</name>\n\
    <table>\n\
      <name>public.stars</name>\n\
      <column>\n\
        <name>ra</name>\n\
        <dataType xsi:type=\"vod:TAPType\"\n\
                  xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"\n\
                  xmlns:vod=\"http://www.ivoa.net/xml/VODataService/v1.1\">DOUBLE</dataType>\n\
      </column>\n\
    </table>\n\
  </schema>\n\
</vosi:tableset>\n";
