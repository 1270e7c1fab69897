use crate::fetch::DocumentFetcher;
use anyhow::Context as _;
use url::Url;

/// Immutable description of the service under test.
///
/// Shared read-only between stages; the only mutable state a stage may touch
/// is the reporter it is handed.
pub struct ServiceContext {
    base_url: Url,
    fetcher: Box<dyn DocumentFetcher>,
}

impl ServiceContext {
    pub fn new(base_url: Url, fetcher: Box<dyn DocumentFetcher>) -> ServiceContext {
        ServiceContext { base_url, fetcher }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn fetcher(&self) -> &dyn DocumentFetcher {
        self.fetcher.as_ref()
    }

    /// Derives an endpoint URL by appending one path segment to the service
    /// base URL, e.g. `capabilities` or `tables`.
    pub fn endpoint(&self, segment: &str) -> anyhow::Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/{segment}"))
            .with_context(|| format!("bad endpoint URL {base}/{segment}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubFetcher;

    #[test]
    fn endpoint_joins_with_or_without_trailing_slash() {
        for base in ["http://example.org/tap", "http://example.org/tap/"] {
            let ctx = ServiceContext::new(
                Url::parse(base).unwrap(),
                Box::new(StubFetcher::new()),
            );
            let url = ctx.endpoint("capabilities").unwrap();
            assert_eq!(url.as_str(), "http://example.org/tap/capabilities");
        }
    }
}
