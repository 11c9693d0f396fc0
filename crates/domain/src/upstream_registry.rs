use crate::errors::DomainError;
use crate::upstream_addr::UpstreamAddr;
use std::collections::BTreeMap;

/// Providers available when the configuration does not override them.
pub const BUILTIN_UPSTREAMS: [(&str, &str); 5] = [
    ("cloudflare", "1.1.1.1:53"),
    ("opendns", "208.67.222.222:53"),
    ("google", "8.8.8.8:53"),
    ("yandex", "77.88.8.8:53"),
    ("afrihost", "169.1.1.1:53"),
];

/// Read-only mapping from provider name to upstream server address.
///
/// Built once at start-up and shared behind an `Arc`; there is no way to
/// mutate it afterwards. Names are case-sensitive.
#[derive(Debug, Clone)]
pub struct UpstreamRegistry {
    upstreams: BTreeMap<String, UpstreamAddr>,
}

impl UpstreamRegistry {
    pub fn builtin() -> Self {
        let upstreams = BUILTIN_UPSTREAMS
            .iter()
            .filter_map(|(name, addr)| Some((name.to_string(), addr.parse().ok()?)))
            .collect();
        Self { upstreams }
    }

    /// Builds a registry from `(name, "host:port")` pairs, rejecting empty
    /// names, duplicate names and malformed addresses.
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut upstreams = BTreeMap::new();

        for (name, addr) in entries {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(DomainError::ConfigError(
                    "Upstream name cannot be empty".to_string(),
                ));
            }

            let parsed: UpstreamAddr = addr.as_ref().parse().map_err(|e| {
                DomainError::InvalidUpstreamAddress(format!("{}: {}", name, e))
            })?;

            if upstreams.insert(name.clone(), parsed).is_some() {
                return Err(DomainError::ConfigError(format!(
                    "Duplicate upstream name: {}",
                    name
                )));
            }
        }

        if upstreams.is_empty() {
            return Err(DomainError::ConfigError(
                "No upstream servers configured".to_string(),
            ));
        }

        Ok(Self { upstreams })
    }

    pub fn resolve(&self, name: &str) -> Result<&UpstreamAddr, DomainError> {
        self.upstreams
            .get(name)
            .ok_or_else(|| DomainError::UnknownUpstream(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.upstreams.keys().map(String::as_str)
    }
}

impl Default for UpstreamRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
