//! Fixed company → ticker mapping.

/// Ordered mapping from company display name to exchange ticker symbol.
///
/// Order is the insertion order and drives row order of fetched tables.
/// Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TickerMap {
    entries: Vec<(String, String)>,
}

impl TickerMap {
    /// Builds a map, keeping the first symbol when a name repeats.
    pub fn new<I, N, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let mut out: Vec<(String, String)> = Vec::new();
        for (name, symbol) in entries {
            let name = name.into();
            if out.iter().any(|(n, _)| *n == name) {
                continue;
            }
            out.push((name, symbol.into()));
        }
        Self { entries: out }
    }

    /// The six companies the dashboard tracks.
    pub fn gafa() -> Self {
        Self::new([
            ("apple", "AAPL"),
            ("facebook", "META"),
            ("google", "GOOGL"),
            ("microsoft", "MSFT"),
            ("netflix", "NFLX"),
            ("amazon", "AMZN"),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn symbol(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbol(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
