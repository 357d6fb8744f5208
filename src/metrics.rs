//! Engine-specific counters reported through [`Engine::metrics`](crate::Engine::metrics).

/// Snapshot of an engine's structural counters.
///
/// Only the subset that applies to the engine is set: trees report `height`
/// (and `rotations` for AVL), tables report `table_size`, `load_factor` and
/// `collisions`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Metrics {
    /// Number of live keys
    pub len: usize,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub height: Option<u32>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub rotations: Option<u64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub table_size: Option<usize>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub load_factor: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub collisions: Option<u64>,
}

impl Metrics {
    /// Metrics carrying only the key count.
    pub fn with_len(len: usize) -> Self {
        Self {
            len,
            ..Self::default()
        }
    }

    /// Name/value pairs for every metric that is set, `len` first.
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        let mut out = vec![("len", self.len as f64)];
        if let Some(h) = self.height {
            out.push(("height", h as f64));
        }
        if let Some(r) = self.rotations {
            out.push(("rotations", r as f64));
        }
        if let Some(s) = self.table_size {
            out.push(("table_size", s as f64));
        }
        if let Some(lf) = self.load_factor {
            out.push(("load_factor", lf));
        }
        if let Some(c) = self.collisions {
            out.push(("collisions", c as f64));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_skip_unset() {
        let m = Metrics {
            height: Some(4),
            rotations: Some(2),
            ..Metrics::with_len(11)
        };
        assert_eq!(
            m.entries(),
            vec![("len", 11.0), ("height", 4.0), ("rotations", 2.0)]
        );
    }
}
