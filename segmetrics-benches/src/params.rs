//! Benchmark parameter types.

use std::fmt;

/// Parameters for a dense table benchmark run.
#[derive(Clone, Debug)]
pub struct VolumeBenchParams {
    /// Extent of every axis of both label volumes.
    pub shape: Vec<usize>,
    /// Pool workers; `1` means the serial builder.
    pub threads: usize,
}

impl fmt::Display for VolumeBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut axes = self.shape.iter();
        if let Some(first) = axes.next() {
            write!(f, "{first}")?;
        }
        for extent in axes {
            write!(f, "x{extent}")?;
        }
        write!(f, ",t={}", self.threads)
    }
}
