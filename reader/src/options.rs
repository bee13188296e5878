//! Reading configuration.

use store::StoreLimits;

/// Options controlling one read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Limits applied to every stream.
    pub limits: StoreLimits,
    /// Decode view, table and view property metadata where the format has it.
    pub read_views: bool,
    /// Treat undecodable streams and missing optional streams as errors.
    pub strict: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            limits: StoreLimits::default(),
            read_views: true,
            strict: false,
        }
    }
}

impl ReadOptions {
    /// Options that stop at the first stream problem.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Options with small limits, for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            limits: StoreLimits::for_testing(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_limits(mut self, limits: StoreLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub const fn with_views(mut self, read_views: bool) -> Self {
        self.read_views = read_views;
        self
    }
}
