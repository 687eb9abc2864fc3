use std::fmt;

use serde::Serialize;

/// Run counters. Only ever incremented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Every parsed entry, with or without a URL
    pub total: usize,
    pub online: usize,
    pub offline: usize,
    pub duplicates: usize,
    /// Entries without a URL
    pub skipped: usize,
}

impl RunStats {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Entries that reached a terminal state so far
    #[must_use]
    pub const fn processed(&self) -> usize {
        self.online + self.offline + self.duplicates + self.skipped
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            indoc::formatdoc! {"
                Total: {}
                Online: {}
                Offline: {}
                Duplicates: {}",
                self.total,
                self.online,
                self.offline,
                self.duplicates,
            }
        )
    }
}
