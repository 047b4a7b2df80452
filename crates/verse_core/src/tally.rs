use std::ops::AddAssign;

/// Chapter counts for a book, translation or whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunTally {
    pub attempted: u32,
    pub saved: u32,
    pub skipped: u32,
    pub failed: u32,
}

impl RunTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chapters on disk after the run, whether written now or earlier.
    pub fn completed(&self) -> u32 {
        self.saved + self.skipped
    }

    /// Percentage of attempted chapters that ended up on disk.
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            return 0.0;
        }
        f64::from(self.completed()) * 100.0 / f64::from(self.attempted)
    }
}

impl AddAssign for RunTally {
    fn add_assign(&mut self, rhs: Self) {
        self.attempted += rhs.attempted;
        self.saved += rhs.saved;
        self.skipped += rhs.skipped;
        self.failed += rhs.failed;
    }
}
