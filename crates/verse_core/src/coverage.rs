use std::fmt;

const LAST_OLD_TESTAMENT_BOOK: u8 = 39;
const FIRST_NEW_TESTAMENT_BOOK: u8 = 40;
const LAST_BOOK: u8 = 66;

/// Which part of the canon a translation carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    Full,
    OldTestament,
    NewTestament,
    Unknown,
}

impl Coverage {
    /// Classifies a set of book numbers found on disk.
    pub fn from_book_numbers<I>(numbers: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let mut has_old = false;
        let mut has_new = false;
        for number in numbers {
            match number {
                1..=LAST_OLD_TESTAMENT_BOOK => has_old = true,
                FIRST_NEW_TESTAMENT_BOOK..=LAST_BOOK => has_new = true,
                _ => {}
            }
        }
        Self::from_presence(has_old, has_new)
    }

    pub fn from_presence(has_old: bool, has_new: bool) -> Self {
        match (has_old, has_new) {
            (true, true) => Coverage::Full,
            (true, false) => Coverage::OldTestament,
            (false, true) => Coverage::NewTestament,
            (false, false) => Coverage::Unknown,
        }
    }

    pub fn starting_book(self) -> u8 {
        match self {
            Coverage::NewTestament => FIRST_NEW_TESTAMENT_BOOK,
            _ => 1,
        }
    }

    pub fn ending_book(self) -> u8 {
        match self {
            Coverage::OldTestament => LAST_OLD_TESTAMENT_BOOK,
            _ => LAST_BOOK,
        }
    }

    pub fn includes(self, book_number: u8) -> bool {
        (self.starting_book()..=self.ending_book()).contains(&book_number)
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coverage::Full => write!(f, "full bible"),
            Coverage::OldTestament => write!(f, "old testament only"),
            Coverage::NewTestament => write!(f, "new testament only"),
            Coverage::Unknown => write!(f, "unknown"),
        }
    }
}
