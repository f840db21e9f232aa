use std::fmt;

/// Genomic strand/orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    /// Parse the single-character strand column of a gene table.
    pub fn from_symbol(s: &str) -> Option<Strand> {
        match s {
            "+" => Some(Strand::Plus),
            "-" => Some(Strand::Minus),
            _ => None,
        }
    }

    #[inline]
    pub fn symbol(self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
        }
    }

    #[inline]
    pub fn is_reverse(self) -> bool {
        self == Strand::Minus
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A contiguous genomic interval.
/// Coordinates are 0-based, half-open: [start, end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefBlock {
    pub start: u32,
    pub end: u32,
}

impl RefBlock {
    /// Create a new block. Panics if start >= end.
    pub fn new(start: u32, end: u32) -> Self {
        assert!(start < end, "RefBlock requires start < end");
        Self { start, end }
    }

    /// Checked constructor for values coming from untrusted input.
    pub fn try_new(start: u32, end: u32) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    #[inline]
    pub fn len(self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub fn overlaps(self, other: RefBlock) -> bool {
        self.start < other.end && other.start < self.end
    }

    #[inline]
    pub fn contains(self, other: RefBlock) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    #[inline]
    pub fn contains_pos(self, pos: u32) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Reading-frame remainder of the block length.
    #[inline]
    pub fn frame(self) -> u8 {
        (self.len() % 3) as u8
    }
}

impl fmt::Display for RefBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.start, self.end)
    }
}
