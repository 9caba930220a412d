use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

///
/// Entry struct, one interval record of a BED file.
///
/// The same struct doubles as a query window: only `chromosome`, `start` and
/// `end` are looked at when searching, `attributes` are ignored.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entry {
    pub chromosome: String,
    pub start: u32,
    pub end: u32,
    pub attributes: Vec<String>,
}

impl Entry {
    pub fn new(chromosome: impl Into<String>, start: u32, end: u32) -> Self {
        Entry {
            chromosome: chromosome.into(),
            start,
            end,
            attributes: Vec::new(),
        }
    }

    ///
    /// Build a query window. Identical to [Entry::new], named for readability at call sites.
    ///
    pub fn query(chromosome: impl Into<String>, start: u32, end: u32) -> Self {
        Entry::new(chromosome, start, end)
    }

    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// The all-empty instance produced by `Default`. It is never a real record.
    pub fn is_placeholder(&self) -> bool {
        self.chromosome.is_empty() && self.start == 0 && self.end == 0 && self.attributes.is_empty()
    }

    ///
    /// Whether this entry lies within the window `query` on both bounds:
    /// same chromosome, `query.start <= start < query.end` and
    /// `query.start <= end <= query.end`.
    ///
    pub fn is_contained_in(&self, query: &Entry) -> bool {
        self.chromosome == query.chromosome
            && query.start <= self.start
            && self.start < query.end
            && query.start <= self.end
            && self.end <= query.end
    }

    ///
    /// Get file string of the Entry (tab separated, attributes appended)
    ///
    pub fn as_string(&self) -> String {
        let mut line = format!("{}\t{}\t{}", self.chromosome, self.start, self.end);
        for attribute in &self.attributes {
            line.push('\t');
            line.push_str(attribute);
        }
        line
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}
