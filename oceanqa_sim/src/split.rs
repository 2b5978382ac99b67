//! Train / validation / test partitioning.

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

/// Fraction of the videos assigned to each of the validation and test splits.
pub const SPLIT_PERC: f64 = 0.2;

/// Dataset partitions, each written to its own directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Val,
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Val, Split::Test];

    /// Directory name of the split.
    pub fn name(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Items partitioned into the three splits.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<T> {
    pub train: Vec<T>,
    pub val: Vec<T>,
    pub test: Vec<T>,
}

impl<T> Partition<T> {
    /// Shuffles `items` and takes `round(n * perc)` items each for the
    /// validation and test splits. The remainder becomes the training split.
    pub fn split<R: Rng + ?Sized>(mut items: Vec<T>, perc: f64, rng: &mut R) -> Self {
        items.shuffle(rng);

        let held_out = ((items.len() as f64 * perc).round() as usize).min(items.len() / 2);
        let test = items.split_off(items.len() - held_out);
        let val = items.split_off(items.len() - held_out);

        Self { train: items, val, test }
    }

    pub fn get(&self, split: Split) -> &[T] {
        match split {
            Split::Train => &self.train,
            Split::Val => &self.val,
            Split::Test => &self.test,
        }
    }

    pub fn len(&self) -> usize {
        self.train.len() + self.val.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
