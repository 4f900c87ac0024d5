use std::collections::VecDeque;
use std::path::Path;

use crate::{transform_record, Record, Symmetry, TakbinError, TakbinReader};

/// Pull-based stream of training samples over one `.takbin` file.
///
/// With augmentation off, every raw record passes through once. With it on,
/// each record expands into its 8 dihedral variants in `Symmetry::ALL`
/// order; the identity variant reproduces the raw record exactly. Variants
/// are produced lazily, one raw record at a time, and never persisted.
pub struct SampleStream {
    reader: TakbinReader,
    augment: bool,
    pending: VecDeque<Record>,
}

impl SampleStream {
    pub fn open(path: impl AsRef<Path>, augment: bool) -> Result<Self, TakbinError> {
        Ok(Self {
            reader: TakbinReader::open(path)?,
            augment,
            pending: VecDeque::new(),
        })
    }

    pub fn channels(&self) -> u32 {
        self.reader.channels()
    }
}

impl Iterator for SampleStream {
    type Item = Result<Record, TakbinError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(rec) = self.pending.pop_front() {
            return Some(Ok(rec));
        }

        let raw = match self.reader.next()? {
            Ok(rec) => rec,
            Err(e) => return Some(Err(e)),
        };

        if !self.augment {
            return Some(Ok(raw));
        }

        for sym in Symmetry::ALL {
            self.pending.push_back(transform_record(&raw, sym));
        }
        self.pending.pop_front().map(Ok)
    }
}
