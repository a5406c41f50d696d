use indexmap::IndexMap;

/// Fragments collected under one bin key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentBin {
    lengths: Vec<u64>,
}

impl FragmentBin {
    /// Create an empty bin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one fragment.
    pub fn observe(&mut self, length: u64) {
        self.lengths.push(length);
    }

    /// Number of fragments seen.
    pub fn read_count(&self) -> u64 {
        self.lengths.len() as u64
    }

    /// Fragment lengths in arrival order.
    pub fn lengths(&self) -> &[u64] {
        &self.lengths
    }

    /// Median fragment length of the bin.
    pub fn median_length(&self) -> f64 {
        median(&self.lengths)
    }
}

/// Median of `values`; `0.0` when empty, mean of the central pair when even.
pub fn median(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
    } else {
        sorted[mid] as f64
    }
}

/// Bins of the chromosome currently being streamed, in first-seen key order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromosomeAggregate {
    tid: i32,
    bins: IndexMap<u64, FragmentBin>,
}

impl ChromosomeAggregate {
    /// Start an empty aggregate for reference `tid`.
    pub fn new(tid: i32) -> Self {
        Self {
            tid,
            bins: IndexMap::new(),
        }
    }

    /// Reference id the aggregate belongs to.
    pub fn tid(&self) -> i32 {
        self.tid
    }

    /// Add a fragment of `length` under `key`.
    pub fn observe(&mut self, key: u64, length: u64) {
        self.bins.entry(key).or_default().observe(length);
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Whether no fragment has been recorded.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Look up a bin.
    pub fn get(&self, key: u64) -> Option<&FragmentBin> {
        self.bins.get(&key)
    }

    /// Iterate bins in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &FragmentBin)> {
        self.bins.iter().map(|(key, bin)| (*key, bin))
    }

    /// Consume into bins in first-insertion order.
    pub fn into_bins(self) -> impl Iterator<Item = (u64, FragmentBin)> {
        self.bins.into_iter()
    }
}
