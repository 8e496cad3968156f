use std::collections::BTreeMap;

/// Counts how many times each key has been seen. Iteration order is deterministic.
#[derive(Clone, Debug, PartialEq)]
pub struct Counter<T: Ord + PartialEq + Clone> {
    map: BTreeMap<T, usize>,
    sum: usize,
}

impl<T: Ord + PartialEq + Clone> Default for Counter<T> {
    fn default() -> Counter<T> {
        Counter::new()
    }
}

impl<T: Ord + PartialEq + Clone> Counter<T> {
    pub fn new() -> Counter<T> {
        Counter {
            map: BTreeMap::new(),
            sum: 0,
        }
    }

    pub fn add(&mut self, val: T, amount: usize) -> usize {
        let entry = self.map.entry(val).or_insert(0);
        *entry += amount;
        self.sum += amount;
        *entry
    }

    pub fn inc(&mut self, val: T) -> usize {
        self.add(val, 1)
    }

    pub fn highest_n(&self, n: usize) -> Vec<(T, usize)> {
        let mut list: Vec<(T, usize)> = self
            .map
            .iter()
            .map(|(key, cnt)| (key.clone(), *cnt))
            .collect();
        // Highest first; the BTreeMap order breaks ties because the sort is stable
        list.sort_by(|a, b| b.1.cmp(&a.1));
        list.truncate(n);
        list
    }

    /// How many distinct keys have been counted
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The total of all counts
    pub fn sum(&self) -> usize {
        self.sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting() {
        let mut cnt = Counter::new();
        cnt.inc("a");
        cnt.inc("b");
        assert_eq!(cnt.inc("a"), 2);
        cnt.add("c", 5);
        assert_eq!(cnt.sum(), 8);
        assert_eq!(cnt.len(), 3);
        assert_eq!(cnt.highest_n(2), vec![("c", 5), ("a", 2)]);
        assert_eq!(cnt.highest_n(5), vec![("c", 5), ("a", 2), ("b", 1)]);
    }
}
