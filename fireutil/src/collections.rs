use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Counts occurrences of things. Iteration order is the sorted order of the keys, so output built
/// from a Counter is deterministic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
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

    /// If the key is missing, returns 0
    pub fn get(&self, val: T) -> usize {
        self.map.get(&val).cloned().unwrap_or(0)
    }

    /// Values with the same count are grouped together
    pub fn sorted_asc(&self) -> Vec<Vec<T>> {
        let mut list = self.map.iter().collect::<Vec<_>>();
        list.sort_by_key(|(_, cnt)| *cnt);
        let mut result: Vec<Vec<T>> = Vec::new();
        let mut last_cnt = None;
        for (val, cnt) in list {
            if last_cnt == Some(*cnt) {
                if let Some(group) = result.last_mut() {
                    group.push(val.clone());
                }
            } else {
                result.push(vec![val.clone()]);
                last_cnt = Some(*cnt);
            }
        }
        result
    }

    pub fn max(&self) -> usize {
        self.map.values().max().cloned().unwrap_or(0)
    }

    pub fn sum(&self) -> usize {
        self.sum
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn extend(&mut self, other: Counter<T>) {
        for (val, cnt) in other.consume() {
            self.add(val, cnt);
        }
    }

    pub fn borrow(&self) -> &BTreeMap<T, usize> {
        &self.map
    }

    pub fn consume(self) -> BTreeMap<T, usize> {
        self.map
    }
}

impl<T: Ord + PartialEq + Clone> FromIterator<T> for Counter<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Counter<T> {
        let mut counter = Counter::new();
        for val in iter {
            counter.inc(val);
        }
        counter
    }
}
