use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use serde_derive::{Deserialize, Serialize};

/// Bidirectional mapping between values and numbers.
///
/// Numbers are assigned consecutively, starting at `start_at`. Numbers
/// below `start_at` are reserved, e.g. to represent unknown values.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Numberer<T>
where
    T: Eq + Hash,
{
    values: Vec<T>,
    numbers: HashMap<T, usize>,
    start_at: usize,
}

impl<T> Numberer<T>
where
    T: Clone + Eq + Hash,
{
    pub fn new(start_at: usize) -> Self {
        Numberer {
            values: Vec::new(),
            numbers: HashMap::new(),
            start_at,
        }
    }

    /// Add a value. If the value is already known, its existing number is
    /// returned.
    pub fn add(&mut self, value: T) -> usize {
        if let Some(&number) = self.numbers.get(&value) {
            return number;
        }

        let number = self.values.len() + self.start_at;
        self.values.push(value.clone());
        self.numbers.insert(value, number);
        number
    }

    /// Return the number of a value, `None` for unknown values.
    pub fn number<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.numbers.get(value).cloned()
    }

    /// Return the value for a number.
    pub fn value(&self, number: usize) -> Option<&T> {
        number
            .checked_sub(self.start_at)
            .and_then(|idx| self.values.get(idx))
    }

    /// The number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The first number that is assigned to a value.
    pub fn start_at(&self) -> usize {
        self.start_at
    }
}

#[cfg(test)]
mod tests {
    use super::Numberer;

    #[test]
    fn numbers_start_at_offset() {
        let mut numberer = Numberer::new(1);
        assert!(numberer.is_empty());
        assert_eq!(numberer.add("a".to_owned()), 1);
        assert_eq!(numberer.add("b".to_owned()), 2);
        assert_eq!(numberer.add("a".to_owned()), 1);
        assert_eq!(numberer.len(), 2);

        assert_eq!(numberer.number("b"), Some(2));
        assert_eq!(numberer.number("c"), None);
        assert_eq!(numberer.value(0), None);
        assert_eq!(numberer.value(2).map(String::as_str), Some("b"));
        assert_eq!(numberer.value(3), None);
    }
}
