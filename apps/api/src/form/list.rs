use serde::{Deserialize, Serialize};

/// Ordered, editable list backing a repeatable form section.
///
/// Items are addressed by their current position; removing an item shifts
/// the ones after it, and validation paths follow the new positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormList<T> {
    items: Vec<T>,
}

impl<T> FormList<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Removes and returns the item at `index`, or `None` when out of range.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Default> FormList<T> {
    /// A list holding one blank item, the starting state of every section.
    pub fn with_blank() -> Self {
        Self {
            items: vec![T::default()],
        }
    }

    /// Appends a blank item and returns its index.
    pub fn push_blank(&mut self) -> usize {
        self.items.push(T::default());
        self.items.len() - 1
    }
}

impl<T> Default for FormList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for FormList<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> From<FormList<T>> for Vec<T> {
    fn from(list: FormList<T>) -> Self {
        list.items
    }
}

impl<'a, T> IntoIterator for &'a FormList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
