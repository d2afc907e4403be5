//! Ordered texture cycle with a wrapping cursor.

use crate::error::SceneError;

/// A non-empty sequence of handles and the index of the active one.
///
/// The cursor is always in range: it starts at 0 and [`advance`](Self::advance)
/// wraps it modulo the length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureSet<T> {
    items: Vec<T>,
    cursor: usize,
}

impl<T> TextureSet<T> {
    /// Build a set with the cursor on the first item.
    ///
    /// # Errors
    /// [`SceneError::EmptyTextureSet`] if `items` is empty.
    pub fn new(items: Vec<T>) -> Result<Self, SceneError> {
        if items.is_empty() {
            return Err(SceneError::EmptyTextureSet);
        }
        Ok(Self { items, cursor: 0 })
    }

    /// The active item.
    pub fn current(&self) -> &T {
        &self.items[self.cursor]
    }

    /// Index of the active item.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move to the next item, wrapping to the first after the last.
    pub fn advance(&mut self) -> &T {
        self.cursor = (self.cursor + 1) % self.items.len();
        &self.items[self.cursor]
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rejected() {
        let result = TextureSet::<u32>::new(Vec::new());
        assert!(matches!(result, Err(SceneError::EmptyTextureSet)));
    }

    #[test]
    fn test_advance_wraps() {
        let mut set = TextureSet::new(vec!['a', 'b', 'c']).unwrap();
        assert_eq!(*set.current(), 'a');
        assert_eq!(*set.advance(), 'b');
        assert_eq!(*set.advance(), 'c');
        assert_eq!(*set.advance(), 'a');
        assert_eq!(set.cursor(), 0);
    }

    #[test]
    fn test_full_cycles_return_to_start() {
        for len in 1..=5 {
            let mut set = TextureSet::new((0..len).collect::<Vec<_>>()).unwrap();
            set.advance();
            let start = set.cursor();
            for _ in 0..(len * 3) {
                set.advance();
                assert!(set.cursor() < set.len());
            }
            assert_eq!(set.cursor(), start, "len {len}");
        }
    }

    #[test]
    fn test_single_item_stays_put() {
        let mut set = TextureSet::new(vec![7]).unwrap();
        assert_eq!(*set.advance(), 7);
        assert_eq!(set.cursor(), 0);
    }
}
