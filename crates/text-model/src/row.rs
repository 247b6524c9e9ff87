//! Per-line character storage.
//!
//! A [`Row`] holds the characters of exactly one line, without its separator. Storage is a
//! preallocated `char` array plus an explicit logical length: slots past the length are padding
//! and are never read. Inserts and deletes shift the tail of the array in place, so an edit costs
//! O(row length) no matter how large the document is.
//!
//! Rows do no locking; the owning [`Buffer`](crate::Buffer) is the synchronization boundary.

use crate::error::{Result, TextError};
use std::fmt;

/// Growable storage for the characters of one line.
#[derive(Clone)]
pub struct Row {
    /// Backing storage: `[content | padding]`. `data.len()` is the physical capacity.
    data: Vec<char>,
    /// Logical length. Invariant: `len <= data.len()`.
    len: usize,
}

impl Row {
    /// Capacity of a freshly created row.
    pub const DEFAULT_CAPACITY: usize = 16;

    /// Create an empty row with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create an empty row able to hold at least `capacity` characters without reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec!['\0'; capacity.max(Self::DEFAULT_CAPACITY)],
            len: 0,
        }
    }

    /// Create a row holding exactly the given characters.
    pub fn from_chars(chars: &[char]) -> Self {
        let mut row = Self::with_capacity(chars.len());
        row.data[..chars.len()].copy_from_slice(chars);
        row.len = chars.len();
        row
    }

    /// Logical length in characters.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the row holds no characters.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Physical capacity in characters.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// The row's characters.
    pub fn as_chars(&self) -> &[char] {
        &self.data[..self.len]
    }

    /// Character at `index` (`0 <= index < len`).
    pub fn get(&self, index: usize) -> Result<char> {
        self.check_read(index)?;
        Ok(self.data[index])
    }

    /// Overwrite the character at `index` (`0 <= index < len`).
    pub fn set(&mut self, index: usize, ch: char) -> Result<()> {
        self.check_read(index)?;
        self.data[index] = ch;
        Ok(())
    }

    /// Insert `text` at `index` (`0 <= index <= len`).
    pub fn insert(&mut self, index: usize, text: &str) -> Result<()> {
        let chars: Vec<char> = text.chars().collect();
        self.insert_chars(index, &chars)
    }

    /// Insert a single character at `index` (`0 <= index <= len`).
    pub fn insert_char(&mut self, index: usize, ch: char) -> Result<()> {
        self.insert_chars(index, &[ch])
    }

    /// Insert a run of characters at `index` (`0 <= index <= len`).
    pub fn insert_chars(&mut self, index: usize, chars: &[char]) -> Result<()> {
        self.check_insert(index)?;
        if chars.is_empty() {
            return Ok(());
        }
        self.reserve(chars.len());
        self.data.copy_within(index..self.len, index + chars.len());
        self.data[index..index + chars.len()].copy_from_slice(chars);
        self.len += chars.len();
        Ok(())
    }

    /// Append `text` to the end of the row.
    pub fn append(&mut self, text: &str) {
        let chars: Vec<char> = text.chars().collect();
        self.append_chars(&chars);
    }

    /// Append a run of characters to the end of the row.
    pub fn append_chars(&mut self, chars: &[char]) {
        self.reserve(chars.len());
        self.data[self.len..self.len + chars.len()].copy_from_slice(chars);
        self.len += chars.len();
    }

    /// Delete the characters in `start..end` (`0 <= start <= end <= len`).
    pub fn delete(&mut self, start: usize, end: usize) -> Result<()> {
        self.check_range(start, end)?;
        if start == end {
            return Ok(());
        }
        self.data.copy_within(end..self.len, start);
        self.len -= end - start;
        Ok(())
    }

    /// Delete and return the character at `index` (`0 <= index < len`).
    pub fn delete_char_at(&mut self, index: usize) -> Result<char> {
        self.check_read(index)?;
        let ch = self.data[index];
        self.data.copy_within(index + 1..self.len, index);
        self.len -= 1;
        Ok(ch)
    }

    /// Delete everything before `index`.
    pub fn delete_before(&mut self, index: usize) -> Result<()> {
        self.delete(0, index)
    }

    /// Delete everything from `index` to the end (truncate).
    pub fn delete_after(&mut self, index: usize) -> Result<()> {
        self.check_insert(index)?;
        self.len = index;
        Ok(())
    }

    /// Move the characters from `index` to the end into a new row.
    pub fn split_off(&mut self, index: usize) -> Result<Row> {
        self.check_insert(index)?;
        let tail = Row::from_chars(&self.data[index..self.len]);
        self.len = index;
        Ok(tail)
    }

    /// The characters in `start..end` as a string.
    pub fn sub_sequence(&self, start: usize, end: usize) -> Result<String> {
        self.check_range(start, end)?;
        Ok(self.data[start..end].iter().collect())
    }

    /// The characters before `index`.
    pub fn sub_sequence_before(&self, index: usize) -> Result<String> {
        self.sub_sequence(0, index)
    }

    /// The characters from `index` to the end.
    pub fn sub_sequence_after(&self, index: usize) -> Result<String> {
        self.sub_sequence(index, self.len)
    }

    /// Remove all characters, keeping the allocation.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// A compact copy holding the same characters.
    pub fn copy(&self) -> Row {
        Row::from_chars(self.as_chars())
    }

    /// Grow the backing storage to at least `min_capacity` characters.
    pub fn ensure_capacity(&mut self, min_capacity: usize) {
        if min_capacity > self.data.len() {
            self.data.resize(min_capacity, '\0');
        }
    }

    /// Make room for `additional` more characters.
    ///
    /// Growth doubles the spare room relative to the request so runs of small inserts
    /// (typing) amortize to O(1) reallocations.
    fn reserve(&mut self, additional: usize) {
        let target = self.len + additional;
        if target > self.data.len() {
            self.ensure_capacity(target.max(self.data.len() + additional * 2));
        }
    }

    fn check_read(&self, index: usize) -> Result<()> {
        if index >= self.len {
            return Err(TextError::IndexOutOfRange {
                index,
                bound: self.len,
            });
        }
        Ok(())
    }

    fn check_insert(&self, index: usize) -> Result<()> {
        if index > self.len {
            return Err(TextError::IndexOutOfRange {
                index,
                bound: self.len,
            });
        }
        Ok(())
    }

    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        self.check_insert(start)?;
        self.check_insert(end)?;
        if start > end {
            return Err(TextError::InvalidRange { start, end });
        }
        Ok(())
    }
}

impl Default for Row {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Row {
    fn from(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        Row::from_chars(&chars)
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.as_chars() == other.as_chars()
    }
}

impl Eq for Row {}

impl PartialEq<str> for Row {
    fn eq(&self, other: &str) -> bool {
        self.as_chars().iter().copied().eq(other.chars())
    }
}

impl PartialEq<&str> for Row {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for &ch in self.as_chars() {
            f.write_char(ch)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("text", &self.to_string())
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_row() {
        let row = Row::new();
        assert!(row.is_empty());
        assert_eq!(row.capacity(), Row::DEFAULT_CAPACITY);
        assert_eq!(Row::with_capacity(3).capacity(), Row::DEFAULT_CAPACITY);
        assert_eq!(Row::with_capacity(40).capacity(), 40);
    }

    #[test]
    fn test_insert_and_get() {
        let mut row = Row::from("Hlo");
        row.insert(1, "el").unwrap();
        assert_eq!(row, "Hello");
        assert_eq!(row.get(4).unwrap(), 'o');
        row.insert_char(5, '!').unwrap();
        assert_eq!(row.to_string(), "Hello!");
    }

    #[test]
    fn test_insert_out_of_bounds() {
        let mut row = Row::from("abc");
        assert_eq!(
            row.insert(4, "x"),
            Err(TextError::IndexOutOfRange { index: 4, bound: 3 })
        );
        assert_eq!(row, "abc");
        assert!(row.insert(3, "x").is_ok());
    }

    #[test]
    fn test_read_bounds() {
        let row = Row::from("ab");
        assert!(row.get(1).is_ok());
        assert_eq!(
            row.get(2),
            Err(TextError::IndexOutOfRange { index: 2, bound: 2 })
        );
        assert!(Row::new().get(0).is_err());
    }

    #[test]
    fn test_set() {
        let mut row = Row::from("cat");
        row.set(0, 'b').unwrap();
        assert_eq!(row, "bat");
        assert!(row.set(3, 'x').is_err());
    }

    #[test]
    fn test_growth_policy() {
        let mut row = Row::new();
        row.append(&"x".repeat(16));
        assert_eq!(row.capacity(), 16);

        // 16 + 1 needed; grows to capacity + 2 * 1.
        row.append("y");
        assert_eq!(row.capacity(), 18);

        // A large insert grows to at least the target length.
        row.append(&"z".repeat(100));
        assert_eq!(row.len(), 117);
        assert_eq!(row.capacity(), 218);
    }

    #[test]
    fn test_delete() {
        let mut row = Row::from("Hello, World");
        row.delete(5, 7).unwrap();
        assert_eq!(row, "HelloWorld");
        row.delete(0, 0).unwrap();
        assert_eq!(row, "HelloWorld");
        assert_eq!(
            row.delete(4, 2),
            Err(TextError::InvalidRange { start: 4, end: 2 })
        );
        assert!(row.delete(0, 11).is_err());
    }

    #[test]
    fn test_delete_char_at() {
        let mut row = Row::from("abc");
        assert_eq!(row.delete_char_at(1).unwrap(), 'b');
        assert_eq!(row, "ac");
        assert!(row.delete_char_at(2).is_err());
    }

    #[test]
    fn test_delete_before_after() {
        let mut row = Row::from("abcdef");
        row.delete_before(2).unwrap();
        assert_eq!(row, "cdef");
        row.delete_after(2).unwrap();
        assert_eq!(row, "cd");
        assert!(row.delete_after(3).is_err());
    }

    #[test]
    fn test_split_off() {
        let mut row = Row::from("hello world");
        let tail = row.split_off(5).unwrap();
        assert_eq!(row, "hello");
        assert_eq!(tail, " world");
        assert!(row.split_off(6).is_err());
    }

    #[test]
    fn test_sub_sequences() {
        let row = Row::from("你好世界");
        assert_eq!(row.sub_sequence(1, 3).unwrap(), "好世");
        assert_eq!(row.sub_sequence_before(2).unwrap(), "你好");
        assert_eq!(row.sub_sequence_after(2).unwrap(), "世界");
        assert!(row.sub_sequence(0, 5).is_err());
    }

    #[test]
    fn test_clear_and_copy() {
        let mut row = Row::from(&*"a".repeat(50));
        let copy = row.copy();
        row.clear();
        assert!(row.is_empty());
        assert_eq!(row.capacity(), 50);
        assert_eq!(copy.len(), 50);

        // Padding beyond the logical length is never observable.
        row.append("b");
        assert_eq!(row, "b");
    }
}
