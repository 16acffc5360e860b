use std::cell::{Ref, RefCell, RefMut};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use tracing::trace;

use super::error::ItemsetError;

type ItemStorage<I> = Rc<RefCell<Vec<Rc<I>>>>;

/// Items that occur together at one point of a sequence, with the timestamp
/// of that point. An itemset with a timestamp is also called a transaction.
///
/// Item values are held as `Rc<I>` and are never copied. The item storage
/// itself is shared by [`Itemset::share_from`] and reallocated by
/// [`Itemset::duplicate`].
pub struct Itemset<I> {
    items: ItemStorage<I>,
    timestamp: i64,
}

impl<I> Default for Itemset<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> Itemset<I> {
    pub fn new() -> Self {
        Self::with_timestamp(0)
    }

    pub fn with_timestamp(timestamp: i64) -> Self {
        Self {
            items: Rc::new(RefCell::new(Vec::new())),
            timestamp,
        }
    }

    /// Creates an itemset that aliases `other`'s item storage.
    ///
    /// Adding or removing items through either itemset is visible through
    /// both. The timestamp is copied, so the two timestamps evolve
    /// independently.
    pub fn share_from(other: &Itemset<I>) -> Self {
        trace!(
            size = other.size(),
            timestamp = other.timestamp,
            "sharing itemset storage"
        );
        Self {
            items: Rc::clone(&other.items),
            timestamp: other.timestamp,
        }
    }

    /// Creates an itemset with the same timestamp and a new item storage
    /// holding the same item values in the same order.
    pub fn duplicate(&self) -> Self {
        Self {
            items: Rc::new(RefCell::new(self.items.borrow().clone())),
            timestamp: self.timestamp,
        }
    }

    pub fn shares_storage_with(&self, other: &Itemset<I>) -> bool {
        Rc::ptr_eq(&self.items, &other.items)
    }

    /// Appends an item after the last one.
    pub fn add_item(&mut self, item: I) {
        self.add_shared(Rc::new(item));
    }

    /// Appends an item value that is already shared with other itemsets.
    pub fn add_shared(&mut self, item: Rc<I>) {
        self.items.borrow_mut().push(item);
    }

    /// Removes the item at `index` and shifts the following items down.
    pub fn remove_item(&mut self, index: usize) -> Result<Rc<I>, ItemsetError> {
        let mut items = self.items.borrow_mut();
        if index >= items.len() {
            return Err(out_of_range(index, items.len()));
        }
        Ok(items.remove(index))
    }

    pub fn get(&self, index: usize) -> Result<Rc<I>, ItemsetError> {
        let items = self.items.borrow();
        let item = items.get(index).cloned();
        item.ok_or_else(|| out_of_range(index, items.len()))
    }

    /// Read-only view of the live item sequence. No copy is made.
    pub fn items(&self) -> Ref<'_, Vec<Rc<I>>> {
        self.items.borrow()
    }

    /// Mutable handle on the live item sequence, bypassing `add_item` and
    /// `remove_item`. Changes are seen by every itemset sharing the storage.
    ///
    /// While the handle is alive, any other access to the shared storage
    /// (through this itemset or an alias from `share_from`) panics, except
    /// `Debug`, which prints `<borrowed>`.
    pub fn items_mut(&mut self) -> RefMut<'_, Vec<Rc<I>>> {
        self.items.borrow_mut()
    }

    /// Snapshot of the current items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Rc<I>> {
        self.items.borrow().clone().into_iter()
    }

    pub fn size(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: i64) {
        self.timestamp = timestamp;
    }
}

/// Converts a signed index into a position in an itemset of `size` items.
/// Negative indices are rejected, they do not count from the end.
pub fn checked_index(index: isize, size: usize) -> Result<usize, ItemsetError> {
    usize::try_from(index).map_err(|_| {
        trace!(index, size, "negative itemset index");
        ItemsetError::NegativeIndex { index, size }
    })
}

fn out_of_range(index: usize, size: usize) -> ItemsetError {
    trace!(index, size, "itemset index out of range");
    ItemsetError::IndexOutOfRange { index, size }
}

impl<I: PartialEq> Itemset<I> {
    pub fn contains(&self, item: &I) -> bool {
        self.items.borrow().iter().any(|own| **own == *item)
    }

    /// Whether every item of `other` also occurs in this itemset.
    /// Multiplicities are not compared.
    pub fn contains_all(&self, other: &Itemset<I>) -> bool {
        if self.shares_storage_with(other) {
            return true;
        }
        other.items.borrow().iter().all(|item| self.contains(item))
    }
}

impl<I: Hash> Itemset<I> {
    /// Order-independent hash: the wrapping sum of the item hashes.
    ///
    /// Item hashes use a fixed-key hasher, so the value is stable across
    /// processes running the same build. It may change between Rust releases.
    pub fn hash_code(&self) -> u64 {
        self.items
            .borrow()
            .iter()
            .fold(0u64, |sum, item| sum.wrapping_add(item_hash(&**item)))
    }
}

fn item_hash<I: Hash + ?Sized>(item: &I) -> u64 {
    let mut hasher = DefaultHasher::new();
    item.hash(&mut hasher);
    hasher.finish()
}

/// Itemsets are equal when they hold the same items with the same
/// multiplicities. Item order and timestamps are ignored.
impl<I: Eq + Hash> PartialEq for Itemset<I> {
    fn eq(&self, other: &Self) -> bool {
        if self.shares_storage_with(other) {
            return true;
        }

        let ours = self.items.borrow();
        let theirs = other.items.borrow();
        if ours.len() != theirs.len() {
            return false;
        }

        let mut counts: HashMap<&I, usize> = HashMap::with_capacity(ours.len());
        for item in ours.iter() {
            *counts.entry(&**item).or_insert(0) += 1;
        }
        for item in theirs.iter() {
            match counts.get_mut(&**item) {
                Some(count) if *count > 0 => *count -= 1,
                _ => return false,
            }
        }
        true
    }
}

impl<I: Eq + Hash> Eq for Itemset<I> {}

impl<I: Hash> Hash for Itemset<I> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl<I> Clone for Itemset<I> {
    fn clone(&self) -> Self {
        self.duplicate()
    }
}

impl<I: fmt::Display> fmt::Display for Itemset<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self.items.borrow().iter() {
            write!(f, "{} ", item)?;
        }
        Ok(())
    }
}

impl<I: fmt::Debug> fmt::Debug for Itemset<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("Itemset");
        match self.items.try_borrow() {
            Ok(items) => dbg.field("items", &*items),
            Err(_) => dbg.field("items", &format_args!("<borrowed>")),
        };
        dbg.field("timestamp", &self.timestamp).finish()
    }
}

impl<I> FromIterator<I> for Itemset<I> {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        let mut itemset = Self::new();
        itemset.extend(iter);
        itemset
    }
}

impl<I> Extend<I> for Itemset<I> {
    fn extend<T: IntoIterator<Item = I>>(&mut self, iter: T) {
        self.items
            .borrow_mut()
            .extend(iter.into_iter().map(Rc::new));
    }
}
