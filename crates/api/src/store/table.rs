//! Generic id-keyed table.

use std::collections::BTreeMap;

/// Every id a table can hand out has been used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("id space exhausted")]
pub struct IdSpaceExhausted;

/// An in-memory table of records keyed by a typed id.
///
/// Ids come from a per-table counter: monotonic, never reused (a deleted
/// id stays retired), and always above every seeded id. Iteration is in id
/// order, which is also creation order.
#[derive(Debug, Clone)]
pub struct Table<Id, T> {
    rows: BTreeMap<Id, T>,
    // Wider than the id so that `i32::MAX` can be issued once and then refused
    next_id: i64,
}

impl<Id, T> Default for Table<Id, T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<Id, T> Table<Id, T>
where
    Id: Copy + Ord + From<i32>,
    i32: From<Id>,
{
    /// An empty table whose first id is 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A table pre-filled with `rows`; the next id is one past the largest
    /// seeded id.
    #[must_use]
    pub fn seeded(rows: impl IntoIterator<Item = (Id, T)>) -> Self {
        let rows: BTreeMap<Id, T> = rows.into_iter().collect();
        let next_id = rows
            .keys()
            .next_back()
            .map_or(1, |&id| i64::from(i32::from(id)) + 1);
        Self { rows, next_id }
    }

    fn allocate_id(&mut self) -> Result<Id, IdSpaceExhausted> {
        let raw = i32::try_from(self.next_id).map_err(|_| IdSpaceExhausted)?;
        self.next_id += 1;
        Ok(Id::from(raw))
    }

    /// Insert a record built from a freshly assigned id and return that id.
    ///
    /// # Errors
    ///
    /// Returns `IdSpaceExhausted` once every `i32` id has been issued. The
    /// table is left unchanged.
    pub fn create(&mut self, build: impl FnOnce(Id) -> T) -> Result<Id, IdSpaceExhausted> {
        let id = self.allocate_id()?;
        self.rows.insert(id, build(id));
        Ok(id)
    }

    /// Like [`Table::create`], but hands back the stored record.
    ///
    /// # Errors
    ///
    /// Returns `IdSpaceExhausted` once every `i32` id has been issued.
    pub fn create_returning(&mut self, build: impl FnOnce(Id) -> T) -> Result<&T, IdSpaceExhausted> {
        let id = self.allocate_id()?;
        Ok(self.rows.entry(id).or_insert_with(|| build(id)))
    }

    #[must_use]
    pub fn get(&self, id: Id) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: Id) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    /// All records in id order.
    pub fn list(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    /// Apply `patch` to a record in place and return the updated record.
    pub fn update(&mut self, id: Id, patch: impl FnOnce(&mut T)) -> Option<&T> {
        let row = self.rows.get_mut(&id)?;
        patch(row);
        Some(row)
    }

    /// Remove and return a record.
    pub fn delete(&mut self, id: Id) -> Option<T> {
        self.rows.remove(&id)
    }

    /// First record (in id order) matching `predicate`.
    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<&T> {
        self.rows.values().find(|row| predicate(row))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use storekeep_core::ProductId;

    use super::*;

    #[test]
    fn test_ids_are_monotonic_and_never_reused() {
        let mut table: Table<ProductId, &str> = Table::new();
        let a = table.create(|_| "a").unwrap();
        let b = table.create(|_| "b").unwrap();
        assert_eq!((a.as_i32(), b.as_i32()), (1, 2));

        table.delete(b);
        let c = table.create(|_| "c").unwrap();
        assert_eq!(c.as_i32(), 3);
    }

    #[test]
    fn test_seeded_counter_starts_above_seed() {
        let mut table = Table::seeded([(ProductId::new(1), "x"), (ProductId::new(3), "y")]);
        assert_eq!(table.create(|_| "z").unwrap(), ProductId::new(4));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_create_passes_assigned_id_to_builder() {
        let mut table: Table<ProductId, ProductId> = Table::new();
        let id = table.create(|id| id).unwrap();
        assert_eq!(table.get(id), Some(&id));

        let stored = *table.create_returning(|id| id).unwrap();
        assert_eq!(stored, ProductId::new(2));
    }

    #[test]
    fn test_last_id_is_issued_once() {
        let mut table = Table::seeded([(ProductId::new(i32::MAX - 1), "old")]);

        assert_eq!(table.create(|_| "last").unwrap(), ProductId::new(i32::MAX));
        assert_eq!(table.create(|_| "overflow"), Err(IdSpaceExhausted));
        assert_eq!(table.create_returning(|_| "again").unwrap_err(), IdSpaceExhausted);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(ProductId::new(i32::MAX)), Some(&"last"));
    }

    #[test]
    fn test_update_and_delete_absent() {
        let mut table: Table<ProductId, u32> = Table::new();
        let id = table.create(|_| 5).unwrap();

        assert_eq!(table.update(id, |v| *v += 1), Some(&6));
        assert!(table.update(ProductId::new(99), |v| *v += 1).is_none());
        assert!(table.delete(ProductId::new(99)).is_none());
        assert_eq!(table.delete(id), Some(6));
        assert!(table.is_empty());
    }

    #[test]
    fn test_list_and_find_follow_id_order() {
        let mut table: Table<ProductId, u32> = Table::new();
        for v in [30, 10, 20] {
            table.create(|_| v).unwrap();
        }

        assert_eq!(table.list().copied().collect::<Vec<_>>(), vec![30, 10, 20]);
        assert_eq!(table.find(|v| *v < 25), Some(&10));
    }
}
