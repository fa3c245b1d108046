//! Resource Calendar - 桌台时段占用表
//!
//! 单一事实来源：记录每个 (restaurant, table, time slot, date) 被哪个预订占用。
//!
//! # 原子性
//!
//! `try_allocate` 通过 DashMap entry API 完成检查 + 插入，
//! 整个过程持有该 key 所在 shard 的写锁，等价于按 key 的 compare-and-set：
//! 同一 key 的并发请求恰好一个 `Allocated`，其余 `Conflict`。
//! 不同 key 落在不同 shard 时互不阻塞，没有全局锁。

use chrono::NaiveDate;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::collections::HashSet;

/// One bookable unit: a table for a time slot on a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub restaurant_id: i64,
    pub table_id: i64,
    pub time_slot_id: i64,
    pub date: NaiveDate,
}

impl SlotKey {
    pub fn new(restaurant_id: i64, table_id: i64, time_slot_id: i64, date: NaiveDate) -> Self {
        Self {
            restaurant_id,
            table_id,
            time_slot_id,
            date,
        }
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "r{}/t{}/s{}/{}",
            self.restaurant_id, self.table_id, self.time_slot_id, self.date
        )
    }
}

/// Result of an allocation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allocation {
    Allocated,
    /// Key already held by another reservation
    Conflict { holder: String },
}

impl Allocation {
    pub fn is_allocated(&self) -> bool {
        matches!(self, Allocation::Allocated)
    }
}

/// Slot occupancy map
#[derive(Debug, Default)]
pub struct ResourceCalendar {
    slots: DashMap<SlotKey, String>,
}

impl ResourceCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claim `key` for `reservation_id`
    ///
    /// Re-allocating a key to its current holder is idempotent.
    pub fn try_allocate(&self, key: SlotKey, reservation_id: &str) -> Allocation {
        match self.slots.entry(key) {
            Entry::Occupied(entry) => {
                if entry.get() == reservation_id {
                    Allocation::Allocated
                } else {
                    Allocation::Conflict {
                        holder: entry.get().clone(),
                    }
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(reservation_id.to_string());
                tracing::debug!(slot = %key, reservation_id = %reservation_id, "Slot allocated");
                Allocation::Allocated
            }
        }
    }

    /// Free `key` if (and only if) `reservation_id` holds it
    ///
    /// Idempotent: releasing a free key, or a key now held by someone else,
    /// is a no-op. Returns whether an entry was removed.
    pub fn release(&self, key: &SlotKey, reservation_id: &str) -> bool {
        let removed = self
            .slots
            .remove_if(key, |_, holder| holder == reservation_id)
            .is_some();
        if removed {
            tracing::debug!(slot = %key, reservation_id = %reservation_id, "Slot released");
        }
        removed
    }

    /// Best-effort read; not a reservation
    pub fn is_available(&self, key: &SlotKey) -> bool {
        !self.slots.contains_key(key)
    }

    /// Current holder of `key`
    pub fn holder(&self, key: &SlotKey) -> Option<String> {
        self.slots.get(key).map(|h| h.value().clone())
    }

    /// Tables of a restaurant occupied for (time slot, date)
    pub fn occupied_tables(
        &self,
        restaurant_id: i64,
        time_slot_id: i64,
        date: NaiveDate,
    ) -> HashSet<i64> {
        self.slots
            .iter()
            .filter(|e| {
                let k = e.key();
                k.restaurant_id == restaurant_id && k.time_slot_id == time_slot_id && k.date == date
            })
            .map(|e| e.key().table_id)
            .collect()
    }

    /// Number of occupied keys
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
