//! Open-addressed symbol table: interned string handle → value.
//!
//! This is the one mapping type used throughout the driver for modules,
//! global symbols, module-local symbols, and qualified per-module
//! namespaces — only the value type changes. Linear probing keeps the
//! implementation small; load factor is kept under 0.7 by doubling on
//! insert, which is the only resizing policy spec §4.B leaves unspecified
//! ("implementation-defined").
//!
//! The only externally observable invariant (spec §4.B) is last-write-wins
//! on `set`: inserting the same key twice overwrites the prior value rather
//! than keeping both or erroring.

use crate::intern::Symbol;

enum Slot<V> {
    Empty,
    Occupied(Symbol, V),
}

pub struct SymbolTable<V> {
    slots: Vec<Slot<V>>,
    len: usize,
}

impl<V> SymbolTable<V> {
    pub fn init(capacity: usize) -> Self {
        let capacity = capacity.next_power_of_two().max(8);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || Slot::Empty);
        SymbolTable { slots, len: 0 }
    }

    fn hash_index(&self, sym: Symbol) -> usize {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        sym.hash(&mut hasher);
        (hasher.finish() as usize) & (self.slots.len() - 1)
    }

    pub fn get(&self, key: Symbol) -> Option<&V> {
        let mut idx = self.hash_index(key);
        for _ in 0..self.slots.len() {
            match &self.slots[idx] {
                Slot::Empty => return None,
                Slot::Occupied(k, v) if *k == key => return Some(v),
                Slot::Occupied(_, _) => idx = (idx + 1) & (self.slots.len() - 1),
            }
        }
        None
    }

    pub fn get_mut(&mut self, key: Symbol) -> Option<&mut V> {
        let mut idx = self.hash_index(key);
        for _ in 0..self.slots.len() {
            match &self.slots[idx] {
                Slot::Empty => return None,
                Slot::Occupied(k, _) if *k == key => {
                    if let Slot::Occupied(_, v) = &mut self.slots[idx] {
                        return Some(v);
                    }
                    unreachable!()
                }
                Slot::Occupied(_, _) => idx = (idx + 1) & (self.slots.len() - 1),
            }
        }
        None
    }

    /// Insert, overwriting any existing value for `key` (last-write-wins).
    pub fn set(&mut self, key: Symbol, value: V) {
        if (self.len + 1) as f64 > 0.7 * self.slots.len() as f64 {
            self.grow();
        }
        let mut idx = self.hash_index(key);
        loop {
            match &mut self.slots[idx] {
                Slot::Empty => {
                    self.slots[idx] = Slot::Occupied(key, value);
                    self.len += 1;
                    return;
                }
                Slot::Occupied(k, v) if *k == key => {
                    *v = value;
                    return;
                }
                Slot::Occupied(_, _) => idx = (idx + 1) & (self.slots.len() - 1),
            }
        }
    }

    pub fn contains(&self, key: Symbol) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn grow(&mut self) {
        let new_capacity = self.slots.len() * 2;
        let mut new_slots = Vec::with_capacity(new_capacity);
        new_slots.resize_with(new_capacity, || Slot::Empty);
        let old_slots = std::mem::replace(&mut self.slots, new_slots);
        self.len = 0;
        for slot in old_slots {
            if let Slot::Occupied(k, v) = slot {
                self.set(k, v);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &V)> {
        self.slots.iter().filter_map(|s| match s {
            Slot::Occupied(k, v) => Some((*k, v)),
            Slot::Empty => None,
        })
    }
}
