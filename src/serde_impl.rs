//! `serde` support, behind the `serde` feature.
//!
//! Maps serialize as maps and sets as sequences, in the collection's order.
//! Deserializing inserts entries one at a time under `C::default()`, so the
//! input need not be sorted and later duplicates win.

use core::fmt;
use core::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

use crate::comparator::Comparator;
use crate::{RBTreeMap, RBTreeSet};

impl<K, V, C> Serialize for RBTreeMap<K, V, C>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self)
    }
}

impl<'de, K, V, C> Deserialize<'de> for RBTreeMap<K, V, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Comparator<K> + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<RBTreeMap<K, V, C>, D::Error> {
        deserializer.deserialize_map(RBTreeMapVisitor { phantom: PhantomData })
    }
}

struct RBTreeMapVisitor<K, V, C> {
    phantom: PhantomData<(K, V, C)>,
}

impl<'de, K, V, C> Visitor<'de> for RBTreeMapVisitor<K, V, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Comparator<K> + Default,
{
    type Value = RBTreeMap<K, V, C>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut map: A) -> Result<RBTreeMap<K, V, C>, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut tree = RBTreeMap::with_comparator(C::default());

        while let Some((k, v)) = map.next_entry()? {
            tree.insert(k, v);
        }

        Ok(tree)
    }
}

impl<T, C> Serialize for RBTreeSet<T, C>
where
    T: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self)
    }
}

impl<'de, T, C> Deserialize<'de> for RBTreeSet<T, C>
where
    T: Deserialize<'de>,
    C: Comparator<T> + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<RBTreeSet<T, C>, D::Error> {
        deserializer.deserialize_seq(RBTreeSetVisitor { phantom: PhantomData })
    }
}

struct RBTreeSetVisitor<T, C> {
    phantom: PhantomData<(T, C)>,
}

impl<'de, T, C> Visitor<'de> for RBTreeSetVisitor<T, C>
where
    T: Deserialize<'de>,
    C: Comparator<T> + Default,
{
    type Value = RBTreeSet<T, C>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<RBTreeSet<T, C>, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut set = RBTreeSet::with_comparator(C::default());

        while let Some(value) = seq.next_element()? {
            set.insert(value);
        }

        Ok(set)
    }
}
