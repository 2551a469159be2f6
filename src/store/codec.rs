//! Injected capabilities: key ordering and record packing
//!
//! The store does not put `Ord` or serialization bounds on its logical key
//! and value types. Both concerns arrive as explicit capability objects at
//! construction, so one store type serves records whose ordering or packed
//! form is decided by the embedder.

use std::cmp::Ordering;

use crate::batch::BatchId;

/// Bidirectional codec between logical `(K, V)` pairs and the packed
/// `(PK, PV)` pairs the storage layer holds.
///
/// `encode` sees the batch being written so packed records can carry their
/// batch stamp; `decode` must invert whatever `encode` produced.
pub trait PairCodec<K, V, PK, PV>: Send + Sync {
    /// Packs one logical pair for storage, stamped with the batch it
    /// belongs to.
    fn encode(&self, pair: (K, V), batch: BatchId) -> (PK, PV);

    /// Unpacks one stored pair back into its logical form.
    fn decode(&self, packed: (PK, PV)) -> (K, V);
}

/// Stores logical pairs as-is, ignoring the batch stamp.
#[derive(Copy, Clone, Debug, Default)]
pub struct IdentityCodec;

impl<K: Send + Sync, V: Send + Sync> PairCodec<K, V, K, V> for IdentityCodec {
    fn encode(&self, pair: (K, V), _batch: BatchId) -> (K, V) {
        pair
    }

    fn decode(&self, packed: (K, V)) -> (K, V) {
        packed
    }
}

/// A total order over logical keys.
pub trait KeyOrder<K>: Send + Sync {
    fn cmp(&self, a: &K, b: &K) -> Ordering;
}

/// Orders keys by their own `Ord` implementation.
#[derive(Copy, Clone, Debug, Default)]
pub struct NaturalOrder;

impl<K: Ord + Send + Sync> KeyOrder<K> for NaturalOrder {
    fn cmp(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_codec_round_trips() {
        let codec = IdentityCodec;
        let packed = codec.encode(("k".to_string(), 7u64), BatchId::new(1));
        assert_eq!(codec.decode(packed), ("k".to_string(), 7u64));
    }

    #[test]
    fn test_natural_order_matches_ord() {
        let order = NaturalOrder;
        assert_eq!(order.cmp(&1, &2), Ordering::Less);
        assert_eq!(order.cmp(&2, &2), Ordering::Equal);
        assert_eq!(order.cmp(&3, &2), Ordering::Greater);
    }

    #[test]
    fn test_reversed_order_capability() {
        struct Reversed;
        impl KeyOrder<i32> for Reversed {
            fn cmp(&self, a: &i32, b: &i32) -> Ordering {
                b.cmp(a)
            }
        }
        assert_eq!(Reversed.cmp(&1, &2), Ordering::Greater);
    }
}
