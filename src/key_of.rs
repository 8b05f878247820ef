/// Extracts the ordering key from a stored value.
///
/// The same engine backs set-like trees, where the whole value is the key ([`Identity`]),
/// and map-like trees storing `(key, value)` pairs ([`First`]).
pub trait KeyOf<T> {
    /// The key type the comparator sees.
    type Key: ?Sized;

    /// Returns the key of `value`. Must be pure: the same value always yields an equal key.
    fn key_of(value: &T) -> &Self::Key;
}

/// The value is its own key.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Identity;

impl<T> KeyOf<T> for Identity {
    type Key = T;

    #[inline]
    fn key_of(value: &T) -> &T {
        value
    }
}

/// The key is the first component of a `(key, value)` pair.
///
/// ```
/// use redwood_tree::{First, Natural, RbTree};
///
/// let mut ages: RbTree<(&str, u32), First> = RbTree::with_comparator(Natural);
/// ages.insert_unique(("bob", 41));
/// ages.insert_unique(("alice", 37));
/// let (_, inserted) = ages.insert_unique(("bob", 99));
/// assert!(!inserted);
///
/// let bob = ages.find(&"bob");
/// assert_eq!(ages.get(bob), Some(&("bob", 41)));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct First;

impl<K, V> KeyOf<(K, V)> for First {
    type Key = K;

    #[inline]
    fn key_of(value: &(K, V)) -> &K {
        &value.0
    }
}
