//! Field-name lookup over raw UTF-8 key bytes.

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::CodecError;

/// One 8-byte slice of a key.
///
/// `bits` holds up to eight key bytes little-endian with zero padding; `len` records how many
/// of them are real, so `"a"` and `"a\0"` map to different chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Chunk {
    bits: u64,
    len: u8,
}

/// Split the leading chunk off a non-empty key.
///
/// Insertion and lookup both go through this function.
#[inline]
fn get_raw64(key: &[u8]) -> (Chunk, &[u8]) {
    let n = key.len().min(8);
    let mut buf = [0u8; 8];
    buf[..n].copy_from_slice(&key[..n]);
    #[allow(clippy::cast_possible_truncation)]
    let chunk = Chunk {
        bits: u64::from_le_bytes(buf),
        len: n as u8,
    };
    (chunk, &key[n..])
}

/// Binary search over sorted chunk keys: `Ok(index)` on a hit, `Err(insertion point)` on a miss.
#[inline]
fn search(keys: &[Chunk], target: Chunk) -> Result<usize, usize> {
    let mut lo = 0;
    let mut hi = keys.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match keys[mid].cmp(&target) {
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
            Ordering::Equal => return Ok(mid),
        }
    }
    Err(lo)
}

#[derive(Debug, Clone)]
struct Node<T> {
    value: Option<T>,
    // Parallel arrays; `child_keys` is strictly ascending.
    child_keys: Vec<Chunk>,
    child_nodes: Vec<Node<T>>,
}

impl<T> Node<T> {
    const fn empty() -> Self {
        Self {
            value: None,
            child_keys: Vec::new(),
            child_nodes: Vec::new(),
        }
    }

    fn child(&self, chunk: Chunk) -> Option<&Self> {
        search(&self.child_keys, chunk)
            .ok()
            .map(|i| &self.child_nodes[i])
    }
}

/// Maps byte-string keys to values without allocating per lookup.
///
/// Keys are consumed eight bytes per level; every level keeps its children as sorted chunk
/// keys with a parallel node array, searched by binary search. An empty key addresses the
/// root. Lookups that miss return the default supplied at construction.
///
/// Build once, then share immutably (for example behind an `Arc`): lookups take `&self`
/// and the type is `Send + Sync` whenever `T` is.
///
/// ```
/// use packcore::ScalarStringTrie;
///
/// let mut fields = ScalarStringTrie::new(usize::MAX);
/// assert!(fields.try_add("id", 0));
/// assert!(fields.try_add("created_at", 1));
/// assert!(!fields.try_add("id", 7));
///
/// assert_eq!(*fields.get_or_default(b"created_at"), 1);
/// assert_eq!(*fields.get_or_default(b"missing"), usize::MAX);
/// ```
#[derive(Debug, Clone)]
pub struct ScalarStringTrie<T> {
    root: Node<T>,
    default: T,
    len: usize,
}

impl<T> ScalarStringTrie<T> {
    /// An empty trie whose misses resolve to `default`.
    pub const fn new(default: T) -> Self {
        Self {
            root: Node::empty(),
            default,
            len: 0,
        }
    }

    /// Build a trie from `(key, value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a key repeats.
    pub fn from_entries<K, I>(default: T, entries: I) -> Result<Self, CodecError>
    where
        K: AsRef<[u8]>,
        I: IntoIterator<Item = (K, T)>,
    {
        let mut trie = Self::new(default);
        for (key, value) in entries {
            if !trie.try_add_raw(key.as_ref(), value) {
                return Err(CodecError::invalid_argument());
            }
        }
        Ok(trie)
    }

    /// Number of stored keys.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no key is stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The value misses resolve to.
    #[must_use]
    pub const fn default_value(&self) -> &T {
        &self.default
    }

    /// Insert `value` under the UTF-8 bytes of `key`. See [`ScalarStringTrie::try_add_raw`].
    pub fn try_add(&mut self, key: &str, value: T) -> bool {
        self.try_add_raw(key.as_bytes(), value)
    }

    /// Insert `value` under `key`.
    ///
    /// Returns false, leaving the trie unchanged, if `key` is already present.
    pub fn try_add_raw(&mut self, key: &[u8], value: T) -> bool {
        let mut node = &mut self.root;
        let mut rest = key;
        while !rest.is_empty() {
            let (chunk, tail) = get_raw64(rest);
            let idx = match search(&node.child_keys, chunk) {
                Ok(i) => i,
                Err(i) => {
                    node.child_keys.insert(i, chunk);
                    node.child_nodes.insert(i, Node::empty());
                    i
                }
            };
            node = &mut node.child_nodes[idx];
            rest = tail;
        }
        if node.value.is_some() {
            return false;
        }
        node.value = Some(value);
        self.len += 1;
        true
    }

    /// Look up `key`.
    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<&T> {
        let mut node = &self.root;
        let mut rest = key;
        while !rest.is_empty() {
            let (chunk, tail) = get_raw64(rest);
            node = node.child(chunk)?;
            rest = tail;
        }
        node.value.as_ref()
    }

    /// Look up `key`, falling back to the construction default.
    #[must_use]
    pub fn get_or_default(&self, key: &[u8]) -> &T {
        self.get(key).unwrap_or(&self.default)
    }

    /// Returns true if `key` is stored.
    #[must_use]
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }
}

impl<T: Default> Default for ScalarStringTrie<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<K: AsRef<[u8]>, T: Default> FromIterator<(K, T)> for ScalarStringTrie<T> {
    /// Collect pairs; on a repeated key the first value wins.
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut trie = Self::default();
        for (key, value) in iter {
            trie.try_add_raw(key.as_ref(), value);
        }
        trie
    }
}
