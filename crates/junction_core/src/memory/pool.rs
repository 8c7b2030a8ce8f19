//! # Chunked Pool
//!
//! Growth-only block storage for one element type, indexed by a dense key.
//!
//! Storage is a list of fixed-size chunks. Each chunk is a boxed slice that is
//! allocated once and never moved, so appending chunks (which may reallocate
//! the chunk list itself) leaves every existing element at the same address.
//! Iteration is contiguous within a chunk.
//!
//! Every slot also carries a generation that advances whenever a live element
//! is destroyed, so a `(slot, generation)` pair names one element's lifetime
//! even after the slot is reused.

use std::any::{type_name, Any};

use crate::error::PoolError;

/// Number of elements per chunk when none is specified.
pub const DEFAULT_ELEMENTS_PER_CHUNK: usize = 64;

/// A chunked, pointer-stable pool of `T`.
///
/// Reserving space and constructing elements are separate steps:
/// [`ensure_size`](Self::ensure_size) makes slots addressable,
/// [`create`](Self::create) constructs a value in one, and
/// [`destroy`](Self::destroy) ends its life. The pool never shrinks.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. Use one pool per thread or wrap in a mutex.
///
/// # Example
///
/// ```rust
/// use junction_core::Pool;
///
/// let mut pool: Pool<u32> = Pool::with_chunk_size(4);
/// pool.ensure_size(8);
///
/// let first = pool.create(0, 10) as *const u32;
/// pool.ensure_size(1_000);
///
/// // Growth never moves constructed elements.
/// assert_eq!(pool.get(0).map(|v| v as *const u32), Some(first));
/// ```
pub struct Pool<T> {
    /// Fixed-size chunks; a chunk's slots never move once allocated.
    chunks: Vec<Box<[Option<T>]>>,
    /// Per-slot destruction counters, chunked like `chunks`.
    generations: Vec<Box<[u32]>>,
    /// Slots per chunk.
    elements_per_chunk: usize,
    /// Logical size: slots `[0, size)` are addressable.
    size: usize,
    /// Number of constructed elements.
    live: usize,
}

impl<T> Pool<T> {
    /// Creates an empty pool with [`DEFAULT_ELEMENTS_PER_CHUNK`] slots per chunk.
    #[must_use]
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_ELEMENTS_PER_CHUNK)
    }

    /// Creates an empty pool with `elements_per_chunk` slots per chunk.
    ///
    /// No memory is allocated until the first [`reserve`](Self::reserve).
    ///
    /// # Panics
    ///
    /// Panics if `elements_per_chunk` is zero.
    #[must_use]
    pub fn with_chunk_size(elements_per_chunk: usize) -> Self {
        assert!(elements_per_chunk > 0, "Chunk size must be greater than zero");

        Self {
            chunks: Vec::new(),
            generations: Vec::new(),
            elements_per_chunk,
            size: 0,
            live: 0,
        }
    }

    /// Returns the logical size (number of addressable slots).
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if no slot is addressable yet.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of slots backed by allocated chunks.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.chunks.len() * self.elements_per_chunk
    }

    /// Returns the number of allocated chunks.
    #[inline]
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Returns the number of slots per chunk.
    #[inline]
    #[must_use]
    pub const fn elements_per_chunk(&self) -> usize {
        self.elements_per_chunk
    }

    /// Returns the number of constructed elements.
    #[inline]
    #[must_use]
    pub const fn live_count(&self) -> usize {
        self.live
    }

    /// Makes slots `[0, size)` addressable. Never shrinks.
    pub fn ensure_size(&mut self, size: usize) {
        if size > self.size {
            self.reserve(size);
            self.size = size;
        }
    }

    /// Allocates chunks until at least `capacity` slots are backed.
    ///
    /// Does not change the logical size.
    pub fn reserve(&mut self, capacity: usize) {
        while self.capacity() < capacity {
            let chunk: Vec<Option<T>> = (0..self.elements_per_chunk).map(|_| None).collect();
            self.chunks.push(chunk.into_boxed_slice());
            self.generations
                .push(vec![0; self.elements_per_chunk].into_boxed_slice());
        }
    }

    /// Constructs `value` in the slot at `index` and returns it.
    ///
    /// Constructing over a live slot is a contract violation. Debug builds
    /// assert; optimized builds drop the previous element and replace it.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`len`](Self::len).
    pub fn create(&mut self, index: usize, value: T) -> &mut T {
        assert!(
            index < self.size,
            "pool index {index} out of range (size {})",
            self.size
        );

        let (chunk, offset) = self.locate(index);
        let slot = &mut self.chunks[chunk][offset];
        debug_assert!(slot.is_none(), "pool slot {index} constructed twice");

        if slot.is_some() {
            let generation = &mut self.generations[chunk][offset];
            *generation = generation.wrapping_add(1);
        } else {
            self.live += 1;
        }
        slot.insert(value)
    }

    /// Returns the element at `index`, or `None` if the slot is vacant.
    ///
    /// An index at or past [`len`](Self::len) is a caller bug: debug builds
    /// assert, optimized builds return `None`. Use [`try_get`](Self::try_get)
    /// to tell the two cases apart.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        debug_assert!(index < self.size, "pool index {index} out of range (size {})", self.size);
        self.slot(index)?.as_ref()
    }

    /// Mutable counterpart of [`get`](Self::get).
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        debug_assert!(index < self.size, "pool index {index} out of range (size {})", self.size);
        self.slot_mut(index)?.as_mut()
    }

    /// Checked access distinguishing an out-of-range index from a vacant slot.
    ///
    /// # Errors
    ///
    /// [`PoolError::OutOfRange`] or [`PoolError::Vacant`].
    pub fn try_get(&self, index: usize) -> Result<&T, PoolError> {
        let size = self.size;
        self.slot(index)
            .ok_or(PoolError::OutOfRange { index, size })?
            .as_ref()
            .ok_or(PoolError::Vacant(index))
    }

    /// Mutable counterpart of [`try_get`](Self::try_get).
    ///
    /// # Errors
    ///
    /// [`PoolError::OutOfRange`] or [`PoolError::Vacant`].
    pub fn try_get_mut(&mut self, index: usize) -> Result<&mut T, PoolError> {
        let size = self.size;
        self.slot_mut(index)
            .ok_or(PoolError::OutOfRange { index, size })?
            .as_mut()
            .ok_or(PoolError::Vacant(index))
    }

    /// Returns `true` if the slot at `index` holds a constructed element.
    #[inline]
    #[must_use]
    pub fn is_live(&self, index: usize) -> bool {
        matches!(self.slot(index), Some(Some(_)))
    }

    /// Returns the generation of the slot at `index`.
    ///
    /// Starts at zero and advances each time a live element in the slot is
    /// destroyed. `None` if `index` is not below [`len`](Self::len).
    #[inline]
    #[must_use]
    pub fn generation(&self, index: usize) -> Option<u32> {
        if index >= self.size {
            return None;
        }
        let (chunk, offset) = self.locate(index);
        Some(self.generations[chunk][offset])
    }

    /// Ends the life of the element at `index` and hands it back.
    ///
    /// The slot stays addressable; nothing is deallocated.
    pub fn destroy(&mut self, index: usize) -> Option<T> {
        debug_assert!(index < self.size, "pool index {index} out of range (size {})", self.size);
        let value = self.slot_mut(index)?.take();
        if value.is_some() {
            self.live -= 1;
            let (chunk, offset) = self.locate(index);
            let generation = &mut self.generations[chunk][offset];
            *generation = generation.wrapping_add(1);
        }
        value
    }

    /// Destroys every element. Size and chunks are kept.
    pub fn clear(&mut self) {
        let slots = self.chunks.iter_mut().flat_map(|chunk| chunk.iter_mut());
        let generations = self.generations.iter_mut().flat_map(|chunk| chunk.iter_mut());
        for (slot, generation) in slots.zip(generations) {
            if slot.take().is_some() {
                *generation = generation.wrapping_add(1);
            }
        }
        self.live = 0;
    }

    /// Iterates over constructed elements in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.chunks
            .iter()
            .flat_map(|chunk| chunk.iter())
            .take(self.size)
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|value| (index, value)))
    }

    /// Iterates mutably over constructed elements in ascending index order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        let size = self.size;
        self.chunks
            .iter_mut()
            .flat_map(|chunk| chunk.iter_mut())
            .take(size)
            .enumerate()
            .filter_map(|(index, slot)| slot.as_mut().map(|value| (index, value)))
    }

    /// Splits `index` into chunk and offset.
    #[inline]
    const fn locate(&self, index: usize) -> (usize, usize) {
        (index / self.elements_per_chunk, index % self.elements_per_chunk)
    }

    #[inline]
    fn slot(&self, index: usize) -> Option<&Option<T>> {
        if index >= self.size {
            return None;
        }
        let (chunk, offset) = self.locate(index);
        Some(&self.chunks[chunk][offset])
    }

    #[inline]
    fn slot_mut(&mut self, index: usize) -> Option<&mut Option<T>> {
        if index >= self.size {
            return None;
        }
        let (chunk, offset) = self.locate(index);
        Some(&mut self.chunks[chunk][offset])
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a [`Pool`].
///
/// Lets a table hold pools of arbitrary element types behind one pointer
/// type. The owner needs only per-slot destruction and sizing without knowing
/// `T`; typed access goes through [`as_any`](Self::as_any) downcasts.
pub trait ErasedPool: Any {
    /// Destroys the element at `index`. Returns `true` if one was live.
    fn destroy_slot(&mut self, index: usize) -> bool;

    /// Returns `true` if the slot at `index` is constructed.
    fn is_live(&self, index: usize) -> bool;

    /// Makes slots `[0, size)` addressable.
    fn ensure_size(&mut self, size: usize);

    /// Returns the logical size.
    fn len(&self) -> usize;

    /// Returns `true` if no slot is addressable.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of constructed elements.
    fn live_count(&self) -> usize;

    /// Returns the element type's name.
    fn element_type_name(&self) -> &'static str;

    /// Converts to `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Converts to mutable `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> ErasedPool for Pool<T> {
    fn destroy_slot(&mut self, index: usize) -> bool {
        Pool::is_live(self, index) && Pool::destroy(self, index).is_some()
    }

    fn is_live(&self, index: usize) -> bool {
        Pool::is_live(self, index)
    }

    fn ensure_size(&mut self, size: usize) {
        Pool::ensure_size(self, size);
    }

    fn len(&self) -> usize {
        Pool::len(self)
    }

    fn live_count(&self) -> usize {
        Pool::live_count(self)
    }

    fn element_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
