/// Initial capacity of a [`GrowableBuffer`] on its first growth.
pub const BASE_CAP: usize = 256;

/// Append-only buffer with deterministic doubling growth.
///
/// Invariant: `len <= capacity`. `capacity` is tracked separately from the
/// backing `Vec` so growth always follows `BASE_CAP, BASE_CAP * 2, ...`
/// regardless of what the allocator hands back.
///
/// Storage may move on growth; never keep a pointer into the buffer across an
/// append.
#[derive(Debug, Clone)]
pub struct GrowableBuffer<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> Default for GrowableBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> GrowableBuffer<T> {
    /// Appends a single item, doubling capacity when full.
    pub fn append(&mut self, item: T) {
        if self.items.len() == self.capacity {
            let next = (self.capacity * 2).max(BASE_CAP);
            self.reallocate(next);
        }
        self.items.push(item);
    }

    /// Appends a contiguous batch with at most one reallocation.
    pub fn append_many(&mut self, items: &[T]) {
        let required = self.items.len() + items.len();
        if required > self.capacity {
            let mut next = self.capacity.max(BASE_CAP);
            while next < required {
                next *= 2;
            }
            self.reallocate(next);
        }
        self.items.extend_from_slice(items);
    }
}

impl<T> GrowableBuffer<T> {
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            capacity: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the used prefix (`len` elements).
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Resets `len` to zero and keeps the allocation.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn reallocate(&mut self, new_capacity: usize) {
        let additional = new_capacity - self.items.len();
        if let Err(e) = self.items.try_reserve_exact(additional) {
            // Nothing downstream can make progress without the memory.
            panic!(
                "growable buffer: failed to allocate {new_capacity} x {} bytes: {e}",
                std::mem::size_of::<T>()
            );
        }
        log::trace!(
            "growable buffer: capacity {} -> {}",
            self.capacity,
            new_capacity
        );
        self.capacity = new_capacity;
    }
}

impl<'a, T> IntoIterator for &'a GrowableBuffer<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_capacity(n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let mut cap = BASE_CAP;
        while cap < n {
            cap *= 2;
        }
        cap
    }

    // ── append ────────────────────────────────────────────────────────────

    #[test]
    fn new_buffer_is_empty_without_capacity() {
        let b: GrowableBuffer<u32> = GrowableBuffer::new();
        assert!(b.is_empty());
        assert_eq!(b.capacity(), 0);
    }

    #[test]
    fn first_append_allocates_base_cap() {
        let mut b = GrowableBuffer::new();
        b.append(7u32);
        assert_eq!(b.len(), 1);
        assert_eq!(b.capacity(), BASE_CAP);
        assert_eq!(b.as_slice(), &[7]);
    }

    #[test]
    fn single_appends_follow_doubling_sequence() {
        let mut b = GrowableBuffer::new();
        for n in 1..=(BASE_CAP * 4 + 1) {
            b.append(n as u32);
            assert!(b.len() <= b.capacity());
            assert_eq!(b.capacity(), expected_capacity(n), "after {n} appends");
        }
    }

    #[test]
    fn growth_preserves_existing_values() {
        let mut b = GrowableBuffer::new();
        for i in 0..(BASE_CAP * 3) as u32 {
            b.append(i);
        }
        for (i, v) in b.iter().enumerate() {
            assert_eq!(*v, i as u32);
        }
    }

    // ── append_many ───────────────────────────────────────────────────────

    #[test]
    fn append_many_on_empty_jumps_to_covering_power() {
        let mut b = GrowableBuffer::new();
        let batch: Vec<u32> = (0..1000).collect();
        b.append_many(&batch);
        assert_eq!(b.len(), 1000);
        assert_eq!(b.capacity(), 1024);
        assert_eq!(b.as_slice(), batch.as_slice());
    }

    #[test]
    fn append_many_exact_fit_does_not_grow() {
        let mut b = GrowableBuffer::new();
        b.append(0u8);
        b.append_many(&[1u8; BASE_CAP - 1]);
        assert_eq!(b.len(), BASE_CAP);
        assert_eq!(b.capacity(), BASE_CAP);
    }

    #[test]
    fn append_many_one_past_capacity_doubles_once() {
        let mut b = GrowableBuffer::new();
        b.append_many(&[0u8; BASE_CAP]);
        b.append_many(&[1u8]);
        assert_eq!(b.capacity(), BASE_CAP * 2);
        assert_eq!(b.as_slice()[BASE_CAP], 1);
    }

    #[test]
    fn append_many_empty_slice_is_noop() {
        let mut b: GrowableBuffer<u16> = GrowableBuffer::new();
        b.append_many(&[]);
        assert_eq!(b.len(), 0);
        assert_eq!(b.capacity(), 0);
    }

    #[test]
    fn mixed_appends_keep_count_within_capacity_and_values_intact() {
        let mut b = GrowableBuffer::new();
        let mut mirror = Vec::new();
        for round in 0..40u32 {
            if round % 3 == 0 {
                b.append(round);
                mirror.push(round);
            } else {
                let batch: Vec<u32> = (0..round * 7).map(|i| i ^ round).collect();
                b.append_many(&batch);
                mirror.extend_from_slice(&batch);
            }
            assert!(b.len() <= b.capacity());
            assert_eq!(b.as_slice(), mirror.as_slice());
        }
    }

    // ── clear ─────────────────────────────────────────────────────────────

    #[test]
    fn clear_keeps_capacity() {
        let mut b = GrowableBuffer::new();
        b.append_many(&[1u32; 300]);
        b.clear();
        assert!(b.is_empty());
        assert_eq!(b.capacity(), 512);
        b.append(9);
        assert_eq!(b.capacity(), 512);
    }
}
