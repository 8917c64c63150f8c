use core::fmt;

/// The largest capacity a ring buffer will ever grow to.
pub const MAX_CAPACITY: usize = isize::max_value() as usize - 1;

/// A circular byte queue with optional growth.
///
/// The backing storage has one slot more than the capacity. That slot is always kept empty so
/// that a full buffer can be told apart from an empty one by the cursors alone: the buffer is
/// empty when `read == write` and full when advancing `write` by one would reach `read`.
///
/// Without auto-expansion, enqueueing never fails but writes only as many bytes as fit and reports
/// that number. With auto-expansion the storage is doubled before an enqueue that would otherwise
/// not fit, preserving the logical byte order.
#[derive(Clone)]
pub struct RingBuffer {
    storage: Vec<u8>,
    read: usize,
    write: usize,
    auto_expand: bool,
}

impl RingBuffer {
    /// Create an empty buffer holding at most `capacity` bytes.
    ///
    /// Auto-expansion starts disabled. The capacity is clamped to [`MAX_CAPACITY`].
    ///
    /// [`MAX_CAPACITY`]: constant.MAX_CAPACITY.html
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_CAPACITY);
        RingBuffer {
            storage: vec![0; capacity + 1],
            read: 0,
            write: 0,
            auto_expand: false,
        }
    }

    /// The maximum number of bytes the buffer holds before it has to grow.
    pub fn capacity(&self) -> usize {
        self.storage.len() - 1
    }

    /// The number of bytes currently queued.
    pub fn len(&self) -> usize {
        let size = self.storage.len();
        (self.write + size - self.read) % size
    }

    /// The number of bytes that can be enqueued without growing.
    pub fn available(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Query if no bytes are queued.
    pub fn is_empty(&self) -> bool {
        self.read == self.write
    }

    /// Query if no more bytes can be queued without growing.
    pub fn is_full(&self) -> bool {
        (self.write + 1) % self.storage.len() == self.read
    }

    /// Query if the buffer grows to fit enqueued data.
    pub fn auto_expand(&self) -> bool {
        self.auto_expand
    }

    /// Choose if the buffer grows to fit enqueued data.
    pub fn set_auto_expand(&mut self, auto_expand: bool) {
        self.auto_expand = auto_expand;
    }

    /// Append bytes at the back.
    ///
    /// Returns the number of bytes actually queued. This is less than `data.len()` only when
    /// auto-expansion is disabled or the buffer already reached [`MAX_CAPACITY`].
    ///
    /// [`MAX_CAPACITY`]: constant.MAX_CAPACITY.html
    pub fn enqueue(&mut self, data: &[u8]) -> usize {
        if self.auto_expand {
            while self.available() < data.len() {
                if !self.expand() {
                    break;
                }
            }
        }

        let count = data.len().min(self.available());
        let size = self.storage.len();
        let front = count.min(size - self.write);
        let rear = count - front;

        self.storage[self.write..self.write + front].copy_from_slice(&data[..front]);
        self.storage[..rear].copy_from_slice(&data[front..count]);
        self.write = (self.write + count) % size;

        count
    }

    /// Remove up to `count` bytes from the front, oldest first.
    pub fn dequeue(&mut self, count: usize) -> Vec<u8> {
        let mut data = vec![0; count.min(self.len())];
        let taken = self.dequeue_into(&mut data);
        debug_assert_eq!(taken, data.len());
        data
    }

    /// Remove bytes from the front into `buf`.
    ///
    /// Returns the number of bytes written, the smaller of `buf.len()` and `len()`.
    pub fn dequeue_into(&mut self, buf: &mut [u8]) -> usize {
        let count = buf.len().min(self.len());
        let (front, rear) = self.as_slices();
        let from_front = count.min(front.len());
        let from_rear = count - from_front;

        buf[..from_front].copy_from_slice(&front[..from_front]);
        buf[from_front..count].copy_from_slice(&rear[..from_rear]);
        self.read = (self.read + count) % self.storage.len();

        count
    }

    /// Remove all queued bytes.
    pub fn dequeue_all(&mut self) -> Vec<u8> {
        let len = self.len();
        self.dequeue(len)
    }

    /// Discard all queued bytes, keeping the capacity.
    pub fn clear(&mut self) {
        self.read = 0;
        self.write = 0;
    }

    /// The queued bytes in logical order, as at most two contiguous pieces.
    ///
    /// The second slice is non-empty only if the queued bytes wrap around the end of the storage.
    pub fn as_slices(&self) -> (&[u8], &[u8]) {
        if self.read <= self.write {
            (&self.storage[self.read..self.write], &[])
        } else {
            (&self.storage[self.read..], &self.storage[..self.write])
        }
    }

    /// Iterate the queued bytes, oldest first, without removing them.
    pub fn iter(&self) -> impl Iterator<Item=u8> + '_ {
        let (front, rear) = self.as_slices();
        front.iter().chain(rear).cloned()
    }

    /// Copy the queued bytes, oldest first, without removing them.
    pub fn to_vec(&self) -> Vec<u8> {
        let (front, rear) = self.as_slices();
        let mut data = Vec::with_capacity(self.len());
        data.extend_from_slice(front);
        data.extend_from_slice(rear);
        data
    }

    /// Double the capacity, keeping the queued bytes in order.
    ///
    /// The queued bytes are moved to the start of the new storage. Returns `false` if the buffer
    /// is already at [`MAX_CAPACITY`] and did not grow.
    ///
    /// [`MAX_CAPACITY`]: constant.MAX_CAPACITY.html
    pub fn expand(&mut self) -> bool {
        let capacity = self.capacity();
        if capacity >= MAX_CAPACITY {
            return false;
        }

        let new_capacity = capacity.saturating_mul(2).max(1).min(MAX_CAPACITY);
        let len = self.len();
        let mut storage = vec![0; new_capacity + 1];
        {
            let (front, rear) = self.as_slices();
            storage[..front.len()].copy_from_slice(front);
            storage[front.len()..len].copy_from_slice(rear);
        }

        self.storage = storage;
        self.read = 0;
        self.write = len;
        true
    }
}

impl fmt::Debug for RingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("auto_expand", &self.auto_expand)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fifo_order() {
        let mut ring = RingBuffer::new(16);
        assert!(ring.is_empty());
        assert_eq!(ring.enqueue(b"hello "), 6);
        assert_eq!(ring.enqueue(b"world"), 5);
        assert_eq!(ring.len(), 11);
        assert_eq!(ring.available(), 5);
        assert_eq!(ring.dequeue(6), b"hello ");
        assert_eq!(ring.dequeue_all(), b"world");
        assert!(ring.is_empty());
    }

    #[test]
    fn wraparound() {
        let mut ring = RingBuffer::new(8);
        assert_eq!(ring.enqueue(&[0, 1, 2, 3, 4, 5]), 6);
        assert_eq!(ring.dequeue(4), &[0, 1, 2, 3]);
        assert_eq!(ring.enqueue(&[6, 7, 8, 9, 10]), 5);
        assert_eq!(ring.len(), 7);

        let (front, rear) = ring.as_slices();
        assert!(!rear.is_empty());
        assert_eq!(front.len() + rear.len(), 7);
        assert_eq!(ring.iter().collect::<Vec<_>>(), &[4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(ring.dequeue_all(), &[4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn fifo_over_many_wraps() {
        let mut ring = RingBuffer::new(7);
        let mut expected = 0u8;
        let mut next = 0u8;
        for round in 0..100usize {
            let chunk: Vec<u8> = (0..round % 5 + 1).map(|_| { next = next.wrapping_add(1); next }).collect();
            assert_eq!(ring.enqueue(&chunk), chunk.len());
            for byte in ring.dequeue(round % 4 + 2) {
                expected = expected.wrapping_add(1);
                assert_eq!(byte, expected);
            }
            assert_eq!(ring.len(), usize::from(next.wrapping_sub(expected)));
        }
    }

    #[test]
    fn truncating_enqueue() {
        let mut ring = RingBuffer::new(4);
        assert_eq!(ring.enqueue(&[1, 2, 3, 4, 5, 6]), 4);
        assert!(ring.is_full());
        assert_eq!(ring.available(), 0);
        assert_eq!(ring.enqueue(&[7]), 0);
        assert_eq!(ring.dequeue(10), &[1, 2, 3, 4]);
    }

    #[test]
    fn partial_dequeue() {
        let mut ring = RingBuffer::new(4);
        ring.enqueue(&[1, 2, 3]);
        let mut buf = [0; 8];
        assert_eq!(ring.dequeue_into(&mut buf), 3);
        assert_eq!(&buf[..3], &[1, 2, 3]);
        assert_eq!(ring.dequeue(1), &[]);
        assert_eq!(ring.dequeue_into(&mut buf), 0);
    }

    #[test]
    fn auto_expand_keeps_order() {
        let mut ring = RingBuffer::new(4);
        ring.set_auto_expand(true);
        ring.enqueue(&[0, 1, 2]);
        ring.dequeue(2);
        // The queued byte now sits in the middle, enqueue wraps before expanding.
        assert_eq!(ring.enqueue(&[3, 4, 5]), 3);
        assert_eq!(ring.capacity(), 4);

        let data: Vec<u8> = (6..40).collect();
        assert_eq!(ring.enqueue(&data), data.len());
        assert_eq!(ring.capacity(), 64);
        let mut expected = vec![2, 3, 4, 5];
        expected.extend_from_slice(&data);
        assert_eq!(ring.to_vec(), expected);
        assert_eq!(ring.dequeue_all(), expected);
    }

    #[test]
    fn expand_from_zero() {
        let mut ring = RingBuffer::new(0);
        assert_eq!(ring.enqueue(&[1]), 0);
        ring.set_auto_expand(true);
        assert_eq!(ring.enqueue(&[1, 2, 3]), 3);
        assert!(ring.capacity() >= 3);
        assert_eq!(ring.dequeue_all(), &[1, 2, 3]);
    }

    #[test]
    fn clear_resets() {
        let mut ring = RingBuffer::new(4);
        ring.enqueue(&[1, 2, 3]);
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.capacity(), 4);
        assert_eq!(ring.enqueue(&[4, 5, 6, 7]), 4);
        assert_eq!(ring.dequeue_all(), &[4, 5, 6, 7]);
    }
}
