/// Read/write pair for a field that is updated from its own previous values.
///
/// Exactly one slot is "read" at any time; `swap` flips the roles so the next
/// pass reads what the previous pass wrote.
#[derive(Debug, Clone)]
pub struct DoubleBuffer<T> {
    slots: [T; 2],
    read: usize,
    swaps: u64,
}

impl<T> DoubleBuffer<T> {
    pub fn new(read: T, write: T) -> Self {
        Self {
            slots: [read, write],
            read: 0,
            swaps: 0,
        }
    }

    pub fn read(&self) -> &T {
        &self.slots[self.read]
    }

    pub fn write(&self) -> &T {
        &self.slots[1 - self.read]
    }

    pub fn write_mut(&mut self) -> &mut T {
        &mut self.slots[1 - self.read]
    }

    /// Borrow the read slot and the write slot at the same time.
    pub fn split(&mut self) -> (&T, &mut T) {
        let (a, b) = self.slots.split_at_mut(1);
        if self.read == 0 {
            (&a[0], &mut b[0])
        } else {
            (&b[0], &mut a[0])
        }
    }

    pub fn swap(&mut self) {
        self.read = 1 - self.read;
        self.swaps += 1;
    }

    /// Index of the slot currently used for reading (0 or 1).
    pub fn read_index(&self) -> usize {
        self.read
    }

    pub fn swap_count(&self) -> u64 {
        self.swaps
    }

    pub fn slots(&self) -> &[T; 2] {
        &self.slots
    }
}

impl<T: Clone> DoubleBuffer<T> {
    pub fn filled(value: T) -> Self {
        Self::new(value.clone(), value)
    }
}
