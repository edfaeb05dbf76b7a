/// Which of the two buffers of a [`BufferPair`] holds the latest result.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
    /// Written by the recurrence kernels
    Main,
    Scratch,
}

impl Slot {
    fn other(self) -> Slot {
        match self {
            Slot::Main => Slot::Scratch,
            Slot::Scratch => Slot::Main,
        }
    }
}

/// Ping-pong buffers of an engine. Every transform step reads the current buffer and writes
/// the other one, after which the roles are swapped.
#[derive(Clone, Debug)]
pub(crate) struct BufferPair {
    main: Vec<f64>,
    scratch: Vec<f64>,
    current: Slot,
}

impl BufferPair {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            main: vec![0.0; len],
            scratch: vec![0.0; len],
            current: Slot::Main,
        }
    }

    /// Length of each of the two buffers.
    pub(crate) fn len(&self) -> usize {
        self.main.len()
    }

    pub(crate) fn set_current(&mut self, slot: Slot) {
        self.current = slot;
    }

    /// Makes the other buffer current.
    pub(crate) fn swap(&mut self) {
        self.current = self.current.other();
    }

    pub(crate) fn main_mut(&mut self) -> &mut [f64] {
        &mut self.main
    }

    /// Both buffers at once, `(main, scratch)`.
    pub(crate) fn both_mut(&mut self) -> (&mut [f64], &mut [f64]) {
        (&mut self.main, &mut self.scratch)
    }

    /// The current buffer for reading and the other one for writing.
    pub(crate) fn split(&mut self) -> (&[f64], &mut [f64]) {
        match self.current {
            Slot::Main => (&self.main, &mut self.scratch),
            Slot::Scratch => (&self.scratch, &mut self.main),
        }
    }

    /// The first `n` values of the current buffer.
    pub(crate) fn view(&self, n: usize) -> &[f64] {
        match self.current {
            Slot::Main => &self.main[..n],
            Slot::Scratch => &self.scratch[..n],
        }
    }
}
