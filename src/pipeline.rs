use std::collections::VecDeque;

/// Fixed-length FIFO of egg counts, one slot per tick of incubation.
///
/// Each tick removes exactly one count from the front (the batch due to
/// hatch) and appends exactly one count at the back (the batch laid this
/// tick), so the queue length is the species' egg-cycle length for the whole
/// run.
#[derive(Debug, Clone)]
pub struct IncubationPipeline {
    slots: VecDeque<u64>,
}

impl IncubationPipeline {
    pub fn new(cycle_len: usize) -> Self {
        Self {
            slots: VecDeque::from(vec![0; cycle_len]),
        }
    }

    /// Dequeue the batch that has finished incubating. Must be paired with a
    /// [`queue`](Self::queue) call in the same tick.
    pub fn take_due(&mut self) -> u64 {
        self.slots.pop_front().unwrap_or(0)
    }

    /// Enqueue the batch laid this tick.
    pub fn queue(&mut self, eggs_laid: u64) {
        self.slots.push_back(eggs_laid);
    }

    /// True while any slot still holds eggs that could hatch.
    pub fn has_viable_eggs(&self) -> bool {
        self.slots.iter().any(|&count| count > 0)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
