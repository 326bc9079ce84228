/// Tuning knobs shared by every solver spawned from one [`SolvingContext`](crate::SolvingContext).
///
/// None of these change which solutions are produced, only how quickly and with how much memory.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SolverConfig {
    pub(crate) channel_capacity: usize,
    pub(crate) search_threads: usize,
    pub(crate) validation_radius: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { channel_capacity: 64, search_threads: 0, validation_radius: 2 }
    }
}

impl SolverConfig {
    /// How many solutions a pipeline stage may buffer before its producer blocks.
    pub fn channel_capacity(&mut self, capacity: usize) -> &mut Self {
        self.channel_capacity = capacity;
        self
    }

    /// Worker threads for the goal path search. `0` lets rayon pick.
    pub fn search_threads(&mut self, threads: usize) -> &mut Self {
        self.search_threads = threads;
        self
    }

    /// Count tiles within this taxicab distance of the newest merged tile are re-checked after each merge.
    pub fn validation_radius(&mut self, radius: usize) -> &mut Self {
        self.validation_radius = radius;
        self
    }
}
