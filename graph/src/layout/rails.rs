use smallvec::SmallVec;
use std::collections::HashMap;

/// A rail is a vertical column in the graph
pub type Rail = usize;

/// Rails waiting for one hash. Almost always one or two.
type Waiters = SmallVec<[Rail; 2]>;

/// Assigns commits to rails while walking a children-before-parents list.
///
/// Strategy:
/// - `place`: the leftmost rail expecting the commit wins and every other
///   rail expecting it is released; a commit nobody expects takes the first
///   free rail
/// - `advance`: the first parent continues on the commit's rail; every other
///   parent opens the first free rail
#[derive(Debug, Default)]
pub struct RailAllocator {
    /// Per-rail hash expected next; `None` is a free rail
    active: Vec<Option<String>>,
    /// Hash -> rails waiting for it
    expected: HashMap<String, Waiters>,
    /// Highest rail index handed out so far
    max_rail: Option<Rail>,
}

impl RailAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a rail for the given commit hash
    pub fn place(&mut self, hash: &str) -> Rail {
        let rail = match self.expected.remove(hash) {
            Some(waiters) => {
                let rail = waiters.iter().copied().min().unwrap_or_default();
                // Converging rails collapse into the chosen one
                for &other in waiters.iter().filter(|&&r| r != rail) {
                    self.release(other);
                }
                rail
            }
            None => self.first_free(),
        };

        self.touch(rail);
        rail
    }

    /// After placing a commit on `rail`, advance rails to its parents
    pub fn advance(&mut self, rail: Rail, parents: &[String]) {
        let Some((first, rest)) = parents.split_first() else {
            self.release(rail);
            return;
        };

        self.reserve(rail, first);

        for parent in rest {
            let merge_rail = self.first_free();
            self.reserve(merge_rail, parent);
        }
    }

    /// One more than the highest rail used so far
    pub fn rail_count(&self) -> usize {
        self.max_rail.map_or(0, |max| max + 1)
    }

    /// Rails currently reserved for a hash
    pub fn active_rails(&self) -> usize {
        self.active.iter().filter(|slot| slot.is_some()).count()
    }

    /// Smallest rail index not currently reserved
    fn first_free(&self) -> Rail {
        self.active
            .iter()
            .position(Option::is_none)
            .unwrap_or(self.active.len())
    }

    fn reserve(&mut self, rail: Rail, hash: &str) {
        if rail >= self.active.len() {
            self.active.resize(rail + 1, None);
        }
        self.active[rail] = Some(hash.to_string());
        self.expected.entry(hash.to_string()).or_default().push(rail);
        self.touch(rail);
    }

    fn release(&mut self, rail: Rail) {
        if let Some(slot) = self.active.get_mut(rail) {
            *slot = None;
        }
    }

    fn touch(&mut self, rail: Rail) {
        self.max_rail = Some(self.max_rail.map_or(rail, |max| max.max(rail)));
    }
}
