//! Experience replay memory for DQN training
//!
//! A bounded FIFO of transitions. Once full, every push evicts the oldest
//! transition. Batches are drawn uniformly without replacement.

use std::collections::VecDeque;

use rand::{seq::index, Rng};

use super::observation::Observation;
use crate::error::ConfigError;
use crate::game::RelativeAction;

/// One step of experience
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Observation before acting
    pub state: Observation,
    /// Action taken
    pub action: RelativeAction,
    /// Reward received
    pub reward: f32,
    /// Observation after acting
    pub next_state: Observation,
    /// Whether the step ended the episode
    pub done: bool,
}

/// Bounded replay memory
///
/// # Example
///
/// ```rust
/// use dqn_snake::game::RelativeAction;
/// use dqn_snake::rl::{ReplayMemory, Transition};
///
/// let mut memory = ReplayMemory::new(2).unwrap();
/// for reward in [1.0, 2.0, 3.0] {
///     memory.push(Transition {
///         state: [0.0; 11],
///         action: RelativeAction::Straight,
///         reward,
///         next_state: [0.0; 11],
///         done: false,
///     });
/// }
///
/// assert_eq!(memory.len(), 2);
/// assert_eq!(memory.iter().next().unwrap().reward, 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct ReplayMemory {
    transitions: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayMemory {
    /// Create an empty memory holding at most `capacity` transitions
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        Ok(Self {
            transitions: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
        })
    }

    /// Append a transition, evicting the oldest one when full
    pub fn push(&mut self, transition: Transition) {
        if self.transitions.len() == self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Draw up to `batch_size` distinct transitions uniformly at random
    ///
    /// Returns `min(batch_size, len)` transitions; the memory is unchanged.
    pub fn sample<R: Rng + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Vec<&Transition> {
        let amount = batch_size.min(self.transitions.len());

        index::sample(rng, self.transitions.len(), amount)
            .into_iter()
            .map(|i| &self.transitions[i])
            .collect()
    }

    /// Every stored transition, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    /// Every stored transition collected into a batch
    pub fn all(&self) -> Vec<&Transition> {
        self.transitions.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    fn transition(reward: f32) -> Transition {
        Transition {
            state: [0.0; 11],
            action: RelativeAction::Straight,
            reward,
            next_state: [1.0; 11],
            done: false,
        }
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(ReplayMemory::new(0).err(), Some(ConfigError::ZeroCapacity));
    }

    #[test]
    fn test_push_within_capacity() {
        let mut memory = ReplayMemory::new(10).unwrap();
        assert!(memory.is_empty());

        memory.push(transition(1.0));
        memory.push(transition(2.0));

        assert_eq!(memory.len(), 2);
    }

    #[test]
    fn test_fifo_eviction() {
        let mut memory = ReplayMemory::new(3).unwrap();

        for i in 0..5 {
            memory.push(transition(i as f32));
        }

        assert_eq!(memory.len(), 3);
        let rewards: Vec<f32> = memory.iter().map(|t| t.reward).collect();
        assert_eq!(rewards, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_len_never_exceeds_capacity() {
        let mut memory = ReplayMemory::new(7).unwrap();

        for i in 0..100 {
            memory.push(transition(i as f32));
            assert_eq!(memory.len(), (i + 1).min(7));
        }
    }

    #[test]
    fn test_sample_without_duplicates() {
        let mut memory = ReplayMemory::new(100).unwrap();
        for i in 0..50 {
            memory.push(transition(i as f32));
        }
        let mut rng = StdRng::seed_from_u64(17);

        let batch = memory.sample(20, &mut rng);

        assert_eq!(batch.len(), 20);
        let unique: HashSet<u32> = batch.iter().map(|t| t.reward as u32).collect();
        assert_eq!(unique.len(), 20);
    }

    #[test]
    fn test_sample_larger_than_memory() {
        let mut memory = ReplayMemory::new(100).unwrap();
        for i in 0..5 {
            memory.push(transition(i as f32));
        }
        let mut rng = StdRng::seed_from_u64(3);

        let batch = memory.sample(1000, &mut rng);

        assert_eq!(batch.len(), 5);
        assert_eq!(memory.len(), 5);

        // Every stored transition exactly once
        let mut rewards: Vec<i32> = batch.iter().map(|t| t.reward as i32).collect();
        rewards.sort_unstable();
        assert_eq!(rewards, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_sample_empty_memory() {
        let memory = ReplayMemory::new(4).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        assert!(memory.sample(10, &mut rng).is_empty());
        assert!(memory.all().is_empty());
    }
}
