//! Training statistics for the DQN agent
//!
//! Keeps the full per-game score history (for plotting) alongside rolling
//! windows of recent scores, episode lengths and losses.

use std::collections::VecDeque;

/// Training statistics tracker
///
/// # Example
///
/// ```rust
/// use dqn_snake::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(100);
/// stats.record_episode(4, 120);
/// stats.record_episode(2, 80);
/// stats.record_loss(0.5);
///
/// assert_eq!(stats.scores(), &[4, 2]);
/// assert_eq!(stats.mean_scores(), &[4.0, 3.0]);
/// assert_eq!(stats.record(), 4);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Every episode score, in order
    scores: Vec<u32>,

    /// Running mean score after each episode
    mean_scores: Vec<f32>,

    /// Recent scores (rolling window)
    recent_scores: VecDeque<u32>,

    /// Recent episode lengths in frames (rolling window)
    episode_lengths: VecDeque<u32>,

    /// Recent training losses (rolling window)
    losses: VecDeque<f32>,

    last_loss: Option<f32>,
    total_score: u64,
    record: u32,
    total_steps: u64,

    /// Window size for rolling averages
    window_size: usize,
}

impl TrainingStats {
    /// Create a tracker whose rolling windows hold `window_size` values
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            scores: Vec::new(),
            mean_scores: Vec::new(),
            recent_scores: VecDeque::with_capacity(window_size),
            episode_lengths: VecDeque::with_capacity(window_size),
            losses: VecDeque::with_capacity(window_size),
            last_loss: None,
            total_score: 0,
            record: 0,
            total_steps: 0,
            window_size,
        }
    }

    /// Record the end of an episode
    pub fn record_episode(&mut self, score: u32, length: u32) {
        self.scores.push(score);
        self.total_score += score as u64;
        self.record = self.record.max(score);
        self.total_steps += length as u64;
        self.mean_scores.push(self.mean_score());

        Self::push_deque(&mut self.recent_scores, score, self.window_size);
        Self::push_deque(&mut self.episode_lengths, length, self.window_size);
    }

    /// Record the loss of a training update
    pub fn record_loss(&mut self, loss: f32) {
        self.last_loss = Some(loss);
        Self::push_deque(&mut self.losses, loss, self.window_size);
    }

    /// Mean score over every episode so far (total / games)
    pub fn mean_score(&self) -> f32 {
        if self.scores.is_empty() {
            0.0
        } else {
            self.total_score as f32 / self.scores.len() as f32
        }
    }

    /// Mean score over the rolling window
    pub fn mean_recent_score(&self) -> f32 {
        if self.recent_scores.is_empty() {
            0.0
        } else {
            self.recent_scores.iter().sum::<u32>() as f32 / self.recent_scores.len() as f32
        }
    }

    /// Mean episode length over the rolling window
    pub fn mean_episode_length(&self) -> f32 {
        if self.episode_lengths.is_empty() {
            0.0
        } else {
            self.episode_lengths.iter().sum::<u32>() as f32 / self.episode_lengths.len() as f32
        }
    }

    /// Mean loss over the rolling window
    pub fn mean_loss(&self) -> f32 {
        if self.losses.is_empty() {
            0.0
        } else {
            self.losses.iter().sum::<f32>() / self.losses.len() as f32
        }
    }

    pub fn last_loss(&self) -> Option<f32> {
        self.last_loss
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn mean_scores(&self) -> &[f32] {
        &self.mean_scores
    }

    /// Best score so far
    pub fn record(&self) -> u32 {
        self.record
    }

    pub fn total_episodes(&self) -> usize {
        self.scores.len()
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// One-line summary of the current statistics
    pub fn format_summary(&self) -> String {
        format!(
            "Games: {} | Record: {} | Mean: {:.2} | Recent: {:.2} | Len: {:.1} | Loss: {:.4}",
            self.total_episodes(),
            self.record,
            self.mean_score(),
            self.mean_recent_score(),
            self.mean_episode_length(),
            self.mean_loss(),
        )
    }

    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let stats = TrainingStats::new(100);
        assert_eq!(stats.window_size(), 100);
        assert_eq!(stats.total_episodes(), 0);
        assert_eq!(stats.total_steps(), 0);
        assert_eq!(stats.last_loss(), None);
    }

    #[test]
    fn test_running_mean_history() {
        let mut stats = TrainingStats::new(100);
        stats.record_episode(2, 10);
        stats.record_episode(4, 20);
        stats.record_episode(0, 5);

        assert_eq!(stats.scores(), &[2, 4, 0]);
        assert_eq!(stats.mean_scores(), &[2.0, 3.0, 2.0]);
        assert!((stats.mean_score() - 2.0).abs() < 1e-5);
        assert_eq!(stats.record(), 4);
        assert_eq!(stats.total_steps(), 35);
    }

    #[test]
    fn test_rolling_average() {
        let mut stats = TrainingStats::new(3);

        stats.record_episode(1, 10);
        stats.record_episode(2, 20);
        stats.record_episode(3, 30);
        assert!((stats.mean_recent_score() - 2.0).abs() < 1e-5);

        // Fourth episode evicts the first
        stats.record_episode(4, 40);
        assert!((stats.mean_recent_score() - 3.0).abs() < 1e-5);
        assert!((stats.mean_episode_length() - 30.0).abs() < 1e-5);
        // Running mean still covers everything
        assert!((stats.mean_score() - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_loss_window() {
        let mut stats = TrainingStats::new(2);

        stats.record_loss(0.1);
        stats.record_loss(0.2);
        assert!((stats.mean_loss() - 0.15).abs() < 1e-5);

        stats.record_loss(0.3);
        assert!((stats.mean_loss() - 0.25).abs() < 1e-5);
        assert_eq!(stats.last_loss(), Some(0.3));
    }

    #[test]
    fn test_format_summary() {
        let mut stats = TrainingStats::new(100);
        stats.record_episode(5, 150);
        stats.record_loss(0.02);

        let summary = stats.format_summary();
        assert!(summary.contains("Games: 1"));
        assert!(summary.contains("Record: 5"));
        assert!(summary.contains("Mean: 5.00"));
        assert!(summary.contains("Len: 150.0"));
        assert!(summary.contains("Loss: 0.0200"));
    }

    #[test]
    fn test_empty_stats() {
        let stats = TrainingStats::new(100);

        assert_eq!(stats.mean_score(), 0.0);
        assert_eq!(stats.mean_recent_score(), 0.0);
        assert_eq!(stats.mean_episode_length(), 0.0);
        assert_eq!(stats.mean_loss(), 0.0);
        assert!(stats.scores().is_empty());
    }
}
