//! Tick-driven consumption of a [`RequestQueue`].

use std::fmt;

use thiserror::Error;
use waypath_paths::{GraphNode, NodeGraph};

use crate::request::RequestQueue;

/// How much pathfinding work a [`TickScheduler`] does, and how often.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SchedulerConfig {
    /// Paths computed per batch. At least 1.
    pub computations_per_tick: u32,
    /// Ticks between two batches. At least 1.
    pub ticks_between_batches: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            computations_per_tick: 1,
            ticks_between_batches: 1,
        }
    }
}

impl SchedulerConfig {
    /// Reject settings under which the scheduler would never do any work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.computations_per_tick == 0 {
            return Err(ConfigError::ZeroComputations);
        }
        if self.ticks_between_batches == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}

/// Invalid [`SchedulerConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("computations_per_tick must be at least 1")]
    ZeroComputations,
    #[error("ticks_between_batches must be at least 1")]
    ZeroInterval,
}

/// Whether a [`TickScheduler`] is doing work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulerStatus {
    Paused,
    Running,
}

impl fmt::Display for SchedulerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paused => f.write_str("Paused"),
            Self::Running => f.write_str("Running"),
        }
    }
}

/// Spreads queued path computations over the host's ticks.
///
/// Every `ticks_between_batches` ticks, up to `computations_per_tick`
/// requests are computed. The counter has to reach the interval before a
/// batch fires, so the very first tick after start (or after
/// [`resume`](Self::resume)) never does any work.
///
/// ```text
/// ticks_between_batches = 1
/// tick:     1  2  3  4
/// counter:  0  1  1  1   (before the tick)
/// batch:    -  x  x  x
/// ```
#[derive(Debug, Clone)]
pub struct TickScheduler {
    config: SchedulerConfig,
    tick_counter: u32,
    paused: bool,
}

impl TickScheduler {
    /// Create a running scheduler.
    pub fn new(config: SchedulerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            tick_counter: 0,
            paused: false,
        })
    }

    #[inline]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Ticks counted since the last batch.
    #[inline]
    pub fn tick_counter(&self) -> u32 {
        self.tick_counter
    }

    /// Advance one tick.
    ///
    /// Returns `Some(n)` if a batch ran on this tick, `n` being the number of
    /// requests it computed, and `None` otherwise.
    pub fn tick<N: GraphNode>(
        &mut self,
        queue: &RequestQueue<N>,
        graph: &mut NodeGraph<N>,
    ) -> Option<u32> {
        if self.paused {
            return None;
        }

        let mut batch = None;
        if self.tick_counter >= self.config.ticks_between_batches {
            let computed = queue.compute_batch(graph, self.config.computations_per_tick);
            if computed > 0 {
                log::trace!(
                    "batch computed {computed} path(s), {} pending",
                    queue.queue_size()
                );
            }
            batch = Some(computed);
            self.tick_counter = 0;
        }
        self.tick_counter += 1;
        batch
    }

    /// Stop starting new batches.
    pub fn pause(&mut self) {
        if !self.paused {
            log::debug!("scheduler paused");
        }
        self.paused = true;
    }

    /// Start batches again. The warm-up tick applies again after resuming.
    pub fn resume(&mut self) {
        if self.paused {
            log::debug!("scheduler resumed");
            self.tick_counter = 0;
        }
        self.paused = false;
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn status(&self) -> SchedulerStatus {
        let status = if self.paused {
            SchedulerStatus::Paused
        } else {
            SchedulerStatus::Running
        };
        log::debug!("scheduler is {status}");
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::tests::chain;
    use waypath_paths::{NodeId, Waypoint};

    fn scheduler(computations_per_tick: u32, ticks_between_batches: u32) -> TickScheduler {
        TickScheduler::new(SchedulerConfig {
            computations_per_tick,
            ticks_between_batches,
        })
        .unwrap()
    }

    fn filled_queue(ids: &[NodeId], requests: usize) -> RequestQueue<Waypoint> {
        let queue = RequestQueue::default();
        for _ in 0..requests {
            queue.enqueue_on_success(ids[0], ids[ids.len() - 1], |_| {});
        }
        queue
    }

    #[test]
    fn rejects_zero_settings() {
        let zero_work = SchedulerConfig {
            computations_per_tick: 0,
            ticks_between_batches: 1,
        };
        assert_eq!(
            TickScheduler::new(zero_work).unwrap_err(),
            ConfigError::ZeroComputations
        );
        let zero_interval = SchedulerConfig {
            computations_per_tick: 1,
            ticks_between_batches: 0,
        };
        assert_eq!(zero_interval.validate(), Err(ConfigError::ZeroInterval));
        assert!(SchedulerConfig::default().validate().is_ok());
    }

    #[test]
    fn first_tick_is_warm_up() {
        let (mut graph, ids) = chain(3);
        let queue = filled_queue(&ids, 10);
        let mut sched = scheduler(1, 1);

        assert_eq!(sched.tick(&queue, &mut graph), None);
        assert_eq!(queue.queue_size(), 10);
        assert_eq!(sched.tick(&queue, &mut graph), Some(1));
        assert_eq!(queue.queue_size(), 9);
        assert_eq!(sched.tick(&queue, &mut graph), Some(1));
        assert_eq!(queue.queue_size(), 8);
    }

    #[test]
    fn batches_follow_interval() {
        let (mut graph, ids) = chain(3);
        let queue = filled_queue(&ids, 20);
        let mut sched = scheduler(2, 3);

        let fired: Vec<bool> = (0..10)
            .map(|_| sched.tick(&queue, &mut graph).is_some())
            .collect();
        // Ticks 4, 7 and 10 fire.
        assert_eq!(
            fired,
            vec![false, false, false, true, false, false, true, false, false, true]
        );
        assert_eq!(queue.queue_size(), 20 - 3 * 2);
    }

    #[test]
    fn batch_on_empty_queue_computes_nothing() {
        let (mut graph, ids) = chain(2);
        let queue = filled_queue(&ids, 1);
        let mut sched = scheduler(5, 1);
        sched.tick(&queue, &mut graph);
        assert_eq!(sched.tick(&queue, &mut graph), Some(1));
        assert_eq!(sched.tick(&queue, &mut graph), Some(0));
    }

    #[test]
    fn pause_suppresses_work() {
        let (mut graph, ids) = chain(3);
        let queue = filled_queue(&ids, 5);
        let mut sched = scheduler(1, 1);
        assert_eq!(sched.status(), SchedulerStatus::Running);

        sched.pause();
        assert_eq!(sched.status(), SchedulerStatus::Paused);
        for _ in 0..50 {
            assert_eq!(sched.tick(&queue, &mut graph), None);
        }
        assert_eq!(sched.tick_counter(), 0);
        assert_eq!(queue.queue_size(), 5);

        sched.resume();
        assert_eq!(sched.status(), SchedulerStatus::Running);
        assert_eq!(sched.tick(&queue, &mut graph), None);
        assert_eq!(sched.tick(&queue, &mut graph), Some(1));
        assert_eq!(queue.queue_size(), 4);
    }

    #[test]
    fn resume_restarts_cadence() {
        let (mut graph, ids) = chain(3);
        let queue = filled_queue(&ids, 5);
        let mut sched = scheduler(1, 2);

        sched.tick(&queue, &mut graph);
        sched.tick(&queue, &mut graph);
        assert_eq!(sched.tick_counter(), 2);

        sched.pause();
        sched.tick(&queue, &mut graph);
        assert_eq!(sched.tick_counter(), 2);

        sched.resume();
        assert_eq!(sched.tick_counter(), 0);
        assert_eq!(sched.tick(&queue, &mut graph), None);
        assert_eq!(sched.tick(&queue, &mut graph), None);
        assert_eq!(sched.tick(&queue, &mut graph), Some(1));
    }

    #[test]
    fn resume_while_running_keeps_counter() {
        let (mut graph, ids) = chain(2);
        let queue = filled_queue(&ids, 1);
        let mut sched = scheduler(1, 3);
        sched.tick(&queue, &mut graph);
        sched.resume();
        assert_eq!(sched.tick_counter(), 1);
        assert!(!sched.is_paused());
    }

    #[test]
    fn status_display() {
        assert_eq!(SchedulerStatus::Paused.to_string(), "Paused");
        assert_eq!(SchedulerStatus::Running.to_string(), "Running");
    }
}
