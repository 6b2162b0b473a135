//! Agents wandering a [`Lattice`], each asking for a new route whenever it
//! runs out of one.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use waypath_paths::{NodeId, Waypoint};
use waypath_sched::{RequestQueue, TickScheduler};

use crate::config::{SwarmConfig, SwarmConfigError};
use crate::lattice::Lattice;

#[derive(Debug, Clone)]
pub struct Agent {
    pub at: NodeId,
    pub route: VecDeque<NodeId>,
    /// A request for this agent is queued.
    pub waiting: bool,
}

/// Counters accumulated over a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SwarmStats {
    pub ticks: u32,
    pub requested: u32,
    pub succeeded: u32,
    pub failed: u32,
    pub steps: u32,
    /// Routes dropped because a cell on them got blocked.
    pub rerouted: u32,
    pub batches: u32,
    pub paused_ticks: u32,
}

pub struct Swarm {
    config: SwarmConfig,
    rng: StdRng,
    lattice: Lattice,
    queue: RequestQueue<Waypoint>,
    scheduler: TickScheduler,
    agents: Vec<Rc<RefCell<Agent>>>,
    stats: Rc<RefCell<SwarmStats>>,
}

impl Swarm {
    pub fn new(config: SwarmConfig) -> Result<Self, SwarmConfigError> {
        config.validate()?;
        let scheduler = TickScheduler::new(config.scheduler)?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let lattice = Lattice::generate(config.width, config.height, config.obstacle_ratio, &mut rng);

        let mut agents = Vec::with_capacity(config.agents);
        for _ in 0..config.agents {
            let Some(at) = lattice.random_open(&mut rng) else {
                log::warn!("no open cell to place agents on");
                break;
            };
            agents.push(Rc::new(RefCell::new(Agent {
                at,
                route: VecDeque::new(),
                waiting: false,
            })));
        }
        log::info!(
            "{}x{} lattice, {} agents, {} computation(s) every {} tick(s)",
            lattice.width(),
            lattice.height(),
            agents.len(),
            config.scheduler.computations_per_tick,
            config.scheduler.ticks_between_batches
        );

        Ok(Self {
            queue: RequestQueue::new(config.search),
            config,
            rng,
            lattice,
            scheduler,
            agents,
            stats: Rc::default(),
        })
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn agents(&self) -> impl Iterator<Item = Agent> + '_ {
        self.agents.iter().map(|a| a.borrow().clone())
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    pub fn pending(&self) -> usize {
        self.queue.queue_size()
    }

    pub fn stats(&self) -> SwarmStats {
        *self.stats.borrow()
    }

    /// Run the configured number of ticks.
    pub fn run(&mut self) -> SwarmStats {
        for _ in 0..self.config.ticks {
            self.step();
        }
        self.stats()
    }

    /// Advance the world by one tick.
    pub fn step(&mut self) {
        let tick = self.stats.borrow().ticks;
        if let Some((from, until)) = self.config.pause {
            if tick == from {
                self.scheduler.pause();
                log::info!("tick {tick}: scheduler {}", self.scheduler.status());
            } else if tick == until {
                self.scheduler.resume();
                log::info!("tick {tick}: scheduler {}", self.scheduler.status());
            }
        }

        if self.config.toggle_every > 0 && tick > 0 && tick % self.config.toggle_every == 0 {
            if let Some(id) = self.lattice.toggle_random(&mut self.rng) {
                log::trace!("tick {tick}: cell {id} toggled");
            }
        }

        for i in 0..self.agents.len() {
            self.move_agent(i);
        }

        if self.scheduler.is_paused() {
            self.stats.borrow_mut().paused_ticks += 1;
        }
        let batch = self.scheduler.tick(&self.queue, &mut self.lattice.graph);
        let mut stats = self.stats.borrow_mut();
        if batch.is_some() {
            stats.batches += 1;
        }
        stats.ticks += 1;
    }

    fn move_agent(&mut self, i: usize) {
        let agent = Rc::clone(&self.agents[i]);
        let mut a = agent.borrow_mut();
        if a.waiting {
            return;
        }

        if let Some(next) = a.route.pop_front() {
            if self.lattice.is_open(next) {
                a.at = next;
                self.stats.borrow_mut().steps += 1;
            } else {
                a.route.clear();
                self.stats.borrow_mut().rerouted += 1;
            }
            return;
        }

        let Some(destination) = self.lattice.random_open(&mut self.rng) else {
            return;
        };
        if destination == a.at {
            return;
        }
        a.waiting = true;
        let origin = a.at;
        drop(a);

        self.stats.borrow_mut().requested += 1;
        let (on_success, on_failure) = (Rc::clone(&agent), agent);
        let (ok_stats, failed_stats) = (Rc::clone(&self.stats), Rc::clone(&self.stats));
        self.queue.enqueue(
            origin,
            destination,
            move |path| {
                let mut a = on_success.borrow_mut();
                a.route = path.into();
                a.waiting = false;
                ok_stats.borrow_mut().succeeded += 1;
            },
            move |_| {
                on_failure.borrow_mut().waiting = false;
                failed_stats.borrow_mut().failed += 1;
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypath_sched::{SchedulerConfig, SchedulerStatus};

    fn small(agents: usize, ticks: u32) -> SwarmConfig {
        SwarmConfig {
            width: 8,
            height: 6,
            obstacle_ratio: 0.0,
            agents,
            ticks,
            seed: 42,
            ..SwarmConfig::default()
        }
    }

    #[test]
    fn open_lattice_routes_succeed() {
        let mut swarm = Swarm::new(small(4, 100)).unwrap();
        let stats = swarm.run();
        assert_eq!(stats.ticks, 100);
        assert!(stats.succeeded > 0);
        assert_eq!(stats.failed, 0);
        assert!(stats.steps > 0);
        assert_eq!(
            stats.requested,
            stats.succeeded + stats.failed + swarm.pending() as u32
        );
    }

    #[test]
    fn agents_stay_on_open_cells() {
        let mut swarm = Swarm::new(small(6, 60)).unwrap();
        swarm.run();
        for agent in swarm.agents() {
            assert!(swarm.lattice().is_open(agent.at));
        }
    }

    #[test]
    fn pause_window_holds_requests() {
        let config = SwarmConfig {
            pause: Some((0, 30)),
            ..small(3, 30)
        };
        let mut swarm = Swarm::new(config).unwrap();
        let stats = swarm.run();
        assert_eq!(stats.paused_ticks, 30);
        assert_eq!(stats.batches, 0);
        assert_eq!(stats.succeeded + stats.failed, 0);
        assert_eq!(swarm.pending(), stats.requested as usize);
        assert_eq!(swarm.scheduler().status(), SchedulerStatus::Paused);

        // Resume at tick 30, warm up, then one batch per tick.
        swarm.step();
        swarm.step();
        assert_eq!(swarm.scheduler().status(), SchedulerStatus::Running);
        assert_eq!(swarm.stats().batches, 1);
    }

    #[test]
    fn slow_scheduler_leaves_backlog() {
        let config = SwarmConfig {
            scheduler: SchedulerConfig {
                computations_per_tick: 1,
                ticks_between_batches: 10,
            },
            ..small(10, 25)
        };
        let mut swarm = Swarm::new(config).unwrap();
        let stats = swarm.run();
        // Batches fire on ticks 11 and 21.
        assert_eq!(stats.batches, 2);
        assert_eq!(stats.succeeded, 2);
        assert!(swarm.pending() > 0);
    }

    #[test]
    fn toggling_cells_keeps_counts_consistent() {
        let config = SwarmConfig {
            toggle_every: 2,
            ..small(5, 200)
        };
        let mut swarm = Swarm::new(config).unwrap();
        let stats = swarm.run();
        assert_eq!(
            stats.requested,
            stats.succeeded + stats.failed + swarm.pending() as u32
        );
    }

    #[test]
    fn same_seed_same_run() {
        let a = Swarm::new(small(5, 80)).unwrap().run();
        let b = Swarm::new(small(5, 80)).unwrap().run();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_scheduler_is_rejected() {
        let mut config = small(1, 1);
        config.scheduler.ticks_between_batches = 0;
        assert!(Swarm::new(config).is_err());
    }
}
