//! Incremental pathfinding: queue path requests now, compute them a few at a
//! time as the host ticks.
//!
//! - [`RequestQueue`] holds pending requests for one node kind and their
//!   success/failure continuations, and services them strictly in arrival
//!   order.
//! - [`TickScheduler`] drains a queue in bounded batches from the host's
//!   per-frame update, so no single tick pays for every pending search.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use waypath_paths::{NodeGraph, Waypoint};
//! use waypath_sched::{RequestQueue, SchedulerConfig, TickScheduler};
//!
//! let mut graph = NodeGraph::new();
//! let a = graph.add(Waypoint::new([0.0, 0.0, 0.0]));
//! let b = graph.add(Waypoint::new([1.0, 0.0, 0.0]));
//! graph.connect(a, b);
//!
//! let queue = RequestQueue::default();
//! let found = Rc::new(RefCell::new(None));
//! let sink = Rc::clone(&found);
//! queue.enqueue_on_success(a, b, move |path| *sink.borrow_mut() = Some(path));
//!
//! let mut scheduler = TickScheduler::new(SchedulerConfig::default()).unwrap();
//! scheduler.tick(&queue, &mut graph); // warm-up
//! scheduler.tick(&queue, &mut graph);
//! assert_eq!(*found.borrow(), Some(vec![b]));
//! ```

mod request;
mod scheduler;

pub use request::RequestQueue;
pub use scheduler::{ConfigError, SchedulerConfig, SchedulerStatus, TickScheduler};
