//! FIFO of pending path requests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;

use waypath_paths::{GraphNode, NodeGraph, NodeId, SearchOptions};

/// Continuation receiving the computed path.
type PathCallback = Box<dyn FnOnce(Vec<NodeId>)>;

/// A path that has been asked for but not computed yet.
struct PathRequest {
    origin: NodeId,
    destination: NodeId,
    on_success: PathCallback,
    on_failure: PathCallback,
}

/// Marks the queue as busy for as long as it lives.
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Queue of path requests for one kind of graph node, serviced in arrival
/// order.
///
/// All methods take `&self`, so a continuation holding an `Rc` to its queue
/// may enqueue follow-up requests. Calling [`compute_next`](Self::compute_next)
/// from inside a continuation does nothing and returns `false`.
pub struct RequestQueue<N> {
    pending: RefCell<VecDeque<PathRequest>>,
    computing: Cell<bool>,
    options: SearchOptions,
    _node: PhantomData<fn(&N)>,
}

impl<N> fmt::Debug for RequestQueue<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestQueue")
            .field("pending", &self.pending.borrow().len())
            .field("computing", &self.computing.get())
            .field("options", &self.options)
            .finish()
    }
}

impl<N: GraphNode> Default for RequestQueue<N> {
    fn default() -> Self {
        Self::new(SearchOptions::default())
    }
}

impl<N: GraphNode> RequestQueue<N> {
    /// Create an empty queue whose searches use `options`.
    pub fn new(options: SearchOptions) -> Self {
        Self {
            pending: RefCell::new(VecDeque::new()),
            computing: Cell::new(false),
            options,
            _node: PhantomData,
        }
    }

    /// Options every search run by this queue uses.
    #[inline]
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Ask for a path from `origin` to `destination`.
    ///
    /// `on_success` receives the path (origin excluded) once it is found;
    /// `on_failure` receives an empty path if the search gives up.
    pub fn enqueue(
        &self,
        origin: NodeId,
        destination: NodeId,
        on_success: impl FnOnce(Vec<NodeId>) + 'static,
        on_failure: impl FnOnce(Vec<NodeId>) + 'static,
    ) {
        log::trace!("path request {origin} -> {destination} queued");
        self.pending.borrow_mut().push_back(PathRequest {
            origin,
            destination,
            on_success: Box::new(on_success),
            on_failure: Box::new(on_failure),
        });
    }

    /// Ask for a path when only success matters. A failed search is dropped
    /// after being logged.
    pub fn enqueue_on_success(
        &self,
        origin: NodeId,
        destination: NodeId,
        on_success: impl FnOnce(Vec<NodeId>) + 'static,
    ) {
        self.enqueue(origin, destination, on_success, |_| {});
    }

    /// Compute the oldest pending request and run its continuation.
    ///
    /// Returns `false` without doing anything if the queue is empty or a
    /// computation is already running.
    pub fn compute_next(&self, graph: &mut NodeGraph<N>) -> bool {
        if self.computing.get() {
            log::trace!("compute_next called while a path is being computed");
            return false;
        }
        let _busy = InFlight::enter(&self.computing);

        let next = self.pending.borrow_mut().pop_front();
        let Some(request) = next else {
            return false;
        };

        let result = graph.astar(request.origin, request.destination, &self.options);
        if result.found() {
            log::trace!(
                "path {} -> {} computed ({} steps)",
                request.origin,
                request.destination,
                result.path.len()
            );
            (request.on_success)(result.path);
        } else {
            log::debug!(
                "path {} -> {} failed: {:?}",
                request.origin,
                request.destination,
                result.termination
            );
            (request.on_failure)(result.path);
        }
        true
    }

    /// Compute up to `budget` requests, stopping early once the queue is
    /// drained. Returns how many were computed.
    pub fn compute_batch(&self, graph: &mut NodeGraph<N>, budget: u32) -> u32 {
        let mut computed = 0;
        while computed < budget && self.compute_next(graph) {
            computed += 1;
        }
        computed
    }

    /// Number of requests waiting to be computed.
    #[inline]
    pub fn queue_size(&self) -> usize {
        self.pending.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Whether a request is being computed right now.
    #[inline]
    pub fn is_computing(&self) -> bool {
        self.computing.get()
    }
}
