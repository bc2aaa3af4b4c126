//! The traversal engine.
//!
//! A [`Walker`] holds three hooks (enter, leave, children) and a
//! [`WalkConfig`]. Each call to [`Walker::walk`] runs one depth-first
//! traversal below a root node:
//!
//! 1. The root's children are requested; the root itself is never entered.
//! 2. Each child is entered, its own children are walked, then it is left.
//! 3. Signals returned by the hooks abort the walk, skip a node's children,
//!    or cut the remaining siblings short.
//!
//! Open sibling lists live on an explicit stack of frames rather than in
//! recursive calls, so tree depth only costs heap memory.

use std::fmt;
use std::vec;

use futures_util::future::LocalBoxFuture;
use tracing::{debug, trace};

use crate::{Children, Signal, WalkConfig, WalkOutcome};

/// Future returned by asynchronous hooks.
pub type HookFuture<'a, T, E> = LocalBoxFuture<'a, Result<T, E>>;

/// A user-supplied hook, or the built-in default.
enum Hook<'w, N, C, T, E> {
    /// Immediately yields `T::default()`.
    Default,
    /// Built-in function of the node itself, such as [`Children::children`].
    Builtin(fn(&N) -> T),
    Sync(Box<dyn Fn(&N, &mut C) -> Result<T, E> + 'w>),
    Async(Box<dyn for<'a> Fn(&'a N, &'a mut C) -> HookFuture<'a, T, E> + 'w>),
}

impl<N, C, T: Default, E> Hook<'_, N, C, T, E> {
    async fn call(&self, node: &N, ctx: &mut C) -> Result<T, E> {
        match self {
            Hook::Default => Ok(T::default()),
            Hook::Builtin(f) => Ok(f(node)),
            Hook::Sync(f) => f(node, ctx),
            Hook::Async(f) => f(node, ctx).await,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Hook::Default | Hook::Builtin(_) => "default",
            Hook::Sync(_) => "sync",
            Hook::Async(_) => "async",
        }
    }
}

/// A node whose children are being walked.
struct OpenNode<N> {
    node: N,
    /// Set when enter signaled [`Signal::SkipSiblings`].
    skip_latched: bool,
}

/// One sibling list on the traversal stack.
struct Frame<N> {
    pending: vec::IntoIter<N>,
    /// `None` only for the root's children.
    parent: Option<OpenNode<N>>,
}

impl<N> Frame<N> {
    fn new(children: Vec<N>, parent: Option<OpenNode<N>>) -> Self {
        Self {
            pending: children.into_iter(),
            parent,
        }
    }

    /// Drops every sibling not yet visited.
    fn cut(&mut self) {
        self.pending = Vec::new().into_iter();
    }
}

/// Per-walk counters, reported in logs.
#[derive(Debug, Default)]
struct WalkCounts {
    entered: usize,
    left: usize,
    max_depth: usize,
}

/// Asynchronous depth-first tree walker.
///
/// Type parameters:
/// - `N`: the node type. Borrowed trees use a reference type such as
///   `&serde_json::Value`.
/// - `C`: caller-owned context passed as `&mut C` to every hook.
/// - `E`: the hooks' error type. A failing hook fails the walk with exactly
///   this error.
///
/// A walker holds no per-traversal state and can be reused.
///
/// The hooks take `&N`, which makes the walker invariant in `N`. A walker
/// over borrowed nodes (`N = &'t T`) can therefore only walk trees that
/// already exist when it is built, and that outlive it. Build it after the
/// trees it walks, or use an owned node type (an index into an arena, an
/// `Rc<T>`) for a long-lived walker.
///
/// # Example
///
/// ```rust
/// use serde_json::{Value, json};
/// use treewalker::{Signal, WalkOutcome, Walker};
///
/// # tokio_test_block_on(async {
/// let tree = json!({ "children": [{ "id": "a", "children": [{ "id": "a1" }] }, { "id": "b" }] });
///
/// let walker = Walker::<&Value, Vec<String>, std::convert::Infallible>::builder()
///     .on_enter_sync(|node, seen| {
///         seen.push(node["id"].as_str().unwrap_or_default().to_string());
///         Ok(Signal::Continue)
///     })
///     .build();
///
/// let mut seen = Vec::new();
/// let outcome = walker.walk(&&tree, &mut seen).await;
/// assert_eq!(outcome, Ok(WalkOutcome::Completed));
/// assert_eq!(seen, ["a", "a1", "b"]);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub struct Walker<'w, N, C = (), E = std::convert::Infallible> {
    enter: Hook<'w, N, C, Signal, E>,
    leave: Hook<'w, N, C, Signal, E>,
    children: Hook<'w, N, C, Vec<N>, E>,
    config: WalkConfig,
}

impl<'w, N, C, E> Walker<'w, N, C, E>
where
    N: Children + 'w,
    C: 'w,
    E: 'w,
{
    /// Creates a walker with default hooks: enter and leave always continue,
    /// children come from [`Children`].
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts building a walker whose children come from [`Children`].
    pub fn builder() -> WalkerBuilder<'w, N, C, E> {
        WalkerBuilder::default()
    }
}

impl<'w, N, C, E> Default for Walker<'w, N, C, E>
where
    N: Children + 'w,
    C: 'w,
    E: 'w,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'w, N, C, E> Walker<'w, N, C, E> {
    /// Starts building a walker with an asynchronous children hook.
    pub fn builder_with_children<F>(children: F) -> WalkerBuilder<'w, N, C, E>
    where
        F: for<'a> Fn(&'a N, &'a mut C) -> HookFuture<'a, Vec<N>, E> + 'w,
    {
        WalkerBuilder::from_children(Hook::Async(Box::new(children)))
    }

    /// Starts building a walker with a synchronous children hook.
    pub fn builder_with_children_sync<F>(children: F) -> WalkerBuilder<'w, N, C, E>
    where
        F: Fn(&N, &mut C) -> Result<Vec<N>, E> + 'w,
    {
        WalkerBuilder::from_children(Hook::Sync(Box::new(children)))
    }

    /// Returns the configuration.
    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Walks every descendant of `root`.
    ///
    /// `root` is a container: it is passed to the children hook but never
    /// entered or left.
    ///
    /// Returns [`WalkOutcome::Aborted`] if any hook signaled
    /// [`Signal::Abort`], [`WalkOutcome::Completed`] otherwise. The first hook
    /// error ends the walk and is returned unchanged.
    pub async fn walk(&self, root: &N, ctx: &mut C) -> Result<WalkOutcome, E> {
        debug!(
            max_depth = ?self.config.max_depth,
            enter = self.enter.kind(),
            leave = self.leave.kind(),
            children = self.children.kind(),
            "Starting walk"
        );

        let mut counts = WalkCounts::default();
        let result = self.run(root, ctx, &mut counts).await;

        match &result {
            Ok(outcome) => debug!(
                ?outcome,
                entered = counts.entered,
                left = counts.left,
                max_depth = counts.max_depth,
                "Walk finished"
            ),
            Err(_) => debug!(
                entered = counts.entered,
                left = counts.left,
                "Walk failed in a hook"
            ),
        }

        result
    }

    /// Walks `root`, then calls `on_complete` if the walk did not fail.
    ///
    /// The callback runs for both [`WalkOutcome::Completed`] and
    /// [`WalkOutcome::Aborted`], with the walker and the context.
    pub async fn walk_with_callback<F>(
        &self,
        root: &N,
        ctx: &mut C,
        on_complete: F,
    ) -> Result<WalkOutcome, E>
    where
        F: FnOnce(&Self, &mut C),
    {
        let outcome = self.walk(root, ctx).await?;
        on_complete(self, ctx);
        Ok(outcome)
    }

    async fn run(
        &self,
        root: &N,
        ctx: &mut C,
        counts: &mut WalkCounts,
    ) -> Result<WalkOutcome, E> {
        if self.config.stops_at(0) {
            trace!("Depth limit 0, nothing to visit");
            return Ok(WalkOutcome::Completed);
        }

        let roots = self.children.call(root, ctx).await?;
        let mut stack = vec![Frame::new(roots, None)];

        while let Some(frame) = stack.last_mut() {
            let Some(node) = frame.pending.next() else {
                // Sibling list exhausted (or cut): leave its parent.
                let Some(Frame {
                    parent: Some(open), ..
                }) = stack.pop()
                else {
                    continue;
                };

                let depth = stack.len();
                match self.leave_node(&open, depth, ctx, counts).await? {
                    Signal::Abort => return Ok(WalkOutcome::Aborted),
                    Signal::SkipSiblings => {
                        if let Some(enclosing) = stack.last_mut() {
                            enclosing.cut();
                        }
                    }
                    Signal::Continue | Signal::SkipChildren => {}
                }
                continue;
            };

            let depth = stack.len();
            counts.entered += 1;
            counts.max_depth = counts.max_depth.max(depth);

            let signal = self.enter.call(&node, ctx).await?;
            let children = match signal {
                Signal::Abort => {
                    trace!(depth, "Aborted on enter");
                    return Ok(WalkOutcome::Aborted);
                }
                Signal::SkipChildren => {
                    trace!(depth, "Skipping children");
                    Vec::new()
                }
                Signal::Continue | Signal::SkipSiblings if self.config.stops_at(depth) => {
                    trace!(depth, "Depth limit reached, not descending");
                    Vec::new()
                }
                Signal::Continue | Signal::SkipSiblings => self.children.call(&node, ctx).await?,
            };

            // A skipped or childless node still gets a frame, so its leave
            // runs through the same path as any other node's.
            let skip_latched = signal == Signal::SkipSiblings;
            stack.push(Frame::new(children, Some(OpenNode { node, skip_latched })));
        }

        Ok(WalkOutcome::Completed)
    }

    /// Runs the leave hook and resolves the node's effective signal.
    ///
    /// An abort from leave always wins. Otherwise a skip latched on enter
    /// overrides whatever leave returned.
    async fn leave_node(
        &self,
        open: &OpenNode<N>,
        depth: usize,
        ctx: &mut C,
        counts: &mut WalkCounts,
    ) -> Result<Signal, E> {
        counts.left += 1;

        let signal = match self.leave.call(&open.node, ctx).await? {
            Signal::Abort => {
                trace!(depth, "Aborted on leave");
                Signal::Abort
            }
            _ if open.skip_latched => Signal::SkipSiblings,
            signal => signal,
        };

        if signal == Signal::SkipSiblings {
            trace!(depth, latched = open.skip_latched, "Skipping siblings");
        }
        Ok(signal)
    }
}

impl<N, C, E> fmt::Debug for Walker<'_, N, C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Walker")
            .field("enter", &self.enter.kind())
            .field("leave", &self.leave.kind())
            .field("children", &self.children.kind())
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for [`Walker`].
///
/// Hooks that are not set keep their defaults: enter and leave continue,
/// children come from [`Children`] (or from the hook given to
/// [`Walker::builder_with_children`]).
pub struct WalkerBuilder<'w, N, C, E> {
    enter: Hook<'w, N, C, Signal, E>,
    leave: Hook<'w, N, C, Signal, E>,
    children: Hook<'w, N, C, Vec<N>, E>,
    config: WalkConfig,
}

impl<'w, N, C, E> Default for WalkerBuilder<'w, N, C, E>
where
    N: Children + 'w,
    C: 'w,
    E: 'w,
{
    fn default() -> Self {
        Self::from_children(Hook::Builtin(N::children))
    }
}

impl<'w, N, C, E> WalkerBuilder<'w, N, C, E> {
    fn from_children(children: Hook<'w, N, C, Vec<N>, E>) -> Self {
        Self {
            enter: Hook::Default,
            leave: Hook::Default,
            children,
            config: WalkConfig::default(),
        }
    }

    /// Sets an asynchronous enter hook.
    pub fn on_enter<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(&'a N, &'a mut C) -> HookFuture<'a, Signal, E> + 'w,
    {
        self.enter = Hook::Async(Box::new(f));
        self
    }

    /// Sets a synchronous enter hook.
    pub fn on_enter_sync<F>(mut self, f: F) -> Self
    where
        F: Fn(&N, &mut C) -> Result<Signal, E> + 'w,
    {
        self.enter = Hook::Sync(Box::new(f));
        self
    }

    /// Sets an asynchronous leave hook.
    pub fn on_leave<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(&'a N, &'a mut C) -> HookFuture<'a, Signal, E> + 'w,
    {
        self.leave = Hook::Async(Box::new(f));
        self
    }

    /// Sets a synchronous leave hook.
    pub fn on_leave_sync<F>(mut self, f: F) -> Self
    where
        F: Fn(&N, &mut C) -> Result<Signal, E> + 'w,
    {
        self.leave = Hook::Sync(Box::new(f));
        self
    }

    /// Replaces the children hook with an asynchronous one.
    pub fn children<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(&'a N, &'a mut C) -> HookFuture<'a, Vec<N>, E> + 'w,
    {
        self.children = Hook::Async(Box::new(f));
        self
    }

    /// Replaces the children hook with a synchronous one.
    pub fn children_sync<F>(mut self, f: F) -> Self
    where
        F: Fn(&N, &mut C) -> Result<Vec<N>, E> + 'w,
    {
        self.children = Hook::Sync(Box::new(f));
        self
    }

    /// Sets the configuration.
    pub fn config(mut self, config: WalkConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the maximum traversal depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = Some(depth);
        self
    }

    /// Builds the walker.
    pub fn build(self) -> Walker<'w, N, C, E> {
        Walker {
            enter: self.enter,
            leave: self.leave,
            children: self.children,
            config: self.config,
        }
    }
}
