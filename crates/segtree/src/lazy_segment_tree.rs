use std::fmt;
use std::marker::PhantomData;
use std::ops::RangeBounds;

use tracing::debug;

use crate::arena::{Span, layout};
use crate::error::{Result, check_position, check_start, normalize_range};
use crate::policy::Aggregate;

/// `agg` summarizes the leaves under `span` before `pending` is added to
/// each of them. A node is clean when `pending == 0`.
#[derive(Clone, Copy, Debug)]
struct Node {
    span: Span,
    agg: i64,
    pending: i64,
}

impl Node {
    #[inline(always)]
    fn effective<P: Aggregate>(&self) -> i64 {
        if self.pending == 0 {
            self.agg
        } else {
            P::apply(self.agg, self.pending, self.span.len())
        }
    }
}

/// Segment tree with range add and range folding under `P`. Adds are kept
/// as pending tags and pushed down on the next visit.
pub struct LazySegmentTree<P: Aggregate> {
    nodes: Vec<Node>,
    len: usize,
    _policy: PhantomData<P>,
}

impl<P: Aggregate> Clone for LazySegmentTree<P> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            len: self.len,
            _policy: PhantomData,
        }
    }
}

impl<P: Aggregate> fmt::Debug for LazySegmentTree<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dirty = self.nodes.iter().filter(|node| node.pending != 0).count();
        f.debug_struct("LazySegmentTree")
            .field("len", &self.len)
            .field("nodes", &self.nodes.len())
            .field("dirty", &dirty)
            .finish()
    }
}

impl<P: Aggregate> LazySegmentTree<P> {
    pub fn new(values: &[i64]) -> Self {
        let len = values.len();
        let mut nodes = layout(len)
            .into_iter()
            .map(|span| Node {
                span,
                agg: P::identity(),
                pending: 0,
            })
            .collect::<Vec<_>>();

        for id in (0..nodes.len()).rev() {
            let span = nodes[id].span;
            nodes[id].agg = if span.is_leaf() {
                values[span.start]
            } else {
                P::combine(nodes[span.left].agg, nodes[span.right].agg)
            };
        }

        debug!(len, nodes = nodes.len(), "built lazy segment tree");
        Self {
            nodes,
            len,
            _policy: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fold of the whole sequence, `None` when empty.
    pub fn fold_all(&mut self) -> Option<i64> {
        if self.is_empty() {
            return None;
        }
        self.push(0);
        Some(self.nodes[0].agg)
    }

    pub fn get(&mut self, position: usize) -> Result<i64> {
        self.query(position..position.saturating_add(1))
    }

    pub fn query<R: RangeBounds<usize>>(&mut self, range: R) -> Result<i64> {
        let range = normalize_range(range, self.len)?;
        Ok(self.fold_at(0, range.start, range.end))
    }

    /// Adds `delta` to every value in `range`.
    pub fn add<R: RangeBounds<usize>>(&mut self, range: R, delta: i64) -> Result<()> {
        let range = normalize_range(range, self.len)?;
        self.add_at(0, range.start, range.end, delta);
        Ok(())
    }

    pub fn set(&mut self, position: usize, value: i64) -> Result<()> {
        check_position(position, self.len)?;
        self.set_at(0, position, value);
        Ok(())
    }

    /// Pushes every pending tag down to the leaves and reads them in order.
    pub fn to_vec(&mut self) -> Vec<i64> {
        let mut values = vec![0; self.len];
        for id in 0..self.nodes.len() {
            self.push(id);
            let span = self.nodes[id].span;
            if span.is_leaf() {
                values[span.start] = self.nodes[id].agg;
            }
        }
        values
    }

    /// Largest `end` with `pred(fold(start..end))`, `pred` monotone and true
    /// on the identity.
    pub fn max_right<F>(&mut self, start: usize, mut pred: F) -> Result<usize>
    where
        F: FnMut(i64) -> bool,
    {
        check_start(start, self.len)?;
        if start == self.len {
            return Ok(start);
        }
        let mut acc = P::identity();
        Ok(self
            .max_right_at(0, start, &mut acc, &mut pred)
            .unwrap_or(self.len))
    }

    /// Folds the node's tag into its aggregate and hands it to the children.
    #[inline]
    fn push(&mut self, id: usize) {
        let node = self.nodes[id];
        if node.pending == 0 {
            return;
        }
        self.nodes[id].agg = P::apply(node.agg, node.pending, node.span.len());
        if !node.span.is_leaf() {
            self.nodes[node.span.left].pending += node.pending;
            self.nodes[node.span.right].pending += node.pending;
        }
        self.nodes[id].pending = 0;
    }

    #[inline]
    fn pull(&mut self, id: usize) {
        let span = self.nodes[id].span;
        let left = self.nodes[span.left].effective::<P>();
        let right = self.nodes[span.right].effective::<P>();
        self.nodes[id].agg = P::combine(left, right);
    }

    fn fold_at(&mut self, id: usize, start: usize, end: usize) -> i64 {
        self.push(id);
        let span = self.nodes[id].span;
        debug_assert!(span.contains(start, end));
        if span.matches(start, end) {
            return self.nodes[id].agg;
        }

        let mid = span.mid();
        if start >= mid {
            self.fold_at(span.right, start, end)
        } else if end <= mid {
            self.fold_at(span.left, start, end)
        } else {
            let left = self.fold_at(span.left, start, mid);
            let right = self.fold_at(span.right, mid, end);
            P::combine(left, right)
        }
    }

    fn add_at(&mut self, id: usize, start: usize, end: usize, delta: i64) {
        self.push(id);
        let span = self.nodes[id].span;
        debug_assert!(span.contains(start, end));
        if span.matches(start, end) {
            self.nodes[id].pending += delta;
            return;
        }

        let mid = span.mid();
        if start >= mid {
            self.add_at(span.right, start, end, delta);
        } else if end <= mid {
            self.add_at(span.left, start, end, delta);
        } else {
            self.add_at(span.left, start, mid, delta);
            self.add_at(span.right, mid, end, delta);
        }
        self.pull(id);
    }

    // Tags on the path are pushed on the way down, so the leaf is clean once
    // reached and the overwrite cannot be shadowed by a stale ancestor tag.
    fn set_at(&mut self, id: usize, position: usize, value: i64) {
        self.push(id);
        let span = self.nodes[id].span;
        debug_assert!(span.contains(position, position + 1));
        if span.is_leaf() {
            self.nodes[id].agg = value;
            self.nodes[id].pending = 0;
            return;
        }

        if position >= span.mid() {
            self.set_at(span.right, position, value);
        } else {
            self.set_at(span.left, position, value);
        }
        self.pull(id);
    }

    fn max_right_at<F>(
        &mut self,
        id: usize,
        start: usize,
        acc: &mut i64,
        pred: &mut F,
    ) -> Option<usize>
    where
        F: FnMut(i64) -> bool,
    {
        let span = self.nodes[id].span;
        if span.end <= start {
            return None;
        }
        self.push(id);
        if start <= span.start {
            let next = P::combine(*acc, self.nodes[id].agg);
            if pred(next) {
                *acc = next;
                return None;
            }
            if span.is_leaf() {
                return Some(span.start);
            }
        }

        if let Some(end) = self.max_right_at(span.left, start, acc, pred) {
            return Some(end);
        }
        self.max_right_at(span.right, start, acc, pred)
    }
}
