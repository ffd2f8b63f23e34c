use std::fmt;
use std::marker::PhantomData;
use std::ops::RangeBounds;

use tracing::debug;

use crate::arena::{Span, layout};
use crate::error::{Result, check_position, check_start, normalize_range};
use crate::policy::Aggregate;

#[derive(Clone, Copy, Debug)]
struct Node {
    span: Span,
    agg: i64,
}

/// Segment tree with point assignment and range folding under `P`.
pub struct SegmentTree<P: Aggregate> {
    nodes: Vec<Node>,
    len: usize,
    _policy: PhantomData<P>,
}

impl<P: Aggregate> Clone for SegmentTree<P> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            len: self.len,
            _policy: PhantomData,
        }
    }
}

impl<P: Aggregate> fmt::Debug for SegmentTree<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentTree")
            .field("len", &self.len)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

impl<P: Aggregate> SegmentTree<P> {
    pub fn new(values: &[i64]) -> Self {
        let len = values.len();
        let mut nodes = layout(len)
            .into_iter()
            .map(|span| Node {
                span,
                agg: P::identity(),
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

        debug!(len, nodes = nodes.len(), "built segment tree");
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
    pub fn fold_all(&self) -> Option<i64> {
        self.nodes.first().map(|root| root.agg)
    }

    pub fn get(&self, position: usize) -> Result<i64> {
        self.query(position..position.saturating_add(1))
    }

    pub fn query<R: RangeBounds<usize>>(&self, range: R) -> Result<i64> {
        let range = normalize_range(range, self.len)?;
        Ok(self.fold_at(0, range.start, range.end))
    }

    pub fn set(&mut self, position: usize, value: i64) -> Result<()> {
        check_position(position, self.len)?;
        self.set_at(0, position, value);
        Ok(())
    }

    pub fn to_vec(&self) -> Vec<i64> {
        let mut values = vec![0; self.len];
        for node in &self.nodes {
            if node.span.is_leaf() {
                values[node.span.start] = node.agg;
            }
        }
        values
    }

    /// Largest `end` with `pred(fold(start..end))`, `pred` monotone and true
    /// on the identity.
    pub fn max_right<F>(&self, start: usize, mut pred: F) -> Result<usize>
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

    // `[start, end)` must lie inside the node; halves are clipped at `mid`
    // so every branch bottoms out on an exact match.
    fn fold_at(&self, id: usize, start: usize, end: usize) -> i64 {
        let node = &self.nodes[id];
        debug_assert!(node.span.contains(start, end));
        if node.span.matches(start, end) {
            return node.agg;
        }

        let mid = node.span.mid();
        if start >= mid {
            self.fold_at(node.span.right, start, end)
        } else if end <= mid {
            self.fold_at(node.span.left, start, end)
        } else {
            P::combine(
                self.fold_at(node.span.left, start, mid),
                self.fold_at(node.span.right, mid, end),
            )
        }
    }

    fn set_at(&mut self, id: usize, position: usize, value: i64) {
        let span = self.nodes[id].span;
        debug_assert!(span.contains(position, position + 1));
        if span.is_leaf() {
            self.nodes[id].agg = value;
            return;
        }

        if position >= span.mid() {
            self.set_at(span.right, position, value);
        } else {
            self.set_at(span.left, position, value);
        }
        self.nodes[id].agg = P::combine(self.nodes[span.left].agg, self.nodes[span.right].agg);
    }

    // Returns the first position whose inclusion fails `pred`, or `None` if
    // the part of this node at or after `start` is absorbed into `acc`.
    fn max_right_at<F>(&self, id: usize, start: usize, acc: &mut i64, pred: &mut F) -> Option<usize>
    where
        F: FnMut(i64) -> bool,
    {
        let node = &self.nodes[id];
        if node.span.end <= start {
            return None;
        }
        if start <= node.span.start {
            let next = P::combine(*acc, node.agg);
            if pred(next) {
                *acc = next;
                return None;
            }
            if node.span.is_leaf() {
                return Some(node.span.start);
            }
        }

        let span = node.span;
        self.max_right_at(span.left, start, acc, pred)
            .or_else(|| self.max_right_at(span.right, start, acc, pred))
    }
}
