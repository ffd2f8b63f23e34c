pub(crate) const NIL: usize = usize::MAX;

/// Half-open `[start, end)` covered by one arena slot, with the slots of its
/// two halves (`NIL` for leaves).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Span {
    pub start: usize,
    pub end: usize,
    pub left: usize,
    pub right: usize,
}

impl Span {
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline(always)]
    pub fn is_leaf(&self) -> bool {
        self.end - self.start == 1
    }

    #[inline(always)]
    pub fn mid(&self) -> usize {
        (self.start + self.end) / 2
    }

    #[inline(always)]
    pub fn matches(&self, start: usize, end: usize) -> bool {
        self.start == start && self.end == end
    }

    #[inline(always)]
    pub fn contains(&self, start: usize, end: usize) -> bool {
        self.start <= start && start < end && end <= self.end
    }
}

/// Lays out the tree over `[0, n)`: root in slot 0, children allocated in
/// pairs so every child sits after its parent. Uses `2n - 1` of `2n` slots.
pub(crate) fn layout(n: usize) -> Vec<Span> {
    let mut spans = Vec::with_capacity(2 * n);
    if n == 0 {
        return spans;
    }
    spans.push(Span {
        start: 0,
        end: n,
        left: NIL,
        right: NIL,
    });

    // Slots are split in allocation order, so the cursor doubles as the queue.
    let mut cursor = 0;
    while cursor < spans.len() {
        let span = spans[cursor];
        if !span.is_leaf() {
            let mid = span.mid();
            let left = spans.len();
            spans.push(Span {
                start: span.start,
                end: mid,
                left: NIL,
                right: NIL,
            });
            spans.push(Span {
                start: mid,
                end: span.end,
                left: NIL,
                right: NIL,
            });
            spans[cursor].left = left;
            spans[cursor].right = left + 1;
        }
        cursor += 1;
    }

    debug_assert_eq!(spans.len(), 2 * n - 1);
    spans
}
