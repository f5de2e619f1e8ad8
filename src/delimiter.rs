//! Pending delimiter list used while parsing the inlines of one block.
//!
//! Entries live in a vector and are chained through `prev`/`next` so that
//! removing a span keeps every other [`EntryId`] valid. Removed entries are
//! marked [`Activity::Removed`] and never handed out again.

use crate::inline::InlineId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EntryId(usize);

/// Link brackets are resolved before emphasis that encloses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Priority {
    Emphasis,
    Links,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Activity {
    Eligible,
    /// A `[` that may no longer form a link because a link was already
    /// formed after it.
    Blocked,
    Removed,
}

#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub delimiter: u8,
    /// Delimiter characters still available; unused for brackets.
    pub count: usize,
    pub can_open: bool,
    pub can_close: bool,
    /// Opened by `![`.
    pub image: bool,
    pub priority: Priority,
    /// Text node holding the delimiter run.
    pub node: InlineId,
    /// Byte offset just after an opening bracket.
    pub start: usize,
    pub activity: Activity,
    prev: Option<EntryId>,
    next: Option<EntryId>,
}

impl Entry {
    pub fn emphasis(
        delimiter: u8,
        count: usize,
        can_open: bool,
        can_close: bool,
        node: InlineId,
    ) -> Self {
        Entry {
            delimiter,
            count,
            can_open,
            can_close,
            image: false,
            priority: Priority::Emphasis,
            node,
            start: 0,
            activity: Activity::Eligible,
            prev: None,
            next: None,
        }
    }

    pub fn bracket(image: bool, node: InlineId, start: usize) -> Self {
        Entry {
            delimiter: b'[',
            count: 1,
            can_open: true,
            can_close: false,
            image,
            priority: Priority::Links,
            node,
            start,
            activity: Activity::Eligible,
            prev: None,
            next: None,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct DelimiterStack {
    entries: Vec<Entry>,
    first: Option<EntryId>,
    last: Option<EntryId>,
}

impl DelimiterStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mut entry: Entry) -> EntryId {
        let id = EntryId(self.entries.len());
        entry.prev = self.last;
        entry.next = None;
        self.entries.push(entry);
        match self.last {
            Some(last) => self.entries[last.0].next = Some(id),
            None => self.first = Some(id),
        }
        self.last = Some(id);
        id
    }

    pub fn first(&self) -> Option<EntryId> {
        self.first
    }

    pub fn last(&self) -> Option<EntryId> {
        self.last
    }

    pub fn prev(&self, id: EntryId) -> Option<EntryId> {
        self.entries[id.0].prev
    }

    pub fn next(&self, id: EntryId) -> Option<EntryId> {
        self.entries[id.0].next
    }

    pub fn get(&self, id: EntryId) -> &Entry {
        &self.entries[id.0]
    }

    pub fn get_mut(&mut self, id: EntryId) -> &mut Entry {
        &mut self.entries[id.0]
    }

    /// Walk back from `from` looking for an opener for `delimiter`, without
    /// stepping onto `floor`.
    ///
    /// The flag is false only when the walk ran out of entries: no opener
    /// exists, so the delimiter can never close anything. It stays true when
    /// the search was cut short by a higher-priority entry or by an earlier
    /// closer for the same delimiter, either of which may still go away.
    pub fn find_matching_opener(
        &self,
        from: Option<EntryId>,
        floor: Option<EntryId>,
        priority: Priority,
        delimiter: u8,
    ) -> (Option<EntryId>, bool) {
        let mut current = from;
        while let Some(id) = current {
            if Some(id) == floor {
                break;
            }
            let entry = &self.entries[id.0];
            if entry.priority > priority || (entry.delimiter == delimiter && entry.can_close) {
                return (None, true);
            }
            if entry.delimiter == delimiter && entry.can_open {
                return (Some(id), true);
            }
            current = entry.prev;
        }
        (None, false)
    }

    /// Unlink `first` and every entry after it up to and including `last`,
    /// or to the end of the list when `last` is `None`.
    pub fn remove_range(&mut self, first: EntryId, last: Option<EntryId>) {
        let before = self.entries[first.0].prev;
        let mut current = Some(first);
        let mut after = None;
        while let Some(id) = current {
            let entry = &mut self.entries[id.0];
            entry.activity = Activity::Removed;
            current = entry.next.take();
            entry.prev = None;
            if Some(id) == last {
                after = current;
                break;
            }
        }

        match before {
            Some(b) => self.entries[b.0].next = after,
            None => self.first = after,
        }
        match after {
            Some(a) => self.entries[a.0].prev = before,
            None => self.last = before,
        }
    }

    pub fn remove(&mut self, id: EntryId) {
        self.remove_range(id, Some(id));
    }

    /// Remove the entries strictly between `opener` and `closer`.
    pub fn remove_between(&mut self, opener: EntryId, closer: EntryId) {
        if let Some(inner) = self.next(opener)
            && inner != closer
            && let Some(last) = self.prev(closer)
        {
            self.remove_range(inner, Some(last));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(n: usize) -> InlineId {
        InlineId(n)
    }

    fn ids(stack: &DelimiterStack) -> Vec<usize> {
        let mut out = Vec::new();
        let mut current = stack.first();
        while let Some(id) = current {
            out.push(id.0);
            current = stack.next(id);
        }
        out
    }

    #[test]
    fn remove_range_to_end() {
        let mut stack = DelimiterStack::new();
        let a = stack.push(Entry::emphasis(b'*', 1, true, false, node(1)));
        let b = stack.push(Entry::emphasis(b'_', 1, true, false, node(2)));
        stack.push(Entry::emphasis(b'*', 2, true, false, node(3)));

        stack.remove_range(b, None);
        assert_eq!(ids(&stack), vec![0]);
        assert_eq!(stack.last(), Some(a));
        assert_eq!(stack.get(b).activity, Activity::Removed);
    }

    #[test]
    fn remove_between_keeps_endpoints() {
        let mut stack = DelimiterStack::new();
        let a = stack.push(Entry::emphasis(b'*', 1, true, false, node(1)));
        stack.push(Entry::emphasis(b'_', 1, true, false, node(2)));
        stack.push(Entry::emphasis(b'_', 1, true, false, node(3)));
        let d = stack.push(Entry::emphasis(b'*', 1, false, true, node(4)));

        stack.remove_between(a, d);
        assert_eq!(ids(&stack), vec![0, 3]);
        assert_eq!(stack.prev(d), Some(a));
    }

    #[test]
    fn links_block_emphasis_search() {
        let mut stack = DelimiterStack::new();
        stack.push(Entry::emphasis(b'*', 1, true, false, node(1)));
        let bracket = stack.push(Entry::bracket(false, node(2), 3));

        let (opener, can_close) =
            stack.find_matching_opener(Some(bracket), None, Priority::Emphasis, b'*');
        assert_eq!(opener, None);
        assert!(can_close);

        stack.remove(bracket);
        let (opener, _) =
            stack.find_matching_opener(stack.last(), None, Priority::Emphasis, b'*');
        assert_eq!(opener, Some(EntryId(0)));
    }

    #[test]
    fn empty_search_cannot_close() {
        let mut stack = DelimiterStack::new();
        let a = stack.push(Entry::emphasis(b'_', 1, true, false, node(1)));
        let (opener, can_close) =
            stack.find_matching_opener(Some(a), None, Priority::Emphasis, b'*');
        assert_eq!(opener, None);
        assert!(!can_close);
    }

    #[test]
    fn floor_bounds_the_search() {
        let mut stack = DelimiterStack::new();
        let a = stack.push(Entry::emphasis(b'*', 1, true, false, node(1)));
        let b = stack.push(Entry::emphasis(b'_', 1, true, false, node(2)));
        let (opener, _) = stack.find_matching_opener(Some(b), Some(a), Priority::Emphasis, b'*');
        assert_eq!(opener, None);
    }
}
