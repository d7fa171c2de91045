//! Score-ordered university lists.
//!
//! A [`ScoreList`] is the payload of one leaf key slot: a singly linked list
//! of university entries kept strictly non-increasing by placement score.
//! A new entry is inserted before the first entry with a strictly smaller
//! score, so entries with equal scores stay in insertion order.

/// One university's entry in a department's ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct UniversityEntry {
    pub university: String,
    pub score: f32,
}

#[derive(Debug)]
struct ScoreNode {
    entry: UniversityEntry,
    next: Option<Box<ScoreNode>>,
}

/// Descending-by-score singly linked list of [`UniversityEntry`] values.
#[derive(Debug, Default)]
pub struct ScoreList {
    head: Option<Box<ScoreNode>>,
    len: usize,
}

impl ScoreList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Insert an entry at its score-ordered position.
    ///
    /// The entry lands before the first existing entry whose score is
    /// strictly smaller, i.e. after every entry with an equal score.
    pub fn insert(&mut self, university: impl Into<String>, score: f32) {
        let mut node = Box::new(ScoreNode {
            entry: UniversityEntry {
                university: university.into(),
                score,
            },
            next: None,
        });
        self.len += 1;

        let goes_in_front = match self.head {
            Some(ref head) => head.entry.score < score,
            None => true,
        };
        if goes_in_front {
            node.next = self.head.take();
            self.head = Some(node);
            return;
        }

        let mut current = self.head.as_mut().expect("non-empty when not front");
        while current
            .next
            .as_ref()
            .is_some_and(|next| next.entry.score >= score)
        {
            current = current.next.as_mut().expect("next checked above");
        }
        node.next = current.next.take();
        current.next = Some(node);
    }

    /// Entry at 1-based `rank` (rank 1 is the highest score), if present.
    pub fn get(&self, rank: usize) -> Option<&UniversityEntry> {
        if rank == 0 {
            return None;
        }
        self.iter().nth(rank - 1)
    }

    /// Iterate entries in descending score order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            node: self.head.as_deref(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list holds no entries.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

impl Drop for ScoreList {
    fn drop(&mut self) {
        // Unlink iteratively; a recursive Box drop could blow the stack on a
        // department with many entries.
        let mut node = self.head.take();
        while let Some(mut boxed) = node {
            node = boxed.next.take();
        }
    }
}

/// Footprint of one linked entry node, for the static memory model.
pub(crate) fn entry_footprint() -> usize {
    std::mem::size_of::<ScoreNode>()
}

/// Iterator over a [`ScoreList`] in descending score order.
pub struct Iter<'a> {
    node: Option<&'a ScoreNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a UniversityEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.node?;
        self.node = node.next.as_deref();
        Some(&node.entry)
    }
}

impl<'a> IntoIterator for &'a ScoreList {
    type Item = &'a UniversityEntry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
