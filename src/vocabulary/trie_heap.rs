/*!
# Trie-Backed Bounded Top-K Miner

Streaming word counter that keeps only the K most frequent words.

A trie stores every word seen so far with its occurrence count; shared
prefixes are stored once. A fixed-capacity, array-backed min-heap holds the
current top K, with the least frequent resident at slot 0. Each trie node
that completes a resident word knows its heap slot, so an increment
reaches its heap entry in O(1) and restores order with a sift-down.

Words are stored in an arena (`Vec<TrieNode>`) and heap entries point back
at their trie node by index.
*/

use std::collections::HashMap;

use crate::core::{SeqError, SeqResult};

/// Number of occurrences of a word
pub type WordCount = u64;

type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug)]
struct TrieNode {
    character: Option<char>,
    /// `None` for prefix-only nodes, `Some` once a word ends here
    count: Option<WordCount>,
    children: HashMap<char, NodeId>,
    heap_index: Option<usize>,
}

impl TrieNode {
    fn new(character: Option<char>) -> Self {
        Self {
            character,
            count: None,
            children: HashMap::new(),
            heap_index: None,
        }
    }
}

#[derive(Debug, Clone)]
struct HeapEntry {
    word: String,
    count: WordCount,
    trie_node: NodeId,
}

/// Bounded top-K word frequency miner
#[derive(Debug)]
pub struct TrieMinHeap {
    nodes: Vec<TrieNode>,
    heap: Vec<HeapEntry>,
    capacity: usize,
}

impl TrieMinHeap {
    /// Creates a miner that retains at most `capacity` words
    pub fn new(capacity: usize) -> SeqResult<Self> {
        if capacity == 0 {
            return Err(SeqError::InvalidCapacity);
        }
        Ok(Self {
            nodes: vec![TrieNode::new(None)],
            heap: Vec::with_capacity(capacity),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of resident words
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Counts one occurrence of `word`. Empty words are ignored.
    pub fn increment(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }

        let mut current = ROOT;
        for ch in word.chars() {
            current = match self.nodes[current].children.get(&ch) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode::new(Some(ch)));
                    self.nodes[current].children.insert(ch, next);
                    next
                }
            };
        }

        let node = &mut self.nodes[current];
        node.count = Some(node.count.map_or(1, |count| count + 1));

        self.update_heap(word, current);
    }

    /// Occurrence count of `word`, or `None` if it was never completed
    pub fn count(&self, word: &str) -> Option<WordCount> {
        self.find(word).and_then(|id| self.nodes[id].count)
    }

    /// Whether `word` is currently among the top K
    pub fn is_resident(&self, word: &str) -> bool {
        self.find(word)
            .map(|id| self.nodes[id].heap_index.is_some())
            .unwrap_or(false)
    }

    /// Least frequent resident word
    pub fn min(&self) -> Option<(&str, WordCount)> {
        self.heap.first().map(|e| (e.word.as_str(), e.count))
    }

    /// Resident words in heap order. Only slot 0 is guaranteed minimal.
    pub fn top_k(&self) -> Vec<&str> {
        self.heap.iter().map(|e| e.word.as_str()).collect()
    }

    /// Resident words by count descending, then word ascending
    pub fn top_k_sorted(&self) -> Vec<(&str, WordCount)> {
        let mut words: Vec<(&str, WordCount)> = self
            .heap
            .iter()
            .map(|e| (e.word.as_str(), e.count))
            .collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        words
    }

    /// Number of distinct words seen, resident or not
    pub fn distinct_words(&self) -> usize {
        self.nodes.iter().filter(|n| n.count.is_some()).count()
    }

    /// Every word seen with its count, rebuilt from the trie in
    /// lexicographic order
    pub fn seen_words(&self) -> Vec<(String, WordCount)> {
        let mut out = Vec::new();
        let mut prefix = String::new();
        self.collect_words(ROOT, &mut prefix, &mut out);
        out
    }

    fn collect_words(&self, id: NodeId, prefix: &mut String, out: &mut Vec<(String, WordCount)>) {
        let node = &self.nodes[id];
        if let Some(ch) = node.character {
            prefix.push(ch);
        }
        if let Some(count) = node.count {
            out.push((prefix.clone(), count));
        }

        let mut children: Vec<(&char, &NodeId)> = node.children.iter().collect();
        children.sort_by_key(|(ch, _)| **ch);
        for (_, &child) in children {
            self.collect_words(child, prefix, out);
        }

        if node.character.is_some() {
            prefix.pop();
        }
    }

    fn find(&self, word: &str) -> Option<NodeId> {
        let mut current = ROOT;
        for ch in word.chars() {
            current = *self.nodes[current].children.get(&ch)?;
        }
        Some(current)
    }

    fn update_heap(&mut self, word: &str, id: NodeId) {
        let count = self.nodes[id].count.unwrap_or(0);

        if self.heap.is_empty() {
            self.heap.push(HeapEntry {
                word: word.to_string(),
                count,
                trie_node: id,
            });
            self.nodes[id].heap_index = Some(0);
            return;
        }

        match self.nodes[id].heap_index {
            None => {
                // ties keep the earlier resident
                if self.heap.len() == self.capacity && count <= self.heap[0].count {
                    return;
                }
                self.insert(HeapEntry {
                    word: word.to_string(),
                    count,
                    trie_node: id,
                });
            }
            Some(index) => {
                // counts only grow, so sifting down is enough
                self.heap[index].count = count;
                self.sift_down(index);
            }
        }
    }

    fn insert(&mut self, entry: HeapEntry) {
        if self.heap.len() < self.capacity {
            let index = self.heap.len();
            self.nodes[entry.trie_node].heap_index = Some(index);
            self.heap.push(entry);
            self.sift_up(index);
            return;
        }

        let evicted = self.heap[0].trie_node;
        self.nodes[evicted].heap_index = None;
        self.nodes[entry.trie_node].heap_index = Some(0);
        self.heap[0] = entry;
        self.sift_down(0);
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.heap[parent].count <= self.heap[index].count {
                break;
            }
            self.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let smallest = if right < len && self.heap[right].count < self.heap[left].count {
                right
            } else {
                left
            };
            if self.heap[index].count <= self.heap[smallest].count {
                break;
            }
            self.swap(index, smallest);
            index = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        let node_a = self.heap[a].trie_node;
        let node_b = self.heap[b].trie_node;
        self.nodes[node_a].heap_index = Some(a);
        self.nodes[node_b].heap_index = Some(b);
    }

    /// Checks heap order and trie back-references
    #[cfg(test)]
    fn assert_invariants(&self) {
        assert!(self.heap.len() <= self.capacity);
        for (i, entry) in self.heap.iter().enumerate() {
            assert_eq!(self.nodes[entry.trie_node].heap_index, Some(i));
            assert_eq!(self.nodes[entry.trie_node].count, Some(entry.count));
            if i > 0 {
                assert!(self.heap[(i - 1) / 2].count <= entry.count);
            }
        }
        let resident = self.nodes.iter().filter(|n| n.heap_index.is_some()).count();
        assert_eq!(resident, self.heap.len());
    }
}
