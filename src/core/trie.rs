//! Ternary search tree for autocomplete.
//!
//! Nodes live in an arena and refer to each other by index, so the classic
//! less/equal/greater structure needs no manual lifetime management and the
//! whole tree deep-copies with a `clone`. A node's terminal flag marks the
//! end of a registered word; removal clears flags and prunes subtrees that
//! no longer lead to any word.

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(u32);

#[derive(Debug, Clone)]
struct Node {
    ch: u8,
    is_word: bool,
    less: Option<NodeId>,
    equal: Option<NodeId>,
    greater: Option<NodeId>,
}

impl Node {
    fn new(ch: u8) -> Self {
        Self {
            ch,
            is_word: false,
            less: None,
            equal: None,
            greater: None,
        }
    }

    fn is_leafless(&self) -> bool {
        self.less.is_none() && self.equal.is_none() && self.greater.is_none()
    }
}

/// Autocomplete index over registered names.
///
/// # Examples
///
/// ```
/// use bevy_typed_console::core::TernaryTrie;
///
/// let mut trie = TernaryTrie::new();
/// trie.insert("sv_gravity");
/// trie.insert("sv_cheats");
///
/// assert!(trie.search("sv_gravity"));
/// assert_eq!(trie.word_count(), 2);
///
/// let mut options = trie.suggestions("sv_");
/// options.sort();
/// assert_eq!(options, vec!["sv_cheats", "sv_gravity"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TernaryTrie {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    words: usize,
    live: usize,
}

impl TernaryTrie {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered words.
    #[inline]
    pub fn word_count(&self) -> usize {
        self.words
    }

    /// Number of live nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.live
    }

    /// Check if no words are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    fn alloc(&mut self, ch: u8) -> NodeId {
        self.live += 1;
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0 as usize] = Node::new(ch);
                id
            }
            None => {
                let id = NodeId(self.nodes.len() as u32);
                self.nodes.push(Node::new(ch));
                id
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        self.live -= 1;
        self.free.push(id);
    }

    /// Insert a word, marking its final node terminal.
    ///
    /// Re-inserting an existing word leaves the word count unchanged.
    pub fn insert(&mut self, word: &str) {
        let bytes = word.as_bytes();
        if bytes.is_empty() {
            return;
        }
        self.words += 1;

        // Walk/create one node per character, tracking the link to fill.
        let mut slot: Option<NodeId> = self.root;
        let mut parent: Option<(NodeId, u8)> = None; // (node, side) 0=l 1=e 2=g
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            let id = match slot {
                Some(id) => id,
                None => {
                    let id = self.alloc(b);
                    match parent {
                        None => self.root = Some(id),
                        Some((pid, 0)) => self.node_mut(pid).less = Some(id),
                        Some((pid, 1)) => self.node_mut(pid).equal = Some(id),
                        Some((pid, _)) => self.node_mut(pid).greater = Some(id),
                    }
                    id
                }
            };

            let ch = self.node(id).ch;
            if b < ch {
                slot = self.node(id).less;
                parent = Some((id, 0));
            } else if b == ch {
                if i + 1 == bytes.len() {
                    if self.node(id).is_word {
                        self.words -= 1;
                    }
                    self.node_mut(id).is_word = true;
                }
                slot = self.node(id).equal;
                parent = Some((id, 1));
                i += 1;
            } else {
                slot = self.node(id).greater;
                parent = Some((id, 2));
            }
        }
    }

    /// Check whether `word` is registered (terminal node at its last
    /// character).
    pub fn search(&self, word: &str) -> bool {
        let bytes = word.as_bytes();
        if bytes.is_empty() {
            return false;
        }
        let mut ptr = self.root;
        let mut i = 0;
        while let Some(id) = ptr {
            let node = self.node(id);
            let b = bytes[i];
            if b < node.ch {
                ptr = node.less;
            } else if b == node.ch {
                if i + 1 == bytes.len() {
                    return node.is_word;
                }
                ptr = node.equal;
                i += 1;
            } else {
                ptr = node.greater;
            }
        }
        false
    }

    /// Remove a word if present.
    ///
    /// Clears the terminal flag and prunes subtrees that no longer lead to
    /// any word. A word that is a strict prefix of another registered word
    /// keeps its nodes; only its flag is cleared. Removing an unregistered
    /// word changes nothing.
    pub fn remove(&mut self, word: &str) {
        let bytes = word.as_bytes();
        if bytes.is_empty() {
            return;
        }
        if let Some(root) = self.root {
            if self.remove_aux(root, bytes, 0) {
                self.release(root);
                self.root = None;
            }
        }
    }

    // Returns true when the visited node has become dead (not a word, no
    // children) and the caller should unlink and release it.
    fn remove_aux(&mut self, id: NodeId, word: &[u8], i: usize) -> bool {
        let b = word[i];
        let (ch, less, equal, greater) = {
            let node = self.node(id);
            (node.ch, node.less, node.equal, node.greater)
        };

        if i + 1 == word.len() && b == ch {
            if self.node(id).is_word {
                self.node_mut(id).is_word = false;
                self.words -= 1;
                return self.node(id).is_leafless();
            }
            return false;
        }

        if b < ch {
            if let Some(child) = less {
                if self.remove_aux(child, word, i) {
                    self.release(child);
                    let node = self.node_mut(id);
                    node.less = None;
                    return !node.is_word && node.is_leafless();
                }
            }
        } else if b > ch {
            if let Some(child) = greater {
                if self.remove_aux(child, word, i) {
                    self.release(child);
                    let node = self.node_mut(id);
                    node.greater = None;
                    return !node.is_word && node.is_leafless();
                }
            }
        } else if let Some(child) = equal {
            if self.remove_aux(child, word, i + 1) {
                self.release(child);
                let node = self.node_mut(id);
                node.equal = None;
                return !node.is_word && node.is_leafless();
            }
        }
        false
    }

    /// Collect every registered word extending `prefix`.
    ///
    /// Returns nothing when the prefix is unknown, and nothing when the
    /// prefix is itself a registered word.
    pub fn suggestions(&self, prefix: &str) -> Vec<String> {
        let mut options = Vec::new();
        if let Some(id) = self.prefix_node(prefix) {
            if !self.node(id).is_word {
                if let Some(equal) = self.node(id).equal {
                    let mut buffer = prefix.as_bytes().to_vec();
                    self.suggestions_aux(equal, &mut buffer, &mut options);
                }
            }
        }
        options
    }

    /// Like [`suggestions`](Self::suggestions), additionally extending the
    /// prefix along a single unambiguous chain before collecting.
    ///
    /// Returns the (possibly extended) prefix together with the options;
    /// the options are reconstructed from the original prefix.
    pub fn suggestions_partial(&self, prefix: &str) -> (String, Vec<String>) {
        let mut completed = prefix.to_string();
        let mut options = Vec::new();

        let Some(id) = self.prefix_node(prefix) else {
            return (completed, options);
        };

        // Extend while exactly one continuation exists and keeps going.
        let mut walk = self.node(id).equal;
        while let Some(pc) = walk {
            let node = self.node(pc);
            if node.equal.is_some() && node.less.is_none() && node.greater.is_none() {
                completed.push(node.ch as char);
            } else {
                break;
            }
            walk = node.equal;
        }

        if !self.node(id).is_word {
            if let Some(equal) = self.node(id).equal {
                let mut buffer = prefix.as_bytes().to_vec();
                self.suggestions_aux(equal, &mut buffer, &mut options);
            }
        }
        (completed, options)
    }

    // Walk to the node matching the last character of `prefix`.
    fn prefix_node(&self, prefix: &str) -> Option<NodeId> {
        let bytes = prefix.as_bytes();
        if bytes.is_empty() {
            return None;
        }
        let mut ptr = self.root;
        let mut i = 0;
        while let Some(id) = ptr {
            let node = self.node(id);
            let b = bytes[i];
            if b < node.ch {
                ptr = node.less;
            } else if b == node.ch {
                if i + 1 == bytes.len() {
                    return Some(id);
                }
                ptr = node.equal;
                i += 1;
            } else {
                ptr = node.greater;
            }
        }
        None
    }

    // In-order walk of the subtree, emitting prefix + buffered characters
    // at every terminal node.
    fn suggestions_aux(&self, id: NodeId, buffer: &mut Vec<u8>, options: &mut Vec<String>) {
        let (ch, is_word, less, equal, greater) = {
            let node = self.node(id);
            (node.ch, node.is_word, node.less, node.equal, node.greater)
        };

        if let Some(child) = less {
            self.suggestions_aux(child, buffer, options);
        }
        if is_word {
            buffer.push(ch);
            options.push(String::from_utf8_lossy(buffer).into_owned());
            buffer.pop();
        }
        if let Some(child) = equal {
            buffer.push(ch);
            self.suggestions_aux(child, buffer, options);
            buffer.pop();
        }
        if let Some(child) = greater {
            self.suggestions_aux(child, buffer, options);
        }
    }
}
