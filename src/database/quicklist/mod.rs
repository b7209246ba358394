//! Segmented, compressible doubly-linked packed-array list ("Quicklist"):
//! each segment ("Node") is a [`ListPack`](crate::database::listpack::ListPack)
//! or a single oversized "plain" item, nodes beyond the compress depth are
//! transparently zstd-compressed at rest, and a capped set of named
//! bookmarks lets callers resume iteration over very large lists.

pub mod compression;

use std::{
    collections::VecDeque,
    sync::atomic::{AtomicUsize, Ordering},
};

use packedcore_error::{QuicklistError, QuicklistResult};
use serde::{Deserialize, Serialize};

use super::listpack::ListPack;

/// Maximum single-item payload size still absorbed into a regular packed
/// Node before it must become its own oversized "plain" Node. Process-wide
/// and mutable so a host can tune it at startup.
static PLAIN_THRESHOLD: AtomicUsize = AtomicUsize::new(1024);

pub fn plain_threshold() -> usize {
    PLAIN_THRESHOLD.load(Ordering::Relaxed)
}

pub fn set_plain_threshold(bytes: usize) {
    PLAIN_THRESHOLD.store(bytes, Ordering::Relaxed);
}

/// Byte budgets indexed by `FillPolicy::SizeClass`.
const SIZE_CLASS_BUDGETS: [usize; 5] = [4 * 1024, 8 * 1024, 16 * 1024, 32 * 1024, 64 * 1024];

/// Per-Node capacity policy: either an element-count cap or a byte-budget
/// size class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillPolicy {
    Count(u16),
    SizeClass(u8),
}

impl FillPolicy {
    fn allows(
        &self,
        node: &QuicklistNode,
        incoming_len: usize,
    ) -> bool {
        match self {
            FillPolicy::Count(max) => node.count < *max as usize,
            FillPolicy::SizeClass(idx) => {
                let budget = SIZE_CLASS_BUDGETS[(*idx as usize).min(SIZE_CLASS_BUDGETS.len() - 1)];
                node.sz + incoming_len <= budget
            }
        }
    }
}

/// Number of Nodes at each end of the list left uncompressed. `0`
/// disables compression entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressDepth(pub u16);

/// Whether a Node stores a packed array of small items or a single large
/// item verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Container {
    Plain,
    Packed,
}

/// Forward (head-to-tail) or reverse (tail-to-head) traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// A Node's decoded contents, matching its `container`.
#[derive(Clone, Debug, Serialize, Deserialize)]
enum NodeContents {
    Packed(ListPack),
    Plain(Vec<u8>),
}

impl NodeContents {
    fn len(&self) -> usize {
        match self {
            NodeContents::Packed(lp) => lp.len(),
            NodeContents::Plain(_) => 1,
        }
    }

    fn byte_len(&self) -> usize {
        match self {
            NodeContents::Packed(lp) => lp.byte_len(),
            NodeContents::Plain(v) => v.len(),
        }
    }

    fn get(
        &self,
        index: usize,
    ) -> Option<Vec<u8>> {
        match self {
            NodeContents::Packed(lp) => lp.get(index).map(|s| s.to_vec()),
            NodeContents::Plain(v) => (index == 0).then(|| v.clone()),
        }
    }

    fn push_back(
        &mut self,
        value: &[u8],
    ) {
        match self {
            NodeContents::Packed(lp) => lp.push_back(value),
            NodeContents::Plain(_) => unreachable!("plain nodes are never appended to"),
        }
    }

    fn push_front(
        &mut self,
        value: &[u8],
    ) {
        match self {
            NodeContents::Packed(lp) => lp.push_front(value),
            NodeContents::Plain(_) => unreachable!("plain nodes are never appended to"),
        }
    }

    fn insert_at(
        &mut self,
        index: usize,
        value: &[u8],
    ) {
        match self {
            NodeContents::Packed(lp) => lp.insert_at(index, value),
            NodeContents::Plain(_) => unreachable!("plain nodes are never appended to"),
        }
    }

    fn remove(
        &mut self,
        index: usize,
    ) -> bool {
        match self {
            NodeContents::Packed(lp) => lp.remove(index),
            NodeContents::Plain(_) => false,
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        match self {
            NodeContents::Packed(lp) => lp.to_bytes(),
            NodeContents::Plain(v) => v.clone(),
        }
    }

    fn from_bytes(
        container: Container,
        bytes: &[u8],
    ) -> NodeContents {
        match container {
            Container::Packed => {
                NodeContents::Packed(ListPack::from_bytes(bytes).expect("malformed listpack node"))
            }
            Container::Plain => NodeContents::Plain(bytes.to_vec()),
        }
    }
}

/// A Node's payload pointer once compressed: compressed bytes plus enough header to decompress without
/// consulting the owning Node.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct CompressedPayload {
    bytes: Vec<u8>,
    container: Container,
    sz: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
enum NodeBody {
    Raw(NodeContents),
    Compressed(CompressedPayload),
}

/// One segment of the Quicklist: a packed array or a single plain item,
/// transparently RAW or compressed at rest.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuicklistNode {
    id: u64,
    body: NodeBody,
    count: usize,
    sz: usize,
    container: Container,
    recompress: bool,
    attempted_compress: bool,
}

impl QuicklistNode {
    fn new(contents: NodeContents, container: Container) -> Self {
        let count = contents.len();
        let sz = contents.byte_len();
        Self {
            id: 0,
            body: NodeBody::Raw(contents),
            count,
            sz,
            container,
            recompress: false,
            attempted_compress: false,
        }
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self.body, NodeBody::Compressed(_))
    }

    pub fn attempted_compress(&self) -> bool {
        self.attempted_compress
    }

    /// Decompresses in place if needed, marking `recompress` so a later
    /// maintenance pass knows to restore the invariant. Idempotent.
    fn ensure_raw(&mut self) -> &mut NodeContents {
        if let NodeBody::Compressed(payload) = &self.body {
            let decoded = compression::decompress(&payload.bytes, payload.sz);
            let contents = NodeContents::from_bytes(payload.container, &decoded);
            self.body = NodeBody::Raw(contents);
            self.recompress = true;
        }
        match &mut self.body {
            NodeBody::Raw(contents) => contents,
            NodeBody::Compressed(_) => unreachable!(),
        }
    }

    fn contents(&self) -> Option<&NodeContents> {
        match &self.body {
            NodeBody::Raw(contents) => Some(contents),
            NodeBody::Compressed(_) => None,
        }
    }

    fn sync_header(&mut self) {
        if let NodeBody::Raw(contents) = &self.body {
            self.count = contents.len();
            self.sz = contents.byte_len();
        }
    }

    /// Compresses the Node if it is currently RAW and compression
    /// actually shrinks the payload.
    fn try_compress(&mut self) {
        let bytes = match &self.body {
            NodeBody::Raw(contents) => contents.to_bytes(),
            NodeBody::Compressed(_) => return,
        };
        self.attempted_compress = true;
        if let Some(compressed) = compression::compress(&bytes) {
            self.body = NodeBody::Compressed(CompressedPayload {
                bytes: compressed,
                container: self.container,
                sz: bytes.len(),
            });
        }
        self.recompress = false;
    }
}

/// A named resumable anchor referencing a Node by stable id.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct Bookmark {
    name: String,
    node_id: u64,
}

/// Maximum number of simultaneously-live bookmarks.
const MAX_BOOKMARKS: usize = 15;

/// A position within the list: the index of a Node and an element index
/// inside that Node, for single-element operations that don't need a live
/// iterator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub node_idx: usize,
    pub elem_idx: usize,
}

/// A segmented, compressible doubly-linked list of byte-string elements.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuickList {
    nodes: VecDeque<QuicklistNode>,
    count: usize,
    fill: FillPolicy,
    compress: CompressDepth,
    bookmarks: Vec<Bookmark>,
    next_node_id: u64,
}

impl QuickList {
    /// `Create`/`New(fill, compress)`: empty list.
    pub fn new(fill: FillPolicy, compress: CompressDepth) -> Self {
        Self {
            nodes: VecDeque::new(),
            count: 0,
            fill,
            compress,
            bookmarks: Vec::new(),
            next_node_id: 1,
        }
    }

    /// Total element count across all Nodes.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of Nodes currently making up the list.
    pub fn node_len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn alloc_node_id(&mut self) -> u64 {
        let id = self.next_node_id;
        self.next_node_id += 1;
        id
    }

    fn new_packed_node(
        &mut self,
        value: &[u8],
    ) -> QuicklistNode {
        let mut lp = ListPack::new();
        lp.push_back(value);
        let mut node = QuicklistNode::new(NodeContents::Packed(lp), Container::Packed);
        node.id = self.alloc_node_id();
        node
    }

    fn new_plain_node(
        &mut self,
        value: Vec<u8>,
    ) -> QuicklistNode {
        let mut node = QuicklistNode::new(NodeContents::Plain(value), Container::Plain);
        node.id = self.alloc_node_id();
        node
    }

    /// `PushHead`/`PushTail`: absorbs into the
    /// terminal Node under the fill policy, else allocates a new one;
    /// oversized values become their own plain Node.
    pub fn push_tail(
        &mut self,
        value: &[u8],
    ) {
        if value.len() > plain_threshold() {
            let node = self.new_plain_node(value.to_vec());
            self.nodes.push_back(node);
        } else if self.terminal_node_accepts(true, value.len()) {
            let node = self.nodes.back_mut().expect("checked above");
            node.ensure_raw().push_back(value);
            node.sync_header();
        } else {
            let node = self.new_packed_node(value);
            self.nodes.push_back(node);
        }
        self.count += 1;
        self.maintain_compression();
    }

    pub fn push_head(
        &mut self,
        value: &[u8],
    ) {
        if value.len() > plain_threshold() {
            let node = self.new_plain_node(value.to_vec());
            self.nodes.push_front(node);
        } else if self.terminal_node_accepts(false, value.len()) {
            let node = self.nodes.front_mut().expect("checked above");
            node.ensure_raw().push_front(value);
            node.sync_header();
        } else {
            let node = self.new_packed_node(value);
            self.nodes.push_front(node);
        }
        self.count += 1;
        self.maintain_compression();
    }

    fn terminal_node_accepts(
        &self,
        tail: bool,
        incoming_len: usize,
    ) -> bool {
        let node = if tail {
            self.nodes.back()
        } else {
            self.nodes.front()
        };
        match node {
            Some(node) => {
                node.container == Container::Packed
                    && !node.is_compressed()
                    && self.fill.allows(node, incoming_len)
            }
            None => false,
        }
    }

    /// `AppendListpack(buf)`: adopts an externally-built
    /// listpack as a new tail Node.
    pub fn append_listpack_node(
        &mut self,
        lp: ListPack,
    ) {
        let count = lp.len();
        let mut node = QuicklistNode::new(NodeContents::Packed(lp), Container::Packed);
        node.id = self.alloc_node_id();
        self.count += count;
        self.nodes.push_back(node);
        self.maintain_compression();
    }

    /// `AppendPlainNode(buf, sz)`.
    pub fn append_plain_node(
        &mut self,
        data: Vec<u8>,
    ) {
        let node = self.new_plain_node(data);
        self.count += 1;
        self.nodes.push_back(node);
        self.maintain_compression();
    }

    fn resolve_index(
        &self,
        index: i64,
    ) -> Option<(usize, usize)> {
        let index = if index < 0 {
            let from_tail = (-index - 1) as usize;
            self.count.checked_sub(from_tail + 1)?
        } else {
            let index = index as usize;
            if index >= self.count {
                return None;
            }
            index
        };
        let mut remaining = index;
        for (node_idx, node) in self.nodes.iter().enumerate() {
            if remaining < node.count {
                return Some((node_idx, remaining));
            }
            remaining -= node.count;
        }
        None
    }

    /// Locates the Node/element-offset pair for global index `index`
    /// (negative counts from the tail).
    pub fn position_at(
        &self,
        index: i64,
    ) -> Option<Position> {
        self.resolve_index(index)
            .map(|(node_idx, elem_idx)| Position { node_idx, elem_idx })
    }

    pub fn get(
        &mut self,
        index: i64,
    ) -> Option<Vec<u8>> {
        let (node_idx, elem_idx) = self.resolve_index(index)?;
        let node = &mut self.nodes[node_idx];
        node.ensure_raw().get(elem_idx)
    }

    /// `InsertBefore`/`InsertAfter`: inserts adjacent to
    /// `pos` within its Node, splitting the Node if the fill policy would
    /// overflow.
    pub fn insert_before(
        &mut self,
        pos: Position,
        value: &[u8],
    ) -> QuicklistResult<()> {
        self.insert_at_offset(pos.node_idx, pos.elem_idx, value)
    }

    pub fn insert_after(
        &mut self,
        pos: Position,
        value: &[u8],
    ) -> QuicklistResult<()> {
        self.insert_at_offset(pos.node_idx, pos.elem_idx + 1, value)
    }

    fn insert_at_offset(
        &mut self,
        node_idx: usize,
        offset: usize,
        value: &[u8],
    ) -> QuicklistResult<()> {
        let node = self
            .nodes
            .get_mut(node_idx)
            .ok_or(QuicklistError::InvalidIndex {
                index: node_idx as i64,
                len: self.nodes.len(),
            })?;
        if node.container != Container::Packed || value.len() > plain_threshold() {
            // Oversized or non-packed target: split the list at the
            // offset and drop a fresh single-item Node in between.
            self.split_node_and_insert(node_idx, offset, value);
            return Ok(());
        }
        if self.fill.allows(node, value.len()) {
            node.ensure_raw().insert_at(offset, value);
            node.sync_header();
        } else {
            self.split_node_and_insert(node_idx, offset, value);
        }
        self.count += 1;
        self.maintain_compression();
        Ok(())
    }

    fn split_node_and_insert(
        &mut self,
        node_idx: usize,
        offset: usize,
        value: &[u8],
    ) {
        let mut node = self.nodes.remove(node_idx).expect("checked by caller");
        let contents = node.ensure_raw();
        let tail_contents = match contents {
            NodeContents::Packed(lp) => NodeContents::Packed(lp.split_off(offset)),
            NodeContents::Plain(_) => NodeContents::Plain(Vec::new()),
        };
        node.sync_header();
        let mut tail_node = QuicklistNode::new(tail_contents, node.container);
        tail_node.id = self.alloc_node_id();

        let middle = self.new_packed_node(value);
        let mut insert_pos = node_idx;
        self.nodes.insert(insert_pos, node);
        insert_pos += 1;
        self.nodes.insert(insert_pos, middle);
        insert_pos += 1;
        self.nodes.insert(insert_pos, tail_node);
    }

    /// `DelEntry`: removes one element; unlinks the Node
    /// if it becomes empty.
    pub fn del_entry(
        &mut self,
        pos: Position,
    ) -> QuicklistResult<()> {
        let len = self.nodes.len();
        let node = self
            .nodes
            .get_mut(pos.node_idx)
            .ok_or(QuicklistError::InvalidIndex {
                index: pos.node_idx as i64,
                len,
            })?;
        let removed = node.ensure_raw().remove(pos.elem_idx);
        if !removed {
            return Err(QuicklistError::InvalidIndex {
                index: pos.elem_idx as i64,
                len: node.count,
            });
        }
        node.sync_header();
        self.count -= 1;
        if node.count == 0 {
            self.remove_node_at(pos.node_idx);
        }
        self.maintain_compression();
        Ok(())
    }

    /// `ReplaceAtIndex`: in-place when the element fits
    /// its current slot, otherwise delete then insert.
    pub fn replace_at_index(
        &mut self,
        index: i64,
        value: &[u8],
    ) -> QuicklistResult<()> {
        let (node_idx, elem_idx) = self.resolve_index(index).ok_or(QuicklistError::InvalidIndex {
            index,
            len: self.count,
        })?;
        self.del_entry(Position { node_idx, elem_idx })?;
        // `del_entry` may have unlinked the Node entirely (`remove_node_at`),
        // shifting every later Node down by one; re-resolve rather than
        // reuse `node_idx`/`elem_idx`, which may now name the wrong Node.
        match self.resolve_index(index) {
            Some((node_idx, elem_idx)) => self.insert_before(Position { node_idx, elem_idx }, value),
            None => {
                self.push_tail(value);
                Ok(())
            }
        }
    }

    /// `DelRange(start, stop)`: deletes a half-open range
    /// by global index, clamping out-of-range bounds; returns the number
    /// of elements actually removed.
    pub fn del_range(
        &mut self,
        start: i64,
        stop: i64,
    ) -> usize {
        let mut removed = 0;
        let mut idx = start;
        let stop = stop.min(self.count as i64);
        while idx < stop {
            match self.resolve_index(start) {
                Some((node_idx, elem_idx)) => {
                    let _ = self.del_entry(Position { node_idx, elem_idx });
                    removed += 1;
                    idx += 1;
                }
                None => break,
            }
        }
        removed
    }

    fn remove_node_at(
        &mut self,
        node_idx: usize,
    ) {
        let removed = self.nodes.remove(node_idx);
        if let Some(removed) = removed {
            let successor_id = self.nodes.get(node_idx).map(|n| n.id);
            self.bookmarks.retain_mut(|b| {
                if b.node_id == removed.id {
                    match successor_id {
                        Some(id) => {
                            b.node_id = id;
                            true
                        }
                        None => false,
                    }
                } else {
                    true
                }
            });
        }
    }

    /// `Pop`/`PopCustom`: removes from head or tail.
    pub fn pop(
        &mut self,
        direction: Direction,
    ) -> Option<Vec<u8>> {
        let node_idx = match direction {
            Direction::Forward => 0,
            Direction::Reverse => self.nodes.len().checked_sub(1)?,
        };
        let node = self.nodes.get_mut(node_idx)?;
        let elem_idx = match direction {
            Direction::Forward => 0,
            Direction::Reverse => node.count.checked_sub(1)?,
        };
        let value = node.ensure_raw().get(elem_idx)?;
        node.ensure_raw().remove(elem_idx);
        node.sync_header();
        self.count -= 1;
        if node.count == 0 {
            self.remove_node_at(node_idx);
        }
        self.maintain_compression();
        Some(value)
    }

    /// Like [`QuickList::pop`], but hands the payload to `saver` before
    /// it is dropped, so the caller can copy or transfer it without an
    /// extra allocation-then-pop round trip.
    pub fn pop_custom(
        &mut self,
        direction: Direction,
        mut saver: impl FnMut(&[u8]),
    ) -> bool {
        match self.pop(direction) {
            Some(value) => {
                saver(&value);
                true
            }
            None => false,
        }
    }

    /// `Rotate`: moves the tail element to the head in one
    /// step.
    pub fn rotate(&mut self) -> bool {
        match self.pop(Direction::Reverse) {
            Some(value) => {
                self.push_head(&value);
                true
            }
            None => false,
        }
    }

    /// `Dup`: deep-copies every Node, preserving
    /// compression state as-is (a plain `Clone`, since every field here
    /// is already owned data rather than a pointer).
    pub fn dup(&self) -> QuickList {
        self.clone()
    }

    /// `create_bookmark(name, node_id)`,
    /// capped at 15 simultaneously-live bookmarks.
    pub fn create_bookmark(
        &mut self,
        name: impl Into<String>,
        node_id: u64,
    ) -> QuicklistResult<()> {
        let name = name.into();
        if self.bookmarks.iter().any(|b| b.name == name) {
            return Err(QuicklistError::BookmarkNameTaken(name));
        }
        if self.bookmarks.len() >= MAX_BOOKMARKS {
            return Err(QuicklistError::BookmarkLimitExceeded {
                limit: MAX_BOOKMARKS,
            });
        }
        self.bookmarks.push(Bookmark { name, node_id });
        Ok(())
    }

    pub fn delete_bookmark(
        &mut self,
        name: &str,
    ) -> QuicklistResult<()> {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|b| b.name != name);
        if self.bookmarks.len() == before {
            return Err(QuicklistError::BookmarkNotFound(name.to_string()));
        }
        Ok(())
    }

    pub fn find_bookmark(
        &self,
        name: &str,
    ) -> Option<u64> {
        self.bookmarks
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.node_id)
    }

    /// Node id at `node_idx`, for passing to [`QuickList::create_bookmark`].
    pub fn node_id_at(
        &self,
        node_idx: usize,
    ) -> Option<u64> {
        self.nodes.get(node_idx).map(|n| n.id)
    }

    /// Re-establishes the compression invariant: Nodes
    /// within `compress` of either end stay RAW, interior Nodes are
    /// compressed, except any Node a live borrower has marked
    /// `recompress` (left alone until the borrower releases it).
    fn maintain_compression(&mut self) {
        let depth = self.compress.0 as usize;
        let len = self.nodes.len();
        for (i, node) in self.nodes.iter_mut().enumerate() {
            let in_window = depth == 0 || i < depth || i + depth >= len;
            if in_window {
                if node.is_compressed() {
                    node.ensure_raw();
                    node.recompress = false;
                }
            } else if !node.recompress {
                node.try_compress();
            }
        }
    }

    /// `GetIterator(direction)` / `GetIteratorAtIdx`.
    pub fn iter(
        &mut self,
        direction: Direction,
    ) -> QuicklistIter<'_> {
        let start = match direction {
            Direction::Forward => 0,
            Direction::Reverse => self.nodes.len().saturating_sub(1),
        };
        QuicklistIter::new(self, direction, start)
    }

    pub fn iter_at(
        &mut self,
        direction: Direction,
        index: i64,
    ) -> Option<QuicklistIter<'_>> {
        let (node_idx, _) = self.resolve_index(index)?;
        Some(QuicklistIter::new(self, direction, node_idx))
    }
}

/// Iterates a [`QuickList`], decompressing each Node it enters and
/// recompressing the Node it leaves once the borrow moves on, rather than
/// hiding that mutation inside the read paths themselves.
pub struct QuicklistIter<'a> {
    list: &'a mut QuickList,
    direction: Direction,
    node_idx: Option<usize>,
    elem_idx: Option<usize>,
    started: bool,
}

impl<'a> QuicklistIter<'a> {
    fn new(
        list: &'a mut QuickList,
        direction: Direction,
        start_node: usize,
    ) -> Self {
        if let Some(node) = list.nodes.get_mut(start_node) {
            node.ensure_raw();
        }
        Self {
            list,
            direction,
            node_idx: Some(start_node),
            elem_idx: None,
            started: false,
        }
    }

    /// Reverses direction without repositioning: the next [`QuicklistIter::next`] moves the
    /// opposite way from the current element.
    pub fn set_direction(
        &mut self,
        direction: Direction,
    ) {
        self.direction = direction;
    }

    /// Advances one element, crossing Node boundaries as needed.
    pub fn next(&mut self) -> Option<Vec<u8>> {
        let mut node_idx = self.node_idx?;
        loop {
            let node = self.list.nodes.get_mut(node_idx)?;
            let count = node.contents().map(|c| c.len()).unwrap_or(node.count);
            if count == 0 {
                node_idx = self.advance_node(node_idx)?;
                self.node_idx = Some(node_idx);
                self.elem_idx = None;
                self.started = false;
                continue;
            }
            let next_elem = if !self.started {
                self.started = true;
                match self.direction {
                    Direction::Forward => 0,
                    Direction::Reverse => count - 1,
                }
            } else {
                match (self.direction, self.elem_idx) {
                    (Direction::Forward, Some(i)) => i + 1,
                    (Direction::Reverse, Some(0)) | (Direction::Reverse, None) => {
                        node_idx = self.advance_node(node_idx)?;
                        self.node_idx = Some(node_idx);
                        self.elem_idx = None;
                        self.started = false;
                        continue;
                    }
                    (Direction::Reverse, Some(i)) => i - 1,
                    (Direction::Forward, None) => 0,
                }
            };
            if next_elem >= count {
                node_idx = self.advance_node(node_idx)?;
                self.node_idx = Some(node_idx);
                self.elem_idx = None;
                self.started = false;
                continue;
            }
            self.elem_idx = Some(next_elem);
            return self.list.nodes[node_idx].ensure_raw().get(next_elem);
        }
    }

    fn advance_node(
        &mut self,
        current: usize,
    ) -> Option<usize> {
        if let Some(node) = self.list.nodes.get_mut(current) {
            if node.recompress {
                self.list.maintain_compression_single(current);
            }
        }
        let next = match self.direction {
            Direction::Forward => current + 1,
            Direction::Reverse => {
                if current == 0 {
                    return None;
                }
                current - 1
            }
        };
        let node = self.list.nodes.get_mut(next)?;
        node.ensure_raw();
        Some(next)
    }
}

impl<'a> Drop for QuicklistIter<'a> {
    fn drop(&mut self) {
        if let Some(idx) = self.node_idx {
            self.list.maintain_compression_single(idx);
        }
    }
}

impl QuickList {
    /// Recompresses a single Node if it now lies outside the compress
    /// window and no other borrower still holds it open — used by
    /// [`QuicklistIter`] on boundary-cross and release instead of the
    /// full `O(len)` [`QuickList::maintain_compression`] sweep.
    fn maintain_compression_single(
        &mut self,
        node_idx: usize,
    ) {
        let depth = self.compress.0 as usize;
        let len = self.nodes.len();
        if let Some(node) = self.nodes.get_mut(node_idx) {
            let in_window = depth == 0 || node_idx < depth || node_idx + depth >= len;
            if node.recompress && !in_window {
                node.try_compress();
            } else if node.recompress {
                node.recompress = false;
            }
        }
    }
}
