//! Consumable paths backed by reusable pathfinding buffers
//!
//! A `Path` is read once, front to back. Dropping it hands its buffer back
//! to the `PathPool` it came from, so every exit from a caller releases the
//! pathfinder's working memory.

use crate::core::types::CellPos;
use std::cell::{Cell, RefCell};

/// Recycles node buffers between path queries
#[derive(Debug, Default)]
pub struct PathPool {
    free: RefCell<Vec<Vec<CellPos>>>,
    outstanding: Cell<usize>,
}

impl PathPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty buffer for the pathfinder to fill
    pub fn take_buffer(&self) -> Vec<CellPos> {
        self.free.borrow_mut().pop().unwrap_or_default()
    }

    /// Wrap `nodes` (start first) as a path owned by this pool
    pub fn acquire(&self, mut nodes: Vec<CellPos>) -> Path<'_> {
        self.outstanding.set(self.outstanding.get() + 1);
        // Stored reversed so consuming pops from the back
        nodes.reverse();
        Path {
            nodes,
            pool: Some(self),
        }
    }

    /// A "no path" result that still counts as an acquisition
    pub fn not_found(&self) -> Path<'_> {
        let buffer = self.take_buffer();
        self.acquire(buffer)
    }

    /// Paths handed out and not yet dropped
    pub fn outstanding(&self) -> usize {
        self.outstanding.get()
    }

    /// Buffers waiting for reuse
    pub fn idle_buffers(&self) -> usize {
        self.free.borrow().len()
    }

    fn release(&self, mut buffer: Vec<CellPos>) {
        buffer.clear();
        self.free.borrow_mut().push(buffer);
        self.outstanding.set(self.outstanding.get().saturating_sub(1));
    }
}

/// Ordered cells from source to destination, consumed front to back
#[derive(Debug)]
pub struct Path<'a> {
    nodes: Vec<CellPos>,
    pool: Option<&'a PathPool>,
}

impl<'a> Path<'a> {
    /// A path not tied to any pool, for hosts without buffer reuse
    pub fn detached(mut nodes: Vec<CellPos>) -> Self {
        nodes.reverse();
        Self { nodes, pool: None }
    }

    pub fn found(&self) -> bool {
        !self.nodes.is_empty()
    }

    pub fn nodes_left_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn consume_next_node(&mut self) -> Option<CellPos> {
        self.nodes.pop()
    }

    /// The final node, without consuming anything
    pub fn destination(&self) -> Option<CellPos> {
        self.nodes.first().copied()
    }

    /// Peek at the next node to be consumed
    pub fn peek_next(&self) -> Option<CellPos> {
        self.nodes.last().copied()
    }
}

impl Drop for Path<'_> {
    fn drop(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.release(std::mem::take(&mut self.nodes));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(n: i32) -> Vec<CellPos> {
        (0..n).map(|x| CellPos::new(x, 0)).collect()
    }

    #[test]
    fn test_consumes_in_order() {
        let pool = PathPool::new();
        let mut path = pool.acquire(cells(3));
        assert_eq!(path.nodes_left_count(), 3);
        assert_eq!(path.destination(), Some(CellPos::new(2, 0)));
        assert_eq!(path.consume_next_node(), Some(CellPos::new(0, 0)));
        assert_eq!(path.consume_next_node(), Some(CellPos::new(1, 0)));
        assert_eq!(path.nodes_left_count(), 1);
    }

    #[test]
    fn test_drop_releases_buffer() {
        let pool = PathPool::new();
        {
            let mut path = pool.acquire(cells(4));
            path.consume_next_node();
            assert_eq!(pool.outstanding(), 1);
        }
        assert_eq!(pool.outstanding(), 0);
        assert_eq!(pool.idle_buffers(), 1);
    }

    #[test]
    fn test_released_buffer_is_reused_empty() {
        let pool = PathPool::new();
        drop(pool.acquire(cells(5)));
        let buffer = pool.take_buffer();
        assert!(buffer.is_empty());
        assert!(buffer.capacity() >= 5);
        assert_eq!(pool.idle_buffers(), 0);
    }

    #[test]
    fn test_not_found_path_is_empty_and_released() {
        let pool = PathPool::new();
        let path = pool.not_found();
        assert!(!path.found());
        assert_eq!(path.nodes_left_count(), 0);
        drop(path);
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn test_detached_path() {
        let mut path = Path::detached(cells(2));
        assert_eq!(path.peek_next(), Some(CellPos::new(0, 0)));
        path.consume_next_node();
        assert_eq!(path.consume_next_node(), Some(CellPos::new(1, 0)));
        assert_eq!(path.consume_next_node(), None);
    }
}
