//! The search tree arena: nodes are stored in a flat
//! `Vec` and referenced by index rather than linked through `Rc<RefCell<_>>`,
//! so a whole search tree is dropped in one deallocation.
use super::node::{Node, NodeHandle};
use crate::board::{Board, ChessMove};

pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(root_board: Board) -> Self {
        Tree {
            nodes: vec![Node::new_root(root_board)],
        }
    }

    pub fn root(&self) -> NodeHandle {
        NodeHandle(0)
    }

    pub fn node(&self, handle: NodeHandle) -> &Node {
        &self.nodes[handle.0]
    }

    pub fn node_mut(&mut self, handle: NodeHandle) -> &mut Node {
        &mut self.nodes[handle.0]
    }

    pub fn expand(&mut self, parent: NodeHandle, board: Board, mv: ChessMove) -> NodeHandle {
        let handle = NodeHandle(self.nodes.len());
        self.nodes.push(Node::new_child(board, mv, parent));
        self.node_mut(parent).add_child(handle);
        handle
    }

    pub fn depth_of(&self, handle: NodeHandle) -> usize {
        let mut depth = 0;
        let mut current = handle;
        while let Some(parent) = self.node(current).parent() {
            depth += 1;
            current = parent;
        }
        depth
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn expanding_a_child_links_it_to_its_parent() {
        let mut tree = Tree::new(Board::new());
        let root = tree.root();
        let mv = tree.node(root).untried_moves()[0];
        let mut board = tree.node(root).board().clone_for_search();
        board.apply_move_unchecked(mv);
        let child = tree.expand(root, board, mv);

        assert_eq!(tree.node(root).children(), &[child]);
        assert_eq!(tree.node(child).parent(), Some(root));
        assert_eq!(tree.depth_of(child), 1);
    }
}
