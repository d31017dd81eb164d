//! The MCTS engine: selection, expansion, playout, adjudication and
//! backpropagation, plus the mate-in-one shortcut and final move choice.
use super::config::SearchConfig;
use super::node::NodeHandle;
use super::strategy::SearchStrategy;
use super::tree::Tree;
use crate::board::{Board, ChessMove, Color, GameResult, Special};
use crate::eval::Evaluator;
use crate::rl::RlOverlay;
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::cmp::Reverse;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Win(Color),
    Draw,
}

pub struct MctsEngine<'e> {
    evaluator: &'e dyn Evaluator,
    config: SearchConfig,
}

impl<'e> MctsEngine<'e> {
    pub fn new(evaluator: &'e dyn Evaluator, config: SearchConfig) -> Self {
        MctsEngine { evaluator, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs a bounded search from `board` and returns the chosen move, or
    /// `None` if the position has no legal moves.
    pub fn choose_move(&self, board: &Board, strategy: SearchStrategy) -> Option<ChessMove> {
        let legal_moves = board.legal_moves();
        if legal_moves.is_empty() {
            return None;
        }

        if let Some(mate) = self.find_mate_in_one(board, &legal_moves) {
            return Some(mate);
        }

        let mut rng = match self.config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut tree = Tree::new(board.clone_for_search());
        self.sort_untried_moves(&mut tree, tree.root());

        let start = Instant::now();
        let budget = std::time::Duration::from_secs_f64(self.config.time_limit_secs);
        let mut simulations = 0u32;

        while simulations < self.config.max_simulations {
            if start.elapsed() >= budget {
                break;
            }

            let leaf = self.select(&mut tree, &strategy);
            let expanded = self.expand(&mut tree, leaf, &strategy);
            let depth = tree.depth_of(expanded);
            let result = self.playout(tree.node(expanded).board(), depth, &strategy, &mut rng);
            self.backpropagate(&mut tree, expanded, result);

            simulations += 1;
            if simulations % 100 == 0 && start.elapsed() >= budget.mul_f64(0.9) {
                break;
            }
        }

        debug!(
            "search completed {} simulations in {:?}",
            simulations,
            start.elapsed()
        );

        self.select_final_move(&tree, &strategy, &legal_moves, board)
    }

    fn find_mate_in_one(&self, board: &Board, legal_moves: &[ChessMove]) -> Option<ChessMove> {
        for &mv in legal_moves {
            let mut scratch = board.clone_for_search();
            scratch.apply_move_unchecked(mv);
            if scratch.is_checkmate() {
                return Some(mv);
            }
        }
        None
    }

    fn sort_untried_moves(&self, tree: &mut Tree, handle: NodeHandle) {
        let evaluator = self.evaluator;
        let node = tree.node_mut(handle);
        node.sort_untried_moves_by_priority(evaluator);
    }

    /// Descends from the root via UCB1 (plus the RL bias, if active) while
    /// the current node is fully expanded, non-terminal, and within depth.
    fn select(&self, tree: &mut Tree, strategy: &SearchStrategy) -> NodeHandle {
        let mut current = tree.root();
        loop {
            let depth = tree.depth_of(current);
            let node = tree.node(current);
            if node.is_terminal() || !node.is_fully_expanded() || depth >= self.config.max_tree_depth {
                return current;
            }
            let children = node.children().to_vec();
            if children.is_empty() {
                return current;
            }
            let parent_visits = node.visits().max(1);
            let parent_board = node.board().clone();

            let mut best = children[0];
            let mut best_score = f64::NEG_INFINITY;
            for &child in &children {
                let child_node = tree.node(child);
                let ucb1 = child_node.ucb1(parent_visits, self.config.exploration_constant);
                let mv = child_node.mv().expect("non-root node always has a move");
                let score = if ucb1.is_infinite() {
                    ucb1
                } else {
                    ucb1 + strategy.rl_term(&parent_board, mv)
                };
                if score > best_score {
                    best_score = score;
                    best = child;
                }
            }
            current = best;
        }
    }

    /// Expands `handle` with one new child, unless it is already terminal or
    /// fully expanded. Returns the new child, or `handle` itself if no
    /// expansion happened.
    fn expand(&self, tree: &mut Tree, handle: NodeHandle, strategy: &SearchStrategy) -> NodeHandle {
        let depth = tree.depth_of(handle);
        if depth >= self.config.max_tree_depth {
            return handle;
        }
        let node = tree.node(handle);
        if node.is_terminal() || node.is_fully_expanded() {
            return handle;
        }

        let board = node.board().clone();
        let index = self.pick_expansion_index(node.untried_moves(), &board, strategy);
        let mv = tree.node_mut(handle).take_untried_move(index);

        let mut child_board = board.clone_for_search();
        child_board.apply_move_unchecked(mv);
        let child = tree.expand(handle, child_board, mv);
        self.sort_untried_moves(tree, child);
        child
    }

    fn pick_expansion_index(
        &self,
        untried: &[ChessMove],
        board: &Board,
        strategy: &SearchStrategy,
    ) -> usize {
        match strategy {
            SearchStrategy::Plain => 0,
            SearchStrategy::Rl { overlay, weight } => untried
                .iter()
                .enumerate()
                .map(|(i, &mv)| {
                    let score = self.evaluator.move_priority(board, mv) as f64
                        + weight * overlay.rl_value(board, mv) * 10.0;
                    (i, score)
                })
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
                .map(|(i, _)| i)
                .unwrap_or(0),
        }
    }

    /// Plays out a position to termination, a depth limit, or a combined
    /// tree-plus-playout depth limit, then adjudicates the result.
    fn playout(&self, start_board: &Board, start_depth: usize, strategy: &SearchStrategy, rng: &mut StdRng) -> Outcome {
        let mut board = start_board.clone_for_search();
        let mut moves_played = 0u32;

        loop {
            let result = board.get_result();
            if result.is_terminal() {
                return Self::outcome_from_result(result);
            }
            if moves_played >= self.config.max_playout_depth {
                break;
            }
            if start_depth + moves_played as usize >= 2 * self.config.max_tree_depth {
                break;
            }

            let legal_moves = board.legal_moves();
            if legal_moves.is_empty() {
                break;
            }

            let mv = match strategy {
                SearchStrategy::Plain => self.select_playout_move_plain(&board, &legal_moves, rng),
                SearchStrategy::Rl { overlay, weight } => {
                    self.select_playout_move_rl(&board, &legal_moves, overlay, *weight, rng)
                }
            };
            board.apply_move_unchecked(mv);
            moves_played += 1;
        }

        self.adjudicate(&board, rng)
    }

    fn select_playout_move_plain(&self, board: &Board, legal_moves: &[ChessMove], rng: &mut StdRng) -> ChessMove {
        let mut checkmates = Vec::new();
        let mut checks = Vec::new();
        let mut captures = Vec::new();
        let mut tactical = Vec::new();
        let mut normal = Vec::new();

        for &mv in legal_moves {
            let mut scratch = board.clone_for_search();
            scratch.apply_move_unchecked(mv);
            if scratch.is_checkmate() {
                checkmates.push(mv);
                continue;
            }
            if scratch.is_in_check(scratch.side_to_move()) {
                checks.push(mv);
                continue;
            }
            if board.piece_at(mv.to).is_some() || mv.special == Special::EnPassant {
                captures.push(mv);
                continue;
            }
            if self.evaluator.move_priority(board, mv) > 100 {
                tactical.push(mv);
            } else {
                normal.push(mv);
            }
        }

        let roll: f64 = rng.gen();
        if let Some(&mv) = checkmates.choose(rng) {
            return mv;
        }
        if !checks.is_empty() && roll < 0.7 {
            return *checks.choose(rng).unwrap();
        }
        if !captures.is_empty() && roll < 0.8 {
            if rng.gen::<f64>() < 0.7 {
                let mut sorted = captures.clone();
                sorted.sort_by_key(|&mv| Reverse(self.evaluator.move_priority(board, mv)));
                return sorted[0];
            }
            return *captures.choose(rng).unwrap();
        }
        if !tactical.is_empty() && roll < 0.6 {
            return *tactical.choose(rng).unwrap();
        }
        if let Some(&mv) = normal.choose(rng) {
            return mv;
        }
        legal_moves[0]
    }

    fn select_playout_move_rl(
        &self,
        board: &Board,
        legal_moves: &[ChessMove],
        overlay: &RlOverlay,
        weight: f64,
        rng: &mut StdRng,
    ) -> ChessMove {
        let mut scored: Vec<(ChessMove, f64)> = legal_moves
            .iter()
            .map(|&mv| {
                let score = self.evaluator.move_priority(board, mv) as f64
                    + weight * overlay.rl_value(board, mv) * 5.0;
                (mv, score)
            })
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

        if rng.gen::<f64>() < 0.7 {
            let top_count = (scored.len() / 3).max(1);
            scored[..top_count].choose(rng).unwrap().0
        } else {
            scored.choose(rng).unwrap().0
        }
    }

    fn adjudicate(&self, board: &Board, rng: &mut StdRng) -> Outcome {
        let score = self.evaluator.evaluate(board) as f64;
        let magnitude = score.abs();
        if magnitude < 100.0 {
            return Outcome::Draw;
        }
        let better_side = if score > 0.0 { Color::White } else { Color::Black };
        if magnitude < 300.0 {
            if rng.gen::<f64>() < 0.3 {
                return Outcome::Draw;
            }
        }
        Outcome::Win(better_side)
    }

    fn outcome_from_result(result: GameResult) -> Outcome {
        match result {
            GameResult::WhiteWins => Outcome::Win(Color::White),
            GameResult::BlackWins => Outcome::Win(Color::Black),
            GameResult::Draw | GameResult::InProgress => Outcome::Draw,
        }
    }

    /// Walks from `handle` to the root, crediting each ancestor whose stored
    /// move was played by the winning side.
    fn backpropagate(&self, tree: &mut Tree, handle: NodeHandle, result: Outcome) {
        let mut current = Some(handle);
        while let Some(h) = current {
            let node = tree.node_mut(h);
            let reward = match result {
                Outcome::Draw => 0.5,
                Outcome::Win(winner) => {
                    let mover = node.board().side_to_move().opposite();
                    if node.mv().is_some() && winner == mover {
                        1.0
                    } else {
                        0.0
                    }
                }
            };
            node.record_visit(reward);
            current = node.parent();
        }
    }

    fn select_final_move(
        &self,
        tree: &Tree,
        strategy: &SearchStrategy,
        legal_moves: &[ChessMove],
        root_board: &Board,
    ) -> Option<ChessMove> {
        let root = tree.node(tree.root());
        let children = root.children();
        if children.is_empty() {
            return legal_moves
                .iter()
                .copied()
                .max_by_key(|&mv| self.evaluator.move_priority(root_board, mv));
        }

        let max_visits = children.iter().map(|&c| tree.node(c).visits()).max().unwrap_or(0);
        let highly_explored: Vec<NodeHandle> = children
            .iter()
            .copied()
            .filter(|&c| (tree.node(c).visits() as f64) >= 0.7 * max_visits as f64)
            .collect();
        if highly_explored.len() == 1 {
            return tree.node(highly_explored[0]).mv();
        }

        let mut best: Option<(NodeHandle, f64)> = None;
        for &c in children {
            let node = tree.node(c);
            if node.visits() < 5 {
                continue;
            }
            let win_rate = node.wins() / node.visits() as f64;
            let visit_weight = (node.visits() as f64 / max_visits as f64).min(1.0);
            let mut score = win_rate * 0.7 + visit_weight * 0.3;
            if let Some(mv) = node.mv() {
                score += strategy.rl_term(root_board, mv);
            }
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((c, score));
            }
        }

        let chosen = best.map(|(c, _)| c).unwrap_or_else(|| {
            *children
                .iter()
                .max_by_key(|&&c| tree.node(c).visits())
                .expect("children is non-empty")
        });
        tree.node(chosen).mv()
    }
}
