//! Search strategies over board states.
//!
//! Uniform-cost, greedy best-first and A* share one frontier loop and differ
//! only in how a node is prioritised. Backtracking is a separate recursive
//! depth-first search. Nodes of every strategy live in a [`SearchTree`]
//! arena, each pointing at its parent by index.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    fmt::Display,
    ops::Index,
};

use fnv::FnvHashSet;
use log::{debug, trace};
use smallvec::SmallVec;

use crate::{
    board::Board,
    heuristic::Heuristic,
    moves::{successors, Move},
    Puzzle,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    UniformCost,
    Greedy(Heuristic),
    AStar(Heuristic),
    /// Depth-first search that only avoids states on the current path.
    /// `max_depth` stops descending past that many moves.
    Backtracking { max_depth: Option<u32> },
}

impl Strategy {
    pub fn heuristic(&self) -> Option<Heuristic> {
        match *self {
            Strategy::Greedy(h) | Strategy::AStar(h) => Some(h),
            Strategy::UniformCost | Strategy::Backtracking { .. } => None,
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::UniformCost => write!(f, "Uniform-Cost Search"),
            Strategy::Greedy(h) => write!(f, "Greedy Best-First Search, {h}"),
            Strategy::AStar(h) => write!(f, "A*, {h}"),
            Strategy::Backtracking { max_depth: None } => write!(f, "Backtracking"),
            Strategy::Backtracking {
                max_depth: Some(d),
            } => write!(f, "Backtracking, depth {d}"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Nodes whose successors were generated.
    pub expanded: usize,
    /// Successor nodes created.
    pub generated: usize,
    /// Nodes dropped because their state was already visited.
    pub duplicates: usize,
}

impl Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Nodes expanded: {}, generated: {}, duplicates skipped: {}",
            self.expanded, self.generated, self.duplicates
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
pub struct Node {
    pub board: Board,
    pub parent: Option<NodeId>,
    /// The slide that produced this node; `None` for the root.
    pub mv: Option<Move>,
    pub cost: u32,
    pub heuristic: f64,
}

/// Arena of search nodes. Parents are always pushed before their children.
#[derive(Clone, Debug, Default)]
pub struct SearchTree {
    nodes: Vec<Node>,
}

impl SearchTree {
    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    /// Detaches every node from `at` onwards. Reattaching them with
    /// [`SearchTree::restore`] at the same length keeps their parent ids valid.
    fn split_off(&mut self, at: usize) -> Vec<Node> {
        self.nodes.split_off(at)
    }

    fn restore(&mut self, nodes: Vec<Node>) -> Option<NodeId> {
        self.nodes.extend(nodes);
        self.nodes.len().checked_sub(1).map(NodeId)
    }
}

impl Index<NodeId> for SearchTree {
    type Output = Node;
    fn index(&self, index: NodeId) -> &Self::Output {
        &self.nodes[index.0]
    }
}

/// One board of a solution and the slide that led to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub board: Board,
    pub mv: Option<Move>,
}

/// A node that satisfies the goal test, together with the tree it came from.
#[derive(Clone, Debug)]
pub struct GoalNode {
    tree: SearchTree,
    id: NodeId,
}

impl GoalNode {
    pub fn node(&self) -> &Node {
        &self.tree[self.id]
    }

    pub fn cost(&self) -> u32 {
        self.node().cost
    }

    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    pub fn moves(&self) -> Vec<Move> {
        reconstruct_path(self)
            .into_iter()
            .filter_map(|step| step.mv)
            .collect()
    }
}

/// Boards from the initial state to the goal. Only the first step has no move.
pub fn reconstruct_path(goal: &GoalNode) -> Vec<Step> {
    let mut path = Vec::with_capacity(goal.cost() as usize + 1);
    let mut current = Some(goal.id);
    while let Some(id) = current {
        let node = &goal.tree[id];
        path.push(Step {
            board: node.board.clone(),
            mv: node.mv,
        });
        current = node.parent;
    }

    path.reverse();
    path
}

#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// `None` when the search space was exhausted without reaching the goal.
    pub goal: Option<GoalNode>,
    pub stats: Stats,
}

pub fn search(puzzle: &Puzzle, strategy: Strategy) -> SearchOutcome {
    debug!("{strategy} started");
    let heuristic = strategy.heuristic();
    let outcome = match strategy {
        Strategy::UniformCost => best_first(puzzle, Order::Cost, heuristic),
        Strategy::Greedy(_) => best_first(puzzle, Order::Estimate, heuristic),
        Strategy::AStar(_) => best_first(puzzle, Order::CostPlusEstimate, heuristic),
        Strategy::Backtracking { max_depth } => backtracking(puzzle, max_depth),
    };

    match &outcome.goal {
        Some(goal) => debug!("{strategy} solved in {} moves; {}", goal.cost(), outcome.stats),
        None => debug!("{strategy} found no solution; {}", outcome.stats),
    }
    outcome
}

/// Children of `id`, one per legal slide, each costing one more than its parent.
fn expand(
    puzzle: &Puzzle,
    tree: &SearchTree,
    id: NodeId,
    heuristic: Option<Heuristic>,
) -> SmallVec<[Node; 16]> {
    let parent = &tree[id];
    trace!("expanding node at cost {}:\n{}", parent.cost, parent.board);

    let mut buffer = SmallVec::<[(Move, Board); 16]>::new();
    successors(&parent.board, &puzzle.orientations, puzzle.exit, &mut buffer);

    buffer
        .into_iter()
        .map(|(mv, board)| Node {
            heuristic: heuristic.map_or(0.0, |h| h.evaluate(&board, puzzle.exit)),
            board,
            parent: Some(id),
            mv: Some(mv),
            cost: parent.cost + 1,
        })
        .collect()
}

fn root(puzzle: &Puzzle, heuristic: Option<Heuristic>) -> Node {
    Node {
        board: puzzle.board.clone(),
        parent: None,
        mv: None,
        cost: 0,
        heuristic: heuristic.map_or(0.0, |h| h.evaluate(&puzzle.board, puzzle.exit)),
    }
}

#[derive(Clone, Copy, Debug)]
enum Order {
    Cost,
    Estimate,
    CostPlusEstimate,
}

impl Order {
    fn priority(self, node: &Node) -> f64 {
        match self {
            Order::Cost => node.cost as f64,
            Order::Estimate => node.heuristic,
            Order::CostPlusEstimate => node.cost as f64 + node.heuristic,
        }
    }
}

/// Frontier entry; equal priorities pop in insertion order.
#[derive(Debug)]
struct Entry {
    priority: f64,
    seq: u64,
    node: NodeId,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

fn best_first(puzzle: &Puzzle, order: Order, heuristic: Option<Heuristic>) -> SearchOutcome {
    let mut stats = Stats::default();
    let mut tree = SearchTree::default();
    let mut visited = FnvHashSet::default();
    let mut frontier = BinaryHeap::new();
    let mut seq = 0;

    let start = tree.push(root(puzzle, heuristic));
    frontier.push(Reverse(Entry {
        priority: order.priority(&tree[start]),
        seq,
        node: start,
    }));

    while let Some(Reverse(Entry { node: id, .. })) = frontier.pop() {
        // marked on expansion, not on discovery
        if !visited.insert(tree[id].board.clone()) {
            stats.duplicates += 1;
            continue;
        }

        if puzzle.is_goal(&tree[id].board) {
            return SearchOutcome {
                goal: Some(GoalNode { tree, id }),
                stats,
            };
        }

        stats.expanded += 1;
        for child in expand(puzzle, &tree, id, heuristic) {
            if visited.contains(&child.board) {
                stats.duplicates += 1;
                continue;
            }

            stats.generated += 1;
            seq += 1;
            let priority = order.priority(&child);
            let node = tree.push(child);
            frontier.push(Reverse(Entry { priority, seq, node }));
        }
    }

    SearchOutcome { goal: None, stats }
}

struct Backtracker<'a> {
    puzzle: &'a Puzzle,
    max_depth: Option<u32>,
    tree: SearchTree,
    on_path: FnvHashSet<Board>,
    stats: Stats,
}

impl Backtracker<'_> {
    /// Cheapest goal found below `id`, considering only paths that do not
    /// revisit a state already on the current path.
    ///
    /// On return the arena ends at `id` when nothing was found, or holds
    /// exactly the path from `id` down to the returned goal.
    fn explore(&mut self, id: NodeId) -> Option<NodeId> {
        let node = &self.tree[id];
        if self.puzzle.is_goal(&node.board) {
            return Some(id);
        }
        if self.max_depth.map_or(false, |max| node.cost >= max) {
            return None;
        }

        let board = node.board.clone();
        self.on_path.insert(board.clone());
        self.stats.expanded += 1;

        let mark = self.tree.len();
        let mut best: Option<Vec<Node>> = None;
        for child in expand(self.puzzle, &self.tree, id, None) {
            if self.on_path.contains(&child.board) {
                self.stats.duplicates += 1;
                continue;
            }

            self.stats.generated += 1;
            let child = self.tree.push(child);
            match self.explore(child) {
                Some(found)
                    if best
                        .as_ref()
                        .and_then(|path| path.last())
                        .map_or(true, |goal| self.tree[found].cost < goal.cost) =>
                {
                    best = Some(self.tree.split_off(mark));
                }
                _ => self.tree.truncate(mark),
            }
        }

        self.on_path.remove(&board);
        best.and_then(|path| self.tree.restore(path))
    }
}

fn backtracking(puzzle: &Puzzle, max_depth: Option<u32>) -> SearchOutcome {
    let mut backtracker = Backtracker {
        puzzle,
        max_depth,
        tree: SearchTree::default(),
        on_path: FnvHashSet::default(),
        stats: Stats::default(),
    };

    let start = backtracker.tree.push(root(puzzle, None));
    let goal = backtracker.explore(start);

    SearchOutcome {
        goal: goal.map(|id| GoalNode {
            tree: backtracker.tree,
            id,
        }),
        stats: backtracker.stats,
    }
}
