//! This module defines the `Explorer`, which traces a nondeterministic Turing machine by
//! breadth-first search over its configuration tree.
//!
//! Every generated configuration lives in an arena together with the index of the
//! configuration it was derived from. Levels are lists of arena indices, so only the
//! current and the next level are held at any time, and the accepting path is recovered
//! by following back-references from the accepting node.

use crate::tape::shift;
use crate::types::{
    Configuration, ExplorationResult, Machine, Transition, TransitionTable,
    DEFAULT_MAX_CONFIGURATIONS, DEFAULT_MAX_DEPTH,
};
use tracing::{debug, info, warn};

/// A configuration together with the arena index of its parent.
#[derive(Debug, Clone)]
pub struct Node {
    pub config: Configuration,
    pub parent: Option<usize>,
}

/// Traces a [`Machine`] on input strings.
///
/// ```
/// use tracetm::{Explorer, ExplorationResult};
///
/// let machine = tracetm::parse(
///     "has a 1\nq0,qa,qr\n0,1\n0,1,_\nq0\nqa\nqr\nq0,0,q0,0,R\nq0,1,q0,1,R\nq0,1,qa,1,R",
/// )
/// .unwrap();
///
/// let result = Explorer::new(&machine).explore("01");
/// assert!(matches!(result, ExplorationResult::Accepted { depth: 2, .. }));
/// ```
pub struct Explorer<'a> {
    start_state: &'a str,
    accept_state: &'a str,
    reject_state: &'a str,
    rules: &'a TransitionTable,
    max_depth: usize,
    max_configurations: usize,
}

impl<'a> Explorer<'a> {
    /// Creates an explorer for `machine` with the default depth and configuration bounds.
    pub fn new(machine: &'a Machine) -> Self {
        Self::from_parts(
            &machine.start_state,
            &machine.accept_state,
            &machine.reject_state,
            &machine.rules,
        )
    }

    /// Creates an explorer from the bare pieces of a machine.
    pub fn from_parts(
        start_state: &'a str,
        accept_state: &'a str,
        reject_state: &'a str,
        rules: &'a TransitionTable,
    ) -> Self {
        Self {
            start_state,
            accept_state,
            reject_state,
            rules,
            max_depth: DEFAULT_MAX_DEPTH,
            max_configurations: DEFAULT_MAX_CONFIGURATIONS,
        }
    }

    /// Sets the number of levels to expand before giving up with `TimedOut`.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the number of configurations the search may generate before giving up with
    /// `Exhausted`.
    pub fn max_configurations(mut self, max_configurations: usize) -> Self {
        self.max_configurations = max_configurations;
        self
    }

    /// Explores every computation of the machine on `input`, level by level.
    ///
    /// Within a level, configurations are visited in generation order and the first one
    /// in the accept state ends the search. Configurations in the reject state are not
    /// expanded. A configuration with no matching transition moves to the reject state
    /// with its tape untouched.
    pub fn explore(&self, input: &str) -> ExplorationResult {
        let mut arena = vec![Node {
            config: Configuration::initial(self.start_state, input),
            parent: None,
        }];
        let mut level: Vec<usize> = vec![0];

        for depth in 0..=self.max_depth {
            let total_transitions = arena.len() - 1;
            debug!(depth, frontier = level.len(), total_transitions, "exploring level");

            if !level.iter().any(|&i| self.is_live(&arena[i].config)) {
                info!(depth, total_transitions, "input rejected");
                return ExplorationResult::Rejected {
                    depth,
                    total_transitions,
                };
            }

            // The last level is only checked for acceptance.
            if depth == self.max_depth {
                if let Some(&i) = level
                    .iter()
                    .find(|&&i| arena[i].config.state == self.accept_state)
                {
                    return self.accept(&arena, i, depth);
                }
                break;
            }

            let mut next = Vec::new();
            for (position, &index) in level.iter().enumerate() {
                let config = &arena[index].config;

                if config.state == self.accept_state {
                    return self.accept(&arena, index, depth);
                }
                if config.state == self.reject_state {
                    continue;
                }

                let children = self.successors(config);
                if arena.len() - 1 + children.len() > self.max_configurations {
                    // Configurations later in this level are already generated and may accept.
                    if let Some(&i) = level[position..]
                        .iter()
                        .find(|&&i| arena[i].config.state == self.accept_state)
                    {
                        return self.accept(&arena, i, depth);
                    }
                    warn!(
                        depth,
                        limit = self.max_configurations,
                        "configuration budget exhausted"
                    );
                    return ExplorationResult::Exhausted {
                        depth,
                        total_transitions: arena.len() - 1,
                    };
                }

                for child in children {
                    next.push(arena.len());
                    arena.push(Node {
                        config: child,
                        parent: Some(index),
                    });
                }
            }

            level = next;
        }

        let total_transitions = arena.len() - 1;
        info!(depth = self.max_depth, total_transitions, "search timed out");
        ExplorationResult::TimedOut {
            depth: self.max_depth,
            total_transitions,
        }
    }

    /// A configuration is live if it accepts or can still be expanded.
    fn is_live(&self, config: &Configuration) -> bool {
        config.state == self.accept_state || config.state != self.reject_state
    }

    /// Builds the children of `config` in table order.
    fn successors(&self, config: &Configuration) -> Vec<Configuration> {
        match self.rules.get(&config.state, config.head()) {
            Some(moves) if !moves.is_empty() => {
                moves.iter().map(|t| apply(config, t)).collect()
            }
            _ => vec![Configuration {
                left: config.left.clone(),
                state: self.reject_state.to_string(),
                right: config.right.clone(),
            }],
        }
    }

    fn accept(&self, arena: &[Node], index: usize, depth: usize) -> ExplorationResult {
        let total_transitions = arena.len() - 1;
        info!(depth, total_transitions, "input accepted");
        ExplorationResult::Accepted {
            depth,
            total_transitions,
            path: reconstruct(arena, index),
        }
    }
}

/// Applies a single transition to `config`, producing a new configuration.
pub fn apply(config: &Configuration, transition: &Transition) -> Configuration {
    let (left, right) = shift(
        &config.left,
        &config.right,
        transition.write,
        transition.direction,
    );

    Configuration {
        left,
        state: transition.next_state.clone(),
        right,
    }
}

/// Rebuilds the path from the root of `arena` to the node at `index`, inclusive.
///
/// Returns an empty path when `index` does not belong to the arena.
pub fn reconstruct(arena: &[Node], index: usize) -> Vec<Configuration> {
    let mut path = Vec::new();
    let mut cursor = Some(index);

    while let Some(i) = cursor {
        let Some(node) = arena.get(i) else {
            return Vec::new();
        };
        path.push(node.config.clone());
        cursor = node.parent;
    }

    path.reverse();
    path
}

/// Explores the configuration tree of the machine given by its parts.
///
/// This is a shorthand for building an [`Explorer`] with the given depth bound and the
/// default configuration budget.
pub fn explore(
    start_state: &str,
    accept_state: &str,
    reject_state: &str,
    rules: &TransitionTable,
    input: &str,
    max_depth: usize,
) -> ExplorationResult {
    Explorer::from_parts(start_state, accept_state, reject_state, rules)
        .max_depth(max_depth)
        .explore(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, BLANK_SYMBOL};

    fn rule(next_state: &str, write: char, direction: Direction) -> Transition {
        Transition {
            next_state: next_state.to_string(),
            write,
            direction,
        }
    }

    /// Accepts strings over {0, 1} that contain at least one 1, guessing which 1 to stop at.
    fn guess_a_one() -> TransitionTable {
        let mut rules = TransitionTable::new();
        rules.insert(("q0".into(), '0'), vec![rule("q0", '0', Direction::Right)]);
        rules.insert(
            ("q0".into(), '1'),
            vec![
                rule("q0", '1', Direction::Right),
                rule("qa", '1', Direction::Right),
            ],
        );
        rules
    }

    /// Runs right forever over blanks.
    fn runaway() -> TransitionTable {
        let mut rules = TransitionTable::new();
        rules.insert(
            ("q0".into(), BLANK_SYMBOL),
            vec![rule("q0", BLANK_SYMBOL, Direction::Right)],
        );
        rules.insert(("q0".into(), '0'), vec![rule("q0", '0', Direction::Right)]);
        rules
    }

    #[test]
    fn test_accepts_on_first_branch_to_reach_accept_state() {
        let rules = guess_a_one();
        let result = explore("q0", "qa", "qr", &rules, "0101", 100);

        match result {
            ExplorationResult::Accepted {
                depth,
                total_transitions,
                path,
            } => {
                assert_eq!(depth, 2);
                // The q0 sibling ahead of the accepting node is expanded first.
                assert_eq!(total_transitions, 4);
                assert_eq!(path.len(), depth + 1);
                assert_eq!(path[0], Configuration::initial("q0", "0101"));
                assert_eq!(path[2].state, "qa");
                assert_eq!(path[2].left, vec!['0', '1']);
                assert_eq!(path[2].right, vec!['0', '1']);
            }
            other => panic!("Expected acceptance, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_entry_rejects_at_depth_one() {
        let rules = TransitionTable::new();
        let result = explore("q0", "qa", "qr", &rules, "0", 100);

        assert_eq!(
            result,
            ExplorationResult::Rejected {
                depth: 1,
                total_transitions: 1
            }
        );
    }

    #[test]
    fn test_all_branches_die_rejects() {
        let rules = guess_a_one();
        // No 1 anywhere: the single branch walks off into a blank with no rule.
        let result = explore("q0", "qa", "qr", &rules, "000", 100);

        assert_eq!(
            result,
            ExplorationResult::Rejected {
                depth: 4,
                total_transitions: 4
            }
        );
    }

    #[test]
    fn test_runaway_machine_times_out_at_bound() {
        let rules = runaway();
        let result = explore("q0", "qa", "qr", &rules, "0", 25);

        assert_eq!(
            result,
            ExplorationResult::TimedOut {
                depth: 25,
                total_transitions: 25
            }
        );
    }

    #[test]
    fn test_zero_depth_bound_only_checks_start() {
        let rules = runaway();
        let result = explore("q0", "qa", "qr", &rules, "0", 0);
        assert_eq!(
            result,
            ExplorationResult::TimedOut {
                depth: 0,
                total_transitions: 0
            }
        );

        let result = explore("qa", "qa", "qr", &rules, "0", 0);
        assert!(matches!(result, ExplorationResult::Accepted { depth: 0, .. }));
    }

    #[test]
    fn test_acceptance_on_the_bound_level_is_reported() {
        let mut rules = TransitionTable::new();
        rules.insert(("q0".into(), 'a'), vec![rule("qa", 'a', Direction::Right)]);

        let result = explore("q0", "qa", "qr", &rules, "a", 1);
        assert!(matches!(
            result,
            ExplorationResult::Accepted {
                depth: 1,
                total_transitions: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_start_in_reject_state() {
        let rules = runaway();
        let result = explore("qr", "qa", "qr", &rules, "0", 10);

        assert_eq!(
            result,
            ExplorationResult::Rejected {
                depth: 0,
                total_transitions: 0
            }
        );
    }

    #[test]
    fn test_accept_check_wins_over_reject_check() {
        let rules = TransitionTable::new();
        let result = explore("q", "q", "q", &rules, "", 10);

        assert!(matches!(result, ExplorationResult::Accepted { depth: 0, .. }));
    }

    #[test]
    fn test_configuration_budget_is_enforced() {
        // Two children per step: the tree doubles on every level.
        let mut rules = TransitionTable::new();
        rules.insert(
            ("q0".into(), BLANK_SYMBOL),
            vec![
                rule("q0", '0', Direction::Right),
                rule("q0", '1', Direction::Right),
            ],
        );

        let result = Explorer::from_parts("q0", "qa", "qr", &rules)
            .max_depth(100)
            .max_configurations(10)
            .explore("");

        // Levels 1 and 2 hold 6; the budget runs out on the third node of level 2.
        assert_eq!(
            result,
            ExplorationResult::Exhausted {
                depth: 2,
                total_transitions: 10
            }
        );
    }

    #[test]
    fn test_budget_exhaustion_still_reports_acceptance_in_the_same_level() {
        let mut rules = TransitionTable::new();
        rules.insert(
            ("q0".into(), 'a'),
            vec![
                rule("q1", 'a', Direction::Right),
                rule("qa", 'a', Direction::Right),
            ],
        );
        rules.insert(
            ("q1".into(), BLANK_SYMBOL),
            vec![rule("q1", BLANK_SYMBOL, Direction::Right); 5],
        );

        let result = Explorer::from_parts("q0", "qa", "qr", &rules)
            .max_configurations(3)
            .explore("a");

        match result {
            ExplorationResult::Accepted {
                depth,
                total_transitions,
                path,
            } => {
                assert_eq!(depth, 1);
                assert_eq!(total_transitions, 2);
                assert_eq!(path.len(), 2);
                assert_eq!(path[1].state, "qa");
            }
            other => panic!("Expected acceptance, got {:?}", other),
        }
    }

    #[test]
    fn test_first_accepting_configuration_in_generation_order_wins() {
        // Two moves into the accept state at the same depth, behind a sibling that is
        // expanded first.
        let mut rules = TransitionTable::new();
        rules.insert(
            ("q0".into(), 'a'),
            vec![
                rule("q1", 'a', Direction::Right),
                rule("qa", 'x', Direction::Right),
                rule("qa", 'y', Direction::Left),
            ],
        );
        rules.insert(
            ("q1".into(), BLANK_SYMBOL),
            vec![rule("q1", BLANK_SYMBOL, Direction::Right)],
        );

        let result = explore("q0", "qa", "qr", &rules, "a", 10);

        match result {
            ExplorationResult::Accepted {
                depth,
                total_transitions,
                path,
            } => {
                assert_eq!(depth, 1);
                // Three children at level 1, plus the child of q1 generated before qa is reached.
                assert_eq!(total_transitions, 4);
                let last = path.last().unwrap();
                assert_eq!(last.state, "qa");
                assert_eq!(last.left, vec!['x']);
                assert_eq!(last.right, vec![BLANK_SYMBOL]);
            }
            other => panic!("Expected acceptance, got {:?}", other),
        }
    }

    #[test]
    fn test_reject_children_count_toward_total() {
        let mut rules = TransitionTable::new();
        rules.insert(
            ("q0".into(), 'a'),
            vec![
                rule("qr", 'a', Direction::Right),
                rule("qr", 'b', Direction::Left),
                rule("q1", 'a', Direction::Right),
            ],
        );

        let result = explore("q0", "qa", "qr", &rules, "a", 10);

        // Level 1 holds three children; q1 has no rule on blank and rejects at level 2.
        assert_eq!(
            result,
            ExplorationResult::Rejected {
                depth: 2,
                total_transitions: 4
            }
        );
    }

    #[test]
    fn test_reconstruct_follows_parents() {
        let arena = vec![
            Node {
                config: Configuration::initial("q0", "a"),
                parent: None,
            },
            Node {
                config: Configuration::initial("q1", "a"),
                parent: Some(0),
            },
            Node {
                config: Configuration::initial("q2", "a"),
                parent: Some(0),
            },
            Node {
                config: Configuration::initial("q3", "a"),
                parent: Some(2),
            },
        ];

        let states: Vec<_> = reconstruct(&arena, 3)
            .into_iter()
            .map(|c| c.state)
            .collect();
        assert_eq!(states, vec!["q0", "q2", "q3"]);

        assert_eq!(reconstruct(&arena, 0).len(), 1);
        assert!(reconstruct(&arena, 9).is_empty());
    }
}
