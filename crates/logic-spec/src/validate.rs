use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::answers::ValidationResult;
use crate::spec::question::Question;
use crate::spec::rule::LogicRule;

/// Checks a rule set before it is saved.
///
/// Reports cycles in the `source -> target` graph, rules that target their
/// own source, and rules referring to unknown questions. Advisory only: the
/// caller decides whether to refuse the save.
pub fn validate(rules: &[LogicRule], questions: &[Question]) -> ValidationResult {
    let mut errors = Vec::new();
    let graph = JumpGraph::new(rules);

    for cycle in graph.cycles(questions) {
        errors.push(format!("circular reference detected: {}", cycle.join(" -> ")));
    }

    let known: BTreeSet<&str> = questions.iter().map(|q| q.id.as_str()).collect();
    for rule in rules {
        if rule.target_question_id.as_deref() == Some(rule.source_question_id.as_str()) {
            errors.push(format!(
                "rule {}: question {} cannot reference itself",
                rule.id, rule.source_question_id
            ));
        }
        if !known.contains(rule.source_question_id.as_str()) {
            errors.push(format!(
                "rule {}: source question {} not found",
                rule.id, rule.source_question_id
            ));
        }
        if let Some(target) = &rule.target_question_id
            && !known.contains(target.as_str())
        {
            errors.push(format!(
                "rule {}: target question {} not found",
                rule.id, target
            ));
        }
    }

    let result = ValidationResult::from_errors(errors);
    debug!(
        rules = rules.len(),
        errors = result.errors.len(),
        "rule graph validated"
    );
    result
}

/// Directed edges `source -> target` for every rule carrying a target.
struct JumpGraph<'a> {
    edges: BTreeMap<&'a str, Vec<&'a str>>,
}

#[derive(Default)]
struct Search<'a> {
    visited: BTreeSet<&'a str>,
    on_stack: BTreeSet<&'a str>,
    /// Active path: each node with the index of its next unexplored edge.
    frames: Vec<(&'a str, usize)>,
    cycles: Vec<Vec<String>>,
}

impl<'a> Search<'a> {
    fn enter(&mut self, node: &'a str) {
        self.visited.insert(node);
        self.on_stack.insert(node);
        self.frames.push((node, 0));
    }

    fn record_cycle(&mut self, next: &'a str) {
        if let Some(start) = self.frames.iter().position(|(active, _)| *active == next) {
            let mut cycle: Vec<String> = self.frames[start..]
                .iter()
                .map(|(id, _)| id.to_string())
                .collect();
            cycle.push(next.to_string());
            self.cycles.push(cycle);
        }
    }
}

impl<'a> JumpGraph<'a> {
    fn new(rules: &'a [LogicRule]) -> Self {
        let mut edges: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for rule in rules {
            if let Some(target) = &rule.target_question_id {
                edges
                    .entry(rule.source_question_id.as_str())
                    .or_default()
                    .push(target.as_str());
            }
        }
        Self { edges }
    }

    /// Every back edge found by a DFS started from each unvisited question,
    /// then from any remaining edge source. Each cycle is reported from the
    /// revisited node back to itself.
    fn cycles(&self, questions: &'a [Question]) -> Vec<Vec<String>> {
        let mut search = Search::default();
        let roots = questions
            .iter()
            .map(|question| question.id.as_str())
            .chain(self.edges.keys().copied());
        for root in roots {
            if !search.visited.contains(root) {
                self.visit(root, &mut search);
            }
        }
        search.cycles
    }

    fn visit(&self, root: &'a str, search: &mut Search<'a>) {
        search.enter(root);
        while let Some(frame) = search.frames.last_mut() {
            let (node, index) = *frame;
            let Some(&next) = self.edges.get(node).and_then(|targets| targets.get(index)) else {
                search.frames.pop();
                search.on_stack.remove(node);
                continue;
            };
            frame.1 += 1;
            if search.on_stack.contains(next) {
                search.record_cycle(next);
            } else if !search.visited.contains(next) {
                search.enter(next);
            }
        }
    }
}
