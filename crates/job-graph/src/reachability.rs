//! Directed reachability over job hops
//!
//! Used by design tools to refuse hops that would turn the job into a loop.
//! Every hop counts, enabled or not: a disabled hop can be re-enabled at any
//! time, so it must not hide a loop.

use std::collections::HashSet;

use crate::graph::JobGraph;
use crate::types::EntryId;

impl JobGraph {
    /// Whether `target` can be reached from `source` by following hops
    ///
    /// At least one hop must be traversed, so an entry only reaches itself
    /// through a self-hop or a loop. Terminates on cyclic graphs.
    pub fn is_path_exist(&self, source: EntryId, target: EntryId) -> bool {
        let mut visited: HashSet<EntryId> = HashSet::new();
        let mut stack: Vec<EntryId> = self.outgoing_hops(source).map(|h| h.to).collect();

        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if visited.insert(current) {
                stack.extend(self.outgoing_hops(current).map(|h| h.to));
            }
        }
        false
    }

    /// Whether `id` sits on a loop
    pub fn has_loop(&self, id: EntryId) -> bool {
        self.is_path_exist(id, id)
    }

    /// Whether adding a hop `from -> to` would close a loop
    pub fn would_create_cycle(&self, from: EntryId, to: EntryId) -> bool {
        from == to || self.is_path_exist(to, from)
    }

    /// Every entry reachable from `source`, in no particular order
    pub fn reachable_from(&self, source: EntryId) -> HashSet<EntryId> {
        let mut visited: HashSet<EntryId> = HashSet::new();
        let mut stack: Vec<EntryId> = self.outgoing_hops(source).map(|h| h.to).collect();

        while let Some(current) = stack.pop() {
            if visited.insert(current) {
                stack.extend(self.outgoing_hops(current).map(|h| h.to));
            }
        }
        visited
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::entry::SpecialEntry;
    use crate::error::JobGraphError;
    use crate::graph::JobGraph;
    use crate::types::{EntryId, Hop, JobEntryNode};

    fn add(graph: &mut JobGraph, name: &str) -> EntryId {
        graph.push_entry(JobEntryNode::new(Arc::new(SpecialEntry::named(name))))
    }

    /// je1 -> je2, je1 -> je3, je3 -> je4
    fn branching() -> (JobGraph, [EntryId; 4]) {
        let mut graph = JobGraph::named("paths");
        let je1 = add(&mut graph, "je1");
        let je2 = add(&mut graph, "je2");
        let je3 = add(&mut graph, "je3");
        let je4 = add(&mut graph, "je4");
        graph.add_hop(Hop::new(je1, je2)).unwrap();
        graph.add_hop(Hop::new(je1, je3)).unwrap();
        graph.add_hop(Hop::new(je3, je4)).unwrap();
        (graph, [je1, je2, je3, je4])
    }

    #[test]
    fn test_path_exists() {
        let (graph, [je1, _, _, je4]) = branching();
        assert!(graph.is_path_exist(je1, je4));
    }

    #[test]
    fn test_path_not_exists() {
        let (graph, [_, je2, _, je4]) = branching();
        assert!(!graph.is_path_exist(je2, je4));
    }

    #[test]
    fn test_no_path_against_hop_direction() {
        let (graph, [je1, _, je3, _]) = branching();
        assert!(!graph.is_path_exist(je3, je1));
    }

    #[test]
    fn test_self_without_hop() {
        let (graph, [je1, ..]) = branching();
        assert!(!graph.is_path_exist(je1, je1));
        assert!(!graph.has_loop(je1));
    }

    #[test]
    fn test_explicit_self_hop() {
        let (mut graph, [_, je2, ..]) = branching();
        graph.add_hop(Hop::new(je2, je2)).unwrap();
        assert!(graph.is_path_exist(je2, je2));
        assert!(graph.has_loop(je2));
    }

    #[test]
    fn test_terminates_on_cycle() {
        let mut graph = JobGraph::new();
        let a = add(&mut graph, "a");
        let b = add(&mut graph, "b");
        let c = add(&mut graph, "c");
        graph.add_hop(Hop::new(a, b)).unwrap();
        graph.add_hop(Hop::new(b, a)).unwrap();

        assert!(graph.is_path_exist(a, b));
        assert!(graph.is_path_exist(a, a));
        assert!(!graph.is_path_exist(a, c));
        assert!(!graph.is_path_exist(c, a));
    }

    #[test]
    fn test_disabled_hops_still_count() {
        let mut graph = JobGraph::new();
        let a = add(&mut graph, "a");
        let b = add(&mut graph, "b");
        graph.add_hop(Hop::new(a, b).with_enabled(false)).unwrap();
        assert!(graph.is_path_exist(a, b));
    }

    #[test]
    fn test_would_create_cycle() {
        let (graph, [je1, je2, je3, je4]) = branching();
        assert!(graph.would_create_cycle(je4, je1));
        assert!(graph.would_create_cycle(je2, je2));
        assert!(!graph.would_create_cycle(je2, je4));
        assert!(!graph.would_create_cycle(je1, je4));
        assert!(!graph.would_create_cycle(je3, je2));
    }

    #[test]
    fn test_add_hop_checked_refuses_loop() {
        let (mut graph, [je1, _, _, je4]) = branching();
        let err = graph.add_hop_checked(Hop::new(je4, je1)).unwrap_err();
        assert!(matches!(err, JobGraphError::HopCreatesCycle { .. }));
        assert_eq!(graph.nr_hops(), 3);
    }

    #[test]
    fn test_reachable_from() {
        let (graph, [je1, je2, je3, je4]) = branching();
        let reachable = graph.reachable_from(je1);
        assert_eq!(reachable.len(), 3);
        assert!(reachable.contains(&je2) && reachable.contains(&je3) && reachable.contains(&je4));
        assert!(graph.reachable_from(je4).is_empty());
    }
}
