#![no_main]

use std::collections::BTreeSet;

use kiln_core::graph::{Graph, find_cycle, reachable_nodes, reverse};
use libfuzzer_sys::fuzz_target;

// Bytes are read in pairs: the high nibble of the first byte is the key, the
// second byte is a successor bitmask over nodes 0..8.
fuzz_target!(|data: &[u8]| {
    let graph: Graph<u8> = Graph::from_pairs(data.chunks_exact(2).map(|pair| {
        let successors: BTreeSet<u8> = (0..8).filter(|bit| pair[1] & (1 << bit) != 0).collect();
        (pair[0] >> 4, successors)
    }));

    if let Some(cycle) = find_cycle(&graph) {
        assert!(!cycle.is_empty());
        for (from, to) in cycle.edges() {
            assert!(graph.neighbours(from).contains(to));
        }
    }

    let reversed = reverse(&graph);
    assert_eq!(reversed.edge_count(), graph.edge_count());
    for (from, to) in graph.edges() {
        assert!(reversed.neighbours(to).contains(from));
    }

    let seeds: BTreeSet<u8> = data.first().map(|b| b & 0x0f).into_iter().collect();
    let reached = reachable_nodes(&seeds, &graph);
    for node in reached.iter().chain(&seeds) {
        assert!(graph.neighbours(node).is_subset(&reached));
    }
});
