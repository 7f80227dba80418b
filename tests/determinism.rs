//! Byte-for-byte reproducibility of the wiring kernel across runs and
//! worker counts, plus randomized adjacency properties.

use std::collections::HashMap;

use mesh_weave::prelude::*;
use parking_lot::Mutex;
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn v(raw: u64) -> VertexOffset {
    VertexOffset::new(raw).unwrap()
}
fn p(raw: u64) -> PointOffset {
    PointOffset::new(raw).unwrap()
}

fn wire_fresh(assignment: &[i64], points: usize) -> (AtomicMeshTopology, Vec<VertexOffset>) {
    let topo = AtomicMeshTopology::with_capacity(points, assignment.len());
    let lock = Mutex::new(());
    let shared = wire_vertex_batch(
        &topo,
        VertexBatch::new(v(1), assignment.len()),
        PointBatch::new(p(1)),
        PointAssignment::Explicit(assignment),
        &lock,
    );
    (topo, shared)
}

fn snapshots(topo: &AtomicMeshTopology) -> [Vec<u64>; 4] {
    [
        topo.vertex_to_point.snapshot(),
        topo.point_to_vertex.snapshot(),
        topo.vertex_to_next.snapshot(),
        topo.vertex_to_prev.snapshot(),
    ]
}

#[test]
fn identical_inputs_give_identical_attributes() {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    let assignment: Vec<i64> = (0..4000).map(|_| rng.gen_range(0..64)).collect();

    let (first, shared_first) = wire_fresh(&assignment, 64);
    let (second, shared_second) = wire_fresh(&assignment, 64);

    assert_eq!(snapshots(&first), snapshots(&second));
    assert_eq!(shared_first, shared_second);
}

#[test]
fn worker_count_does_not_change_output() {
    let mut rng = SmallRng::seed_from_u64(42);
    let assignment: Vec<i64> = (0..4000).map(|_| rng.gen_range(0..64)).collect();

    let (wide, shared_wide) = wire_fresh(&assignment, 64);

    let serial_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .unwrap();
    let (narrow, shared_narrow) = serial_pool.install(|| wire_fresh(&assignment, 64));

    assert_eq!(snapshots(&wide), snapshots(&narrow));
    assert_eq!(shared_wide, shared_narrow);
}

proptest! {
    #[test]
    fn wiring_properties_hold_for_random_assignments(
        assignment in prop::collection::vec(0i64..40, 1..200),
    ) {
        let (topo, shared) = wire_fresh(&assignment, 40);
        let (again, shared_again) = wire_fresh(&assignment, 40);

        // determinism
        prop_assert_eq!(snapshots(&topo), snapshots(&again));
        prop_assert_eq!(&shared, &shared_again);

        topo.validate_invariants().unwrap();

        let mut per_point: HashMap<i64, Vec<u64>> = HashMap::new();
        for (i, &k) in assignment.iter().enumerate() {
            per_point.entry(k).or_default().push(i as u64 + 1);
        }

        // the non-singleton list names exactly the vertices on shared
        // points, in ascending offset order
        let mut expected: Vec<u64> = assignment
            .iter()
            .enumerate()
            .filter(|(_, k)| per_point[*k].len() >= 2)
            .map(|(i, _)| i as u64 + 1)
            .collect();
        expected.sort_unstable();
        let got: Vec<u64> = shared.iter().map(|w| w.get()).collect();
        prop_assert_eq!(got, expected);

        for (&k, members) in &per_point {
            let point = p(k as u64 + 1);
            if members.len() == 1 {
                // singleton: pair cleared, no chain
                let lone = v(members[0]);
                prop_assert_eq!(topo.vertex_to_point.get(lone), None);
                prop_assert_eq!(topo.point_to_vertex.get(point), None);
                prop_assert_eq!(topo.vertex_to_next.get(lone), None);
                prop_assert_eq!(topo.vertex_to_prev.get(lone), None);
            } else {
                // chain visits each referencing vertex exactly once, in
                // batch order (the stable tie-break)
                let mut chain = Vec::new();
                let mut at = topo.point_to_vertex.get(point);
                while let Some(vtx) = at {
                    prop_assert!(chain.len() <= members.len(), "cycle in chain");
                    chain.push(vtx.get());
                    at = topo.vertex_to_next.get(vtx);
                }
                prop_assert_eq!(&chain, members);
            }
        }
    }
}
