// Alpha and phi: per-core authorizer pools and their feeding queues. Each
// block drains one queued authorizer per core into the pool and retires one
// occurrence of each accumulated report's authorizer from the pool of the
// core the report was promoted from.

use jam_types::{AuthPools, AuthQueues, CoreIndex, WorkReport};

pub fn update_pools(
    pools: &mut AuthPools,
    queues: &mut AuthQueues,
    reports: &[(CoreIndex, WorkReport)],
) {
    for (pool, queue) in pools.iter_mut().zip(queues.iter_mut()) {
        if let Some(authorizer) = queue.pop_front() {
            pool.push(authorizer);
        }
    }

    // Remove the first occurrence from the report's own core pool; an absent
    // hash is a no-op.
    for (core, report) in reports {
        let Some(pool) = pools.get_mut(*core as usize) else {
            continue;
        };
        if let Some(position) = pool.iter().position(|hash| *hash == report.authorizer_hash) {
            pool.remove(position);
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use jam_types::{AvailabilitySpec, RefineContext};
    use std::collections::VecDeque;

    fn report(authorizer_hash: [u8; 32]) -> WorkReport {
        WorkReport {
            authorizer_hash,
            output: Vec::new(),
            context: RefineContext {
                anchor: [0u8; 32],
                state_root: [0u8; 32],
                beefy_root: [0u8; 32],
                lookup_anchor: [0u8; 32],
                lookup_anchor_slot: 0,
                prerequisite: None,
            },
            package_spec: AvailabilitySpec {
                hash: [0u8; 32],
                length: 0,
                erasure_root: [0u8; 32],
                exports_root: [0u8; 32],
            },
            results: Vec::new(),
        }
    }

    #[test]
    fn one_queued_authorizer_drains_per_core() {
        let mut pools: AuthPools = vec![Vec::new(), vec![[9u8; 32]]];
        let mut queues: AuthQueues = vec![
            VecDeque::from(vec![[1u8; 32], [2u8; 32]]),
            VecDeque::new(),
        ];

        update_pools(&mut pools, &mut queues, &[]);

        assert_eq!(pools[0], vec![[1u8; 32]]);
        assert_eq!(pools[1], vec![[9u8; 32]]);
        assert_eq!(queues[0], VecDeque::from(vec![[2u8; 32]]));
    }

    #[test]
    fn accumulated_report_retires_one_occurrence() {
        let mut pools: AuthPools = vec![vec![[7u8; 32], [7u8; 32]]];
        let mut queues: AuthQueues = vec![VecDeque::new()];

        update_pools(&mut pools, &mut queues, &[(0, report([7u8; 32]))]);

        assert_eq!(pools[0], vec![[7u8; 32]]);
    }

    #[test]
    fn removal_is_scoped_to_the_report_core() {
        // Two cores share the same authorizer hash; only the promoting
        // core's pool loses its entry.
        let mut pools: AuthPools = vec![vec![[7u8; 32]], vec![[7u8; 32]]];
        let mut queues: AuthQueues = vec![VecDeque::new(), VecDeque::new()];

        update_pools(&mut pools, &mut queues, &[(1, report([7u8; 32]))]);

        assert_eq!(pools[0], vec![[7u8; 32]]);
        assert!(pools[1].is_empty());
    }

    #[test]
    fn absent_authorizer_is_a_no_op() {
        let mut pools: AuthPools = vec![vec![[1u8; 32]]];
        let mut queues: AuthQueues = vec![VecDeque::new()];

        update_pools(&mut pools, &mut queues, &[(0, report([5u8; 32]))]);

        assert_eq!(pools[0], vec![[1u8; 32]]);
    }

    #[test]
    fn out_of_range_core_is_a_no_op() {
        let mut pools: AuthPools = vec![vec![[1u8; 32]]];
        let mut queues: AuthQueues = vec![VecDeque::new()];

        update_pools(&mut pools, &mut queues, &[(5, report([1u8; 32]))]);

        assert_eq!(pools[0], vec![[1u8; 32]]);
    }

    #[test]
    fn order_is_preserved_on_removal() {
        let mut pools: AuthPools = vec![vec![[1u8; 32], [2u8; 32], [3u8; 32]]];
        let mut queues: AuthQueues = vec![VecDeque::new()];

        update_pools(&mut pools, &mut queues, &[(0, report([2u8; 32]))]);

        assert_eq!(pools[0], vec![[1u8; 32], [3u8; 32]]);
    }
}
