// Beta: the recent-history window, a bounded queue of per-block records with
// the newest block first.

use jam_types::{BlockHistory, BlockInfo};

pub fn push(history: &mut BlockHistory, info: BlockInfo, window: u32) {
    history.blocks.push_front(info);
    history.blocks.truncate(window as usize);
}

#[cfg(test)]
mod tests {

    use super::*;

    fn info(tag: u8) -> BlockInfo {
        BlockInfo {
            header_hash: [tag; 32],
            accumulate_root: [0u8; 32],
            state_root: [0u8; 32],
            reported: Vec::new(),
        }
    }

    #[test]
    fn newest_block_leads() {
        let mut history = BlockHistory::default();
        push(&mut history, info(1), 24);
        push(&mut history, info(2), 24);
        assert_eq!(history.blocks[0].header_hash, [2u8; 32]);
        assert_eq!(history.blocks[1].header_hash, [1u8; 32]);
    }

    #[test]
    fn window_evicts_the_oldest() {
        let mut history = BlockHistory::default();
        for tag in 0..30u8 {
            push(&mut history, info(tag), 24);
        }
        assert_eq!(history.blocks.len(), 24);
        assert_eq!(history.blocks[0].header_hash, [29u8; 32]);
        assert_eq!(history.blocks[23].header_hash, [6u8; 32]);
    }
}
