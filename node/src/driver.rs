use codec::Encode;
use constants::Config;
use crypto::Verifier;
use jam_types::{Block, Extrinsic, GlobalState, Header, ProcessError, TimeSlot};

use block::header::{extrinsic_hash, unsealed_hash};

/// Build the genesis block: slot 1 on top of the zero state, carrying no
/// extrinsics.
pub fn genesis_block() -> Block {
    let extrinsic = Extrinsic::default();
    let mut header = Header::default();
    header.unsigned.slot = 1;
    header.unsigned.extrinsic_hash = extrinsic_hash(&extrinsic);
    Block { header, extrinsic }
}

/// The empty successor of a block.
pub fn next_block(parent: &Header) -> Block {
    let extrinsic = Extrinsic::default();
    let mut header = Header::default();
    header.unsigned.slot = parent.unsigned.slot + 1;
    header.unsigned.parent = unsealed_hash(parent);
    header.unsigned.extrinsic_hash = extrinsic_hash(&extrinsic);
    Block { header, extrinsic }
}

/// Apply `blocks` empty blocks to the all-zero state, returning the final
/// timeslot.
pub fn run_chain(blocks: u32, encode_state: bool) -> Result<TimeSlot, ProcessError> {
    let config = Config::default();
    let mut state = GlobalState::new(&config);

    let mut block = genesis_block();
    let mut parent: Option<Header> = None;

    for height in 0..blocks {
        log::debug!("applying block {} at slot {}", height, block.header.unsigned.slot);
        state = state::process_block(
            &block,
            parent.as_ref(),
            block.header.unsigned.slot,
            state,
            &config,
            &Verifier,
        )?;
        parent = Some(block.header.clone());
        block = next_block(&block.header);
    }

    log::info!(
        "applied {} blocks, recent history holds {} entries, entropy {}",
        blocks,
        state.recent_history.blocks.len(),
        utils::print_hash!(state.entropy.buf[0])
    );
    if encode_state {
        log::info!("encoded state is {} octets", state.encode().len());
    }

    Ok(state.time)
}
