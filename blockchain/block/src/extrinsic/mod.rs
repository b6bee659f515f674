// The five extrinsic sub-transitions, applied in their fixed order: tickets,
// judgements, preimages, assurances, guarantees.

pub mod assurances;
pub mod guarantees;
pub mod judgements;
pub mod preimages;
pub mod tickets;
