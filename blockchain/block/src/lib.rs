pub mod extrinsic;
pub mod header;
