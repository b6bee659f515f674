mod decode;
mod encode;

pub use decode::{decode_compact, decode_var_octets};
pub use encode::{encode_compact, encode_var_octets};
