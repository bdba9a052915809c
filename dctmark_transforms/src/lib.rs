pub mod dct;

pub use dct::{forward_block_dct, inverse_block_dct, Block, BLOCK, ZERO_BLOCK};
