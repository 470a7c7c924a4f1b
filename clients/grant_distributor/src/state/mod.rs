pub mod distributor_state;

pub use distributor_state::*;
