pub mod initialize_distributor;
pub mod initialize_grant;
pub mod transfer_grant;
pub mod redeem_grant;
pub mod memo;
pub mod schema;

pub use initialize_distributor::*;
pub use initialize_grant::*;
pub use transfer_grant::*;
pub use redeem_grant::*;
pub use memo::*;
pub use schema::*;
