//! Session parameter discovery.
//!
//! The public key, salt, and IV are not published directly. They are picked
//! out of `RoutesList.v.json` using indices computed from that document and
//! from `RoutesList.json`:
//! - public key: `arr[Σ ZoomLevel]`
//! - salt: `s[len(s[0])]`
//! - IV: `v[len(v[0])]`
//!
//! The indirection is part of the upstream contract and is kept as-is.

mod resolver;
mod types;

pub use resolver::{ParameterResolver, master_index, select_parameters};
pub use types::{CryptoParameters, RouteEntry, RoutesListVersioned};
