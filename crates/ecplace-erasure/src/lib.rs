//! ecplace Erasure - Repair-cost models for erasure codes
//!
//! This crate answers one question for every supported code family: when
//! fragment `i` of a stripe is lost, how much must be read from fragment `j`
//! to rebuild it? No encoding or decoding happens here; the costs feed the
//! recovery-load accounting of the placement crate.
//!
//! # Code Families
//!
//! - **RS**: every surviving fragment is read (unified recovery)
//! - **LRC**: a data fragment is rebuilt from its local group; a global
//!   parity fragment is rebuilt from everything outside its own region
//! - **Clay**: modeled like RS; sub-packetized repair savings are not counted
//!
//! # Example
//!
//! ```
//! use ecplace_common::ErasureCode;
//! use ecplace_erasure::{RepairMatrix, repair_cost};
//!
//! let code = ErasureCode::LRC_12_10_2;
//! assert_eq!(repair_cost(&code, 0, 3), 1);
//! assert_eq!(repair_cost(&code, 0, 7), 0);
//!
//! let matrix = RepairMatrix::new(&code).unwrap();
//! let reads: u64 = (0..matrix.width()).map(|j| matrix.cost(0, j)).sum();
//! assert_eq!(reads, 4);
//! ```

pub mod matrix;
pub mod repair;

pub use matrix::RepairMatrix;
pub use repair::{clay_repair_cost, lrc_repair_cost, repair_cost, rs_repair_cost};
