//! The Graft batch source-transformation pipeline.
//!
//! Once per compilation round, a host toolchain hands Graft a batch of
//! already-parsed source units. Graft rebuilds each into a lossless mirror
//! tree, applies the activated recipe set to a bounded fixed point, and
//! aggregates every change into a single patch artifact. One broken unit
//! never aborts the batch, and nothing Graft does can fail the host's
//! build: the presence or absence of the patch file is the outcome.
//!
//! ```rust,ignore
//! use graft_config::{ConfigSource, RoundConfig};
//! use graft_pipeline::{MemoryHost, MemoryUnit, RoundOptions, run_round};
//! use graft_recipes::RecipeRegistry;
//!
//! let config = RoundConfig::from_source(&ConfigSource::new());
//! let registry = RecipeRegistry::with_builtins();
//! let host = MemoryHost::new(units);
//! let outcome = run_round(&host, &registry, &config, &RoundOptions::from_environment());
//! ```

mod diagnostics;
mod host;
mod locator;
mod memory;
mod patch;
mod result;
mod round;
pub mod telemetry;

pub use diagnostics::{Diagnostic, Severity};
pub use host::{ContentAccessor, HostReadError, HostTree, HostUnit, SourceHost};
pub use locator::{LocateError, SourceUnit, locate};
pub use memory::{MemoryHost, MemoryParseError, MemoryTypes, MemoryUnit};
pub use patch::{PATCH_DIR, PATCH_FILE_NAME, PatchWriteError, PatchWriter};
pub use result::UnitResult;
pub use round::{RoundOptions, RoundOutcome, run_round};
