//! Interval overlap index for consensus site building.
//!
//! Everything in `psites` that needs "which records overlap this one" goes
//! through this crate: the overlap-aggregate and overlap-join operations of the
//! in-process interval engine are both built on [`MultiChromOverlapper`].
//!
//! ## Quick Start
//!
//! ```rust
//! use psites_overlaprs::{AIList, Overlapper, Interval};
//!
//! let genes = vec![
//!     Interval { start: 1000u32, end: 2000, val: "GENE1" },
//!     Interval { start: 1500, end: 2500, val: "GENE2" },
//!     Interval { start: 5000, end: 6000, val: "GENE3" },
//! ];
//!
//! let ailist = AIList::build(genes);
//! assert_eq!(ailist.find(1800, 2200).len(), 2);
//! ```

/// Augmented Interval List implementation.
///
/// See [`AIList`] for details.
pub mod ailist;

/// Per-chromosome index over a whole [`RegionSet`](psites_core::models::RegionSet).
pub mod multi_chrom_overlapper;

/// Core traits for overlap operations.
///
/// See [`Overlapper`] for the main trait.
pub mod traits;

// re-exports
pub use self::ailist::AIList;
pub use self::multi_chrom_overlapper::{IntoMultiChromOverlapper, MultiChromOverlapper};
pub use self::traits::{Interval, Overlapper};
