pub mod gene;
pub mod interval;
pub mod peak;
pub mod region;
pub mod region_set;
pub mod sample;
pub mod strand;

// re-export for cleaner imports
pub use self::gene::GeneFeature;
pub use self::interval::Interval;
pub use self::peak::{ClassifiedPeak, class_label};
pub use self::region::Region;
pub use self::region_set::RegionSet;
pub use self::sample::Sample;
pub use self::strand::Strand;
