mod digest;
mod quality;

pub use digest::{NewDigest, PaperDigest};
pub use quality::QualityReport;
