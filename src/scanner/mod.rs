mod baseline;
mod engine;
mod input;
mod registry;

pub use baseline::BaselineCollector;
pub use engine::{ProgressEvent, Scanner};
pub use input::{EndpointFileParser, ParseError};
pub use registry::{DEFAULT_RETENTION, ScanEntry, ScanRegistry, ScanStatus};
