mod endpoint;
mod report;
mod response;
mod vulnerability;

pub use endpoint::{EndpointDescriptor, HttpMethod, InjectionVariant};
pub use report::{
    EndpointScanResult, InjectLocation, ScanOptions, ScanReport, ScanSummary, TestRecord,
    Verdict, VulnerabilityFinding,
};
pub use response::{Baseline, ResponseCapture, TransportError};
pub use vulnerability::{AnalysisResult, Confidence, Severity, VulnType};
