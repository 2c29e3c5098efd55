pub mod analyzer;
pub mod cli;
pub mod http;
pub mod injector;
pub mod models;
pub mod payloads;
pub mod reporter;
pub mod scanner;

pub use analyzer::Analyzer;
pub use injector::Injector;
pub use models::{
    AnalysisResult, Confidence, EndpointDescriptor, HttpMethod, InjectLocation, InjectionVariant,
    ResponseCapture, ScanOptions, ScanReport, Severity, TestRecord, Verdict, VulnType,
};
pub use reporter::{ConsoleReporter, HtmlExporter, JsonExporter};
pub use scanner::{EndpointFileParser, ScanRegistry, Scanner};
