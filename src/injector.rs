use serde_json::Value;

use crate::models::{EndpointDescriptor, InjectLocation, InjectionVariant};

pub const TEST_HEADER: &str = "X-Test-Header";
const QUERY_FALLBACK_KEY: &str = "q";
const BODY_FALLBACK_KEY: &str = "input";
const NO_RULE_FALLBACK_KEY: &str = "test";

pub struct Injector;

impl Injector {
    /// Produces the ordered variant list for one payload: existing query
    /// keys, added `q` key, existing body keys, added `input` key, test
    /// header, URL path suffix. Downstream takes a bounded prefix, so this
    /// order is load-bearing. Always yields at least one variant.
    pub fn inject(
        endpoint: &EndpointDescriptor,
        payload: &str,
        location: InjectLocation,
    ) -> Vec<InjectionVariant> {
        let mut variants = Vec::new();

        if matches!(location, InjectLocation::Query | InjectLocation::All) {
            variants.extend(Self::query_variants(endpoint, payload));
        }
        if matches!(location, InjectLocation::Body | InjectLocation::All) {
            variants.extend(Self::body_variants(endpoint, payload));
        }
        if matches!(location, InjectLocation::Header | InjectLocation::All) {
            variants.push(Self::header_variant(endpoint, payload));
        }
        if matches!(location, InjectLocation::Path | InjectLocation::All) {
            variants.push(Self::path_variant(endpoint, payload));
        }

        if variants.is_empty() {
            let mut fallback = endpoint.spawn_variant();
            fallback
                .query_params
                .insert(NO_RULE_FALLBACK_KEY.to_string(), payload.to_string());
            variants.push(InjectionVariant::new(
                fallback,
                format!("query:{} (fallback)", NO_RULE_FALLBACK_KEY),
            ));
        }

        variants
    }

    fn query_variants(endpoint: &EndpointDescriptor, payload: &str) -> Vec<InjectionVariant> {
        let mut variants = Vec::new();

        for key in endpoint.query_params.keys() {
            let mut variant = endpoint.spawn_variant();
            variant
                .query_params
                .insert(key.clone(), payload.to_string());
            variants.push(InjectionVariant::new(variant, format!("query:{}", key)));
        }

        let mut added = endpoint.spawn_variant();
        added
            .query_params
            .insert(QUERY_FALLBACK_KEY.to_string(), payload.to_string());
        variants.push(InjectionVariant::new(
            added,
            format!("query:{} (added)", QUERY_FALLBACK_KEY),
        ));

        variants
    }

    fn body_variants(endpoint: &EndpointDescriptor, payload: &str) -> Vec<InjectionVariant> {
        let mut variants = Vec::new();

        if let Some(Value::Object(map)) = &endpoint.body {
            for key in map.keys() {
                let mut variant = endpoint.spawn_variant();
                if let Some(Value::Object(vmap)) = &mut variant.body {
                    vmap.insert(key.clone(), Value::String(payload.to_string()));
                }
                variants.push(InjectionVariant::new(variant, format!("body:{}", key)));
            }
        }

        if endpoint.method.carries_body() {
            let mut variant = endpoint.spawn_variant();
            match &mut variant.body {
                Some(Value::Object(map)) => {
                    map.insert(
                        BODY_FALLBACK_KEY.to_string(),
                        Value::String(payload.to_string()),
                    );
                }
                _ => {
                    let mut map = serde_json::Map::new();
                    map.insert(
                        BODY_FALLBACK_KEY.to_string(),
                        Value::String(payload.to_string()),
                    );
                    variant.body = Some(Value::Object(map));
                }
            }
            variants.push(InjectionVariant::new(
                variant,
                format!("body:{} (added)", BODY_FALLBACK_KEY),
            ));
        }

        variants
    }

    fn header_variant(endpoint: &EndpointDescriptor, payload: &str) -> InjectionVariant {
        let mut variant = endpoint.spawn_variant();
        variant
            .headers
            .insert(TEST_HEADER.to_string(), payload.to_string());
        InjectionVariant::new(variant, format!("header:{}", TEST_HEADER))
    }

    fn path_variant(endpoint: &EndpointDescriptor, payload: &str) -> InjectionVariant {
        let mut variant = endpoint.spawn_variant();
        let encoded = urlencoding::encode(payload).into_owned();

        let url = variant.absolute_url();
        let (base, query) = match url.split_once('?') {
            Some((b, q)) => (b.to_string(), Some(q.to_string())),
            None => (url, None),
        };

        let mut mutated = if base.ends_with('/') {
            format!("{}{}", base, encoded)
        } else {
            format!("{}/{}", base, encoded)
        };
        if let Some(q) = query {
            mutated = format!("{}?{}", mutated, q);
        }

        variant.url = mutated;
        InjectionVariant::new(variant, "path")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpMethod;
    use serde_json::json;

    fn post_endpoint() -> EndpointDescriptor {
        let mut ep = EndpointDescriptor::new("login", HttpMethod::Post, "https://x.test/login");
        ep.query_params.insert("a".into(), "1".into());
        ep.body = Some(json!({"b": 2}));
        ep
    }

    #[test]
    fn test_all_locations_full_matrix() {
        let ep = post_endpoint();
        let variants = Injector::inject(&ep, "PAYLOAD", InjectLocation::All);

        let points: Vec<&str> = variants.iter().map(|v| v.injection_point.as_str()).collect();
        assert_eq!(
            points,
            vec![
                "query:a",
                "query:q (added)",
                "body:b",
                "body:input (added)",
                "header:X-Test-Header",
                "path",
            ]
        );
        assert_eq!(variants.len(), 6);
    }

    #[test]
    fn test_variants_are_independent() {
        let ep = post_endpoint();
        let mut variants = Injector::inject(&ep, "PAYLOAD", InjectLocation::All);

        variants[0]
            .endpoint
            .query_params
            .insert("a".into(), "mutated-again".into());

        assert_eq!(ep.query_params.get("a"), Some(&"1".to_string()));
        assert_eq!(
            variants[1].endpoint.query_params.get("a"),
            Some(&"1".to_string())
        );
    }

    #[test]
    fn test_query_replaces_and_adds() {
        let ep = post_endpoint();
        let variants = Injector::inject(&ep, "PAYLOAD", InjectLocation::Query);

        assert_eq!(variants.len(), 2);
        assert_eq!(
            variants[0].endpoint.query_params.get("a"),
            Some(&"PAYLOAD".to_string())
        );
        assert_eq!(
            variants[1].endpoint.query_params.get("q"),
            Some(&"PAYLOAD".to_string())
        );
        assert_eq!(
            variants[1].endpoint.query_params.get("a"),
            Some(&"1".to_string())
        );
    }

    #[test]
    fn test_body_created_when_absent() {
        let ep = EndpointDescriptor::new("create", HttpMethod::Post, "https://x.test/items");
        let variants = Injector::inject(&ep, "PAYLOAD", InjectLocation::Body);

        assert_eq!(variants.len(), 1);
        assert_eq!(
            variants[0].endpoint.body,
            Some(json!({"input": "PAYLOAD"}))
        );
    }

    #[test]
    fn test_get_without_body_skips_body_rule() {
        let ep = EndpointDescriptor::new("users", HttpMethod::Get, "https://x.test/users");
        let variants = Injector::inject(&ep, "PAYLOAD", InjectLocation::Body);

        // No body, method carries none: falls back to a query probe.
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].injection_point, "query:test (fallback)");
        assert_eq!(
            variants[0].endpoint.query_params.get("test"),
            Some(&"PAYLOAD".to_string())
        );
    }

    #[test]
    fn test_path_variant_encodes_payload() {
        let ep = EndpointDescriptor::new("users", HttpMethod::Get, "https://x.test/users");
        let variants = Injector::inject(&ep, "../../etc/passwd", InjectLocation::Path);

        assert_eq!(variants.len(), 1);
        assert_eq!(
            variants[0].endpoint.url,
            "https://x.test/users/..%2F..%2Fetc%2Fpasswd"
        );
    }

    #[test]
    fn test_header_variant_sets_test_header() {
        let ep = EndpointDescriptor::new("users", HttpMethod::Get, "https://x.test/users");
        let variants = Injector::inject(&ep, "PAYLOAD", InjectLocation::Header);

        assert_eq!(variants.len(), 1);
        assert_eq!(
            variants[0].endpoint.headers.get(TEST_HEADER),
            Some(&"PAYLOAD".to_string())
        );
    }
}
