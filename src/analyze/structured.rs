//! Structured data extraction (JSON-LD and microdata)

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructuredFormat {
    JsonLd,
    Microdata,
}

/// One typed structured-data item found on a page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredBlock {
    pub format: StructuredFormat,
    /// Schema types (`@type` / `itemtype`), with any vocabulary prefix removed
    pub types: Vec<String>,
    /// False when a JSON-LD script could not be parsed
    pub valid: bool,
    pub data: Value,
}

impl StructuredBlock {
    pub fn has_type(&self, name: &str) -> bool {
        self.types.iter().any(|t| t.eq_ignore_ascii_case(name))
    }
}

pub fn extract_structured_data(document: &Html) -> Vec<StructuredBlock> {
    let mut blocks = extract_json_ld(document);
    blocks.extend(extract_microdata(document));
    blocks
}

fn extract_json_ld(document: &Html) -> Vec<StructuredBlock> {
    let Ok(selector) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
        return Vec::new();
    };

    let mut blocks = Vec::new();
    for script in document.select(&selector) {
        let raw: String = script.text().collect();
        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(value) => flatten_json_ld(value, &mut blocks),
            Err(_) => blocks.push(StructuredBlock {
                format: StructuredFormat::JsonLd,
                types: Vec::new(),
                valid: false,
                data: Value::String(raw.trim().to_string()),
            }),
        }
    }
    blocks
}

/// Arrays and `@graph` containers become one block per item
fn flatten_json_ld(value: Value, blocks: &mut Vec<StructuredBlock>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten_json_ld(item, blocks);
            }
        }
        Value::Object(ref map) if map.contains_key("@graph") && !map.contains_key("@type") => {
            if let Some(Value::Array(items)) = map.get("@graph") {
                for item in items.clone() {
                    flatten_json_ld(item, blocks);
                }
            }
        }
        Value::Object(_) => blocks.push(StructuredBlock {
            format: StructuredFormat::JsonLd,
            types: json_ld_types(&value),
            valid: true,
            data: value,
        }),
        _ => {}
    }
}

fn json_ld_types(value: &Value) -> Vec<String> {
    match value.get("@type") {
        Some(Value::String(t)) => vec![strip_vocabulary(t)],
        Some(Value::Array(ts)) => ts
            .iter()
            .filter_map(Value::as_str)
            .map(strip_vocabulary)
            .collect(),
        _ => Vec::new(),
    }
}

/// `https://schema.org/Product` -> `Product`
fn strip_vocabulary(t: &str) -> String {
    t.rsplit(['/', '#', ':']).next().unwrap_or(t).to_string()
}

fn extract_microdata(document: &Html) -> Vec<StructuredBlock> {
    let Ok(selector) = Selector::parse("[itemscope][itemtype]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        // Nested scopes are reported as properties of their parent
        .filter(|el| el.value().attr("itemprop").is_none())
        .map(|el| {
            let types = el
                .value()
                .attr("itemtype")
                .unwrap_or_default()
                .split_whitespace()
                .map(strip_vocabulary)
                .collect();
            StructuredBlock {
                format: StructuredFormat::Microdata,
                types,
                valid: true,
                data: microdata_properties(el),
            }
        })
        .collect()
}

fn microdata_properties(scope: ElementRef) -> Value {
    let mut props: BTreeMap<String, Vec<Value>> = BTreeMap::new();
    collect_props(scope, &mut props);

    let map = props
        .into_iter()
        .map(|(name, mut values)| {
            let value = if values.len() == 1 {
                values.remove(0)
            } else {
                Value::Array(values)
            };
            (name, value)
        })
        .collect();
    Value::Object(map)
}

fn collect_props(scope: ElementRef, props: &mut BTreeMap<String, Vec<Value>>) {
    for child in scope.children().filter_map(ElementRef::wrap) {
        let el = child.value();
        match el.attr("itemprop") {
            Some(names) => {
                let value = if el.attr("itemscope").is_some() {
                    microdata_properties(child)
                } else {
                    Value::String(itemprop_value(child))
                };
                for name in names.split_whitespace() {
                    props.entry(name.to_string()).or_default().push(value.clone());
                }
                if el.attr("itemscope").is_none() {
                    collect_props(child, props);
                }
            }
            None => collect_props(child, props),
        }
    }
}

fn itemprop_value(el: ElementRef) -> String {
    let node = el.value();
    let attr = match node.name() {
        "meta" => node.attr("content"),
        "a" | "link" | "area" => node.attr("href"),
        "img" | "audio" | "video" | "source" | "iframe" | "embed" => node.attr("src"),
        "time" => node.attr("datetime"),
        "data" | "meter" => node.attr("value"),
        _ => None,
    };
    match attr {
        Some(v) => v.trim().to_string(),
        None => el.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_ld_object() {
        let html = r#"<script type="application/ld+json">
            {"@context": "https://schema.org", "@type": "Organization", "name": "Acme"}
        </script>"#;
        let blocks = extract_structured_data(&Html::parse_document(html));

        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].valid);
        assert!(blocks[0].has_type("Organization"));
        assert_eq!(blocks[0].data["name"], "Acme");
    }

    #[test]
    fn test_json_ld_graph_and_arrays() {
        let html = r#"
            <script type="application/ld+json">
              {"@context": "https://schema.org", "@graph": [
                {"@type": "WebSite", "name": "A"},
                {"@type": ["Product", "https://schema.org/Thing"], "name": "B"}
              ]}
            </script>
            <script type="application/ld+json">[{"@type": "LocalBusiness"}]</script>"#;
        let blocks = extract_structured_data(&Html::parse_document(html));

        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].has_type("WebSite"));
        assert_eq!(blocks[1].types, vec!["Product", "Thing"]);
        assert!(blocks[2].has_type("LocalBusiness"));
    }

    #[test]
    fn test_invalid_json_ld_is_kept() {
        let html = r#"<script type="application/ld+json">{"@type": "Product",}</script>"#;
        let blocks = extract_structured_data(&Html::parse_document(html));

        assert_eq!(blocks.len(), 1);
        assert!(!blocks[0].valid);
        assert!(blocks[0].types.is_empty());
    }

    #[test]
    fn test_microdata() {
        let html = r#"
            <div itemscope itemtype="https://schema.org/Product">
              <span itemprop="name">Espresso Machine</span>
              <img itemprop="image" src="/m.jpg">
              <div itemprop="offers" itemscope itemtype="https://schema.org/Offer">
                <meta itemprop="price" content="129.00">
                <span itemprop="priceCurrency">EUR</span>
              </div>
            </div>"#;
        let blocks = extract_structured_data(&Html::parse_document(html));

        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert_eq!(block.format, StructuredFormat::Microdata);
        assert!(block.has_type("Product"));
        assert_eq!(block.data["name"], "Espresso Machine");
        assert_eq!(block.data["image"], "/m.jpg");
        assert_eq!(block.data["offers"]["price"], "129.00");
        assert_eq!(block.data["offers"]["priceCurrency"], "EUR");
    }

    #[test]
    fn test_no_structured_data() {
        let blocks = extract_structured_data(&Html::parse_document("<p>plain</p>"));
        assert!(blocks.is_empty());
    }
}
