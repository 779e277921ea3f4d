//! Encoding of expression graphs into the service's wire format:
//!
//! ```json
//! { "result": "3", "values": { "0": { "functionInvocationValue": { ... } }, ... } }
//! ```
//!
//! Every invocation and function definition is stored once in `values` and
//! referenced by key, so subgraphs shared through `Arc` are not repeated.
use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value, json};

use super::node::Expr;

/// Serialize `expr` into a `{"result", "values"}` document.
pub fn serialize(expr: &Expr) -> Value {
    let mut encoder = Encoder::default();
    let root = encoder.encode(expr);
    let result = encoder.key_for(root);
    json!({ "result": result, "values": Value::Object(encoder.values) })
}

#[derive(Default)]
struct Encoder {
    values: Map<String, Value>,
    by_content: HashMap<String, String>,
    by_node: HashMap<usize, String>,
}

impl Encoder {
    fn encode(&mut self, expr: &Expr) -> Value {
        match expr {
            Expr::Constant(v) => json!({ "constantValue": v }),
            Expr::Argument(name) => json!({ "argumentReference": name }),
            Expr::Array(items) => {
                let values: Vec<Value> = items.iter().map(|e| self.encode(e)).collect();
                json!({ "arrayValue": { "values": values } })
            }
            Expr::Dictionary(entries) => {
                let mut values = Map::new();
                for (k, e) in entries {
                    values.insert(k.clone(), self.encode(e));
                }
                json!({ "dictionaryValue": { "values": values } })
            }
            Expr::Invocation(inv) => {
                let node = Arc::as_ptr(inv) as usize;
                if let Some(key) = self.by_node.get(&node) {
                    return reference(key);
                }
                let mut arguments = Map::new();
                for (name, e) in &inv.arguments {
                    arguments.insert(name.clone(), self.encode(e));
                }
                let encoded = json!({
                    "functionInvocationValue": {
                        "functionName": inv.function,
                        "arguments": arguments,
                    }
                });
                let key = self.store(encoded);
                self.by_node.insert(node, key.clone());
                reference(&key)
            }
            Expr::Function(def) => {
                let node = Arc::as_ptr(def) as usize;
                if let Some(key) = self.by_node.get(&node) {
                    return reference(key);
                }
                let body = self.encode(&def.body);
                let body_key = self.key_for(body);
                let encoded = json!({
                    "functionDefinitionValue": {
                        "argumentNames": def.argument_names,
                        "body": body_key,
                    }
                });
                let key = self.store(encoded);
                self.by_node.insert(node, key.clone());
                reference(&key)
            }
        }
    }

    /// Key of an encoded value, storing it in the table if it is inline.
    fn key_for(&mut self, encoded: Value) -> String {
        match encoded.get("valueReference").and_then(Value::as_str) {
            Some(key) => key.to_string(),
            None => self.store(encoded),
        }
    }

    fn store(&mut self, encoded: Value) -> String {
        let content = encoded.to_string();
        if let Some(key) = self.by_content.get(&content) {
            return key.clone();
        }
        let key = self.values.len().to_string();
        self.values.insert(key.clone(), encoded);
        self.by_content.insert(content, key.clone());
        key
    }
}

fn reference(key: &str) -> Value {
    json!({ "valueReference": key })
}
