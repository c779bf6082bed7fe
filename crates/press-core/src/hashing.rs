//! Hashing canónico: identidad de artifacts y de definiciones de pipeline.
//!
//! El JSON se serializa con claves de objeto ordenadas antes de hashear, de
//! modo que el mismo contenido produzca siempre el mismo digest con
//! independencia del orden de inserción.

use blake3::Hasher;
use serde_json::Value;

/// Hex digest blake3 de bytes crudos.
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut h = Hasher::new();
    h.update(bytes);
    h.finalize().to_hex().to_string()
}

/// Hex digest blake3 de un string.
pub fn hash_str(input: &str) -> String {
    hash_bytes(input.as_bytes())
}

/// Hex digest blake3 de un `Value` canonicalizado.
pub fn hash_value(value: &Value) -> String {
    hash_str(&to_canonical_json(value))
}

/// Serializa a JSON canónico (claves ordenadas, sin espacios).
pub fn to_canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        // serializar un string JSON no puede fallar
        Value::String(s) => out.push_str(&serde_json::to_string(s).unwrap()),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, k) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(k).unwrap());
                out.push(':');
                write_canonical(&map[k], out);
            }
            out.push('}');
        }
    }
}
