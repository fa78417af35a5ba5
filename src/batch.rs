use serde_json::{Map, Value};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::transcode::transcode_with_options;
use crate::{DecodeOptions, Result};

#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 256;

/// Transcode many independent bodies. Results keep the input order; one body
/// failing in strict mode does not affect the others.
pub fn transcode_batch(
    bodies: &[Map<String, Value>],
    options: &DecodeOptions,
) -> Vec<Result<Map<String, Value>>> {
    let results = run(bodies, options);
    debug!(
        bodies = bodies.len(),
        failed = results.iter().filter(|result| result.is_err()).count(),
        "transcoded batch"
    );
    results
}

fn run(bodies: &[Map<String, Value>], options: &DecodeOptions) -> Vec<Result<Map<String, Value>>> {
    #[cfg(feature = "parallel")]
    {
        if bodies.len() >= PARALLEL_THRESHOLD {
            return bodies
                .par_iter()
                .map(|flat| transcode_with_options(flat, options))
                .collect();
        }
    }

    bodies
        .iter()
        .map(|flat| transcode_with_options(flat, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[rstest::rstest]
    fn test_batch_keeps_order_and_isolates_failures() {
        let bodies = vec![
            object(json!({"a[0]": "x"})),
            object(json!({"a": "leaf", "a[b]": "x"})),
            object(json!({"b[c]": "y"})),
        ];
        let options = DecodeOptions::new().with_strict(true);
        let results = transcode_batch(&bodies, &options);
        assert_eq!(results.len(), 3);
        assert_eq!(
            Value::Object(results[0].clone().unwrap()),
            json!({"a": ["x"]})
        );
        assert!(results[1].is_err());
        assert_eq!(
            Value::Object(results[2].clone().unwrap()),
            json!({"b": {"c": "y"}})
        );
    }

    #[rstest::rstest]
    fn test_large_batch_matches_sequential() {
        let bodies: Vec<Map<String, Value>> = (0..600)
            .map(|idx| {
                let mut flat = Map::new();
                flat.insert(format!("row[{}]", idx % 7), Value::String(idx.to_string()));
                flat
            })
            .collect();
        let results = transcode_batch(&bodies, &DecodeOptions::default());
        for (idx, result) in results.into_iter().enumerate() {
            let mut expected = vec![Value::Null; idx % 7];
            expected.push(Value::String(idx.to_string()));
            assert_eq!(Value::Object(result.unwrap()), json!({ "row": expected }));
        }
    }
}
