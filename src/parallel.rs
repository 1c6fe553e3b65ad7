//! Batch parsing of independent buffers.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{decode, Document, ParseOptions, Result};

/// Parses every input, concurrently when the `parallel` feature is enabled.
///
/// Results come back in input order. Each document borrows its own buffer.
#[cfg(feature = "parallel")]
pub fn parse_batch<'a>(inputs: &[&'a str], options: &ParseOptions) -> Vec<Result<Document<'a>>> {
    inputs
        .par_iter()
        .map(|&input| decode::parse(input, options))
        .collect()
}

#[cfg(not(feature = "parallel"))]
pub fn parse_batch<'a>(inputs: &[&'a str], options: &ParseOptions) -> Vec<Result<Document<'a>>> {
    inputs
        .iter()
        .map(|&input| decode::parse(input, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn assert_send_sync<T: Send + Sync>() {}

    #[rstest::rstest]
    fn test_document_is_shareable() {
        assert_send_sync::<Document<'static>>();
    }

    #[rstest::rstest]
    fn test_batch_keeps_input_order() {
        let inputs = ["[1]", "", "{\"a\":[1,2]}"];
        let results = parse_batch(&inputs, &ParseOptions::default());
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().node_count(), 2);
        assert_eq!(results[1].as_ref().unwrap_err(), &Error::EmptyInput);
        let third = results[2].as_ref().unwrap();
        assert_eq!(third.get("a").map(|n| n.count()), Some(2));
    }

    #[rstest::rstest]
    fn test_shared_reads_across_threads() {
        let input = String::from("{\"xs\":[1,2,3,4]}");
        let doc = decode::parse(&input, &ParseOptions::default()).unwrap();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let xs = doc.get("xs").and_then(|n| n.as_array()).unwrap();
                    let mut dest = [0.0f32; 4];
                    xs.extract_f32(&mut dest, 0.0, None, false);
                    assert_eq!(dest, [1.0, 2.0, 3.0, 4.0]);
                });
            }
        });
    }
}
