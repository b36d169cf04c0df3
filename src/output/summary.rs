//! Human-readable count summaries.

use crate::spacing::{ClassificationResult, CountBucket};
use std::fmt::Write as _;
use std::io::{self, Write};

/// Format the counts of `result` as an aligned block.
pub fn format_summary(source: &str, result: &ClassificationResult) -> String {
    let mut text = format!("{source}: {} events\n", result.events().len());
    for (bucket, count) in result.counts().iter() {
        let _ = writeln!(text, "  {:<14}{count:>6}", bucket_title(bucket));
    }
    text
}

/// Print the summary of `result` to `out`.
pub fn print_summary<W: Write>(
    out: &mut W,
    source: &str,
    result: &ClassificationResult,
) -> io::Result<()> {
    out.write_all(format_summary(source, result).as_bytes())?;
    out.flush()
}

const fn bucket_title(bucket: CountBucket) -> &'static str {
    match bucket {
        CountBucket::Normal => "Normal",
        CountBucket::RootExposed => "Root exposed",
        CountBucket::Buried => "Buried",
        CountBucket::Overlap => "Overlap",
        CountBucket::Missing => "Missing",
    }
}
