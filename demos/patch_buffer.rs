//! Patch a synthetic packed-record stream
//!
//! This example builds a buffer holding a short run of per-second packed
//! records, shifts them by one hour into a new timezone, and prints the
//! resulting counts.

use movdate::core::builder::packed_record;
use movdate::core::substitute::{substitute_sequential, SequentialPlan};
use movdate::{PackedTimeZone, StampDateTime, TimezoneOverride};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = StampDateTime::parse("2019:05:01 10:00:00")?;
    let source_tz = PackedTimeZone::new(2.0, false)?;

    let mut buffer = Vec::new();
    let mut t = start;
    for _ in 0..5 {
        buffer.extend_from_slice(b"frame payload");
        buffer.extend(packed_record(&t, source_tz.to_byte()));
        t = t.next_second();
    }

    let plan = SequentialPlan::new(start, StampDateTime::parse("2019:05:01 09:00:00")?).target_tz(
        TimezoneOverride {
            hours: Some(1.0),
            daylight_saving: Some(true),
        },
    );
    let result = substitute_sequential(&mut buffer, &plan)?;

    println!("passes:        {:?}", result.passes);
    println!("substitutions: {}", result.match_count);
    if let (Some(from), Some(to)) = (result.source_tz, result.target_tz) {
        println!("timezone:      {} -> {}", from, to);
    }
    Ok(())
}
