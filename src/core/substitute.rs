//! Substitution engine
//!
//! Two entry points:
//!
//! - [`substitute_all`]: one global pass per field for the text family.
//! - [`substitute_sequential`]: repeated passes over packed records, moving
//!   both timestamps forward one second per pass until a pass finds nothing.
//!
//! Both mutate the caller's buffer in place and return the counts.

use crate::core::builder::{packed_record, packed_search_pattern};
use crate::core::error::{StampError, StampResult};
use crate::core::timezone::PackedTimeZone;
use crate::utils::datetime::StampDateTime;
use std::collections::HashSet;

/// Default pass limit for [`substitute_sequential`]: one day of records
pub const DEFAULT_MAX_PASSES: usize = 86_400;

/// Replace every non-overlapping occurrence of `from` with `to`
///
/// Occurrences are found left to right. Returns the number replaced.
///
/// # Example
///
/// ```rust
/// use movdate::core::substitute::replace_all;
///
/// let mut buf = b"aXbXc".to_vec();
/// assert_eq!(replace_all(&mut buf, b"X", b"--"), 2);
/// assert_eq!(buf, b"a--b--c");
/// ```
pub fn replace_all(buffer: &mut Vec<u8>, from: &[u8], to: &[u8]) -> usize {
    let offsets = find_all(buffer, from);
    if offsets.is_empty() {
        return 0;
    }

    if from.len() == to.len() {
        for &offset in &offsets {
            buffer[offset..offset + to.len()].copy_from_slice(to);
        }
        return offsets.len();
    }

    let mut out = Vec::with_capacity(buffer.len() + offsets.len() * to.len());
    let mut last = 0;
    for &offset in &offsets {
        out.extend_from_slice(&buffer[last..offset]);
        out.extend_from_slice(to);
        last = offset + from.len();
    }
    out.extend_from_slice(&buffer[last..]);
    *buffer = out;
    offsets.len()
}

fn find_all(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    let mut offsets = Vec::new();
    if needle.is_empty() {
        return offsets;
    }
    let mut pos = 0;
    while pos + needle.len() <= haystack.len() {
        let Some(found) = haystack[pos..]
            .windows(needle.len())
            .position(|window| window == needle)
        else {
            break;
        };
        offsets.push(pos + found);
        pos += found + needle.len();
    }
    offsets
}

/// A from/to byte pair for one named field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPatterns {
    /// Field name, for reporting
    pub name: String,
    /// Bytes currently in the file
    pub from: Vec<u8>,
    /// Bytes to write instead
    pub to: Vec<u8>,
}

impl FieldPatterns {
    /// Create a field pattern pair
    pub fn new(name: impl Into<String>, from: Vec<u8>, to: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            from,
            to,
        }
    }

    /// Whether substituting would change nothing
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Per-field substitution count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCount {
    /// Field name
    pub name: String,
    /// Number of occurrences replaced
    pub count: usize,
}

/// Outcome of a substitution call
///
/// The buffer itself is updated in place; this carries only the counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubstitutionResult {
    /// Total occurrences replaced
    pub match_count: usize,
    /// Per-field counts (text family)
    pub fields: Vec<FieldCount>,
    /// Per-pass counts (packed family), the final zero pass excluded
    pub passes: Vec<usize>,
    /// Timezone read back from the first packed record
    pub source_tz: Option<PackedTimeZone>,
    /// Timezone written into the packed records
    pub target_tz: Option<PackedTimeZone>,
    /// The pass limit stopped the loop before a zero pass
    pub truncated: bool,
}

impl SubstitutionResult {
    /// Whether nothing was replaced
    pub fn is_unchanged(&self) -> bool {
        self.match_count == 0
    }
}

/// Substitute every field's `from` bytes with its `to` bytes
///
/// Fields whose two sides are equal are skipped and reported with a zero
/// count.
pub fn substitute_all(buffer: &mut Vec<u8>, fields: &[FieldPatterns]) -> SubstitutionResult {
    let mut result = SubstitutionResult::default();
    for field in fields {
        let count = if field.is_noop() {
            tracing::debug!("{}: already up to date", field.name);
            0
        } else {
            replace_all(buffer, &field.from, &field.to)
        };
        tracing::debug!("{}: {} substitution(s)", field.name, count);
        result.match_count += count;
        result.fields.push(FieldCount {
            name: field.name.clone(),
            count,
        });
    }
    result
}

/// Target timezone request for packed records
///
/// Unset parts fall back to the source record's timezone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimezoneOverride {
    /// Offset in hours
    pub hours: Option<f64>,
    /// Daylight-saving flag
    pub daylight_saving: Option<bool>,
}

impl TimezoneOverride {
    /// Whether neither part is set
    pub fn is_empty(&self) -> bool {
        self.hours.is_none() && self.daylight_saving.is_none()
    }

    /// Apply the override on top of `source`
    pub fn resolve(&self, source: PackedTimeZone) -> StampResult<PackedTimeZone> {
        let tz = match self.hours {
            Some(hours) => source.with_hours(hours)?,
            None => source,
        };
        Ok(match self.daylight_saving {
            Some(dst) => tz.with_daylight_saving(dst),
            None => tz,
        })
    }
}

/// Parameters of a sequential packed-record substitution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequentialPlan {
    /// Timestamp of the first record to rewrite
    pub from: StampDateTime,
    /// Timestamp it should carry afterwards
    pub to: StampDateTime,
    /// Known source timezone byte; discovered from the buffer when unset
    pub source_tz: Option<u8>,
    /// Target timezone request
    pub target_tz: TimezoneOverride,
    /// Upper bound on the number of passes
    pub max_passes: usize,
}

impl SequentialPlan {
    /// Plan a run starting at `from`, rewritten to start at `to`
    pub fn new(from: StampDateTime, to: StampDateTime) -> Self {
        Self {
            from,
            to,
            source_tz: None,
            target_tz: TimezoneOverride::default(),
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    /// Use a known source timezone byte instead of discovering it
    pub fn source_tz(mut self, byte: u8) -> Self {
        self.source_tz = Some(byte);
        self
    }

    /// Request a target timezone
    pub fn target_tz(mut self, target: TimezoneOverride) -> Self {
        self.target_tz = target;
        self
    }

    /// Bound the number of passes
    pub fn max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }
}

/// Rewrite a run of consecutive per-second packed records
///
/// The source timezone byte is read back from the first record matching
/// `plan.from` with the timezone left open. Each pass then replaces every
/// record at the current `from` second with the record for the current `to`
/// second, and both advance by one second until a pass finds nothing. A gap in
/// the run ends it.
///
/// Records rewritten by an earlier pass are never rewritten again, even if a
/// later `from` pattern matches them.
///
/// # Errors
///
/// - `PatternNotFound` if no record at `plan.from` exists
/// - `NotApplicable` if the records would be rewritten to themselves
/// - `DomainViolation` if the target timezone cannot be packed
pub fn substitute_sequential(
    buffer: &mut [u8],
    plan: &SequentialPlan,
) -> StampResult<SubstitutionResult> {
    let source_byte = match plan.source_tz {
        Some(byte) => byte,
        None => {
            let found = packed_search_pattern(&plan.from, None)
                .find(buffer)
                .ok_or_else(|| {
                    StampError::PatternNotFound(format!("no packed record at {}", plan.from))
                })?;
            found.bound[0]
        }
    };
    let source_tz = PackedTimeZone::from_byte(source_byte);
    // Without an override the source byte is copied verbatim, unknown bits included
    let (target_tz, target_byte) = if plan.target_tz.is_empty() {
        (source_tz, source_byte)
    } else {
        let tz = plan.target_tz.resolve(source_tz)?;
        (tz, tz.to_byte())
    };

    if plan.from == plan.to && source_byte == target_byte {
        return Err(StampError::NotApplicable(format!(
            "records at {} already match",
            plan.from
        )));
    }

    let mut result = SubstitutionResult {
        source_tz: Some(source_tz),
        target_tz: Some(target_tz),
        ..Default::default()
    };
    let mut rewritten: HashSet<usize> = HashSet::new();
    let mut from = plan.from;
    let mut to = plan.to;

    loop {
        if result.passes.len() >= plan.max_passes {
            tracing::warn!(
                "Stopped after {} passes at {}; later records were left as is",
                plan.max_passes,
                from
            );
            result.truncated = true;
            break;
        }

        let from_bytes = packed_record(&from, source_byte);
        let to_bytes = packed_record(&to, target_byte);
        let mut count = 0;
        for offset in find_all(buffer, &from_bytes) {
            if rewritten.insert(offset) {
                buffer[offset..offset + to_bytes.len()].copy_from_slice(&to_bytes);
                count += 1;
            }
        }
        tracing::debug!("pass {}: {} -> {}: {} record(s)", result.passes.len() + 1, from, to, count);

        if count == 0 {
            break;
        }
        result.passes.push(count);
        result.match_count += count;
        from = from.next_second();
        to = to.next_second();
    }

    Ok(result)
}
