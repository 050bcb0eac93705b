//! Parser for the workout log format.
//!
//! A submission is one or more blocks separated by `;`. Each block is five
//! newline-separated fields, every one prefixed by `#`:
//!
//! ```text
//! #Legs
//! #Back Squat
//! #5sets5reps
//! #100kg
//! #20min
//! ```
//!
//! Each field has its own extractor below; the block parser only decides
//! which extractor runs on which line and attaches the block index to any
//! failure.

use crate::dlog;
use crate::error::{Field, ParseError};
use crate::types::WorkoutDraft;
use once_cell::sync::Lazy;
use regex::Regex;

const BLOCK_SEPARATOR: char = ';';
const MARKER: char = '#';
const FIELDS_PER_BLOCK: usize = 5;

const NUMBER: &str = r"(\d+(?:\.\d*)?|\.\d+)";

static SETS_REPS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\s*(\d+)\s*sets\s*(\d+)\s*reps$").unwrap());
static WEIGHT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^#\s*{NUMBER}\s*kg$")).unwrap());
static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^#\s*{NUMBER}\s*min$")).unwrap());

/// Parse a raw submission into one draft per block, in input order.
///
/// Fails fast: the first bad block aborts the whole submission.
pub fn parse(raw: &str) -> Result<Vec<WorkoutDraft>, ParseError> {
    let blocks: Vec<&str> = raw
        .split(BLOCK_SEPARATOR)
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .collect();

    if !blocks.iter().any(|b| b.starts_with(MARKER)) {
        return Err(ParseError::NoCategories);
    }

    let drafts = blocks
        .iter()
        .enumerate()
        .map(|(i, block)| parse_block(i + 1, block))
        .collect::<Result<Vec<_>, _>>()?;

    dlog!("parsed blocks={}", drafts.len());
    Ok(drafts)
}

/// Parse a single block. `index` is 1-based and only used for errors.
pub fn parse_block(index: usize, block: &str) -> Result<WorkoutDraft, ParseError> {
    if !block.starts_with(MARKER) {
        return Err(ParseError::MalformedBlock(index));
    }

    let fields: Vec<&str> = block.split('\n').map(str::trim).collect();
    let [category, name, sets_reps, weight, duration, ..] = fields.as_slice() else {
        return Err(ParseError::MissingFields(index));
    };

    let invalid = |field| ParseError::InvalidFormat(index, field);

    let category = label_field(category).ok_or_else(|| invalid(Field::Category))?;
    let workout_name = label_field(name).ok_or_else(|| invalid(Field::Name))?;
    let (sets, reps) = sets_reps_field(sets_reps).ok_or_else(|| invalid(Field::SetsReps))?;
    let weight = weight_field(weight).ok_or_else(|| invalid(Field::Weight))?;
    let duration = duration_field(duration).ok_or_else(|| invalid(Field::Duration))?;

    Ok(WorkoutDraft {
        category,
        workout_name,
        sets,
        reps,
        weight,
        duration,
    })
}

/// `#<text>`: the trimmed, non-empty text after the marker.
pub fn label_field(line: &str) -> Option<String> {
    let text = line.strip_prefix(MARKER)?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// `#<int>sets<int>reps`
pub fn sets_reps_field(line: &str) -> Option<(u32, u32)> {
    let caps = SETS_REPS_RE.captures(line)?;
    let sets = caps[1].parse().ok()?;
    let reps = caps[2].parse().ok()?;
    Some((sets, reps))
}

/// `#<float>kg`
pub fn weight_field(line: &str) -> Option<f64> {
    unit_number(&WEIGHT_RE, line)
}

/// `#<float>min`
pub fn duration_field(line: &str) -> Option<f64> {
    unit_number(&DURATION_RE, line)
}

fn unit_number(re: &Regex, line: &str) -> Option<f64> {
    let caps = re.captures(line)?;
    caps[1].parse::<f64>().ok().filter(|v| v.is_finite())
}
