//! Cycle ranges encoded in file names.
//!
//! Exports are commonly named after the cycles they contain, e.g. `sampleA_CV3.csv`
//! for cycle 3 alone or `sampleA_CV2-5.csv` for cycles 2 through 5.
use log::warn;
use once_cell::sync::OnceCell;
use regex::{Regex, RegexBuilder};
/// Largest number of cycle ids a name may announce. Anything wider is treated as a typo.
pub const MAX_CYCLE_RANGE: usize = 1000;
fn cycle_token() -> Result<&'static Regex, regex::Error> {
    static TOKEN: OnceCell<Regex> = OnceCell::new();
    TOKEN.get_or_try_init(|| {
        RegexBuilder::new(r"CV(\d+)(?:-(\d+))?")
            .case_insensitive(true)
            .build()
    })
}
/// Parse the first `CV<start>` or `CV<start>-<end>` token in `name` (case-insensitive).
///
/// Returns the inclusive list of cycle ids, or `None` when the name carries no such token
/// or announces more than [`MAX_CYCLE_RANGE`] cycles.
pub fn expected_cycle_range(name: &str) -> Option<Vec<i64>> {
    let token = match cycle_token() {
        Ok(token) => token,
        Err(e) => {
            warn!("cycle token pattern failed to compile: {e}");
            return None;
        }
    };
    let captures = token.captures(name)?;
    let parse = |idx: usize| -> Option<Option<i64>> {
        match captures.get(idx) {
            None => Some(None),
            Some(m) => match m.as_str().parse() {
                Ok(n) => Some(Some(n)),
                Err(_) => {
                    warn!("{name}: cycle number {:?} is out of range", m.as_str());
                    None
                }
            },
        }
    };
    let start = parse(1)??;
    let (lo, hi) = match parse(2)? {
        Some(end) if end >= start => (start, end),
        Some(end) => (end, start),
        None => (start, start),
    };
    let width = hi.abs_diff(lo);
    if width >= MAX_CYCLE_RANGE as u64 {
        warn!(
            "{name}: announced cycle range CV{lo}-{hi} spans {} cycles (limit {MAX_CYCLE_RANGE}), ignoring it",
            width.saturating_add(1)
        );
        return None;
    }
    Some((lo..=hi).collect())
}
