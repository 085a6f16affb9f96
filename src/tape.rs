//! Conversions between tapes, strings, and the binary numbers they encode.

use crate::types::{Symbol, TuringMachineError};

/// Number of blank cells placed after the digits by [`encode`].
const TRAILING_BLANKS: usize = 3;

/// Parses a tape string, one character per cell. Whitespace is ignored.
pub fn parse(input: &str) -> Result<Vec<Symbol>, TuringMachineError> {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(Symbol::try_from)
        .collect()
}

/// Renders a tape back into its string form.
pub fn render(tape: &[Symbol]) -> String {
    tape.iter().map(|s| s.as_char()).collect()
}

/// Lays out `n` on a fresh tape: a leading blank, the binary digits most significant
/// first, then trailing blanks.
///
/// | _ | 1 | 0 | 1 | 1 | _ | _ | _ |   encode(11)
///   0   1   2   3   4   5   6   7
pub fn encode(n: u64) -> Vec<Symbol> {
    let digits = format!("{n:b}");

    let mut tape = Vec::with_capacity(digits.len() + TRAILING_BLANKS + 1);
    tape.push(Symbol::Blank);
    tape.extend(
        digits
            .chars()
            .map(|c| if c == '1' { Symbol::One } else { Symbol::Zero }),
    );
    tape.extend(std::iter::repeat(Symbol::Blank).take(TRAILING_BLANKS));
    tape
}

/// Extracts the first contiguous run of digits on the tape.
///
/// Blanks before the first digit are skipped; the first blank after a digit ends the run.
pub fn digit_run(tape: &[Symbol]) -> String {
    tape.iter()
        .skip_while(|s| s.is_blank())
        .take_while(|s| s.is_digit())
        .map(|s| s.as_char())
        .collect()
}

/// Reads a digit run as a binary number. An empty run is zero.
///
/// Returns `None` if the run is not binary or does not fit in a `u64`.
pub fn decimal(digits: &str) -> Option<u64> {
    if digits.is_empty() {
        return Some(0);
    }
    u64::from_str_radix(digits, 2).ok()
}
