//! Rotate/flip operations and transform-sequence reduction.
//!
//! A [`TransformOp`] is one atomic 90°-increment rotate and/or axis flip.
//! Edits to an image accumulate as an ordered sequence of ops, applied
//! left-to-right; [`reduce`] simplifies such a sequence algebraically before
//! it is persisted.
//!
//! Ops have two stable encodings:
//! - the **wire name** (`Display`/`FromStr`), the variant name verbatim,
//!   used in rotation cache files — `photo1.jpg<TAB>Rotate90-FlipHorizontal`;
//! - the **numeric code** ([`TransformOp::code`]), used in thumbnail cache
//!   filenames.
//!
//! Both encodings are load-bearing: existing cache files and thumbnail
//! directories were written with them, so neither may change.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized transform op: {0}")]
pub struct ParseOpError(pub String);

/// One atomic rotate/flip operation.
///
/// The eight variants are the combinations of {0°, 90°, 180°, 270°} rotation
/// with an optional horizontal flip, under the identities `Rotate180 + flip
/// horizontal = FlipVertical` and `Rotate0 + flip horizontal =
/// FlipHorizontal`. Rotations are clockwise. Value equality only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransformOp {
    Identity,
    FlipHorizontal,
    FlipVertical,
    Rotate90,
    Rotate180,
    Rotate270,
    Rotate90FlipHorizontal,
    Rotate270FlipHorizontal,
}

impl TransformOp {
    /// All ops, in code order. Useful for CLI help and tests.
    pub const ALL: [TransformOp; 8] = [
        TransformOp::Identity,
        TransformOp::Rotate90,
        TransformOp::Rotate180,
        TransformOp::Rotate270,
        TransformOp::FlipHorizontal,
        TransformOp::Rotate90FlipHorizontal,
        TransformOp::FlipVertical,
        TransformOp::Rotate270FlipHorizontal,
    ];

    /// Stable numeric code used in thumbnail cache filenames.
    ///
    /// The numbering matches the cache directories written by earlier
    /// versions of the browser, so thumbnails survive an upgrade.
    pub fn code(self) -> u8 {
        match self {
            TransformOp::Identity => 0,
            TransformOp::Rotate90 => 1,
            TransformOp::Rotate180 => 2,
            TransformOp::Rotate270 => 3,
            TransformOp::FlipHorizontal => 4,
            TransformOp::Rotate90FlipHorizontal => 5,
            TransformOp::FlipVertical => 6,
            TransformOp::Rotate270FlipHorizontal => 7,
        }
    }

    /// Wire name, as written to rotation cache files.
    pub fn name(self) -> &'static str {
        match self {
            TransformOp::Identity => "Identity",
            TransformOp::FlipHorizontal => "FlipHorizontal",
            TransformOp::FlipVertical => "FlipVertical",
            TransformOp::Rotate90 => "Rotate90",
            TransformOp::Rotate180 => "Rotate180",
            TransformOp::Rotate270 => "Rotate270",
            TransformOp::Rotate90FlipHorizontal => "Rotate90FlipHorizontal",
            TransformOp::Rotate270FlipHorizontal => "Rotate270FlipHorizontal",
        }
    }
}

impl std::fmt::Display for TransformOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for TransformOp {
    type Err = ParseOpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Identity" => Ok(TransformOp::Identity),
            "FlipHorizontal" => Ok(TransformOp::FlipHorizontal),
            "FlipVertical" => Ok(TransformOp::FlipVertical),
            "Rotate90" => Ok(TransformOp::Rotate90),
            "Rotate180" => Ok(TransformOp::Rotate180),
            "Rotate270" => Ok(TransformOp::Rotate270),
            "Rotate90FlipHorizontal" => Ok(TransformOp::Rotate90FlipHorizontal),
            "Rotate270FlipHorizontal" => Ok(TransformOp::Rotate270FlipHorizontal),
            other => Err(ParseOpError(other.to_string())),
        }
    }
}

/// Reduce a transform sequence by algebraic cancellation.
///
/// Three rule families, each applied as **one** backward sweep over the
/// current sequence, in this order:
///
/// 1. two adjacent identical `FlipHorizontal` (or `FlipVertical`) cancel;
/// 2. four adjacent identical `Rotate90` (or `Rotate270`) cancel;
/// 3. an adjacent `Rotate90`/`Rotate270` pair, in either order, cancels.
///
/// The sweeps are **not** repeated to a fixpoint. Removing a run can make
/// its neighbors newly adjacent, and a single sweep will miss a pair formed
/// that way — `[Rotate90, Rotate90, Rotate270, Rotate270]` reduces to
/// `[Rotate90, Rotate270]`, not `[]`. Callers get exactly the patterns above
/// removed once, nothing more; cache files written by earlier versions of
/// the browser depend on this.
pub fn reduce(ops: &[TransformOp]) -> Vec<TransformOp> {
    let mut ops = ops.to_vec();
    cancel_adjacent_flips(&mut ops);
    cancel_full_revolutions(&mut ops);
    cancel_inverse_rotations(&mut ops);
    ops
}

/// Pass 1: flip twice about the same axis = identity.
fn cancel_adjacent_flips(ops: &mut Vec<TransformOp>) {
    use TransformOp::{FlipHorizontal, FlipVertical};
    let mut i = ops.len() as isize - 1;
    while i >= 1 {
        let (a, b) = (ops[i as usize], ops[i as usize - 1]);
        if (a == FlipHorizontal && b == FlipHorizontal)
            || (a == FlipVertical && b == FlipVertical)
        {
            ops.remove(i as usize);
            ops.remove(i as usize - 1);
            i -= 1;
        }
        i -= 1;
    }
}

/// Pass 2: four quarter-turns in the same direction = full revolution.
fn cancel_full_revolutions(ops: &mut Vec<TransformOp>) {
    use TransformOp::{Rotate90, Rotate270};
    let mut i = ops.len() as isize - 1;
    while i >= 3 {
        let run = &ops[i as usize - 3..=i as usize];
        if run == &[Rotate90; 4] || run == &[Rotate270; 4] {
            ops.drain(i as usize - 3..=i as usize);
            i -= 3;
        }
        i -= 1;
    }
}

/// Pass 3: a quarter-turn followed by its inverse = identity.
fn cancel_inverse_rotations(ops: &mut Vec<TransformOp>) {
    use TransformOp::{Rotate90, Rotate270};
    let mut i = ops.len() as isize - 1;
    while i >= 1 {
        let (a, b) = (ops[i as usize], ops[i as usize - 1]);
        if (a == Rotate90 && b == Rotate270) || (a == Rotate270 && b == Rotate90) {
            ops.remove(i as usize);
            ops.remove(i as usize - 1);
            i -= 1;
        }
        i -= 1;
    }
}
