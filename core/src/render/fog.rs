//! Depth-cue fog coefficients.

use psxrender_shared::FixedPoint;

/// Depth-cue coefficients for the kernel.
///
/// The projection writes `IR0 = clamp((DQB + DQA * n) >> 12, 0, 4096)` where
/// `n` is the projection factor `H / z`. The coefficients here make `IR0`
/// zero at the near distance and 4096 at the far distance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DepthCue {
    pub dqa: i16,
    pub dqb: i32,
}

impl DepthCue {
    /// Coefficients for fog between `near` and `far` with projection
    /// distance `h`. Requires `far > near` and `h > 0`.
    pub fn from_near_far(near: FixedPoint, far: FixedPoint, h: u16) -> Self {
        let a = near.raw() as i64;
        let b = far.raw() as i64;
        let span = (b - a).max(1);
        let h = (h as i64).max(1);

        let dqa = ((-a * b / span) << 8) / h;
        let dqb = ((b << 12) / span) << 12;
        Self {
            dqa: dqa.clamp(-32767, 32767) as i16,
            dqb: dqb as i32,
        }
    }

    /// The `IR0` the projection of depth `sz` produces, computed without the
    /// kernel.
    pub fn interp_factor(&self, sz: u32, h: u16) -> u32 {
        let sz = sz.max(1) as i64;
        let div = ((h as i64 * 0x20000) / sz).min(0x1FFFF);
        let mac0 = (div + 1) / 2 * self.dqa as i64 + self.dqb as i64;
        (mac0 >> 12).clamp(0, 4096) as u32
    }
}
