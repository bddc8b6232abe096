//! Sine/cosine lookup for [`Angle`] values.

use super::fixed::{Angle, FixedPoint};

/// Angle steps per half turn (raw `Angle` value of pi).
const HALF_TURN: i32 = 1 << 10;
const QUARTER_TURN: i32 = HALF_TURN / 2;
const FULL_TURN: i32 = HALF_TURN * 2;

/// Quarter-wave sine table, built once at construction.
///
/// Entries are 4.12 values of `sin(i * pi / 1024)` for `i` in `0..=512`,
/// rounded to nearest. The other three quadrants are mirrored from it.
#[derive(Clone)]
pub struct Trig {
    table: Box<[i32; QUARTER_TURN as usize + 1]>,
}

impl Trig {
    pub fn new() -> Self {
        let mut table = Box::new([0i32; QUARTER_TURN as usize + 1]);
        for (i, entry) in table.iter_mut().enumerate() {
            let radians = i as f64 * std::f64::consts::PI / HALF_TURN as f64;
            *entry = (radians.sin() * FixedPoint::<12>::SCALE as f64).round() as i32;
        }
        Self { table }
    }

    pub fn sin(&self, angle: Angle) -> FixedPoint {
        let a = angle.raw().rem_euclid(FULL_TURN);
        let raw = match a {
            a if a <= QUARTER_TURN => self.table[a as usize],
            a if a <= HALF_TURN => self.table[(HALF_TURN - a) as usize],
            a if a <= HALF_TURN + QUARTER_TURN => -self.table[(a - HALF_TURN) as usize],
            a => -self.table[(FULL_TURN - a) as usize],
        };
        FixedPoint::from_raw(raw)
    }

    pub fn cos(&self, angle: Angle) -> FixedPoint {
        self.sin(Angle::from_raw(angle.raw().wrapping_add(QUARTER_TURN)))
    }
}

impl Default for Trig {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Trig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trig").field("entries", &self.table.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal_angles() {
        let trig = Trig::new();
        assert_eq!(trig.sin(Angle::ZERO), FixedPoint::ZERO);
        assert_eq!(trig.sin(Angle::from_f64(0.5)), FixedPoint::ONE);
        assert_eq!(trig.sin(Angle::from_f64(1.0)), FixedPoint::ZERO);
        assert_eq!(trig.sin(Angle::from_f64(1.5)), -FixedPoint::ONE);
        assert_eq!(trig.cos(Angle::ZERO), FixedPoint::ONE);
        assert_eq!(trig.cos(Angle::from_f64(1.0)), -FixedPoint::ONE);
    }

    #[test]
    fn test_negative_and_wrapped_angles() {
        let trig = Trig::new();
        assert_eq!(trig.sin(Angle::from_f64(-0.5)), -FixedPoint::ONE);
        assert_eq!(trig.sin(Angle::from_f64(2.5)), FixedPoint::ONE);
    }

    #[test]
    fn test_matches_float_sine() {
        let trig = Trig::new();
        for raw in (-2048..2048).step_by(37) {
            let expected = (raw as f64 * std::f64::consts::PI / 1024.0).sin();
            let got = trig.sin(Angle::from_raw(raw)).to_f64();
            assert!((got - expected).abs() < 0.0005, "raw {raw}: {got} vs {expected}");
        }
    }
}
