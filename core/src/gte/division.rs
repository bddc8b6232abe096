//! Unsigned Newton-Raphson division used by perspective projection.

use std::sync::LazyLock;

/// Reciprocal seed table, 257 entries indexed by the top bits of the
/// normalized divisor.
pub static UNR_TABLE: LazyLock<[u8; 257]> = LazyLock::new(|| {
    let mut table = [0u8; 257];
    for (i, entry) in table.iter_mut().enumerate() {
        let v = (0x40000 / (i as i32 + 0x100) + 1) / 2 - 0x101;
        *entry = v.max(0) as u8;
    }
    table
});

/// Projection factor `H * 0x10000 / sz`, limited to 17 bits.
///
/// Returns `(quotient, overflow)`. When `h >= sz * 2` (including `sz == 0`)
/// the result saturates to `0x1FFFF` and `overflow` is set. Otherwise the
/// quotient is within 2 of the exact rounded value.
pub fn unr_divide(h: u16, sz: u16) -> (u32, bool) {
    if (h as u32) >= (sz as u32) * 2 {
        return (0x1FFFF, true);
    }

    let shift = sz.leading_zeros();
    let n = (h as u64) << shift;
    let d = (sz as u64) << shift;

    let u = UNR_TABLE[((d - 0x7FC0) >> 7) as usize] as u64 + 0x101;
    let d = (0x200_0080 - d * u) >> 8;
    let d = (0x80 + d * u) >> 8;

    let q = ((n * d + 0x8000) >> 16).min(0x1FFFF);
    (q as u32, false)
}
