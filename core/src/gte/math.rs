//! Matrix products computed through the kernel.
//!
//! Operands go through the 16-bit vertex registers, so every input component
//! must lie within the 4.12 range (about ±8.0). Products accumulate in 64
//! bits and saturate to 16 bits on the way out.

use psxrender_shared::{FixedPoint, Matrix33, Vec3};

use super::{GeometryKernel, MatrixSelect, VertexSlot};

fn load_matrix<K: GeometryKernel + ?Sized>(kernel: &mut K, select: MatrixSelect, m: &Matrix33) {
    match select {
        MatrixSelect::Rotation => kernel.set_rotation(m),
        MatrixSelect::Light => kernel.set_light(m),
    }
}

/// `lhs * rhs`, uploading `lhs` into `select` unless `lhs_loaded` is set.
///
/// `rhs` is fed one column at a time through V0. The kernel's copy of `lhs`
/// stays loaded afterwards, and V0 holds the last column.
pub fn multiply_matrix33<K: GeometryKernel + ?Sized>(
    kernel: &mut K,
    select: MatrixSelect,
    lhs: &Matrix33,
    rhs: &Matrix33,
    lhs_loaded: bool,
) -> Matrix33 {
    if !lhs_loaded {
        load_matrix(kernel, select, lhs);
    }

    let mut columns = [Vec3::ZERO; 3];
    for (c, column) in columns.iter_mut().enumerate() {
        kernel.set_vertex(0, rhs.column(c).to_packed());
        kernel.mvmva(select, VertexSlot::V0, false);
        *column = kernel.ir_vec3();
    }
    Matrix33::from_rows(columns[0], columns[1], columns[2]).transpose()
}

/// `m * v` through the kernel, uploading `m` unless `m_loaded` is set.
pub fn matrix_vec_mul3<K: GeometryKernel + ?Sized>(
    kernel: &mut K,
    select: MatrixSelect,
    m: &Matrix33,
    v: Vec3,
    m_loaded: bool,
) -> Vec3 {
    if !m_loaded {
        load_matrix(kernel, select, m);
    }
    matrix_vec_mul3_loaded(kernel, select, v)
}

/// `m * v` where `m` is already loaded into `select`.
pub fn matrix_vec_mul3_loaded<K: GeometryKernel + ?Sized>(
    kernel: &mut K,
    select: MatrixSelect,
    v: Vec3,
) -> Vec3 {
    kernel.set_vertex(0, v.to_packed());
    kernel.mvmva(select, VertexSlot::V0, false);
    kernel.ir_vec3()
}

/// Squared length of `v` through `sqr`. Components must be within ±8.0.
pub fn length_squared<K: GeometryKernel + ?Sized>(kernel: &mut K, v: Vec3) -> FixedPoint {
    kernel.set_ir([v.x.raw(), v.y.raw(), v.z.raw()]);
    kernel.sqr();
    FixedPoint::from_raw(kernel.mac(1) + kernel.mac(2) + kernel.mac(3))
}
