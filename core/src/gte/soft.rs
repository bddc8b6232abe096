use psxrender_shared::{Matrix33, PackedVec3, Short, Vec3};

use super::division::unr_divide;
use super::{GeometryKernel, MatrixSelect, VertexSlot, flag};
use crate::render::{Color, ScreenPoint};

const IR_MIN: i64 = i16::MIN as i64;
const IR_MAX: i64 = i16::MAX as i64;
const SCREEN_MIN: i64 = -0x400;
const SCREEN_MAX: i64 = 0x3FF;

/// Software model of the geometry coprocessor.
///
/// Register contents, fifos and rounding follow the hardware for the
/// operations in [`GeometryKernel`]. Pipeline hazards do not exist here, so
/// there is no distinction between "safe" and "unsafe" register access.
#[derive(Clone, Debug, Default)]
pub struct SoftGte {
    rotation: [[i16; 3]; 3],
    light: [[i16; 3]; 3],
    translation: [i32; 3],
    ofx: i32,
    ofy: i32,
    h: u16,
    dqa: i16,
    dqb: i32,
    zsf3: i16,
    zsf4: i16,
    far_color: [i32; 3],

    vertices: [[i16; 3]; 3],
    rgb: Color,

    mac0: i32,
    mac: [i32; 3],
    ir0: i32,
    ir: [i32; 3],
    otz: u16,
    sxy: [ScreenPoint; 3],
    sz: [u16; 4],
    rgb_fifo: [Color; 3],
    lzcs: i32,
    flag: u32,
}

fn pack_matrix(m: &Matrix33) -> [[i16; 3]; 3] {
    m.rows.map(|r| {
        [
            Short::from(r.x).raw(),
            Short::from(r.y).raw(),
            Short::from(r.z).raw(),
        ]
    })
}

impl SoftGte {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all registers to power-on state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn projection_distance(&self) -> u16 {
        self.h
    }

    pub fn depth_cue(&self) -> (i16, i32) {
        (self.dqa, self.dqb)
    }

    pub fn translation(&self) -> Vec3 {
        let [x, y, z] = self.translation;
        Vec3::from_raw(x, y, z)
    }

    fn saturate_ir(&mut self, index: usize, value: i64) -> i32 {
        const BITS: [u32; 3] = [flag::IR1_SATURATED, flag::IR2_SATURATED, flag::IR3_SATURATED];
        if !(IR_MIN..=IR_MAX).contains(&value) {
            self.flag |= BITS[index];
        }
        value.clamp(IR_MIN, IR_MAX) as i32
    }

    fn saturate_color(&mut self, index: usize, value: i32) -> u8 {
        const BITS: [u32; 3] = [
            flag::COLOR_R_SATURATED,
            flag::COLOR_G_SATURATED,
            flag::COLOR_B_SATURATED,
        ];
        if !(0..=255).contains(&value) {
            self.flag |= BITS[index];
        }
        value.clamp(0, 255) as u8
    }

    fn saturate_otz(&mut self, value: i64) -> u16 {
        if !(0..=0xFFFF).contains(&value) {
            self.flag |= flag::Z_SATURATED;
        }
        value.clamp(0, 0xFFFF) as u16
    }

    fn begin(&mut self) {
        self.flag = 0;
    }

    fn finish(&mut self) {
        if self.flag & flag::ERROR_MASK != 0 {
            self.flag |= flag::ERROR;
        }
    }

    /// Write MAC1..3 and IR1..3 from 64-bit sums already shifted by 12.
    fn store_mac_ir(&mut self, sums: [i64; 3]) {
        for (i, sum) in sums.into_iter().enumerate() {
            self.mac[i] = sum as i32;
            self.ir[i] = self.saturate_ir(i, sum);
        }
    }

    fn push_color(&mut self, rgb: [i32; 3]) {
        let r = self.saturate_color(0, rgb[0]);
        let g = self.saturate_color(1, rgb[1]);
        let b = self.saturate_color(2, rgb[2]);
        self.rgb_fifo = [self.rgb_fifo[1], self.rgb_fifo[2], Color::rgb(r, g, b)];
    }

    fn transform(&self, matrix: &[[i16; 3]; 3], v: [i32; 3], translation: [i32; 3]) -> [i64; 3] {
        let mut out = [0i64; 3];
        for (i, row) in matrix.iter().enumerate() {
            let mut sum = (translation[i] as i64) << 12;
            for (m, c) in row.iter().zip(v) {
                sum += *m as i64 * c as i64;
            }
            out[i] = sum >> 12;
        }
        out
    }

    fn project(&mut self, slot: usize) {
        let v = self.vertices[slot].map(i32::from);
        let sums = self.transform(&self.rotation, v, self.translation);
        self.store_mac_ir(sums);

        let sz3 = self.saturate_otz(sums[2]);
        self.sz = [self.sz[1], self.sz[2], self.sz[3], sz3];

        let (n, overflow) = unr_divide(self.h, sz3);
        if overflow {
            self.flag |= flag::DIVIDE_OVERFLOW;
        }
        let n = n as i64;

        let sx = (self.ofx as i64 + self.ir[0] as i64 * n) >> 16;
        let sy = (self.ofy as i64 + self.ir[1] as i64 * n) >> 16;
        if !(SCREEN_MIN..=SCREEN_MAX).contains(&sx) {
            self.flag |= flag::SX2_SATURATED;
        }
        if !(SCREEN_MIN..=SCREEN_MAX).contains(&sy) {
            self.flag |= flag::SY2_SATURATED;
        }
        let point = ScreenPoint::new(
            sx.clamp(SCREEN_MIN, SCREEN_MAX) as i16,
            sy.clamp(SCREEN_MIN, SCREEN_MAX) as i16,
        );
        self.sxy = [self.sxy[1], self.sxy[2], point];

        let mac0 = self.dqb as i64 + self.dqa as i64 * n;
        self.mac0 = mac0 as i32;
        let ir0 = mac0 >> 12;
        if !(0..=0x1000).contains(&ir0) {
            self.flag |= flag::IR0_SATURATED;
        }
        self.ir0 = ir0.clamp(0, 0x1000) as i32;
    }

    fn average_z(&mut self, scale: i16, sum: u32) {
        let mac0 = scale as i64 * sum as i64;
        self.mac0 = mac0 as i32;
        self.otz = self.saturate_otz(mac0 >> 12);
    }
}

impl GeometryKernel for SoftGte {
    fn set_rotation(&mut self, m: &Matrix33) {
        self.rotation = pack_matrix(m);
    }

    fn set_light(&mut self, m: &Matrix33) {
        self.light = pack_matrix(m);
    }

    fn set_translation(&mut self, t: Vec3) {
        self.translation = [t.x.raw(), t.y.raw(), t.z.raw()];
    }

    fn set_screen_offset(&mut self, ofx: i32, ofy: i32) {
        self.ofx = ofx;
        self.ofy = ofy;
    }

    fn set_projection_distance(&mut self, h: u16) {
        self.h = h;
    }

    fn set_depth_cue(&mut self, dqa: i16, dqb: i32) {
        self.dqa = dqa;
        self.dqb = dqb;
    }

    fn set_z_scale(&mut self, zsf3: i16, zsf4: i16) {
        self.zsf3 = zsf3;
        self.zsf4 = zsf4;
    }

    fn set_far_color(&mut self, color: Color) {
        // stored with 4 fractional bits so a full blend lands on the color
        self.far_color = [
            (color.r as i32) << 4,
            (color.g as i32) << 4,
            (color.b as i32) << 4,
        ];
    }

    fn set_vertex(&mut self, slot: usize, v: PackedVec3) {
        self.vertices[slot] = [v.x.raw(), v.y.raw(), v.z.raw()];
    }

    fn set_ir0(&mut self, ir0: i32) {
        self.ir0 = ir0;
    }

    fn set_ir(&mut self, ir: [i32; 3]) {
        self.ir = ir;
    }

    fn set_rgb(&mut self, color: Color) {
        self.rgb = color;
    }

    fn set_lzcs(&mut self, value: i32) {
        self.lzcs = value;
    }

    fn rtps(&mut self) {
        self.begin();
        self.project(0);
        self.finish();
    }

    fn rtpt(&mut self) {
        self.begin();
        for slot in 0..3 {
            self.project(slot);
        }
        self.finish();
    }

    fn nclip(&mut self) {
        self.begin();
        let [p0, p1, p2] = self.sxy.map(|p| (p.x as i64, p.y as i64));
        let area = p0.0 * p1.1 + p1.0 * p2.1 + p2.0 * p0.1 - p0.0 * p2.1 - p1.0 * p0.1 - p2.0 * p1.1;
        self.mac0 = area as i32;
        self.finish();
    }

    fn avsz3(&mut self) {
        self.begin();
        let sum = self.sz[1] as u32 + self.sz[2] as u32 + self.sz[3] as u32;
        self.average_z(self.zsf3, sum);
        self.finish();
    }

    fn avsz4(&mut self) {
        self.begin();
        let sum = self.sz.iter().map(|&z| z as u32).sum();
        self.average_z(self.zsf4, sum);
        self.finish();
    }

    fn mvmva(&mut self, matrix: MatrixSelect, vertex: VertexSlot, translate: bool) {
        self.begin();
        let m = match matrix {
            MatrixSelect::Rotation => self.rotation,
            MatrixSelect::Light => self.light,
        };
        let v = match vertex {
            VertexSlot::V0 => self.vertices[0].map(i32::from),
            VertexSlot::V1 => self.vertices[1].map(i32::from),
            VertexSlot::V2 => self.vertices[2].map(i32::from),
            VertexSlot::Ir => self.ir,
        };
        let t = if translate { self.translation } else { [0; 3] };
        let sums = self.transform(&m, v, t);
        self.store_mac_ir(sums);
        self.finish();
    }

    fn sqr(&mut self) {
        self.begin();
        let sums = self.ir.map(|v| (v as i64 * v as i64) >> 12);
        self.store_mac_ir(sums);
        self.finish();
    }

    fn gpf(&mut self) {
        self.begin();
        let ir0 = self.ir0 as i64;
        let sums = self.ir.map(|v| (ir0 * v as i64) >> 12);
        self.store_mac_ir(sums);
        self.push_color(self.mac.map(|m| m >> 4));
        self.finish();
    }

    fn dpcs(&mut self) {
        self.begin();
        let channels = [self.rgb.r, self.rgb.g, self.rgb.b];
        let ir0 = self.ir0 as i64;
        let mut sums = [0i64; 3];
        for i in 0..3 {
            let mac = (channels[i] as i64) << 16;
            let delta = ((self.far_color[i] as i64) << 12) - mac;
            let ir = self.saturate_ir(i, delta >> 12) as i64;
            sums[i] = (mac + ir * ir0) >> 12;
        }
        self.store_mac_ir(sums);
        self.push_color(self.mac.map(|m| m >> 4));
        self.finish();
    }

    fn sxy(&self, index: usize) -> ScreenPoint {
        self.sxy[index]
    }

    fn sz(&self, index: usize) -> u16 {
        self.sz[index]
    }

    fn mac0(&self) -> i32 {
        self.mac0
    }

    fn mac(&self, index: usize) -> i32 {
        self.mac[index - 1]
    }

    fn ir0(&self) -> i32 {
        self.ir0
    }

    fn ir(&self, index: usize) -> i32 {
        self.ir[index - 1]
    }

    fn otz(&self) -> u16 {
        self.otz
    }

    fn rgb2(&self) -> Color {
        self.rgb_fifo[2]
    }

    fn lzcr(&self) -> u32 {
        if self.lzcs >= 0 {
            self.lzcs.leading_zeros()
        } else {
            self.lzcs.leading_ones()
        }
    }

    fn flag(&self) -> u32 {
        self.flag
    }
}
