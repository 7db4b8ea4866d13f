//! Dense kernels over flat `f32` buffers
//!
//! Every function writes into a caller-supplied output buffer and never
//! allocates, so the same buffers can be reused across simulation steps.
//! Matrices are stored row-major with a stride equal to the column count.
//!
//! Lengths are part of the calling contract. A mismatch panics instead of
//! truncating to the shorter operand.

/// `out[i] = src[i]`
#[inline]
pub fn copy(out: &mut [f32], src: &[f32]) {
    assert_eq!(out.len(), src.len(), "copy: output length mismatch");
    out.copy_from_slice(src);
}

/// Sum of `a[i] * b[i]`
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "dot: operand length mismatch");
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Elementwise product: `out[i] = a[i] * b[i]`
#[inline]
pub fn hadamard(out: &mut [f32], a: &[f32], b: &[f32]) {
    check_binary("hadamard", out, a, b);
    for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
        *o = x * y;
    }
}

/// Scaled accumulate: `out[i] = a[i] + b[i] * s`
#[inline]
pub fn axpy(out: &mut [f32], a: &[f32], b: &[f32], s: f32) {
    check_binary("axpy", out, a, b);
    for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
        *o = x + y * s;
    }
}

/// In-place scaled accumulate: `x[i] += b[i] * s`
///
/// Same result as `axpy(x, x, b, s)`, which the borrow checker rejects.
#[inline]
pub fn axpy_in_place(x: &mut [f32], b: &[f32], s: f32) {
    assert_eq!(x.len(), b.len(), "axpy_in_place: operand length mismatch");
    for (o, y) in x.iter_mut().zip(b) {
        *o += y * s;
    }
}

/// `out[i] = a[i] + b[i]`
#[inline]
pub fn add(out: &mut [f32], a: &[f32], b: &[f32]) {
    check_binary("add", out, a, b);
    for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
        *o = x + y;
    }
}

/// Matrix-vector product with `m` row-major, `out.len()` rows and `v.len()` columns
///
/// `out[i] = Σ_j m[i * n + j] * v[j]`
#[allow(clippy::needless_range_loop)]
pub fn mat_vec(out: &mut [f32], m: &[f32], v: &[f32]) {
    let cols = v.len();
    assert_eq!(
        m.len(),
        out.len() * cols,
        "mat_vec: matrix is not {}x{}",
        out.len(),
        cols
    );
    for i in 0..out.len() {
        let row = &m[i * cols..(i + 1) * cols];
        out[i] = row.iter().zip(v).map(|(a, b)| a * b).sum();
    }
}

/// Linear combination: `out[i] = a[i] * sa + b[i] * sb`
#[inline]
pub fn combine2(out: &mut [f32], a: &[f32], sa: f32, b: &[f32], sb: f32) {
    check_binary("combine2", out, a, b);
    for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
        *o = x * sa + y * sb;
    }
}

#[inline]
fn check_binary(op: &str, out: &[f32], a: &[f32], b: &[f32]) {
    assert!(
        out.len() == a.len() && a.len() == b.len(),
        "{}: length mismatch (out {}, a {}, b {})",
        op,
        out.len(),
        a.len(),
        b.len()
    );
}
