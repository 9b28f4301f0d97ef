use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Sub, SubAssign};

use crate::Sample;

/// Fixed-length numeric tuple: a pixel's samples, a kernel row, or a
/// per-channel threshold bound set.
///
/// Arithmetic is elementwise and goes through `f32`, rounding and
/// saturating back to the sample type. Length mismatch between two
/// operands is a precondition failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T: Sample> {
    data: Vec<T>,
}

impl<T: Sample> Vector<T> {
    pub fn new(len: usize) -> Self {
        Self {
            data: vec![T::default(); len],
        }
    }

    pub fn from_slice(samples: &[T]) -> Self {
        Self {
            data: samples.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn dot(&self, other: &Self) -> f32 {
        assert_eq!(self.len(), other.len(), "vector length mismatch");
        self.data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| a.to_f32() * b.to_f32())
            .sum()
    }

    fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            data: self
                .data
                .iter()
                .map(|&a| T::from_f32(f(a.to_f32())))
                .collect(),
        }
    }

    fn zip_map(&self, other: &Self, f: impl Fn(f32, f32) -> f32) -> Self {
        assert_eq!(self.len(), other.len(), "vector length mismatch");
        Self {
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| T::from_f32(f(a.to_f32(), b.to_f32())))
                .collect(),
        }
    }

    fn map_in_place(&mut self, f: impl Fn(f32) -> f32) {
        for a in &mut self.data {
            *a = T::from_f32(f(a.to_f32()));
        }
    }

    fn zip_map_in_place(&mut self, other: &Self, f: impl Fn(f32, f32) -> f32) {
        assert_eq!(self.len(), other.len(), "vector length mismatch");
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            *a = T::from_f32(f(a.to_f32(), b.to_f32()));
        }
    }
}

impl<T: Sample> From<Vec<T>> for Vector<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T: Sample> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T: Sample> IndexMut<usize> for Vector<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}

impl<T: Sample> Add for &Vector<T> {
    type Output = Vector<T>;

    fn add(self, rhs: Self) -> Vector<T> {
        self.zip_map(rhs, |a, b| a + b)
    }
}

impl<T: Sample> Sub for &Vector<T> {
    type Output = Vector<T>;

    fn sub(self, rhs: Self) -> Vector<T> {
        self.zip_map(rhs, |a, b| a - b)
    }
}

impl<T: Sample> Mul for &Vector<T> {
    type Output = Vector<T>;

    fn mul(self, rhs: Self) -> Vector<T> {
        self.zip_map(rhs, |a, b| a * b)
    }
}

impl<T: Sample> Div for &Vector<T> {
    type Output = Vector<T>;

    fn div(self, rhs: Self) -> Vector<T> {
        self.zip_map(rhs, |a, b| {
            assert!(b != 0.0, "zero divisor sample");
            a / b
        })
    }
}

impl<T: Sample> AddAssign<&Vector<T>> for Vector<T> {
    fn add_assign(&mut self, rhs: &Vector<T>) {
        self.zip_map_in_place(rhs, |a, b| a + b);
    }
}

impl<T: Sample> SubAssign<&Vector<T>> for Vector<T> {
    fn sub_assign(&mut self, rhs: &Vector<T>) {
        self.zip_map_in_place(rhs, |a, b| a - b);
    }
}

impl<T: Sample> MulAssign<&Vector<T>> for Vector<T> {
    fn mul_assign(&mut self, rhs: &Vector<T>) {
        self.zip_map_in_place(rhs, |a, b| a * b);
    }
}

impl<T: Sample> DivAssign<&Vector<T>> for Vector<T> {
    fn div_assign(&mut self, rhs: &Vector<T>) {
        self.zip_map_in_place(rhs, |a, b| {
            assert!(b != 0.0, "zero divisor sample");
            a / b
        });
    }
}

impl<T: Sample> AddAssign<f32> for Vector<T> {
    fn add_assign(&mut self, rhs: f32) {
        self.map_in_place(|a| a + rhs);
    }
}

impl<T: Sample> SubAssign<f32> for Vector<T> {
    fn sub_assign(&mut self, rhs: f32) {
        self.map_in_place(|a| a - rhs);
    }
}

impl<T: Sample> MulAssign<f32> for Vector<T> {
    fn mul_assign(&mut self, rhs: f32) {
        self.map_in_place(|a| a * rhs);
    }
}

impl<T: Sample> DivAssign<f32> for Vector<T> {
    fn div_assign(&mut self, rhs: f32) {
        assert!(rhs != 0.0, "zero scalar divisor");
        self.map_in_place(|a| a / rhs);
    }
}

impl<T: Sample> Add<f32> for &Vector<T> {
    type Output = Vector<T>;

    fn add(self, rhs: f32) -> Vector<T> {
        self.map(|a| a + rhs)
    }
}

impl<T: Sample> Sub<f32> for &Vector<T> {
    type Output = Vector<T>;

    fn sub(self, rhs: f32) -> Vector<T> {
        self.map(|a| a - rhs)
    }
}

impl<T: Sample> Mul<f32> for &Vector<T> {
    type Output = Vector<T>;

    fn mul(self, rhs: f32) -> Vector<T> {
        self.map(|a| a * rhs)
    }
}

impl<T: Sample> Div<f32> for &Vector<T> {
    type Output = Vector<T>;

    fn div(self, rhs: f32) -> Vector<T> {
        assert!(rhs != 0.0, "zero scalar divisor");
        self.map(|a| a / rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elementwise_arithmetic() {
        let a = Vector::from_slice(&[10u8, 20, 30]);
        let b = Vector::from_slice(&[1u8, 2, 3]);

        assert_eq!((&a + &b).as_slice(), &[11, 22, 33]);
        assert_eq!((&a - &b).as_slice(), &[9, 18, 27]);
        assert_eq!((&a * &b).as_slice(), &[10, 40, 90]);
        assert_eq!((&a / &b).as_slice(), &[10, 10, 10]);
    }

    #[test]
    fn scalar_arithmetic_saturates() {
        let a = Vector::from_slice(&[100u8, 200]);

        assert_eq!((&a * 2.0).as_slice(), &[200, 255]);
        assert_eq!((&a - 150.0).as_slice(), &[0, 50]);
    }

    #[test]
    fn compound_assignment() {
        let mut a = Vector::from_slice(&[10u8, 20, 30]);
        a += &Vector::from_slice(&[1u8, 2, 3]);
        assert_eq!(a.as_slice(), &[11, 22, 33]);
        a -= &Vector::from_slice(&[1u8, 2, 3]);
        assert_eq!(a.as_slice(), &[10, 20, 30]);
        a *= &Vector::from_slice(&[2u8, 2, 2]);
        assert_eq!(a.as_slice(), &[20, 40, 60]);
        a /= &Vector::from_slice(&[2u8, 4, 6]);
        assert_eq!(a.as_slice(), &[10, 10, 10]);

        a += 245.0;
        assert_eq!(a.as_slice(), &[255, 255, 255]);
        a -= 55.0;
        a *= 0.5;
        a /= 2.0;
        assert_eq!(a.as_slice(), &[50, 50, 50]);
    }

    #[test]
    #[should_panic(expected = "zero scalar divisor")]
    fn compound_zero_scalar_divisor_panics() {
        let mut a = Vector::from_slice(&[1u8, 2]);
        a /= 0.0;
    }

    #[test]
    fn dot_product() {
        let a = Vector::from_slice(&[1.0f32, 2.0, 3.0]);
        let b = Vector::from_slice(&[4.0f32, 5.0, 6.0]);
        assert_eq!(a.dot(&b), 32.0);
    }

    #[test]
    #[should_panic(expected = "vector length mismatch")]
    fn length_mismatch_panics() {
        let a = Vector::from_slice(&[1u8, 2]);
        let b = Vector::from_slice(&[1u8, 2, 3]);
        let _ = &a + &b;
    }

    #[test]
    #[should_panic(expected = "zero divisor sample")]
    fn zero_divisor_panics() {
        let a = Vector::from_slice(&[1u8, 2]);
        let b = Vector::from_slice(&[1u8, 0]);
        let _ = &a / &b;
    }
}
