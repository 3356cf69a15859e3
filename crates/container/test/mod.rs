mod block;
mod hash_table;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct Vec3 {
  pub a: f32,
  pub b: f32,
  pub c: f32,
}

impl Vec3 {
  pub fn new(a: f32, b: f32, c: f32) -> Self {
    Self { a, b, c }
  }
}
