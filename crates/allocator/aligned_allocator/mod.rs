mod allocator;

#[cfg(test)]
mod test;

pub use allocator::*;
