//! Host parallelism hint

/// Number of logical CPUs reported by the host.
///
/// Only a hint for choosing a thread count; classification never sizes its
/// pool from this value on its own.
#[must_use]
pub fn available_parallelism() -> usize {
    num_cpus::get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_parallelism_is_positive() {
        assert!(available_parallelism() >= 1);
    }
}
