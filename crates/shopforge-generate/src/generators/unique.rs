use std::collections::HashSet;

use crate::errors::GenerationError;

/// Bounded-retry source of values that never repeats within one run.
#[derive(Debug)]
pub struct UniqueValues {
    column: &'static str,
    seen: HashSet<String>,
    max_attempts: u32,
}

impl UniqueValues {
    pub fn new(column: &'static str, max_attempts: u32) -> Self {
        Self {
            column,
            seen: HashSet::new(),
            max_attempts,
        }
    }

    /// Draw from `produce` until it yields an unseen value.
    pub fn next_with(
        &mut self,
        mut produce: impl FnMut() -> String,
    ) -> Result<String, GenerationError> {
        for _ in 0..self.max_attempts {
            let value = produce();
            if !self.seen.contains(&value) {
                self.seen.insert(value.clone());
                return Ok(value);
            }
        }
        Err(GenerationError::Exhausted {
            column: self.column.to_string(),
            attempts: self.max_attempts,
        })
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retries_past_duplicates() {
        let mut unique = UniqueValues::new("email", 5);
        let mut values = ["a", "a", "a", "b"].into_iter();
        assert_eq!(unique.next_with(|| "a".to_string()).unwrap(), "a");
        let next = unique
            .next_with(|| values.next().unwrap_or("z").to_string())
            .unwrap();
        assert_eq!(next, "b");
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn exhausted_source_fails() {
        let mut unique = UniqueValues::new("email", 3);
        unique.next_with(|| "same".to_string()).unwrap();
        let err = unique
            .next_with(|| "same".to_string())
            .expect_err("exhausted");
        assert!(matches!(
            err,
            GenerationError::Exhausted { ref column, attempts: 3 } if column == "email"
        ));
    }
}
