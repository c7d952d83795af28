//! Stack arithmetic for inventory quantities.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Result of taking some quantity out of a stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuantityChangeResult {
    /// Stack keeps the remaining quantity
    Updated(u16),
    /// Stack is emptied and its slot frees up
    Depleted,
}

impl QuantityChangeResult {
    /// Take `amount` from `current`. Taking more than is present is an error.
    pub fn subtract(current: u16, amount: u16) -> Result<Self, DomainError> {
        if amount == 0 {
            return Err(DomainError::InvalidItemQuantity);
        }
        match current.checked_sub(amount) {
            None => Err(DomainError::InsufficientItemQuantity),
            Some(0) => Ok(Self::Depleted),
            Some(rest) => Ok(Self::Updated(rest)),
        }
    }

    /// Check if this result indicates the stack should be removed
    pub fn should_remove(&self) -> bool {
        matches!(self, Self::Depleted)
    }
}

/// Add `amount` to a stack bounded by `max`. Exceeding it is an error, never a clamp.
pub fn checked_stack_add(current: u16, amount: u16, max: u16) -> Result<u16, DomainError> {
    if amount == 0 {
        return Err(DomainError::InvalidItemQuantity);
    }
    current
        .checked_add(amount)
        .filter(|total| *total <= max)
        .ok_or(DomainError::ItemStackOverflow { max })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtract_partial() {
        assert_eq!(
            QuantityChangeResult::subtract(5, 3),
            Ok(QuantityChangeResult::Updated(2))
        );
    }

    #[test]
    fn test_subtract_exact() {
        assert!(QuantityChangeResult::subtract(5, 5).unwrap().should_remove());
    }

    #[test]
    fn test_subtract_too_much() {
        assert_eq!(
            QuantityChangeResult::subtract(2, 3),
            Err(DomainError::InsufficientItemQuantity)
        );
    }

    #[test]
    fn test_stack_add_bounds() {
        assert_eq!(checked_stack_add(8, 2, 10), Ok(10));
        assert_eq!(
            checked_stack_add(9, 2, 10),
            Err(DomainError::ItemStackOverflow { max: 10 })
        );
        assert_eq!(
            checked_stack_add(u16::MAX, 1, u16::MAX),
            Err(DomainError::ItemStackOverflow { max: u16::MAX })
        );
    }
}
