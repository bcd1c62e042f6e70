use std::cmp::Ordering;

use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value is strictly greater than zero.
///
/// Works with any `T: PartialOrd + Zero`, including `f64` and `uom`
/// quantities such as `Length`.
///
/// # Examples
///
/// ```
/// use nozzle_core::constraint::StrictlyPositive;
///
/// let d = StrictlyPositive::new(0.1517).unwrap();
/// assert_eq!(d.as_ref(), &0.1517);
///
/// assert!(StrictlyPositive::new(0.0).is_err());
/// assert!(StrictlyPositive::new(-1.0).is_err());
/// assert!(StrictlyPositive::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StrictlyPositive;

impl StrictlyPositive {
    /// Constructs `Constrained<T, StrictlyPositive>` if the value is greater than zero.
    ///
    /// # Errors
    ///
    /// - [`ConstraintError::Zero`] if the value equals zero.
    /// - [`ConstraintError::Negative`] if the value is below zero.
    /// - [`ConstraintError::NotANumber`] if the comparison is undefined (NaN).
    pub fn new<T: PartialOrd + Zero>(
        value: T,
    ) -> Result<Constrained<T, StrictlyPositive>, ConstraintError> {
        Constrained::<T, StrictlyPositive>::new(value)
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for StrictlyPositive {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            Some(Ordering::Greater) => Ok(()),
            Some(Ordering::Equal) => Err(ConstraintError::Zero),
            Some(Ordering::Less) => Err(ConstraintError::Negative),
            None => Err(ConstraintError::NotANumber),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{f64::Length, length::millimeter};

    #[test]
    fn floats() {
        assert!(StrictlyPositive::new(2.0).is_ok());
        assert_eq!(StrictlyPositive::new(0.0), Err(ConstraintError::Zero));
        assert_eq!(StrictlyPositive::new(-0.5), Err(ConstraintError::Negative));
        assert_eq!(
            StrictlyPositive::new(f64::NAN),
            Err(ConstraintError::NotANumber)
        );
    }

    #[test]
    fn lengths() {
        let throat = Length::new::<millimeter>(151.7);
        let positive = StrictlyPositive::new(throat).unwrap();
        assert_eq!(positive.into_inner(), throat);

        assert!(StrictlyPositive::new(Length::new::<millimeter>(0.0)).is_err());
        assert!(StrictlyPositive::new(Length::new::<millimeter>(-3.0)).is_err());
    }
}
