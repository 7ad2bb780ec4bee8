//! # Feasibility checks
//!
//! Block matching is only defined when the matching window fits inside the image. These checks run
//! before any resizing or matching so an infeasible render is rejected without doing any work.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use log::warn;

use crate::error::*;
use crate::scaling::Dimensions;

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Window size the matcher actually runs with. Even sizes, which occur between a step and the
/// following snap, are bumped to the next odd size.
pub fn effective_kernel_size(kernel_size: u32) -> u32 {
    kernel_size | 1
}

/// Whether a kernel of the given size fits inside the target size.
pub fn check_feasible(target: Dimensions, kernel_size: u32) -> bool {
    kernel_size <= target.height && kernel_size <= target.width
}

/// Whether the window the matcher will run with, see [`effective_kernel_size`], fits inside the
/// target size. Returns an [`Error::InfeasibleKernel`] carrying the requested size otherwise.
pub fn ensure_feasible(target: Dimensions, kernel_size: u32) -> Result<()> {
    if check_feasible(target, effective_kernel_size(kernel_size)) {
        Ok(())
    }
    else {
        warn!("Kernel size {} does not fit in {}", kernel_size, target);
        Err(Error::InfeasibleKernel {
            kernel: kernel_size,
            width: target.width,
            height: target.height
        })
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_larger_than_height_is_infeasible() {
        let target = Dimensions::new(320, 240);
        assert!(!check_feasible(target, 255));
        assert!(check_feasible(target, 21));
    }

    #[test]
    fn kernel_larger_than_width_is_infeasible() {
        assert!(!check_feasible(Dimensions::new(10, 400), 11));
    }

    #[test]
    fn kernel_equal_to_size_is_feasible() {
        assert!(check_feasible(Dimensions::new(15, 15), 15));
        assert!(ensure_feasible(Dimensions::new(15, 15), 15).is_ok());
    }

    #[test]
    fn even_kernel_is_checked_at_its_effective_size() {
        assert_eq!(effective_kernel_size(48), 49);
        assert_eq!(effective_kernel_size(49), 49);

        // 48 fits a 48 pixel high image but the 49 wide window the matcher uses does not
        let target = Dimensions::new(64, 48);
        match ensure_feasible(target, 48) {
            Err(Error::InfeasibleKernel { kernel, .. }) => assert_eq!(kernel, 48),
            other => panic!("unexpected result {:?}", other)
        }
        assert!(ensure_feasible(target, 46).is_ok());
    }

    #[test]
    fn ensure_reports_sizes() {
        match ensure_feasible(Dimensions::new(64, 4), 5) {
            Err(Error::InfeasibleKernel { kernel, width, height }) => {
                assert_eq!((kernel, width, height), (5, 64, 4));
            },
            other => panic!("unexpected result {:?}", other)
        }
    }
}
