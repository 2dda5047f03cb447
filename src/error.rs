//! Typed error types for the few operations in this crate that can fail at
//! runtime rather than via a contract-violation panic.

use thiserror::Error;

/// Failure mode of the symmetric eigendecomposition used to find the
/// largest-inertia axis of a point cloud.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MatEigError {
    /// The Jacobi rotation sweep did not drive the off-diagonal norm below
    /// tolerance within the allotted number of sweeps.
    #[error("Jacobi eigensolver did not converge")]
    NotConverged,
}
