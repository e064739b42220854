//! Concrete operator installed by the binary.

/// Infrastructure-backed implementation of every operator port.
///
/// Stateless: each call parses the configuration it is given and opens
/// whatever it needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Operator;
