//! Transformations between the representations of a modelled quantity.
//!
//! # Example
//!
//! ```
//! use anofox_curvefit::transform::{PowerTranslator, Space, SpaceTranslator};
//!
//! let raw = vec![1.0, 10.0, 100.0];
//! let logged = PowerTranslator.translate(&raw, Space::Linear, Space::Log).unwrap();
//! let back = PowerTranslator.translate(&logged, Space::Log, Space::Linear).unwrap();
//! assert!((back[2] - 100.0).abs() < 1e-9);
//! ```

pub mod space;

pub use space::{PowerTranslator, Space, SpaceTranslator};
