//! Radiometric light-field computations over 2D pixel grids.
//!
//! Three scenarios are covered:
//! - illuminance on a plane from a point light, restricted to a circular
//!   aperture ([`illumination`]),
//! - Blinn-Phong shading of a sphere seen through a virtual screen
//!   ([`shading`]),
//! - per-channel mean brightness of a raster image ([`channels`]).
//!
//! Engines are pure functions of their inputs. Geometry is given in
//! millimeters and converted to meters internally, so illuminance comes out in
//! W/m². Results are owned [`ScalarField`]s that can be normalized to 8-bit
//! grayscale and sliced into cross sections for plotting.
//!
//! # Quick Start
//!
//! ```no_run
//! use lumengrid::prelude::*;
//!
//! # fn main() -> lumengrid::Result<()> {
//! let scene = PlaneConfig::default().validate()?;
//! let field = scene.compute()?;
//! field.normalize().save("illumination.png")?;
//! # Ok(())
//! # }
//! ```

// Public API - exposed to library consumers
pub mod channels;
pub mod config;
pub mod error;
pub mod field;
pub mod illumination;
pub mod light;
pub mod math;
pub mod screen;
pub mod section;
pub mod shading;
pub mod units;

// Re-export commonly needed types at crate root for convenience
pub use error::{Error, Result};
pub use field::{normalize, Field, NormalizedField, ScalarField};
pub use light::LightSource;

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use lumengrid::prelude::*;
/// ```
pub mod prelude {
    // Configuration
    pub use crate::config::{PlaneConfig, SphereConfig};

    // Fields
    pub use crate::field::{normalize, Field, FieldStats, NormalizedField, ScalarField};
    pub use crate::section::{horizontal_section, vertical_section, Axis, CrossSection};

    // Planar illumination
    pub use crate::illumination::{AreaSize, Bounds, MaskCircle, PlanarScene};

    // Sphere shading
    pub use crate::shading::{PhongParams, RenderControl, ScreenSize, Sphere, SphereScene};

    // Shared types
    pub use crate::light::LightSource;
    pub use crate::math::vec3::Vec3;
    pub use crate::screen::Resolution;
}
