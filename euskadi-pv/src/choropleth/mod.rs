pub mod color_scale;
pub mod export;
#[cfg(feature = "polars")]
pub mod frame;
