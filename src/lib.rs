pub mod astro_util;
pub mod cursor;
pub mod grid;
pub mod grid_labels;
pub mod grid_spacing;
pub mod grid_tracer;
pub mod projection;
pub mod scale_bar;
pub mod sky_bounds;
pub mod wcs;
