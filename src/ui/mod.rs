/// Browser-facing views: query binding, page template and SVG figure.

pub mod form;
pub mod page;
pub mod plot;
