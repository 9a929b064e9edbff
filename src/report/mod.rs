/// Report composition: result sets of every predictor → one figure.

pub mod composer;
pub mod figure;
