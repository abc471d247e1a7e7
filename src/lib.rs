//! Dotted land-mass globe: samples an equirectangular map, places dots on a
//! sphere where the map shows land, and animates them for a terminal front end.

pub mod anim;
pub mod braille;
pub mod config;
pub mod export;
pub mod geo;
pub mod globe;
pub mod hash;
pub mod interaction;
pub mod land;
pub mod raster;
