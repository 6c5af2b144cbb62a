mod classification;
mod common;
mod filling;
mod resolution;
