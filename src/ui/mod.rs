pub mod export;
pub mod notice;
pub mod panels;
pub mod plot;
pub mod tables;
pub mod view3d;
