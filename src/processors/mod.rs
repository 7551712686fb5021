//! Text processors applied around model inference

pub mod indic;
