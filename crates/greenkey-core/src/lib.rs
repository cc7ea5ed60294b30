pub mod batch;
pub mod color;
pub mod composite;
pub mod consts;
pub mod error;
pub mod filters;
pub mod frame;
pub mod framing;
pub mod io;
pub mod locate;
pub mod mask;
pub mod pipeline;
pub mod refine;
pub mod segment;
pub mod spill;
