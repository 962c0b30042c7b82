pub mod renderer;
pub mod wav;
