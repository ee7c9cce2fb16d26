pub mod export;
pub mod hit;
pub mod inpaint;
pub mod render;
pub mod shapes;
pub mod transform;
