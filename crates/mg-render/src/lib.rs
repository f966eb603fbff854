pub mod hit;
pub mod paint;
pub mod style;
pub mod surface;
pub mod thumbnail;
pub mod vello_surface;

pub use hit::{hit_test, hit_test_rect};
pub use paint::{ConnectPreview, Overlay, Projection, paint_scene};
pub use style::{CanvasTheme, Color};
pub use surface::{StrokeStyle, Surface, SvgSurface, TextAlign, TextStyle};
pub use thumbnail::paint_thumbnail;
pub use vello_surface::VelloSurface;
