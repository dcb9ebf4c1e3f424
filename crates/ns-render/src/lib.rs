pub mod handles;
pub mod hit;
pub mod paint;
pub mod surface;

pub use handles::{connector_handles, subnet_handles};
pub use hit::{CONNECT_PROXIMITY, Hit, farther_endpoint, hit_test, item_at};
pub use paint::{PaintOptions, paint_scene, size_text_bounds, sync_text_bounds};
pub use surface::{DrawOp, Font, NullSurface, Pen, RecordingSurface, Scale, Surface};
