pub mod camera;
pub mod categories;
pub mod demographics;
pub mod page;
pub mod tag;

pub type CameraId = i64;
pub type TagId = i64;
pub type DemographicsConfigId = i64;
